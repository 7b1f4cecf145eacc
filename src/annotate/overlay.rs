// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{AnnotateError, Annotations, Annotator, LabelStyle};
use crate::host::{OverlayStyle, Surface};
use crate::model::{Assignment, TextRange};

/// Draws labels as inlays at each token start. Never edits text.
#[derive(Debug, Clone)]
pub struct OverlayAnnotator {
    style: LabelStyle,
}

impl OverlayAnnotator {
    pub fn new(style: LabelStyle) -> Self {
        Self { style }
    }
}

impl Annotator for OverlayAnnotator {
    fn apply(
        &self,
        surface: &mut dyn Surface,
        assignments: &[Assignment],
        scanned_lines: &[usize],
    ) -> Result<Annotations, AnnotateError> {
        let mut annotations = Annotations::default();

        let result = annotations.dim_lines(surface, &self.style, scanned_lines).and_then(|()| {
            for assignment in assignments {
                let overlay = surface.create_overlay(OverlayStyle::Inlay {
                    text: assignment.label.to_string(),
                    color: self.style.label_color.clone(),
                    background: self.style.label_background.clone(),
                });
                annotations.push_label(overlay);
                surface.apply_overlay(overlay, &[TextRange::caret(assignment.token.position())])?;
            }
            Ok(())
        });

        if let Err(err) = result {
            if let Err(restore_err) = annotations.restore(surface) {
                tracing::warn!(%restore_err, "rolling back overlays failed");
            }
            return Err(err.into());
        }

        tracing::debug!(
            labels = assignments.len(),
            lines = scanned_lines.len(),
            "overlay annotations applied"
        );
        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::OverlayAnnotator;
    use crate::annotate::tests::{plan, style};
    use crate::annotate::{AnnotateError, Annotator};
    use crate::host::{
        OverlayId, OverlayStyle, ScriptedSurface, Surface, SurfaceError, TextEdit,
    };
    use crate::model::{LineRange, Position, TextRange};

    /// Forwards to a [`ScriptedSurface`] but rejects the `fail_at`-th overlay placement.
    struct RejectingSurface {
        inner: ScriptedSurface,
        placed: usize,
        fail_at: usize,
    }

    impl Surface for RejectingSurface {
        fn visible_line_ranges(&self) -> Vec<LineRange> {
            self.inner.visible_line_ranges()
        }

        fn line_text(&self, line: usize) -> Option<String> {
            self.inner.line_text(line)
        }

        fn line_count(&self) -> usize {
            self.inner.line_count()
        }

        fn get_text(&self, range: TextRange) -> String {
            self.inner.get_text(range)
        }

        fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), SurfaceError> {
            self.inner.apply_edits(edits)
        }

        fn create_overlay(&mut self, style: OverlayStyle) -> OverlayId {
            self.inner.create_overlay(style)
        }

        fn apply_overlay(
            &mut self,
            overlay: OverlayId,
            ranges: &[TextRange],
        ) -> Result<(), SurfaceError> {
            self.placed += 1;
            if self.placed == self.fail_at {
                return Err(SurfaceError::UnknownOverlay(overlay));
            }
            self.inner.apply_overlay(overlay, ranges)
        }

        fn dispose_overlay(&mut self, overlay: OverlayId) {
            self.inner.dispose_overlay(overlay);
        }

        fn prompt_for_line(&mut self, placeholder: &str) -> Option<String> {
            self.inner.prompt_for_line(placeholder)
        }

        fn show_error(&mut self, message: &str) {
            self.inner.show_error(message);
        }

        fn set_cursor_and_reveal(&mut self, position: Position) {
            self.inner.set_cursor_and_reveal(position);
        }

        fn document_version(&self) -> u64 {
            self.inner.document_version()
        }
    }

    #[test]
    fn inlays_sit_at_token_starts_and_text_is_untouched() {
        let mut surface = ScriptedSurface::new("foo bar\n\nbaz");
        let (assignments, lines) = plan(&surface);

        let annotations = OverlayAnnotator::new(style())
            .apply(&mut surface, &assignments, &lines)
            .expect("apply");

        let inlays = surface
            .doc()
            .overlays()
            .filter_map(|(_, overlay)| match &overlay.style {
                OverlayStyle::Inlay { text, .. } => Some((text.clone(), overlay.ranges.clone())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            inlays,
            vec![
                ("a".to_owned(), vec![TextRange::new(0, 0, 0)]),
                ("b".to_owned(), vec![TextRange::new(0, 4, 4)]),
                ("c".to_owned(), vec![TextRange::new(2, 0, 0)]),
            ]
        );

        let dimmed = surface
            .doc()
            .overlays()
            .filter(|(_, overlay)| matches!(overlay.style, OverlayStyle::Dim { .. }))
            .flat_map(|(_, overlay)| overlay.ranges.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            dimmed,
            vec![TextRange::new(0, 0, 7), TextRange::new(1, 0, 0), TextRange::new(2, 0, 3)]
        );

        assert_eq!(surface.document_version(), 0);
        assert_eq!(annotations.overlay_count(), 6);
        annotations.restore(&mut surface).expect("restore");
        assert_eq!(surface.doc().overlay_count(), 0);
        assert_eq!(surface.text(), "foo bar\n\nbaz");
        assert_eq!(surface.document_version(), 0);
    }

    #[test]
    fn failed_placement_rolls_back_every_overlay() {
        let inner = ScriptedSurface::new("foo bar\nbaz");
        let (assignments, lines) = plan(&inner);
        // two dims, then the second label
        let mut surface = RejectingSurface {
            inner,
            placed: 0,
            fail_at: 4,
        };

        let err = OverlayAnnotator::new(style())
            .apply(&mut surface, &assignments, &lines)
            .expect_err("placement rejected");

        assert!(matches!(err, AnnotateError::Surface(SurfaceError::UnknownOverlay(_))));
        assert!(surface.inner.peak_overlays() >= 4);
        assert_eq!(surface.inner.doc().overlay_count(), 0);
        assert_eq!(surface.inner.text(), "foo bar\nbaz");
    }
}
