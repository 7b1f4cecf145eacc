// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{AnnotateError, AnnotationRecord, Annotations, Annotator, LabelStyle};
use crate::host::{OverlayStyle, Surface, SurfaceError, TextEdit};
use crate::model::{Assignment, TextRange};

/// Overwrites `[token start, token start + label width)` with the label text.
///
/// All replacements go out as one batch computed against the unedited document; the
/// captured originals are written back by [`Annotations::restore`].
#[derive(Debug, Clone)]
pub struct SubstitutionAnnotator {
    style: LabelStyle,
}

impl SubstitutionAnnotator {
    pub fn new(style: LabelStyle) -> Self {
        Self { style }
    }

    fn highlight(&self) -> OverlayStyle {
        OverlayStyle::Highlight {
            color: self.style.label_color.clone(),
            background: self.style.label_background.clone(),
        }
    }
}

struct Planned<'a> {
    assignment: &'a Assignment,
    applied_range: TextRange,
}

fn check_overlaps(planned: &[Planned<'_>]) -> Result<(), AnnotateError> {
    let mut order = planned.iter().collect::<Vec<_>>();
    order.sort_by_key(|entry| (entry.applied_range.line, entry.applied_range.start));
    for pair in order.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if first.applied_range.overlaps(&second.applied_range)
            || first.applied_range.start_position() == second.applied_range.start_position()
        {
            return Err(AnnotateError::OverlappingLabels {
                first: first.assignment.label.clone(),
                second: second.assignment.label.clone(),
            });
        }
    }
    Ok(())
}

impl Annotator for SubstitutionAnnotator {
    fn apply(
        &self,
        surface: &mut dyn Surface,
        assignments: &[Assignment],
        scanned_lines: &[usize],
    ) -> Result<Annotations, AnnotateError> {
        let planned = assignments
            .iter()
            .map(|assignment| {
                let start = assignment.token.character();
                Planned {
                    assignment,
                    applied_range: TextRange::new(
                        assignment.token.line(),
                        start,
                        start + assignment.label.width(),
                    ),
                }
            })
            .collect::<Vec<_>>();
        check_overlaps(&planned)?;

        let captured = planned
            .iter()
            .map(|entry| surface.get_text(entry.applied_range))
            .collect::<Vec<_>>();
        let edits = planned
            .iter()
            .map(|entry| TextEdit::replace(entry.applied_range, entry.assignment.label.as_str()))
            .collect::<Vec<_>>();
        if !edits.is_empty() {
            surface.apply_edits(&edits)?;
        }

        let mut annotations = Annotations::default();
        let result = (|| -> Result<(), SurfaceError> {
            for (entry, original_text) in planned.iter().zip(captured) {
                let range = entry.applied_range;
                let overlay = surface.create_overlay(self.highlight());
                annotations.push_record(AnnotationRecord {
                    original_range: TextRange::new(
                        range.line,
                        range.start,
                        range.start + original_text.chars().count(),
                    ),
                    applied_range: range,
                    label: entry.assignment.label.clone(),
                    original_text,
                    overlay,
                });
                surface.apply_overlay(overlay, &[range])?;
            }
            annotations.dim_lines(surface, &self.style, scanned_lines)
        })();

        if let Err(err) = result {
            if let Err(restore_err) = annotations.restore(surface) {
                tracing::warn!(%restore_err, "rolling back substitution failed");
            }
            return Err(err.into());
        }

        tracing::debug!(
            labels = assignments.len(),
            lines = scanned_lines.len(),
            "substitution annotations applied"
        );
        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::SubstitutionAnnotator;
    use crate::annotate::tests::{plan, style};
    use crate::annotate::{AnnotateError, Annotator};
    use crate::host::{OverlayStyle, ScriptedSurface, Surface};
    use crate::labels::{gen_labels, HintAlphabet, LabelScheme};
    use crate::model::{Assignment, Label, LineRange, TextRange, Token};

    #[test]
    fn labels_replace_token_starts_until_restored() {
        let mut surface = ScriptedSurface::new("foo bar_1 baz\nqux");
        let (assignments, lines) = plan(&surface);

        let annotations = SubstitutionAnnotator::new(style())
            .apply(&mut surface, &assignments, &lines)
            .expect("apply");
        assert_eq!(surface.text(), "aoo bar_1 caz\ndux");
        assert_eq!(surface.document_version(), 1);

        let records = annotations.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].original_text, "b");
        assert_eq!(records[1].original_range, TextRange::new(0, 4, 5));

        let highlighted = surface
            .doc()
            .overlays()
            .filter(|(_, overlay)| matches!(overlay.style, OverlayStyle::Highlight { .. }))
            .count();
        assert_eq!(highlighted, 4);

        annotations.restore(&mut surface).expect("restore");
        assert_eq!(surface.text(), "foo bar_1 baz\nqux");
        assert_eq!(surface.doc().overlay_count(), 0);
    }

    #[test]
    fn two_letter_labels_may_cover_the_separator() {
        let text = (0..27).map(|i| format!("w{i}")).collect::<Vec<_>>().join("\n") + "\nx y";
        let mut surface = ScriptedSurface::new(&text);
        let (assignments, lines) = plan(&surface);
        assert_eq!(assignments[27].label, "bb");
        assert_eq!(assignments[28].label, "bc");

        let annotations = SubstitutionAnnotator::new(style())
            .apply(&mut surface, &assignments, &lines)
            .expect("apply");
        assert_eq!(surface.doc().line(27), Some("bbbc"));

        annotations.restore(&mut surface).expect("restore");
        assert_eq!(surface.text(), text);
    }

    #[rstest]
    #[case("a", "ba", "ba")]
    #[case("ab", "bcd", "bcd")]
    #[case("", "xy", "xy")]
    fn label_running_past_line_end_appends_and_restores(
        #[case] line: &str,
        #[case] label: &str,
        #[case] edited: &str,
    ) {
        let mut surface = ScriptedSurface::new(&format!("{line}\nnext"));
        let assignments = vec![Assignment {
            label: Label::new(label),
            token: Token::new(0, 0, "t"),
        }];

        let annotations = SubstitutionAnnotator::new(style())
            .apply(&mut surface, &assignments, &[0])
            .expect("apply");
        assert_eq!(surface.doc().line(0), Some(edited));
        assert_eq!(annotations.records()[0].original_text, line);
        assert_eq!(annotations.records()[0].original_range, TextRange::new(0, 0, line.len()));

        annotations.restore(&mut surface).expect("restore");
        assert_eq!(surface.text(), format!("{line}\nnext"));
    }

    #[test]
    fn overlapping_labels_are_refused_before_editing() {
        let mut surface = ScriptedSurface::new("x y z");
        let assignments = vec![
            Assignment {
                label: Label::new("baa"),
                token: Token::new(0, 0, "x"),
            },
            Assignment {
                label: Label::new("bab"),
                token: Token::new(0, 2, "y"),
            },
        ];

        let err = SubstitutionAnnotator::new(style())
            .apply(&mut surface, &assignments, &[0])
            .unwrap_err();
        assert_eq!(
            err,
            AnnotateError::OverlappingLabels {
                first: Label::new("baa"),
                second: Label::new("bab"),
            }
        );
        assert_eq!(surface.text(), "x y z");
        assert_eq!(surface.document_version(), 0);
        assert_eq!(surface.doc().overlay_count(), 0);
    }

    #[test]
    fn duplicate_tokens_from_overlapping_ranges_are_refused() {
        let mut surface = ScriptedSurface::new("foo")
            .with_visible_ranges(vec![LineRange::single(0), LineRange::single(0)]);
        let scan = crate::scan::scan_surface(&surface);
        let labels = gen_labels(scan.tokens.len(), LabelScheme::Legacy, &HintAlphabet::default());
        let assignments = Assignment::zip(labels, scan.tokens);

        let err = SubstitutionAnnotator::new(style())
            .apply(&mut surface, &assignments, &scan.lines)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::OverlappingLabels { .. }));
        assert_eq!(surface.text(), "foo");
    }
}
