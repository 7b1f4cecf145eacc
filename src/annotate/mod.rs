// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Temporary, reversible annotation of a surface with labels.
//!
//! An [`Annotator`] turns assignments into [`Annotations`]; those are restored exactly once,
//! either explicitly or by dropping the [`AnnotationGuard`] that owns them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::{OverlayId, OverlayStyle, Surface, SurfaceError, TextEdit};
use crate::model::{Assignment, Label, TextRange};

mod overlay;
mod substitution;

pub use overlay::OverlayAnnotator;
pub use substitution::SubstitutionAnnotator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStrategy {
    /// Labels are drawn as inlays; text is never touched.
    #[default]
    Overlay,
    /// Labels overwrite the start of each token and are written back afterwards.
    Substitution,
}

impl AnnotationStrategy {
    pub fn annotator(self, style: LabelStyle) -> Box<dyn Annotator> {
        match self {
            Self::Overlay => Box::new(OverlayAnnotator::new(style)),
            Self::Substitution => Box::new(SubstitutionAnnotator::new(style)),
        }
    }
}

impl fmt::Display for AnnotationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overlay => "overlay",
            Self::Substitution => "substitution",
        })
    }
}

impl FromStr for AnnotationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overlay" => Ok(Self::Overlay),
            "substitution" => Ok(Self::Substitution),
            other => Err(format!("unknown strategy `{other}` (expected overlay|substitution)")),
        }
    }
}

/// Colors handed to the surface for every overlay an annotator creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    pub dim_color: String,
    pub label_color: String,
    pub label_background: String,
}

impl LabelStyle {
    fn dim(&self) -> OverlayStyle {
        OverlayStyle::Dim {
            color: self.dim_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    #[error("labels `{first}` and `{second}` would overwrite each other")]
    OverlappingLabels { first: Label, second: Label },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

pub trait Annotator {
    /// Shows every label at its token and dims each scanned line.
    ///
    /// On error nothing stays behind: partial work is restored before returning.
    fn apply(
        &self,
        surface: &mut dyn Surface,
        assignments: &[Assignment],
        scanned_lines: &[usize],
    ) -> Result<Annotations, AnnotateError>;
}

/// What one text substitution needs to be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// The range as captured before the edit, clamped to the line end.
    pub original_range: TextRange,
    /// The range the label occupies after the edit.
    pub applied_range: TextRange,
    pub label: Label,
    pub original_text: String,
    pub overlay: OverlayId,
}

/// Everything a single apply put on the surface.
#[derive(Debug, Default)]
#[must_use = "annotations stay on the surface until restored"]
pub struct Annotations {
    records: Vec<AnnotationRecord>,
    labels: Vec<OverlayId>,
    highlights: Vec<OverlayId>,
}

impl Annotations {
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn overlay_count(&self) -> usize {
        self.records.len() + self.labels.len() + self.highlights.len()
    }

    fn push_label(&mut self, overlay: OverlayId) {
        self.labels.push(overlay);
    }

    fn push_record(&mut self, record: AnnotationRecord) {
        self.records.push(record);
    }

    /// Dims each scanned line (full line, current length).
    fn dim_lines(
        &mut self,
        surface: &mut dyn Surface,
        style: &LabelStyle,
        lines: &[usize],
    ) -> Result<(), SurfaceError> {
        for &line in lines {
            let len = surface.line_text(line).map_or(0, |text| text.chars().count());
            let overlay = surface.create_overlay(style.dim());
            self.highlights.push(overlay);
            surface.apply_overlay(overlay, &[TextRange::new(line, 0, len)])?;
        }
        Ok(())
    }

    /// Writes back every substituted range in one batch, then disposes all overlays.
    ///
    /// A range that no longer holds its label was edited by someone else and is left alone.
    /// Overlays are disposed even when the write-back fails; the edit error is returned.
    pub fn restore(self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        let edits = self
            .records
            .iter()
            .filter(|record| {
                let found = surface.get_text(record.applied_range);
                let intact = record.label == found.as_str();
                if !intact {
                    tracing::warn!(
                        label = %record.label,
                        range = %record.applied_range,
                        %found,
                        "label text was edited; leaving it in place"
                    );
                }
                intact
            })
            .map(|record| TextEdit::replace(record.applied_range, record.original_text.clone()))
            .collect::<Vec<_>>();
        let result = if edits.is_empty() {
            Ok(())
        } else {
            surface.apply_edits(&edits)
        };

        for overlay in self
            .records
            .iter()
            .map(|record| record.overlay)
            .chain(self.labels)
            .chain(self.highlights)
        {
            surface.dispose_overlay(overlay);
        }

        result
    }
}

/// Restores its annotations when dropped unless [`AnnotationGuard::restore`] ran first.
///
/// The guard borrows the surface for the whole annotated span; use
/// [`AnnotationGuard::surface`] to keep talking to it (prompting, moving the cursor).
pub struct AnnotationGuard<'s> {
    surface: &'s mut dyn Surface,
    annotations: Option<Annotations>,
}

impl<'s> AnnotationGuard<'s> {
    pub fn new(surface: &'s mut dyn Surface, annotations: Annotations) -> Self {
        Self {
            surface,
            annotations: Some(annotations),
        }
    }

    pub fn surface(&mut self) -> &mut (dyn Surface + 's) {
        &mut *self.surface
    }

    pub fn restore(mut self) -> Result<(), SurfaceError> {
        match self.annotations.take() {
            Some(annotations) => annotations.restore(&mut *self.surface),
            None => Ok(()),
        }
    }
}

impl Drop for AnnotationGuard<'_> {
    fn drop(&mut self) {
        if let Some(annotations) = self.annotations.take() {
            if let Err(err) = annotations.restore(&mut *self.surface) {
                tracing::warn!(%err, "restoring annotations on drop failed");
            }
        }
    }
}
