// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The capabilities hop needs from a host editing surface.
//!
//! A host (terminal viewer, editor plugin, test double) implements [`Surface`]; everything
//! else in the crate talks to the document only through it. [`DocumentBuffer`] is the
//! in-memory document shared by the bundled surfaces.

use std::fmt;

use thiserror::Error;

use crate::model::{LineRange, Position, TextRange};

pub mod buffer;
pub mod scripted;

pub use buffer::{DocumentBuffer, Overlay};
pub use scripted::ScriptedSurface;

/// Opaque handle for a visual decoration created by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// How an overlay is drawn. Colors are CSS-like strings (`#rrggbb`, `rgba(..)`, `cyan`) and
/// are interpreted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayStyle {
    /// Fades the covered text.
    Dim { color: String },
    /// Renders `text` as inlaid content right after the (zero-width) range.
    Inlay {
        text: String,
        color: String,
        background: String,
    },
    /// Recolors the covered text.
    Highlight { color: String, background: String },
}

/// Replace the text of `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("edits {first} and {second} overlap")]
    OverlappingEdits { first: TextRange, second: TextRange },
    #[error("unknown {0}")]
    UnknownOverlay(OverlayId),
}

/// Host editing surface.
///
/// `apply_edits` is atomic: either every edit lands or none does, and all ranges in one batch
/// refer to the document as it was before the batch. Ranges are clamped to the end of their
/// line.
pub trait Surface {
    fn visible_line_ranges(&self) -> Vec<LineRange>;

    fn line_text(&self, line: usize) -> Option<String>;

    fn line_count(&self) -> usize;

    fn get_text(&self, range: TextRange) -> String;

    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), SurfaceError>;

    fn create_overlay(&mut self, style: OverlayStyle) -> OverlayId;

    fn apply_overlay(&mut self, overlay: OverlayId, ranges: &[TextRange])
        -> Result<(), SurfaceError>;

    fn dispose_overlay(&mut self, overlay: OverlayId);

    /// Asks the user for one line of text. `None` when the prompt is dismissed.
    fn prompt_for_line(&mut self, placeholder: &str) -> Option<String>;

    fn show_error(&mut self, message: &str);

    fn set_cursor_and_reveal(&mut self, position: Position);

    /// Monotonic counter bumped by every text mutation.
    fn document_version(&self) -> u64;
}
