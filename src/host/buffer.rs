// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::{OverlayId, OverlayStyle, SurfaceError, TextEdit};
use crate::model::{LineRange, Position, TextRange};

/// A decoration registered on a [`DocumentBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub style: OverlayStyle,
    pub ranges: Vec<TextRange>,
}

/// Line-based in-memory document with overlays, a cursor and a scrolling viewport.
///
/// The text round-trips exactly: lines are split on `\n` only, so `\r` and a trailing
/// newline survive `from_text` → `full_text`.
#[derive(Debug, Clone)]
pub struct DocumentBuffer {
    lines: Vec<String>,
    version: u64,
    overlays: BTreeMap<OverlayId, Overlay>,
    next_overlay: u64,
    cursor: Position,
    top: usize,
    viewport_height: usize,
}

impl DocumentBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
            version: 0,
            overlays: BTreeMap::new(),
            next_overlay: 1,
            cursor: Position::default(),
            top: 0,
            viewport_height: usize::MAX,
        }
    }

    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line length in columns.
    pub fn line_len(&self, line: usize) -> usize {
        self.line(line).map_or(0, |text| text.chars().count())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.reveal(self.cursor.line);
    }

    /// The single range of lines currently inside the viewport.
    pub fn visible_line_ranges(&self) -> Vec<LineRange> {
        let count = self.line_count();
        if count == 0 || self.top >= count {
            return Vec::new();
        }
        let last = self.top.saturating_add(self.viewport_height).min(count) - 1;
        vec![LineRange::new(self.top, last)]
    }

    pub fn get_text(&self, range: TextRange) -> String {
        let Some(line) = self.line(range.line) else {
            return String::new();
        };
        line.chars().skip(range.start).take(range.len()).collect()
    }

    /// Moves the cursor (clamped to the document) and scrolls it into view.
    pub fn set_cursor(&mut self, position: Position) {
        let line = position.line.min(self.line_count().saturating_sub(1));
        let character = position.character.min(self.line_len(line));
        self.cursor = Position::new(line, character);
        self.reveal(line);
    }

    pub fn move_cursor_by(&mut self, lines: isize, characters: isize) {
        let line = self.cursor.line.saturating_add_signed(lines);
        let character = self.cursor.character.saturating_add_signed(characters);
        self.set_cursor(Position::new(line, character));
    }

    fn reveal(&mut self, line: usize) {
        if line < self.top {
            self.top = line;
        } else if self.viewport_height != usize::MAX && line >= self.top + self.viewport_height {
            self.top = line + 1 - self.viewport_height;
        }
    }

    /// Applies a batch of edits whose ranges all refer to the pre-batch text.
    ///
    /// The whole batch is validated first; on error nothing changes.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), SurfaceError> {
        if edits.is_empty() {
            return Ok(());
        }

        let mut clamped = Vec::with_capacity(edits.len());
        for edit in edits {
            if edit.range.line >= self.line_count() {
                return Err(SurfaceError::LineOutOfRange {
                    line: edit.range.line,
                    line_count: self.line_count(),
                });
            }
            let len = self.line_len(edit.range.line);
            let start = edit.range.start.min(len);
            let end = edit.range.end.clamp(start, len);
            clamped.push((TextRange::new(edit.range.line, start, end), edit.text.as_str()));
        }

        clamped.sort_by(|(left, _), (right, _)| left.cmp(right));
        for pair in clamped.windows(2) {
            let (first, second) = (pair[0].0, pair[1].0);
            if first.line == second.line && (first.end > second.start || first.start == second.start)
            {
                return Err(SurfaceError::OverlappingEdits { first, second });
            }
        }

        for (range, text) in clamped.iter().rev() {
            let line = &mut self.lines[range.line];
            let start = byte_offset(line, range.start);
            let end = byte_offset(line, range.end);
            line.replace_range(start..end, text);
        }

        self.version += 1;
        Ok(())
    }

    pub fn create_overlay(&mut self, style: OverlayStyle) -> OverlayId {
        let id = OverlayId::new(self.next_overlay);
        self.next_overlay += 1;
        self.overlays.insert(
            id,
            Overlay {
                style,
                ranges: Vec::new(),
            },
        );
        id
    }

    pub fn apply_overlay(
        &mut self,
        overlay: OverlayId,
        ranges: &[TextRange],
    ) -> Result<(), SurfaceError> {
        let entry = self
            .overlays
            .get_mut(&overlay)
            .ok_or(SurfaceError::UnknownOverlay(overlay))?;
        entry.ranges = ranges.to_vec();
        Ok(())
    }

    /// Returns `false` when the overlay was already gone.
    pub fn dispose_overlay(&mut self, overlay: OverlayId) -> bool {
        self.overlays.remove(&overlay).is_some()
    }

    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.overlays.iter().map(|(id, overlay)| (*id, overlay))
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }
}

fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map_or(line.len(), |(idx, _)| idx)
}
