// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::fmt;

use super::{DocumentBuffer, OverlayId, OverlayStyle, Surface, SurfaceError, TextEdit};
use crate::model::{LineRange, Position, TextRange};

type PromptHook = Box<dyn FnMut(&mut DocumentBuffer)>;

/// Headless [`Surface`] over a [`DocumentBuffer`] that answers prompts from a queue.
///
/// It records everything a user would have seen (prompts, errors, reveals) so callers can
/// assert on the interaction afterwards.
pub struct ScriptedSurface {
    doc: DocumentBuffer,
    visible: Option<Vec<LineRange>>,
    answers: VecDeque<Option<String>>,
    prompt_hook: Option<PromptHook>,
    prompts: Vec<String>,
    errors: Vec<String>,
    reveals: Vec<Position>,
    peak_overlays: usize,
}

impl ScriptedSurface {
    pub fn new(text: &str) -> Self {
        Self {
            doc: DocumentBuffer::from_text(text),
            visible: None,
            answers: VecDeque::new(),
            prompt_hook: None,
            prompts: Vec::new(),
            errors: Vec::new(),
            reveals: Vec::new(),
            peak_overlays: 0,
        }
    }

    /// Queues the answer for the next prompt; `None` dismisses it.
    pub fn answer(mut self, answer: Option<&str>) -> Self {
        self.answers.push_back(answer.map(str::to_owned));
        self
    }

    /// Overrides the visible ranges instead of deriving them from the viewport.
    pub fn with_visible_ranges(mut self, ranges: Vec<LineRange>) -> Self {
        self.visible = Some(ranges);
        self
    }

    pub fn with_viewport_height(mut self, height: usize) -> Self {
        self.doc.set_viewport_height(height);
        self
    }

    /// Runs `hook` against the document while the prompt is open, before it is answered.
    pub fn on_prompt(mut self, hook: impl FnMut(&mut DocumentBuffer) + 'static) -> Self {
        self.prompt_hook = Some(Box::new(hook));
        self
    }

    pub fn doc(&self) -> &DocumentBuffer {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut DocumentBuffer {
        &mut self.doc
    }

    pub fn text(&self) -> String {
        self.doc.full_text()
    }

    pub fn cursor(&self) -> Position {
        self.doc.cursor()
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn reveals(&self) -> &[Position] {
        &self.reveals
    }

    /// Highest number of live overlays observed at any point.
    pub fn peak_overlays(&self) -> usize {
        self.peak_overlays
    }
}

impl fmt::Debug for ScriptedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedSurface")
            .field("doc", &self.doc)
            .field("answers", &self.answers)
            .field("prompts", &self.prompts)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Surface for ScriptedSurface {
    fn visible_line_ranges(&self) -> Vec<LineRange> {
        match &self.visible {
            Some(ranges) => ranges.clone(),
            None => self.doc.visible_line_ranges(),
        }
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.doc.line(line).map(str::to_owned)
    }

    fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    fn get_text(&self, range: TextRange) -> String {
        self.doc.get_text(range)
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), SurfaceError> {
        self.doc.apply_edits(edits)
    }

    fn create_overlay(&mut self, style: OverlayStyle) -> OverlayId {
        let id = self.doc.create_overlay(style);
        self.peak_overlays = self.peak_overlays.max(self.doc.overlay_count());
        id
    }

    fn apply_overlay(
        &mut self,
        overlay: OverlayId,
        ranges: &[TextRange],
    ) -> Result<(), SurfaceError> {
        self.doc.apply_overlay(overlay, ranges)
    }

    fn dispose_overlay(&mut self, overlay: OverlayId) {
        self.doc.dispose_overlay(overlay);
    }

    fn prompt_for_line(&mut self, placeholder: &str) -> Option<String> {
        self.prompts.push(placeholder.to_owned());
        if let Some(hook) = self.prompt_hook.as_mut() {
            hook(&mut self.doc);
        }
        self.answers.pop_front().flatten()
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }

    fn set_cursor_and_reveal(&mut self, position: Position) {
        self.reveals.push(position);
        self.doc.set_cursor(position);
    }

    fn document_version(&self) -> u64 {
        self.doc.version()
    }
}
