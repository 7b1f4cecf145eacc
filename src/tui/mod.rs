// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal viewer host.
//!
//! A read-only file viewer (ratatui + crossterm) that implements [`Surface`] so the hop
//! command can run against a real screen: overlays are rendered, the prompt lives in the
//! footer, errors show up as toasts.

use std::{
    error::Error,
    fs, io,
    path::Path,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};

use crate::config::HopConfig;
use crate::hop::{HopError, HopOutcome, Hopper};
use crate::host::{DocumentBuffer, OverlayId, OverlayStyle, Surface, SurfaceError, TextEdit};
use crate::model::{LineRange, Position, TextRange};

mod theme;

use theme::TuiTheme;

const TOAST_TTL: Duration = Duration::from_secs(2);

/// Opens `path` in the viewer and runs until the user quits.
pub fn run(path: &Path, config: HopConfig) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let theme = TuiTheme::new(&config)?;
    let hopper = Hopper::new(config)?;
    let mut view = View::new(DocumentBuffer::from_text(&text), path.display().to_string());

    let mut terminal = TerminalSession::new()?;
    while !view.should_quit {
        view.expire_toast();
        terminal.draw(|frame| draw(frame, &mut view, &theme))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && view.handle_key(key) == Command::Hop {
                    run_hop(&hopper, &mut view, &mut terminal, &theme);
                }
            }
        }
    }

    Ok(())
}

fn run_hop(hopper: &Hopper, view: &mut View, terminal: &mut TerminalSession, theme: &TuiTheme) {
    let mut surface = TerminalSurface {
        view,
        terminal,
        theme,
    };
    match hopper.invoke(Some(&mut surface)) {
        Ok(HopOutcome::Jumped { label, position }) => {
            tracing::info!(%label, %position, "hop jumped");
        }
        Ok(outcome) => tracing::info!(?outcome, "hop ended without a jump"),
        // Already reported through the surface.
        Err(HopError::Annotate(err)) => tracing::warn!(%err, "hop could not annotate"),
        Err(err) => {
            tracing::warn!(%err, "hop failed");
            surface.view.set_toast(err.to_string());
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
struct Prompt {
    placeholder: String,
    input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    None,
    Hop,
}

struct View {
    doc: DocumentBuffer,
    title: String,
    toast: Option<Toast>,
    prompt: Option<Prompt>,
    should_quit: bool,
}

impl View {
    fn new(doc: DocumentBuffer, title: String) -> Self {
        Self {
            doc,
            title,
            toast: None,
            prompt: None,
            should_quit: false,
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
            self.toast = None;
        }
    }

    fn page(&self) -> isize {
        isize::try_from(self.doc.viewport_height()).unwrap_or(isize::MAX).max(1)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('j') => return Command::Hop,
                KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return Command::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('f') => return Command::Hop,

            KeyCode::Up | KeyCode::Char('k') => self.doc.move_cursor_by(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.doc.move_cursor_by(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.doc.move_cursor_by(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.doc.move_cursor_by(0, 1),
            KeyCode::PageUp => self.doc.move_cursor_by(-self.page(), 0),
            KeyCode::PageDown => self.doc.move_cursor_by(self.page(), 0),
            KeyCode::Home => self.doc.set_cursor(Position::default()),
            KeyCode::End => self.doc.set_cursor(Position::new(usize::MAX, 0)),

            _ => {}
        }
        Command::None
    }
}

/// [`Surface`] over the viewer while a hop runs; the prompt drives its own event loop.
struct TerminalSurface<'a> {
    view: &'a mut View,
    terminal: &'a mut TerminalSession,
    theme: &'a TuiTheme,
}

impl TerminalSurface<'_> {
    fn redraw(&mut self) -> io::Result<()> {
        let (view, theme) = (&mut *self.view, self.theme);
        self.terminal.draw(|frame| draw(frame, view, theme))
    }

    fn read_prompt(&mut self) -> io::Result<Option<String>> {
        loop {
            self.view.expire_toast();
            self.redraw()?;

            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(prompt) = self.view.prompt.as_mut() else {
                return Ok(None);
            };
            match key.code {
                KeyCode::Enter => return Ok(Some(std::mem::take(&mut prompt.input))),
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None)
                }
                KeyCode::Backspace => {
                    prompt.input.pop();
                }
                KeyCode::Char(ch) => prompt.input.push(ch),
                _ => {}
            }
        }
    }
}

impl Surface for TerminalSurface<'_> {
    fn visible_line_ranges(&self) -> Vec<LineRange> {
        self.view.doc.visible_line_ranges()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.view.doc.line(line).map(str::to_owned)
    }

    fn line_count(&self) -> usize {
        self.view.doc.line_count()
    }

    fn get_text(&self, range: TextRange) -> String {
        self.view.doc.get_text(range)
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), SurfaceError> {
        self.view.doc.apply_edits(edits)
    }

    fn create_overlay(&mut self, style: OverlayStyle) -> OverlayId {
        self.view.doc.create_overlay(style)
    }

    fn apply_overlay(
        &mut self,
        overlay: OverlayId,
        ranges: &[TextRange],
    ) -> Result<(), SurfaceError> {
        self.view.doc.apply_overlay(overlay, ranges)
    }

    fn dispose_overlay(&mut self, overlay: OverlayId) {
        self.view.doc.dispose_overlay(overlay);
    }

    fn prompt_for_line(&mut self, placeholder: &str) -> Option<String> {
        self.view.prompt = Some(Prompt {
            placeholder: placeholder.to_owned(),
            input: String::new(),
        });
        let answer = self.read_prompt();
        self.view.prompt = None;
        answer.unwrap_or_else(|err| {
            tracing::warn!(%err, "prompt aborted by terminal error");
            None
        })
    }

    fn show_error(&mut self, message: &str) {
        self.view.set_toast(message);
    }

    fn set_cursor_and_reveal(&mut self, position: Position) {
        self.view.doc.set_cursor(position);
    }

    fn document_version(&self) -> u64 {
        self.view.doc.version()
    }
}

fn draw(frame: &mut Frame<'_>, view: &mut View, theme: &TuiTheme) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (title_area, body_area, footer_area) = (layout[0], layout[1], layout[2]);

    view.doc.set_viewport_height(usize::from(body_area.height));

    let cursor = view.doc.cursor();
    let title = Line::from(vec![
        Span::styled(view.title.clone(), theme.title_style()),
        Span::styled(
            format!("  {}:{}", cursor.line + 1, cursor.character + 1),
            theme.footer_label_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(title).style(theme.base_style()), title_area);

    let lines = view
        .doc
        .visible_line_ranges()
        .iter()
        .flat_map(LineRange::lines)
        .map(|line| render_line(&view.doc, line, theme))
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines).style(theme.base_style()), body_area);

    if let Some(prompt) = &view.prompt {
        let mut spans = vec![Span::styled("hop › ", theme.footer_key_style())];
        if prompt.input.is_empty() {
            spans.push(Span::styled(prompt.placeholder.clone(), theme.placeholder_style()));
        } else {
            spans.push(Span::raw(prompt.input.clone()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), footer_area);
        let typed = u16::try_from(prompt.input.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = footer_area
            .x
            .saturating_add(6)
            .saturating_add(typed)
            .min(footer_area.x.saturating_add(footer_area.width.saturating_sub(1)));
        frame.set_cursor_position((cursor_x, footer_area.y));
        return;
    }

    let footer = match &view.toast {
        Some(toast) => Line::from(Span::styled(toast.message.clone(), theme.error_style())),
        None => footer_help_line(theme),
    };
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn footer_help_line(theme: &TuiTheme) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    for (label, key) in [("HOP", "f"), ("MOVE", "hjkl"), ("PAGE", "PgUp/PgDn"), ("QUIT", "q")] {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", theme.footer_label_style()));
        }
        spans.push(Span::styled(format!("{label} "), theme.footer_label_style()));
        spans.push(Span::styled(key, theme.footer_key_style()));
    }
    Line::from(spans)
}

/// One document line with dim/highlight styles applied, inlays spliced in before the column
/// they are anchored to, and the cursor cell reversed.
fn render_line(doc: &DocumentBuffer, line: usize, theme: &TuiTheme) -> Line<'static> {
    let chars = doc.line(line).unwrap_or_default().chars().collect::<Vec<_>>();
    let mut styles = vec![theme.base_style(); chars.len()];
    let mut inlays = Vec::<(usize, String, Style)>::new();

    let on_line = |range: &&TextRange| range.line == line;
    for (_, overlay) in doc.overlays() {
        if let OverlayStyle::Dim { color } = &overlay.style {
            for range in overlay.ranges.iter().filter(on_line) {
                for style in styles.iter_mut().take(range.end).skip(range.start) {
                    *style = theme.dim_style(color);
                }
            }
        }
    }
    for (_, overlay) in doc.overlays() {
        match &overlay.style {
            OverlayStyle::Highlight { color, background } => {
                for range in overlay.ranges.iter().filter(on_line) {
                    for style in styles.iter_mut().take(range.end).skip(range.start) {
                        *style = theme.label_style(color, background);
                    }
                }
            }
            OverlayStyle::Inlay {
                text,
                color,
                background,
            } => {
                for range in overlay.ranges.iter().filter(on_line) {
                    inlays.push((range.start, text.clone(), theme.label_style(color, background)));
                }
            }
            OverlayStyle::Dim { .. } => {}
        }
    }
    inlays.sort_by_key(|(column, _, _)| *column);

    let cursor = doc.cursor();
    let mut spans = Vec::<Span<'static>>::with_capacity(chars.len() + inlays.len());
    let mut pending = inlays.into_iter().peekable();
    for column in 0..=chars.len() {
        while let Some((_, text, style)) = pending.next_if(|(at, _, _)| *at <= column) {
            spans.push(Span::styled(text, style));
        }
        let is_cursor = cursor == Position::new(line, column);
        match chars.get(column) {
            Some(ch) if is_cursor => {
                spans.push(Span::styled(ch.to_string(), styles[column].patch(theme.cursor_style())))
            }
            Some(ch) => spans.push(Span::styled(ch.to_string(), styles[column])),
            None if is_cursor => spans.push(Span::styled(" ", theme.cursor_style())),
            None => {}
        }
    }

    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, text::Line, Terminal};

    use super::{draw, render_line, theme::TuiTheme, Command, Prompt, View};
    use crate::annotate::AnnotationStrategy;
    use crate::config::HopConfig;
    use crate::hop::Hopper;
    use crate::host::{DocumentBuffer, OverlayStyle, ScriptedSurface};
    use crate::model::{Position, TextRange};

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn inlays_are_spliced_before_their_column() {
        let mut doc = DocumentBuffer::from_text("foo bar");
        for (column, label) in [(0, "a"), (4, "b")] {
            let id = doc.create_overlay(OverlayStyle::Inlay {
                text: label.to_owned(),
                color: "cyan".to_owned(),
                background: "black".to_owned(),
            });
            doc.apply_overlay(id, &[TextRange::new(0, column, column)]).expect("overlay");
        }

        let line = render_line(&doc, 0, &TuiTheme::default());
        assert_eq!(line_to_string(&line), "afoo bbar");
    }

    #[test]
    fn cursor_past_line_end_renders_a_cell() {
        let mut doc = DocumentBuffer::from_text("ab");
        doc.set_cursor(Position::new(0, 2));
        let line = render_line(&doc, 0, &TuiTheme::default());
        assert_eq!(line_to_string(&line), "ab ");
    }

    #[test]
    fn keys_map_to_movement_and_hop() {
        let text = (0..10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let mut view = View::new(DocumentBuffer::from_text(&text), "t".to_owned());
        assert_eq!(view.handle_key(key(KeyCode::Char('j'))), Command::None);
        assert_eq!(view.doc.cursor(), Position::new(1, 0));
        view.handle_key(key(KeyCode::End));
        assert_eq!(view.doc.cursor(), Position::new(9, 0));
        assert_eq!(view.handle_key(key(KeyCode::Char('f'))), Command::Hop);
        assert_eq!(
            view.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Command::Hop
        );
        view.handle_key(key(KeyCode::Char('q')));
        assert!(view.should_quit);
    }

    #[test]
    fn draw_shows_labels_and_prompt() {
        let hopper = Hopper::new(HopConfig {
            strategy: AnnotationStrategy::Overlay,
            ..HopConfig::default()
        })
        .expect("hopper");
        let mut surface = ScriptedSurface::new("foo bar");
        let plan = hopper.plan(&surface);
        let annotations = AnnotationStrategy::Overlay
            .annotator(hopper.config().label_style())
            .apply(&mut surface, &plan.assignments, &plan.scanned_lines)
            .expect("apply");

        let mut view = View::new(surface.doc().clone(), "demo.txt".to_owned());
        view.prompt = Some(Prompt {
            placeholder: "Enter the label to jump to".to_owned(),
            input: String::new(),
        });
        let mut terminal = Terminal::new(TestBackend::new(30, 4)).expect("terminal");
        terminal
            .draw(|frame| draw(frame, &mut view, &TuiTheme::default()))
            .expect("draw");

        let buffer = terminal.backend().buffer().clone();
        let row = |y: u16| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_owned())
                .collect::<String>()
        };
        assert!(row(0).starts_with("demo.txt"));
        assert!(row(1).starts_with("afoo bbar"));
        assert!(row(3).starts_with("hop › Enter the label"));

        annotations.restore(&mut surface).expect("restore");
    }
}
