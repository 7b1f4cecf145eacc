// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Token discovery over the visible part of a surface.

use std::sync::OnceLock;

use regex::Regex;

use crate::host::Surface;
use crate::model::{LineRange, Token};

static WORD: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("word regex"))
}

/// Tokens plus the lines that were visited to find them, both in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub tokens: Vec<Token>,
    pub lines: Vec<usize>,
}

/// Scans every line of every range, in the order given.
///
/// Overlapping ranges are scanned independently and can yield the same token twice.
/// Lines `line_text` cannot produce are skipped.
pub fn tokenize<F>(ranges: &[LineRange], mut line_text: F) -> Scan
where
    F: FnMut(usize) -> Option<String>,
{
    let mut scan = Scan::default();
    for range in ranges {
        for line in range.lines() {
            let Some(text) = line_text(line) else {
                continue;
            };
            scan.lines.push(line);
            scan.tokens.extend(tokenize_line(line, &text));
        }
    }
    scan
}

/// Scans the surface's visible ranges, trimmed to the lines the document actually has.
pub fn scan_surface(surface: &dyn Surface) -> Scan {
    let last = surface.line_count().checked_sub(1);
    let ranges = surface
        .visible_line_ranges()
        .into_iter()
        .filter_map(|range| {
            let last = last?;
            (range.start <= last).then(|| LineRange::new(range.start, range.end.min(last)))
        })
        .collect::<Vec<_>>();
    tokenize(&ranges, |line| surface.line_text(line))
}

/// Maximal-munch `[A-Za-z0-9_]+` matches of one line, with char-based columns.
pub fn tokenize_line(line: usize, text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    // Char column of the previous match start, and its byte offset.
    let mut column = 0usize;
    let mut consumed = 0usize;
    for found in word_regex().find_iter(text) {
        column += text[consumed..found.start()].chars().count();
        consumed = found.start();
        tokens.push(Token::new(line, column, found.as_str()));
    }
    tokens
}
