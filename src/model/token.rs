// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;

use smol_str::SmolStr;

use super::{Position, TextRange};

/// A word-like run of `[A-Za-z0-9_]` found on a visible line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    line: usize,
    character: usize,
    text: SmolStr,
}

impl Token {
    pub fn new(line: usize, character: usize, text: impl Into<SmolStr>) -> Self {
        Self {
            line,
            character,
            text: text.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn character(&self) -> usize {
        self.character
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    /// Columns covered by the token text itself.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.line, self.character, self.character + self.text.chars().count())
    }
}

/// A short selection key shown next to a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(SmolStr);

impl Label {
    pub fn new(value: impl Into<SmolStr>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label width in columns.
    pub fn width(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// One token paired with the label the user types to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub label: Label,
    pub token: Token,
}

impl Assignment {
    /// Pairs labels with tokens by index. Extra entries on either side are dropped.
    pub fn zip(labels: Vec<Label>, tokens: Vec<Token>) -> Vec<Assignment> {
        labels
            .into_iter()
            .zip(tokens)
            .map(|(label, token)| Assignment { label, token })
            .collect()
    }
}
