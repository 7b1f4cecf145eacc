// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Label generation.
//!
//! Two progressions are supported:
//!
//! * [`LabelScheme::Legacy`] reuses the label at sequence index `round` as the prefix for
//!   every later round. With the default alphabet this yields `a..z, ba..bz, ca..cz, ..`
//!   (label 26 is `ba`, not `aa`). Existing users have muscle memory for it, so it stays
//!   the default.
//! * [`LabelScheme::Positional`] is the plain counter `a..z, aa..az, ba..bz, ..`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Label;

pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelScheme {
    #[default]
    Legacy,
    Positional,
}

impl fmt::Display for LabelScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::Positional => "positional",
        })
    }
}

impl FromStr for LabelScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "positional" => Ok(Self::Positional),
            other => Err(format!("unknown label scheme `{other}` (expected legacy|positional)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("hint alphabet needs at least two characters")]
    TooShort,
    #[error("hint alphabet contains `{0}` more than once")]
    Duplicate(char),
    #[error("hint alphabet may only contain lowercase ASCII letters and digits, found `{0}`")]
    Unsupported(char),
}

/// The characters labels are built from: at least two, distinct, lowercase ASCII
/// alphanumerics (input is lowered before matching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAlphabet {
    chars: Vec<char>,
}

impl HintAlphabet {
    pub fn new(chars: &str) -> Result<Self, AlphabetError> {
        let chars: Vec<char> = chars.chars().collect();
        let mut seen = HashSet::with_capacity(chars.len());
        for &ch in &chars {
            if !(ch.is_ascii_lowercase() || ch.is_ascii_digit()) {
                return Err(AlphabetError::Unsupported(ch));
            }
            if !seen.insert(ch) {
                return Err(AlphabetError::Duplicate(ch));
            }
        }
        if chars.len() < 2 {
            return Err(AlphabetError::TooShort);
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl Default for HintAlphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

/// Returns exactly `n` distinct, non-empty labels; `labels[i]` belongs to token `i`.
pub fn gen_labels(n: usize, scheme: LabelScheme, alphabet: &HintAlphabet) -> Vec<Label> {
    match scheme {
        LabelScheme::Legacy => legacy_labels(n, alphabet.chars()),
        LabelScheme::Positional => positional_labels(n, alphabet.chars()),
    }
}

fn legacy_labels(n: usize, alphabet: &[char]) -> Vec<Label> {
    let k = alphabet.len();
    let rounds = ((n + k - 1) / k).max(1);
    let per_round = n.min(k);

    let mut labels: Vec<Label> = Vec::with_capacity(n);
    for round in 0..rounds {
        for &ch in &alphabet[..per_round] {
            if labels.len() >= n {
                break;
            }
            // Round `r` only runs when n > k*r, so labels[r] exists for k >= 2.
            let mut text = if round > 0 {
                labels[round].as_str().to_owned()
            } else {
                String::new()
            };
            text.push(ch);
            labels.push(Label::new(text));
        }
    }

    labels
}

fn positional_labels(n: usize, alphabet: &[char]) -> Vec<Label> {
    fn pow_saturating(base: usize, exp: usize) -> usize {
        let mut acc = 1usize;
        for _ in 0..exp {
            acc = acc.saturating_mul(base);
        }
        acc
    }

    let k = alphabet.len();
    let mut labels = Vec::with_capacity(n);
    let mut len = 1usize;

    while labels.len() < n {
        let remaining = n - labels.len();
        let count_len = pow_saturating(k, len);
        let to_take = remaining.min(count_len);

        for i in 0..to_take {
            let mut x = i;
            let mut chars = vec![alphabet[0]; len];
            for pos in (0..len).rev() {
                chars[pos] = alphabet[x % k];
                x /= k;
            }
            labels.push(Label::new(chars.into_iter().collect::<String>()));
        }

        len += 1;
    }

    labels
}
