// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User configuration.
//!
//! Loaded from a JSON file (`--config <path>` or the `HOP_CONFIG` env var). Every key is
//! optional; unknown keys are rejected so typos do not silently fall back to defaults.

use std::{env, fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotate::{AnnotationStrategy, LabelStyle};
use crate::labels::{AlphabetError, HintAlphabet, LabelScheme, DEFAULT_ALPHABET};

pub const CONFIG_ENV: &str = "HOP_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HopConfig {
    pub strategy: AnnotationStrategy,
    pub label_scheme: LabelScheme,
    pub alphabet: String,
    pub placeholder: String,
    pub dim_color: String,
    pub label_color: String,
    pub label_background: String,
    /// Refuse to jump when the document changed while the prompt was open.
    pub guard_document_edits: bool,
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            strategy: AnnotationStrategy::Overlay,
            label_scheme: LabelScheme::Legacy,
            alphabet: DEFAULT_ALPHABET.to_owned(),
            placeholder: "Enter the label to jump to".to_owned(),
            dim_color: "#ffffff57".to_owned(),
            label_color: "cyan".to_owned(),
            label_background: "rgba(0, 0, 0, 0.1)".to_owned(),
            guard_document_edits: true,
        }
    }
}

impl HopConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.alphabet()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads the file named by `HOP_CONFIG`; defaults when it is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(value) if value.trim().is_empty() => Ok(Self::default()),
            Ok(value) => Self::load(value.trim()),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
                name: CONFIG_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    pub fn alphabet(&self) -> Result<HintAlphabet, ConfigError> {
        HintAlphabet::new(&self.alphabet).map_err(ConfigError::Alphabet)
    }

    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            dim_color: self.dim_color.clone(),
            label_color: self.label_color.clone(),
            label_background: self.label_background.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    Alphabet(#[from] AlphabetError),
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: String, value: String },
}
