// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hop: label the visible words, type a label, land on the word.
//!
//! The pipeline is [`scan`] → [`labels`] → [`annotate`] → prompt → jump → restore, driven by
//! [`hop::Hopper`] against any [`host::Surface`]. [`tui`] is the bundled terminal host.

pub mod annotate;
pub mod config;
pub mod hop;
pub mod host;
pub mod labels;
pub mod model;
pub mod scan;
pub mod tui;

pub use config::HopConfig;
pub use hop::{HopError, HopOutcome, Hopper};
