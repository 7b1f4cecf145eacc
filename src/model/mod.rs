// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Positions, ranges, tokens and labels shared by every stage of a hop.

pub mod position;
pub mod token;

pub use position::{LineRange, Position, TextRange};
pub use token::{Assignment, Label, Token};
