// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::config::HopConfig;

const PALETTE_ENV: &str = "HOP_TUI_PALETTE";

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    /// Reads the optional palette override and checks that every configured color parses.
    pub(crate) fn new(config: &HopConfig) -> Result<Self, ThemeError> {
        for (key, value) in [
            ("dim_color", &config.dim_color),
            ("label_color", &config.label_color),
            ("label_background", &config.label_background),
        ] {
            parse_color(value).map_err(|error| ThemeError::InvalidColor {
                key: key.to_owned(),
                value: format!("{value} ({error})"),
            })?;
        }
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    /// Resolves a configured color. Translucent colors are blended over the palette
    /// background, or black without a palette.
    pub(crate) fn color(&self, spec: &str) -> Color {
        match parse_color(spec) {
            Ok(Paint::Named(color)) => color,
            Ok(Paint::Rgba(r, g, b, a)) => {
                let (br, bg, bb) = self.backdrop();
                Color::Rgb(blend(r, br, a), blend(g, bg, a), blend(b, bb, a))
            }
            Err(_) => Color::Reset,
        }
    }

    fn backdrop(&self) -> (u8, u8, u8) {
        match self.palette.as_ref().map(|palette| palette.bg) {
            Some(Color::Rgb(r, g, b)) => (r, g, b),
            _ => (0, 0, 0),
        }
    }

    pub(crate) fn dim_style(&self, color: &str) -> Style {
        self.base_style().fg(self.color(color))
    }

    pub(crate) fn label_style(&self, color: &str, background: &str) -> Style {
        self.base_style()
            .fg(self.color(color))
            .bg(self.color(background))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn cursor_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED)
    }

    pub(crate) fn title_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::BOLD)
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        self.base_style().fg(Color::Cyan)
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        self.base_style().fg(Color::Gray)
    }

    pub(crate) fn placeholder_style(&self) -> Style {
        self.base_style().fg(Color::DarkGray)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
}

impl TuiPalette {
    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != 2 {
            return Err(format!("expected 2 comma-separated colors (fg,bg), got {}", parts.len()));
        }
        Ok(Self {
            fg: parse_opaque(parts[0])?,
            bg: parse_opaque(parts[1])?,
        })
    }
}

fn parse_opaque(value: &str) -> Result<Color, String> {
    match parse_color(value)? {
        Paint::Named(color) => Ok(color),
        Paint::Rgba(r, g, b, _) => Ok(Color::Rgb(r, g, b)),
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let value = match env::var(PALETTE_ENV) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_string(),
                value: "<non-unicode>".to_string(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: PALETTE_ENV.to_string(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Named(Color),
    Rgba(u8, u8, u8, u8),
}

fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    ((u16::from(fg) * alpha + u16::from(bg) * (255 - alpha) + 127) / 255) as u8
}

fn parse_color(value: &str) -> Result<Paint, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(color) = named_color(&lower) {
        return Ok(Paint::Named(color));
    }

    if let Some(rest) = lower.strip_prefix("rgb:") {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid rgb: value: {trimmed}"));
        }
        let r = parse_hex_channel(parts[0])?;
        let g = parse_hex_channel(parts[1])?;
        let b = parse_hex_channel(parts[2])?;
        return Ok(Paint::Rgba(r, g, b, 255));
    }

    if let Some(rest) = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb(")) {
        return parse_functional(trimmed, rest);
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB or #RRGGBBAA)"));
    }
    let rgba = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let rgba = if hex.len() == 6 { (rgba << 8) | 0xFF } else { rgba };
    let r = ((rgba >> 24) & 0xFF) as u8;
    let g = ((rgba >> 16) & 0xFF) as u8;
    let b = ((rgba >> 8) & 0xFF) as u8;
    let a = (rgba & 0xFF) as u8;
    Ok(Paint::Rgba(r, g, b, a))
}

fn parse_functional(original: &str, rest: &str) -> Result<Paint, String> {
    let body = rest
        .strip_suffix(')')
        .ok_or_else(|| format!("invalid color: {original} (missing `)`)"))?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("invalid color: {original} (expected 3 or 4 components)"));
    }
    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| format!("invalid color component {part} in {original}"))?;
    }
    let alpha = match parts.get(3) {
        Some(part) => {
            let alpha = part
                .parse::<f32>()
                .map_err(|_| format!("invalid alpha {part} in {original}"))?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(format!("alpha {part} out of range in {original}"));
            }
            (alpha * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Paint::Rgba(channels[0], channels[1], channels[2], alpha))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    if value.len() == 2 {
        let parsed =
            u8::from_str_radix(value, 16).map_err(|_| format!("invalid rgb: component {value}"))?;
        return Ok(parsed);
    }
    if value.len() == 4 {
        let parsed = u16::from_str_radix(value, 16)
            .map_err(|_| format!("invalid rgb: component {value}"))?;
        return Ok((parsed >> 8) as u8);
    }
    Err(format!(
        "invalid rgb: component {value} (expected 2 or 4 hex digits)"
    ))
}

fn named_color(name: &str) -> Option<Color> {
    Some(match name {
        "reset" | "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    })
}

#[derive(Debug, Clone, Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: String, value: String },
    #[error("invalid config color {key}={value}")]
    InvalidColor { key: String, value: String },
}
