//! Theme and Colors
//!
//! Night-sky palette for the classifier screen, plus the mapping from
//! catalog color tokens to terminal colors.

use ratatui::style::Color;

use classifier_core::{ColorToken, NotifyLevel};

// ============================================================================
// UI Colors
// ============================================================================

/// Accent for the title and input prompt
pub const STARGAZE_ACCENT: Color = Color::Rgb(150, 180, 255);

/// Input text
pub const INPUT_TEXT: Color = Color::Rgb(230, 230, 240);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 200, 90);

/// Processing hint
pub const PROCESSING_BLUE: Color = Color::Rgb(100, 180, 255);

/// Rendered for color tokens that are not `#rrggbb`
pub const FALLBACK_GRAY: Color = Color::Rgb(139, 147, 167);

// ============================================================================
// Token mapping
// ============================================================================

/// Terminal color for a catalog color token
///
/// Accepts `#rrggbb` and `#rgb`; anything else renders as [`FALLBACK_GRAY`].
pub fn token_color(token: &ColorToken) -> Color {
    parse_hex(token.as_str()).unwrap_or(FALLBACK_GRAY)
}

fn parse_hex(token: &str) -> Option<Color> {
    let hex = token.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let mut channels = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = channels.next()??;
            let g = channels.next()??;
            let b = channels.next()??;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Color for a notification level
pub fn level_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => STARGAZE_ACCENT,
        NotifyLevel::Success => SUCCESS_GREEN,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
    }
}
