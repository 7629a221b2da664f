//! Theme module for fitlock
//!
//! This module provides a centralized color palette and styling constants
//! for the indigo-to-fuchsia "gym neon" look.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

// ============================================================================
// Background Colors
// ============================================================================

/// Primary background color - deep indigo (#1e1b4b)
pub const BG_PRIMARY: Color = Color::Rgb(30, 27, 75);

/// Secondary background color - card surface (#312e81)
pub const BG_SECONDARY: Color = Color::Rgb(49, 46, 129);

/// Tertiary background color - selected card (#3730a3)
pub const BG_TERTIARY: Color = Color::Rgb(55, 48, 163);

/// Subtle border color (#4c1d95)
pub const BORDER_SUBTLE: Color = Color::Rgb(76, 29, 149);

// ============================================================================
// Accent Colors - Gradient Stops
// ============================================================================

/// Indigo accent (#6366f1)
pub const INDIGO: Color = Color::Rgb(99, 102, 241);

/// Violet accent (#8b5cf6)
pub const VIOLET: Color = Color::Rgb(139, 92, 246);

/// Fuchsia accent (#d946ef)
pub const FUCHSIA: Color = Color::Rgb(217, 70, 239);

// ============================================================================
// Status Colors
// ============================================================================

/// Green for unlocked rewards and success (#22c55e)
pub const GREEN_SUCCESS: Color = Color::Rgb(34, 197, 94);

/// Red for locked apps and errors (#ef4444)
pub const RED_LOCK: Color = Color::Rgb(239, 68, 68);

/// Amber warning color, also the streak flame (#fbbf24)
pub const AMBER_WARNING: Color = Color::Rgb(251, 191, 36);

// ============================================================================
// Text Colors
// ============================================================================

/// Primary text color - bright white (#f8fafc)
pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252);

/// Secondary text color - lavender gray (#c7d2fe)
pub const TEXT_SECONDARY: Color = Color::Rgb(199, 210, 254);

/// Muted text color - for labels and hints (#818cf8)
pub const TEXT_MUTED: Color = Color::Rgb(129, 140, 248);

/// Rounded corners for cards
pub const ROUNDED_BORDERS: BorderType = BorderType::Rounded;

/// Alternate between two colors every few animation ticks
pub fn get_pulse_color(tick: u64, bright: Color, dim: Color) -> Color {
    if (tick / 4) % 2 == 0 { bright } else { dim }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_alternates() {
        assert_eq!(get_pulse_color(0, RED_LOCK, BG_PRIMARY), RED_LOCK);
        assert_eq!(get_pulse_color(3, RED_LOCK, BG_PRIMARY), RED_LOCK);
        assert_eq!(get_pulse_color(4, RED_LOCK, BG_PRIMARY), BG_PRIMARY);
        assert_eq!(get_pulse_color(8, RED_LOCK, BG_PRIMARY), RED_LOCK);
    }
}
