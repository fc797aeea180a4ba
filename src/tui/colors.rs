//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Focus highlight and active form field.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirm dialogs and the WIP exceeded marker.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Status bar background.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Drag overlay background.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Gray,
        Priority::Medium => Color::Cyan,
        Priority::High => Color::Yellow,
        Priority::Urgent => Color::LightRed,
    }
}
