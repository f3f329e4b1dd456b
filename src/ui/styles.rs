// Console Styles
// Colors for the progress tags printed per action

use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

/// Console color scheme
pub struct Styles;

impl Styles {
    // === Action Tags ===

    /// `[+]` copied or overwritten
    pub fn added() -> ContentStyle {
        style(Color::Green, Attribute::Bold.into())
    }

    /// `[~]` updated or synced
    pub fn modified() -> ContentStyle {
        style(Color::Yellow, Attribute::Bold.into())
    }

    /// `[-]` orphan removed
    pub fn removed() -> ContentStyle {
        style(Color::Red, Attribute::Bold.into())
    }

    /// `[-]` skipped because it already exists
    pub fn skipped() -> ContentStyle {
        style(Color::DarkYellow, Attributes::default())
    }

    /// `[=]` up to date
    pub fn unchanged() -> ContentStyle {
        style(Color::Grey, Attributes::default())
    }

    /// `[?]` unknown entity
    pub fn unknown() -> ContentStyle {
        style(Color::Magenta, Attribute::Bold.into())
    }

    // === Run Markers ===

    pub fn banner() -> ContentStyle {
        style(Color::Cyan, Attribute::Bold.into())
    }

    pub fn notice() -> ContentStyle {
        style(Color::DarkGrey, Attributes::default())
    }
}

fn style(color: Color, attributes: Attributes) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        attributes,
        ..ContentStyle::default()
    }
}
