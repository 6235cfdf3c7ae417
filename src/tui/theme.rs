//! Theme system for TUI colors and styles
//!
//! Defines color constants consistent with the CLI output (display module).

use iocraft::prelude::Color;

use crate::types::TicketStatus;

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Status colors (consistent with CLI)
    pub status_pending: Color,
    pub status_open: Color,
    pub status_closed: Color,

    // Badges
    pub badge_user: Color,
    pub badge_channel: Color,
    pub badge_tag: Color,
    pub unread: Color,
    pub chatbot: Color,
    pub action: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub id_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let grey = Color::Rgb {
            r: 120,
            g: 120,
            b: 120,
        };

        Self {
            status_pending: Color::Yellow,
            status_open: Color::Green,
            status_closed: grey,

            badge_user: Color::White,
            badge_channel: Color::Rgb {
                r: 42,
                g: 106,
                b: 90,
            },
            badge_tag: Color::Magenta,
            unread: Color::Red,
            chatbot: grey,
            action: Color::Cyan,

            border: grey,
            border_focused: Color::Blue,
            text: Color::White,
            text_dimmed: grey,
            highlight: Color::Blue,
            highlight_text: Color::White,
            id_color: Color::Cyan,
        }
    }
}

impl Theme {
    /// Get the color for a ticket status
    pub fn status_color(&self, status: TicketStatus) -> Color {
        match status {
            TicketStatus::Pending => self.status_pending,
            TicketStatus::Open => self.status_open,
            TicketStatus::Closed => self.status_closed,
        }
    }
}

/// Parse a `#rrggbb` or `#rgb` server color into a terminal color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').filter(|d| d.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        6 => Some(Color::Rgb {
            r: channel(&digits[0..2])?,
            g: channel(&digits[2..4])?,
            b: channel(&digits[4..6])?,
        }),
        3 => {
            let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
            })
        }
        _ => None,
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
