//! ARGB colors with the host palette's named constants.
//!
//! Colors arrive in three forms: named constants in style strings
//! (`color.Red`, `Color.Blue`, `Red`), `#AARRGGBB` / `#RRGGBB` hex strings in
//! attributes, and JSON strings inside attributes such as IconButton `colors`.

use std::fmt;

/// A 32-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const DARK_GRAY: Color = Color::rgb(0x44, 0x44, 0x44);
    pub const GRAY: Color = Color::rgb(0x88, 0x88, 0x88);
    pub const LIGHT_GRAY: Color = Color::rgb(0xCC, 0xCC, 0xCC);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const CYAN: Color = Color::rgb(0x00, 0xFF, 0xFF);
    pub const MAGENTA: Color = Color::rgb(0xFF, 0x00, 0xFF);
    pub const TRANSPARENT: Color = Color::argb(0x00, 0x00, 0x00, 0x00);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    /// Create a color with explicit alpha.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Whether this color paints nothing.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Look up a named constant.
    ///
    /// Accepts `Red`, `color.Red` and `Color.Red`. Names compare
    /// case-insensitively so `LightGray` and `lightgray` both resolve.
    pub fn named(name: &str) -> Option<Color> {
        let bare = name
            .strip_prefix("color.")
            .or_else(|| name.strip_prefix("Color."))
            .unwrap_or(name);
        NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(bare))
            .map(|(_, c)| *c)
    }

    /// Parse `#AARRGGBB` or `#RRGGBB`.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.trim().strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            8 => Some(Color::argb(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            _ => None,
        }
    }

    /// Parse either a hex string or a named constant.
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::named(s)
        }
    }

    /// The constant name, if this color is one of the palette entries.
    pub fn name(self) -> Option<&'static str> {
        NAMED.iter().find(|(_, c)| *c == self).map(|(n, _)| *n)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b),
        }
    }
}

const NAMED: &[(&str, Color)] = &[
    ("Black", Color::BLACK),
    ("DarkGray", Color::DARK_GRAY),
    ("Gray", Color::GRAY),
    ("LightGray", Color::LIGHT_GRAY),
    ("White", Color::WHITE),
    ("Red", Color::RED),
    ("Green", Color::GREEN),
    ("Blue", Color::BLUE),
    ("Yellow", Color::YELLOW),
    ("Cyan", Color::CYAN),
    ("Magenta", Color::MAGENTA),
    ("Transparent", Color::TRANSPARENT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_with_and_without_prefix() {
        assert_eq!(Color::named("Red"), Some(Color::RED));
        assert_eq!(Color::named("color.Red"), Some(Color::RED));
        assert_eq!(Color::named("Color.Blue"), Some(Color::BLUE));
        assert_eq!(Color::named("lightgray"), Some(Color::LIGHT_GRAY));
        assert_eq!(Color::named("Chartreuse"), None);
    }

    #[test]
    fn hex_argb() {
        assert_eq!(Color::from_hex("#80FF0000"), Some(Color::argb(0x80, 0xFF, 0, 0)));
    }

    #[test]
    fn hex_rgb_is_opaque() {
        assert_eq!(Color::from_hex("#00FF00"), Some(Color::GREEN));
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(Color::from_hex("FF0000"), None);
        assert_eq!(Color::from_hex("#FFF"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn parse_dispatches_on_hash() {
        assert_eq!(Color::parse(" #FF0000FF "), Some(Color::BLUE));
        assert_eq!(Color::parse("White"), Some(Color::WHITE));
    }

    #[test]
    fn display_uses_names_then_hex() {
        assert_eq!(Color::RED.to_string(), "Red");
        assert_eq!(Color::argb(0x80, 1, 2, 3).to_string(), "#80010203");
    }

    #[test]
    fn transparency() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::BLACK.is_transparent());
    }
}
