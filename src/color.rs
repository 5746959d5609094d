//! Colors and role placeholders.
//!
//! Templates write colors as `#RRGGBB` (the `#` may be omitted). Inside a
//! composite definition a color may instead name a role, written `{role}`,
//! which the composite resolver replaces from the element's palette.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// An opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Linear interpolation per channel, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid color `{value}`: expected #RRGGBB")]
pub struct ColorParseError {
    pub value: String,
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError { value: s.to_string() };
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A color as written in a template: either literal or a palette role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ColorSpec {
    Literal(Color),
    Role(String),
}

impl ColorSpec {
    /// The literal color, if this is not a placeholder.
    pub fn literal(&self) -> Option<Color> {
        match self {
            ColorSpec::Literal(c) => Some(*c),
            ColorSpec::Role(_) => None,
        }
    }

    /// Replace a role placeholder using `lookup`. Literal colors pass through.
    /// On failure returns the name of the missing role.
    pub fn substitute(&self, lookup: impl Fn(&str) -> Option<Color>) -> Result<ColorSpec, String> {
        match self {
            ColorSpec::Literal(_) => Ok(self.clone()),
            ColorSpec::Role(role) => lookup(role).map(ColorSpec::Literal).ok_or_else(|| role.clone()),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(c: Color) -> Self {
        ColorSpec::Literal(c)
    }
}

impl FromStr for ColorSpec {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(role) = trimmed.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            let role = role.trim();
            if role.is_empty() {
                return Err(ColorParseError { value: s.to_string() });
            }
            return Ok(ColorSpec::Role(role.to_string()));
        }
        trimmed.parse().map(ColorSpec::Literal)
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Literal(c) => write!(f, "{c}"),
            ColorSpec::Role(role) => write!(f, "{{{role}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!("#FF8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
    }

    #[test]
    fn rejects_short_and_non_hex() {
        assert!("#FFF".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn displays_uppercase_hex() {
        assert_eq!(Color::rgb(10, 200, 255).to_string(), "#0AC8FF");
    }

    #[test]
    fn parses_role_placeholder() {
        assert_eq!(
            "{primary}".parse::<ColorSpec>().unwrap(),
            ColorSpec::Role("primary".into())
        );
        assert!("{}".parse::<ColorSpec>().is_err());
        assert_eq!(
            "#000000".parse::<ColorSpec>().unwrap(),
            ColorSpec::Literal(Color::BLACK)
        );
    }

    #[test]
    fn substitution_reports_missing_role() {
        let spec = ColorSpec::Role("accent".into());
        let missing = spec.substitute(|_| None);
        assert_eq!(missing, Err("accent".to_string()));

        let found = spec.substitute(|r| (r == "accent").then_some(Color::WHITE));
        assert_eq!(found, Ok(ColorSpec::Literal(Color::WHITE)));
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 2.0), Color::WHITE);
    }
}
