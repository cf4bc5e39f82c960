use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Straight-alpha sRGB color, 8 bits per channel.
///
/// Print backends write device RGB directly; no color management is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Returns the RGB channels as `f32` in `[0, 1]`.
    #[inline]
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }

    /// Lightens (positive `factor`) or darkens (negative `factor`) the color.
    ///
    /// A factor of `0.4` moves each channel 40% of the way towards white;
    /// `-0.4` moves it 40% of the way towards black. Alpha is preserved.
    pub fn lighten(self, factor: f32) -> Self {
        let factor = factor.clamp(-1.0, 1.0);
        let shift = |c: u8| -> u8 {
            let c = c as f32 / 255.0;
            let v = if factor > 0.0 {
                c + (1.0 - c) * factor
            } else {
                c + c * factor
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self { r: shift(self.r), g: shift(self.g), b: shift(self.b), a: self.a }
    }
}

/// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Error returned when a color literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color literal '{}'", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_opaque_and_translucent() {
        assert_eq!(Color::rgb(0x12, 0xab, 0xff).to_string(), "#12abff");
        assert_eq!("#12abff".parse::<Color>().unwrap(), Color::rgb(0x12, 0xab, 0xff));
        assert_eq!("#00000080".parse::<Color>().unwrap(), Color::rgba(0, 0, 0, 0x80));
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("123456".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn lighten_moves_towards_white() {
        assert_eq!(Color::black().lighten(0.4), Color::rgb(102, 102, 102));
        assert_eq!(Color::white().lighten(0.4), Color::white());
    }

    #[test]
    fn darken_moves_towards_black() {
        assert_eq!(Color::white().lighten(-0.4), Color::rgb(153, 153, 153));
        assert_eq!(Color::black().lighten(-0.4), Color::black());
    }

    #[test]
    fn lighten_keeps_alpha() {
        assert_eq!(Color::rgba(0, 0, 0, 10).lighten(1.0).a, 10);
    }
}
