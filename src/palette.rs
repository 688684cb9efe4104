//! Named color schemes applied by templates.
//!
//! The table is fixed at compile time. Lookups never fail: an unknown name
//! resolves to [`DEFAULT_PALETTE`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Name of the palette used when a lookup misses.
pub const DEFAULT_PALETTE: &str = "blue";

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Blends `other` over `self` with the given opacity (0.0..=1.0).
    ///
    /// Used where a layout wants a translucent tint, e.g. white at 20% on an
    /// accent sidebar; the page tree only carries opaque colors.
    pub fn mix(self, other: Color, alpha: f32) -> Color {
        let a = alpha.clamp(0.0, 1.0);
        let channel = |base: u8, top: u8| -> u8 {
            (base as f32 * (1.0 - a) + top as f32 * a).round() as u8
        };
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }

    /// Components as fractions, the form PDF color operators take.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(format!("invalid color `{}`", s)),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Color::hex)
            .map_err(|_| format!("invalid color `{}`", s))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Accent, light background tint, and text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary_color: Color,
    pub secondary_color: Color,
    pub text_color: Color,
}

impl Palette {
    pub const fn new(primary: Color, secondary: Color, text: Color) -> Self {
        Self {
            primary_color: primary,
            secondary_color: secondary,
            text_color: text,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        PALETTES[0].1
    }
}

/// The fixed palette table; the first entry is the default.
pub const PALETTES: [(&str, Palette); 6] = [
    (
        "blue",
        Palette::new(Color::hex(0x2563eb), Color::hex(0xeff6ff), Color::hex(0x1e293b)),
    ),
    (
        "emerald",
        Palette::new(Color::hex(0x059669), Color::hex(0xecfdf5), Color::hex(0x064e3b)),
    ),
    (
        "purple",
        Palette::new(Color::hex(0x7c3aed), Color::hex(0xf5f3ff), Color::hex(0x4c1d95)),
    ),
    (
        "red",
        Palette::new(Color::hex(0xdc2626), Color::hex(0xfef2f2), Color::hex(0x7f1d1d)),
    ),
    (
        "slate",
        Palette::new(Color::hex(0x475569), Color::hex(0xf8fafc), Color::hex(0x1e293b)),
    ),
    (
        "orange",
        Palette::new(Color::hex(0xea580c), Color::hex(0xfff7ed), Color::hex(0x7c2d12)),
    ),
];

/// Either a palette name or an already-resolved palette.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteRef {
    Named(String),
    Resolved(Palette),
}

impl From<&str> for PaletteRef {
    fn from(name: &str) -> Self {
        PaletteRef::Named(name.to_string())
    }
}

impl From<String> for PaletteRef {
    fn from(name: String) -> Self {
        PaletteRef::Named(name)
    }
}

impl From<&String> for PaletteRef {
    fn from(name: &String) -> Self {
        PaletteRef::Named(name.clone())
    }
}

impl From<Palette> for PaletteRef {
    fn from(palette: Palette) -> Self {
        PaletteRef::Resolved(palette)
    }
}

impl From<&Palette> for PaletteRef {
    fn from(palette: &Palette) -> Self {
        PaletteRef::Resolved(*palette)
    }
}

/// Looks up a palette by name (case-insensitive, trimmed).
pub fn lookup(name: &str) -> Option<Palette> {
    let name = name.trim();
    PALETTES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, p)| *p)
}

/// Resolves a name or palette; never fails.
pub fn resolve(palette: impl Into<PaletteRef>) -> Palette {
    match palette.into() {
        PaletteRef::Resolved(p) => p,
        PaletteRef::Named(name) => lookup(&name).unwrap_or_else(|| {
            log::warn!(
                "unknown palette `{}`; falling back to `{}`",
                name,
                DEFAULT_PALETTE
            );
            Palette::default()
        }),
    }
}

/// Palette names in table order.
pub fn list_palettes() -> Vec<&'static str> {
    PALETTES.iter().map(|(n, _)| *n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_name_resolves() {
        let p = resolve("emerald");
        assert_eq!(p.primary_color.to_string(), "#059669");
        assert_eq!(p.secondary_color.to_string(), "#ecfdf5");
        assert_eq!(p.text_color.to_string(), "#064e3b");
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(resolve(" Purple "), lookup("purple").unwrap());
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        assert_eq!(resolve("nonexistent-color"), resolve(DEFAULT_PALETTE));
        assert_eq!(resolve(""), Palette::default());
    }

    #[test]
    fn resolved_palette_passes_through() {
        let custom = Palette::new(Color::hex(0x111111), Color::hex(0x222222), Color::hex(0x333333));
        assert_eq!(resolve(custom), custom);
        assert_eq!(resolve(resolve(&custom)), custom);
    }

    #[test]
    fn color_parses_and_prints() {
        assert_eq!("#2563eb".parse::<Color>().unwrap(), Color::rgb(0x25, 0x63, 0xeb));
        assert_eq!("fff".parse::<Color>().unwrap(), Color::WHITE);
        assert!("#12345".parse::<Color>().is_err());
        assert_eq!(Color::hex(0x0a0b0c).to_string(), "#0a0b0c");
    }

    #[test]
    fn mix_blends_towards_top_color() {
        let base = Color::hex(0x000000);
        assert_eq!(base.mix(Color::WHITE, 0.0), base);
        assert_eq!(base.mix(Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(base.mix(Color::WHITE, 0.2), Color::rgb(51, 51, 51));
    }

    #[test]
    fn six_palettes_default_first() {
        assert_eq!(list_palettes().len(), 6);
        assert_eq!(list_palettes()[0], DEFAULT_PALETTE);
    }
}
