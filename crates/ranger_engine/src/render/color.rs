//! RGBA colors and the named palette

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not `#rrggbb[aa]` or `0xrrggbb[aa]`
    #[error("unable to parse hex color '{0}'")]
    InvalidHex(String),
}

/// Color with unit range components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Color from unit range components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 0-255 components
    pub fn from_ints(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Parse `#rrggbb`, `#rrggbbaa`, `0xrrggbb` or `0xrrggbbaa`, digits in
    /// either case. Without an alpha pair the alpha component is 0.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());

        let digits = hex
            .strip_prefix('#')
            .or_else(|| hex.strip_prefix("0x"))
            .ok_or_else(invalid)?;

        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| -> Result<f32, ColorError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| invalid())
        };

        let mut color = Self::new(channel(0)?, channel(2)?, channel(4)?, 0.0);
        if digits.len() == 8 {
            color.a = channel(6)?;
        }
        Ok(color)
    }

    /// Look up a palette color by name
    pub fn named(name: &str) -> Option<Self> {
        palette().get(name).copied()
    }

    /// Components as an array
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components in unit range
    pub fn unit_string(&self) -> String {
        format!("({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Color {
    /// RGB as 0-255 values, alpha in unit range
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.r * 255.0,
            self.g * 255.0,
            self.b * 255.0,
            self.a
        )
    }
}

const PALETTE_INTS: &[(&str, [u8; 4])] = &[
    ("Transparent", [0, 0, 0, 0]),
    ("White", [255, 255, 255, 255]),
    ("Black", [0, 0, 0, 255]),
    ("Grey", [128, 128, 128, 255]),
    ("Red", [255, 0, 0, 255]),
    ("Green", [0, 255, 0, 255]),
    ("Blue", [0, 0, 255, 255]),
    ("Yellow", [255, 255, 0, 255]),
    ("NavyBlue", [10, 20, 100, 255]),
    ("LightBlue", [128, 128, 255, 255]),
    ("GreyBlue", [72, 100, 180, 255]),
    ("DarkBlue", [109, 157, 235, 255]),
    ("Orange", [255, 127, 0, 255]),
    ("GoldYellow", [255, 200, 0, 255]),
    ("GreenYellow", [173, 255, 47, 255]),
    ("YellowGreen", [154, 205, 50, 255]),
];

const PALETTE_HEX: &[(&str, &str)] = &[
    // Pantone
    ("PanSkin", "#fcc89bff"),
    ("PanPurple", "#8031a7ff"),
];

/// Process wide named colors, built on first use and immutable afterwards.
pub fn palette() -> &'static HashMap<&'static str, Color> {
    static PALETTE: OnceLock<HashMap<&'static str, Color>> = OnceLock::new();

    PALETTE.get_or_init(|| {
        let mut colors: HashMap<_, _> = PALETTE_INTS
            .iter()
            .map(|(name, [r, g, b, a])| (*name, Color::from_ints(*r, *g, *b, *a)))
            .collect();

        for (name, hex) in PALETTE_HEX {
            match Color::from_hex(hex) {
                Ok(color) => colors.insert(*name, color),
                Err(e) => panic!("palette entry {name}: {e}"),
            };
        }
        colors
    })
}
