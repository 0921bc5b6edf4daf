//! Stroke and fill styles.

use std::fmt;
use std::str::FromStr;

use crate::errors::ColorError;
use crate::units::Unit;

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::rgb(255, 0, 0),
            "green" => Color::rgb(0, 128, 0),
            "blue" => Color::rgb(0, 0, 255),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "transparent" | "none" => Color::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return Color::named(s).ok_or_else(|| ColorError::UnknownName {
                input: s.to_string(),
            });
        };
        let malformed = || ColorError::Malformed {
            input: s.to_string(),
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| malformed())
        };
        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Dash pattern of a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StrokePattern {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    /// Strokes nothing
    Invisible,
}

impl fmt::Display for StrokePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrokePattern::Solid => "solid",
            StrokePattern::Dash => "dash",
            StrokePattern::Dot => "dot",
            StrokePattern::DashDot => "dash-dot",
            StrokePattern::DashDotDot => "dash-dot-dot",
            StrokePattern::Invisible => "invisible",
        };
        f.write_str(name)
    }
}

/// Outline style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub thickness: Unit,
    pub pattern: StrokePattern,
}

impl Pen {
    pub fn new(color: Color, thickness: Unit) -> Self {
        Pen {
            color,
            thickness,
            pattern: StrokePattern::Solid,
        }
    }

    pub fn no_pen() -> Self {
        Pen {
            color: Color::TRANSPARENT,
            thickness: Unit::ZERO,
            pattern: StrokePattern::Invisible,
        }
    }

    pub fn with_pattern(mut self, pattern: StrokePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.pattern != StrokePattern::Invisible && !self.color.is_transparent()
    }
}

/// Fill style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Brush {
    pub color: Color,
}

impl Brush {
    pub fn new(color: Color) -> Self {
        Brush { color }
    }

    pub fn no_brush() -> Self {
        Brush {
            color: Color::TRANSPARENT,
        }
    }
}

/// Resolved pen and brush for one drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub pen: Pen,
    pub brush: Brush,
}
