//! Color values and the CSS-like color string parser.
//!
//! Element colors are stored as the strings the user typed (`#6C5CE7`,
//! `rgba(0, 0, 0, 0.25)`, `white`) and parsed on demand by the renderer
//! and the SVG encoder. Parsing is built on `winnow` 0.7.

use winnow::ascii::{multispace0, space0};
use winnow::combinator::{alt, delimited, opt, preceded, separated_pair};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], straight (not premultiplied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Parse `RGB`, `RGBA`, `RRGGBB`, `RRGGBBAA` (with or without `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        let (r, g, b, a) = match bytes.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            4 => (short(0)?, short(1)?, short(2)?, short(3)?),
            6 => (long(0)?, long(2)?, long(4)?, 255),
            8 => (long(0)?, long(2)?, long(4)?, long(6)?),
            _ => return None,
        };
        Some(Self::rgba8(r, g, b, a as f32 / 255.0))
    }

    /// Emit as `#RRGGBB` (alpha is carried separately in SVG output).
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }
}

/// Parse a CSS-like color string. Returns `None` for anything unrecognized,
/// which the renderer treats as "paint nothing".
pub fn parse_color(input: &str) -> Option<Color> {
    let mut rest = input.trim();
    let color = color_value.parse_next(&mut rest).ok()?;
    rest.trim().is_empty().then_some(color)
}

fn color_value(input: &mut &str) -> ModalResult<Color> {
    alt((hex_color, rgb_function, named_color)).parse_next(input)
}

fn hex_color(input: &mut &str) -> ModalResult<Color> {
    let digits: &str = preceded('#', take_while(3..=8, |c: char| c.is_ascii_hexdigit()))
        .parse_next(input)?;
    Color::from_hex(digits).ok_or_else(|| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    let ((r, g), (b, a)) = delimited(
        ('(', multispace0),
        separated_pair(
            separated_pair(number, comma, number),
            comma,
            (number, opt(preceded(comma, number))),
        ),
        (multispace0, ')'),
    )
    .parse_next(input)?;
    let channel = |v: f32| (v.clamp(0.0, 255.0)) / 255.0;
    Ok(Color::rgba(
        channel(r),
        channel(g),
        channel(b),
        a.unwrap_or(1.0).clamp(0.0, 1.0),
    ))
}

fn comma(input: &mut &str) -> ModalResult<()> {
    (space0, ',', space0).void().parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f32> {
    let matched: &str = take_while(1.., |c: char| c.is_ascii_digit() || c == '.' || c == '-')
        .parse_next(input)?;
    matched
        .parse::<f32>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn named_color(input: &mut &str) -> ModalResult<Color> {
    let name: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    let color = match name.to_ascii_lowercase().as_str() {
        "transparent" | "none" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgba(1.0, 0.0, 0.0, 1.0),
        "green" => Color::rgba8(0, 128, 0, 1.0),
        "blue" => Color::rgba(0.0, 0.0, 1.0, 1.0),
        "gray" | "grey" => Color::rgba8(128, 128, 128, 1.0),
        _ => return Err(winnow::error::ErrMode::Backtrack(ContextError::new())),
    };
    Ok(color)
}
