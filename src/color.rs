//! Palette colors for launches, parsed from CSS color strings.
//!
//! Hex colors (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`) take a fast
//! path; everything else (`red`, `rgb()`, `hsl()`, `oklch()`, ...) is
//! handed to lightningcss.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// The stock launch palette.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#ff3b30", "#00cc66", "#007aff", "#ff9500", "#5856d6", "#ff2d55", "#4cd964", "#ffcc00",
];

/// Error type for color parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Malformed hex color
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use skyburst::color::parse_color;
///
/// assert_eq!(parse_color("#ff3b30").unwrap(), image::Rgba([255, 59, 48, 255]));
/// assert_eq!(parse_color("red").unwrap(), image::Rgba([255, 0, 0, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(s, hex);
    }
    parse_css(s)
}

/// Parse every entry of a configured palette. An empty palette falls
/// back to [`DEFAULT_PALETTE`] so a degenerate config still sparkles.
pub fn parse_palette(entries: &[String]) -> Result<Vec<Rgba<u8>>, ColorError> {
    if entries.is_empty() {
        return DEFAULT_PALETTE.iter().map(|s| parse_color(s)).collect();
    }
    entries.iter().map(|s| parse_color(s)).collect()
}

fn parse_hex(original: &str, hex: &str) -> Result<Rgba<u8>, ColorError> {
    let invalid = || ColorError::InvalidHex(original.to_string());

    // Reject signs and non-ASCII up front; from_str_radix is laxer
    // than hex notation allows, and byte slicing needs ASCII anyway
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    // Short forms double each digit: #F00 -> #FF0000
    let nibble = |i: usize| -> Result<u8, ColorError> {
        let d = u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid())?;
        Ok(d * 17)
    };
    let pair = |i: usize| -> Result<u8, ColorError> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())
    };

    match hex.len() {
        3 => Ok(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Ok(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Ok(Rgba([pair(0)?, pair(2)?, pair(4)?, 255])),
        8 => Ok(Rgba([pair(0)?, pair(2)?, pair(4)?, pair(6)?])),
        _ => Err(invalid()),
    }
}

fn parse_css(s: &str) -> Result<Rgba<u8>, ColorError> {
    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;
    match rgb {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        _ => Err(ColorError::CssParse(format!("'{}' did not resolve to RGB", s))),
    }
}
