//! ANSI output for truecolor terminals.
//!
//! Frames render as "▀" upper-half-block cells, packing two pixel rows
//! into every text row. The overlay composites onto black (terminals
//! have no alpha channel), and escape sequences are only emitted when
//! a cell's color differs from its neighbor to keep frames small.

use image::{Rgba, RgbaImage};

/// ANSI escape sequence to reset all formatting.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Render an RGBA frame to an ANSI string, two pixel rows per text
/// line, shifted by `offset` (the shake displacement). Rows end with
/// `\r\n` so the output is raw-mode safe.
pub fn frame_to_ansi(frame: &RgbaImage, offset: (i32, i32)) -> String {
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    if width == 0 || height == 0 {
        return String::new();
    }

    let mut out = String::new();
    for y in (0..height).step_by(2) {
        let mut last_fg: Option<(u8, u8, u8)> = None;
        let mut last_bg: Option<(u8, u8, u8)> = None;

        for x in 0..width {
            let top = sample(frame, x - offset.0, y - offset.1);
            let bottom = sample(frame, x - offset.0, y + 1 - offset.1);

            if last_fg != Some(top) {
                out.push_str(&format!("\x1b[38;2;{};{};{}m", top.0, top.1, top.2));
                last_fg = Some(top);
            }
            if last_bg != Some(bottom) {
                out.push_str(&format!("\x1b[48;2;{};{};{}m", bottom.0, bottom.1, bottom.2));
                last_bg = Some(bottom);
            }
            out.push('▀');
        }
        out.push_str(ANSI_RESET);
        out.push_str("\r\n");
    }
    out
}

/// Fetch a pixel composited over black; out-of-bounds reads (shifted
/// edges, odd heights) are black.
fn sample(frame: &RgbaImage, x: i32, y: i32) -> (u8, u8, u8) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return (0, 0, 0);
    }
    over_black(*frame.get_pixel(x as u32, y as u32))
}

fn over_black(pixel: Rgba<u8>) -> (u8, u8, u8) {
    let a = pixel[3] as u32;
    (
        (pixel[0] as u32 * a / 255) as u8,
        (pixel[1] as u32 * a / 255) as u8,
        (pixel[2] as u32 * a / 255) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_empty_frame_renders_nothing() {
        let frame = RgbaImage::new(0, 0);
        assert!(frame_to_ansi(&frame, (0, 0)).is_empty());
    }

    #[test]
    fn test_rows_pack_two_pixels_per_line() {
        let frame = solid(4, 4, Rgba([255, 0, 0, 255]));
        let out = frame_to_ansi(&frame, (0, 0));
        assert_eq!(out.matches("\r\n").count(), 2);
        assert_eq!(out.matches('▀').count(), 8);
        assert!(out.contains("\x1b[38;2;255;0;0m"));
        assert!(out.contains(ANSI_RESET));
    }

    #[test]
    fn test_color_runs_emit_one_escape() {
        // A solid row should set the foreground color exactly once
        let frame = solid(8, 2, Rgba([0, 255, 0, 255]));
        let out = frame_to_ansi(&frame, (0, 0));
        assert_eq!(out.matches("\x1b[38;2;0;255;0m").count(), 1);
        assert_eq!(out.matches("\x1b[48;2;0;255;0m").count(), 1);
    }

    #[test]
    fn test_transparency_composites_to_black() {
        let frame = solid(2, 2, Rgba([255, 255, 255, 0]));
        let out = frame_to_ansi(&frame, (0, 0));
        assert!(out.contains("\x1b[38;2;0;0;0m"));
        assert!(!out.contains("\x1b[38;2;255;255;255m"));
    }

    #[test]
    fn test_half_alpha_dims_channel() {
        let frame = solid(2, 2, Rgba([255, 0, 0, 128]));
        let out = frame_to_ansi(&frame, (0, 0));
        assert!(out.contains("\x1b[38;2;128;0;0m"));
    }

    #[test]
    fn test_offset_shifts_content() {
        // One red pixel at (0, 0); shifting right by one moves it to x=1
        let mut frame = RgbaImage::new(4, 2);
        frame.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        let plain = frame_to_ansi(&frame, (0, 0));
        let shifted = frame_to_ansi(&frame, (1, 0));
        assert_ne!(plain, shifted);
        // The first cell of the shifted frame reads out-of-bounds black
        assert!(shifted.starts_with("\x1b[38;2;0;0;0m"));
        assert!(plain.starts_with("\x1b[38;2;255;0;0m"));
        assert!(shifted.contains("\x1b[38;2;255;0;0m"), "pixel still visible after shift");
    }

    #[test]
    fn test_odd_height_bottom_row_is_black() {
        let frame = solid(2, 3, Rgba([0, 0, 255, 255]));
        let out = frame_to_ansi(&frame, (0, 0));
        // Second text row pairs pixel row 2 with out-of-bounds black
        assert_eq!(out.matches("\r\n").count(), 2);
        assert!(out.contains("\x1b[48;2;0;0;0m"));
    }
}
