//! Terminal preview of a converted image.
//!
//! The image is scaled to fit the terminal and drawn with upper half blocks,
//! two pixel rows per text line, then the preview blocks until a key is pressed.

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::GrayImage;
use termion::color;
use termion::input::TermRead;
use termion::raw::IntoRawMode;
use tracing::debug;

use crate::image_pipeline::GrayImageData;

const FALLBACK_TERMINAL_SIZE: (u16, u16) = (80, 24);
const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Draws `image` on stdout and waits for a key press.
pub fn show(image: &GrayImageData) -> Result<()> {
    let (cols, rows) = termion::terminal_size().unwrap_or(FALLBACK_TERMINAL_SIZE);
    // One line is kept for the prompt.
    let max_rows = usize::from(rows.saturating_sub(1)) * 2;

    {
        let mut out = io::stdout().lock();
        render(image, usize::from(cols), max_rows, &mut out)?;
        write!(
            out,
            "{}x{} grayscale, press any key to close",
            image.width, image.height
        )?;
        out.flush()?;
    }

    wait_for_key()?;
    println!();
    Ok(())
}

fn wait_for_key() -> Result<()> {
    let _raw = io::stdout()
        .into_raw_mode()
        .context("terminal does not support raw mode")?;
    let key = io::stdin()
        .keys()
        .next()
        .transpose()
        .context("failed to read key press")?;
    debug!(?key, "Preview closed");
    Ok(())
}

/// Size that fits `width`x`height` into `max_cols`x`max_rows` pixels
/// without upscaling and keeping the aspect ratio.
fn fit(width: usize, height: usize, max_cols: usize, max_rows: usize) -> (u32, u32) {
    let scale = (max_cols as f64 / width as f64)
        .min(max_rows as f64 / height as f64)
        .min(1.0);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

fn render(image: &GrayImageData, max_cols: usize, max_rows: usize, out: &mut dyn Write) -> Result<()> {
    let source = GrayImage::from_raw(image.width as u32, image.height as u32, image.data.clone())
        .ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", image.width, image.height))?;

    let (w, h) = fit(image.width, image.height, max_cols.max(1), max_rows.max(1));
    let scaled = if (w, h) == source.dimensions() {
        source
    } else {
        imageops::resize(&source, w, h, FilterType::Triangle)
    };
    debug!("Rendering preview at {}x{}", w, h);

    for y in (0..h).step_by(2) {
        for x in 0..w {
            let upper = scaled.get_pixel(x, y)[0];
            write!(out, "{}", color::Fg(color::Rgb(upper, upper, upper)))?;
            if y + 1 < h {
                let lower = scaled.get_pixel(x, y + 1)[0];
                write!(out, "{}", color::Bg(color::Rgb(lower, lower, lower)))?;
            } else {
                write!(out, "{}", color::Bg(color::Reset))?;
            }
            write!(out, "{}", UPPER_HALF_BLOCK)?;
        }
        write!(out, "{}{}\r\n", color::Fg(color::Reset), color::Bg(color::Reset))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> GrayImageData {
        GrayImageData {
            width,
            height,
            data: (0..width * height).map(|i| (i % 256) as u8).collect(),
        }
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit(10, 4, 80, 46), (10, 4));
    }

    #[test]
    fn test_fit_keeps_aspect() {
        assert_eq!(fit(400, 200, 80, 46), (80, 40));
        assert_eq!(fit(200, 400, 80, 46), (23, 46));
    }

    #[test]
    fn test_fit_minimum_one_pixel() {
        assert_eq!(fit(10000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn test_render_line_count() {
        let mut out = Vec::new();
        render(&gradient(6, 5), 80, 46, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
        assert_eq!(text.matches(UPPER_HALF_BLOCK).count(), 6 * 3);
    }

    #[test]
    fn test_render_rejects_short_buffer() {
        let image = GrayImageData { width: 4, height: 4, data: vec![0; 3] };
        assert!(render(&image, 80, 46, &mut Vec::new()).is_err());
    }
}
