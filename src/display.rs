//! Terminal presentation surface
//!
//! Consumes a rendered [`Frame`] and quantizes its intensities into a
//! fixed character ramp, then writes the grid centered in the terminal.
//! The render pipeline never touches terminal control; this module is
//! the only place escape sequences are emitted (via crossterm).

use crate::engine::Frame;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};

/// Intensity ramp from darkest to brightest
pub const CHAR_RAMP: [char; 13] = [
    ' ', '.', ',', '-', '~', ':', ';', '=', '!', '*', '#', '$', '@',
];

/// Error type for the display surface
#[derive(Debug)]
pub enum DisplayError {
    /// Frame dimensions don't match the display grid
    SizeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    IoError(std::io::Error),
}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::IoError(e)
    }
}

impl std::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayError::SizeMismatch { expected, got } => write!(
                f,
                "Frame size {}x{} does not match display size {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
            DisplayError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

/// Map an intensity in [0, 1] to its ramp character.
pub fn quantize(v: f32) -> char {
    let i = (v.clamp(0.0, 1.0) * (CHAR_RAMP.len() - 1) as f32).round() as usize;
    CHAR_RAMP[i]
}

/// Character-cell display of fixed size.
///
/// Each cell is repeated `hspace` times horizontally when written, which
/// compensates for terminal cells being roughly twice as tall as wide.
pub struct Display {
    width: usize,
    height: usize,
    hspace: usize,
    chars: Vec<char>,
}

impl Display {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_hspace(width, height, 2)
    }

    pub fn with_hspace(width: usize, height: usize, hspace: usize) -> Self {
        Self {
            width,
            height,
            hspace,
            chars: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Quantize a rendered frame into the character grid.
    pub fn update_buffer(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(DisplayError::SizeMismatch {
                expected: (self.width, self.height),
                got: (frame.width(), frame.height()),
            });
        }
        for (cell, &v) in self.chars.iter_mut().zip(frame.intensity()) {
            *cell = quantize(v);
        }
        Ok(())
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.chars[y * self.width + x]
    }

    /// Write the grid to the terminal, centered against the current
    /// terminal size. The offsets are recomputed every call, so resizes
    /// are picked up on the next frame.
    pub fn render_buffer(&self) -> Result<(), DisplayError> {
        let term_size = terminal::size()?;
        let mut out = io::stdout();
        self.render_to(&mut out, term_size)?;
        Ok(())
    }

    /// Write the grid to any sink, centered against `(cols, rows)`.
    pub fn render_to<W: Write>(&self, out: &mut W, term_size: (u16, u16)) -> io::Result<()> {
        let (cols, rows) = term_size;
        let start_row = (rows as usize).saturating_sub(self.height) / 2;
        let start_col = (cols as usize).saturating_sub(self.width * self.hspace) / 2;

        queue!(out, Clear(ClearType::All))?;
        for y in 0..self.height {
            let line: String = self.chars[y * self.width..(y + 1) * self.width]
                .iter()
                .flat_map(|&c| std::iter::repeat(c).take(self.hspace))
                .collect();
            queue!(
                out,
                MoveTo(start_col as u16, (start_row + y) as u16),
                Print(line)
            )?;
        }
        out.flush()
    }
}

/// Clear the terminal and park the cursor at the top-left.
pub fn clear_terminal() -> io::Result<()> {
    let mut out = io::stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_endpoints() {
        assert_eq!(quantize(0.0), ' ');
        assert_eq!(quantize(1.0), '@');
    }

    #[test]
    fn test_quantize_midpoint() {
        // 0.5 * 12 = 6 -> ';'
        assert_eq!(quantize(0.5), ';');
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-0.3), ' ');
        assert_eq!(quantize(2.0), '@');
    }

    #[test]
    fn test_update_buffer_size_mismatch() {
        let mut display = Display::new(10, 5);
        let frame = Frame::new(8, 5);
        assert!(matches!(
            display.update_buffer(&frame),
            Err(DisplayError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_update_buffer_quantizes() {
        let mut display = Display::new(4, 2);
        let frame = Frame::new(4, 2);
        display.update_buffer(&frame).unwrap();
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(display.char_at(x, y), ' ');
            }
        }
    }

    #[test]
    fn test_render_to_repeats_cells() {
        let display = Display::with_hspace(3, 1, 2);
        let mut out: Vec<u8> = Vec::new();
        display.render_to(&mut out, (80, 24)).unwrap();
        let text = String::from_utf8(out).unwrap();
        // 3 cells * hspace 2 = 6 spaces in the payload line
        assert!(text.contains("      "));
    }
}
