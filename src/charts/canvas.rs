//! Braille sub-pixel canvas.
//!
//! Every character cell holds a 2 × 4 grid of dots, so a canvas of `w × h`
//! cells addresses `2w × 4h` sub-pixels. Each sub-pixel remembers which series
//! painted it; when the canvas is turned into text, a cell's glyph is the OR of
//! its dot bits and its color comes from the series owning most of its dots.

use crate::ui::helpers::TextBlock;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// Dot bit per (column, row) inside one cell.
///
/// dot 1 (0,0) = bit 0    dot 4 (1,0) = bit 3
/// dot 2 (0,1) = bit 1    dot 5 (1,1) = bit 4
/// dot 3 (0,2) = bit 2    dot 6 (1,2) = bit 5
/// dot 7 (0,3) = bit 6    dot 8 (1,3) = bit 7
const DOT_BITS: [[u8; 4]; 2] = [[0, 1, 2, 6], [3, 4, 5, 7]];

const BRAILLE_BASE: u32 = 0x2800;

#[derive(Debug, Clone)]
pub struct Canvas {
    char_w: u16,
    char_h: u16,
    px_w: i32,
    px_h: i32,
    /// Row-major owner per sub-pixel.
    pixels: Vec<Option<usize>>,
}

impl Canvas {
    pub fn new(char_w: u16, char_h: u16) -> Self {
        let px_w = char_w as i32 * 2;
        let px_h = char_h as i32 * 4;
        Self {
            char_w,
            char_h,
            px_w,
            px_h,
            pixels: vec![None; px_w as usize * px_h as usize],
        }
    }

    /// Sub-pixel dimensions.
    #[inline]
    pub fn size(&self) -> (i32, i32) {
        (self.px_w, self.px_h)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.px_w || y >= self.px_h {
            None
        } else {
            Some(y as usize * self.px_w as usize + x as usize)
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<usize> {
        self.index(x, y).and_then(|i| self.pixels[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, series: usize) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = Some(series);
        }
    }

    /// DDA line stepped along the dominant axis. Each sample also paints the dot
    /// above and below it so steep or shallow segments stay connected.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, series: usize) {
        let dx = x1 as i64 - x0 as i64;
        let dy = y1 as i64 - y0 as i64;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.stamp(x0, y0, series);
            return;
        }

        // Only walk the part of the segment that can touch the grid (one dot of
        // margin for the vertical stamp).
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, d, max) in [
            (x0 as f64, dx as f64, self.px_w as f64),
            (y0 as f64, dy as f64, self.px_h as f64),
        ] {
            if d == 0.0 {
                if p < -1.0 || p > max {
                    return;
                }
                continue;
            }
            let a = (-1.0 - p) / d;
            let b = (max - p) / d;
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
        if t0 > t1 {
            return;
        }

        let first = ((t0 * steps as f64).floor() as i64).max(0);
        let last = ((t1 * steps as f64).ceil() as i64).min(steps);
        for i in first..=last {
            let t = i as f64 / steps as f64;
            let x = (x0 as f64 + dx as f64 * t).round() as i32;
            let y = (y0 as f64 + dy as f64 * t).round() as i32;
            self.stamp(x, y, series);
        }
    }

    fn stamp(&mut self, x: i32, y: i32, series: usize) {
        self.set_pixel(x, y, series);
        self.set_pixel(x, y.saturating_sub(1), series);
        self.set_pixel(x, y.saturating_add(1), series);
    }

    /// Area fill for single-series charts: everything under the topmost painted
    /// dot of each column.
    pub fn fill_below(&mut self, series: usize) {
        for x in 0..self.px_w {
            let Some(top) = (0..self.px_h).find(|&y| self.get(x, y).is_some()) else {
                continue;
            };
            for y in top + 1..self.px_h {
                if let Some(i) = self.index(x, y) {
                    if self.pixels[i].is_none() {
                        self.pixels[i] = Some(series);
                    }
                }
            }
        }
    }

    /// Glyph and owning series for one cell.
    fn cell(&self, cx: i32, cy: i32) -> (char, Option<usize>) {
        let mut bits: u8 = 0;
        let mut owners: [usize; 8] = [0; 8];
        let mut n = 0;
        for (col, rows) in DOT_BITS.iter().enumerate() {
            for (row, bit) in rows.iter().enumerate() {
                if let Some(s) = self.get(cx * 2 + col as i32, cy * 4 + row as i32) {
                    bits |= 1 << bit;
                    owners[n] = s;
                    n += 1;
                }
            }
        }
        if bits == 0 {
            return (' ', None);
        }
        let ch = char::from_u32(BRAILLE_BASE + bits as u32).unwrap_or(' ');
        (ch, plurality(&mut owners[..n]))
    }

    /// Convert to text, coloring each cell by `palette[series]`.
    pub fn render(&self, palette: &[Color]) -> TextBlock {
        let mut lines = Vec::with_capacity(self.char_h as usize);
        for cy in 0..self.char_h as i32 {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_owner: Option<usize> = None;
            for cx in 0..self.char_w as i32 {
                let (ch, owner) = self.cell(cx, cy);
                if owner != run_owner && !run.is_empty() {
                    spans.push(styled_run(std::mem::take(&mut run), run_owner, palette));
                }
                run_owner = owner;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(styled_run(run, run_owner, palette));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn styled_run(text: String, owner: Option<usize>, palette: &[Color]) -> Span<'static> {
    match owner.and_then(|s| palette.get(s)) {
        Some(color) => Span::styled(text, Style::default().fg(*color)),
        None => Span::raw(text),
    }
}

/// Most frequent series; ties go to the lowest index.
fn plurality(owners: &mut [usize]) -> Option<usize> {
    owners.sort_unstable();
    let mut best: Option<(usize, usize)> = None;
    for run in owners.chunk_by(|a, b| a == b) {
        let count = run.len();
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((run[0], count));
        }
    }
    best.map(|(s, _)| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::helpers::block_text;

    #[test]
    fn test_dimensions() {
        let c = Canvas::new(10, 3);
        assert_eq!(c.size(), (20, 12));
    }

    #[test]
    fn test_empty_canvas_renders_blank_block() {
        let c = Canvas::new(7, 4);
        let text = block_text(&c.render(&[]));
        assert_eq!(text.len(), 4);
        for line in text {
            assert_eq!(line, " ".repeat(7));
        }
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_noop() {
        let mut c = Canvas::new(2, 2);
        c.set_pixel(-1, 0, 0);
        c.set_pixel(0, -1, 0);
        c.set_pixel(4, 0, 0);
        c.set_pixel(0, 8, 0);
        assert!(c.pixels.iter().all(Option::is_none));
    }

    #[test]
    fn test_far_out_of_bounds_line() {
        let mut c = Canvas::new(4, 2);
        c.draw_line(-1_000_000, -5, 2_000_000, 900_000, 0);
        c.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 1);
        assert_eq!(c.render(&[Color::Red, Color::Blue]).len(), 2);
    }

    #[test]
    fn test_single_dot_glyph() {
        let mut c = Canvas::new(1, 1);
        c.set_pixel(0, 0, 0);
        assert_eq!(block_text(&c.render(&[Color::Red]))[0], "\u{2801}");
        c.set_pixel(1, 3, 0);
        assert_eq!(block_text(&c.render(&[Color::Red]))[0], "\u{2881}");
    }

    #[test]
    fn test_all_dots_glyph() {
        let mut c = Canvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                c.set_pixel(x, y, 0);
            }
        }
        assert_eq!(block_text(&c.render(&[Color::Red]))[0], "\u{28FF}");
    }

    #[test]
    fn test_line_paints_neighbours() {
        let mut c = Canvas::new(5, 3);
        c.draw_line(0, 5, 9, 5, 0);
        for x in 0..10 {
            assert_eq!(c.get(x, 4), Some(0));
            assert_eq!(c.get(x, 5), Some(0));
            assert_eq!(c.get(x, 6), Some(0));
        }
        assert_eq!(c.get(0, 3), None);
    }

    #[test]
    fn test_fill_below() {
        let mut c = Canvas::new(1, 2);
        c.set_pixel(0, 2, 0);
        c.fill_below(0);
        for y in 2..8 {
            assert_eq!(c.get(0, y), Some(0));
        }
        assert_eq!(c.get(0, 1), None);
        assert_eq!(c.get(1, 7), None);
    }

    #[test]
    fn test_plurality_tie_breaks_low() {
        assert_eq!(plurality(&mut [3, 1, 3, 1]), Some(1));
        assert_eq!(plurality(&mut [2, 2, 0]), Some(2));
        assert_eq!(plurality(&mut []), None);
    }

    #[test]
    fn test_cell_color_is_deterministic() {
        let mut c = Canvas::new(1, 1);
        c.set_pixel(0, 0, 1);
        c.set_pixel(1, 0, 0);
        let palette = [Color::Red, Color::Blue];
        let first = c.render(&palette);
        assert_eq!(first[0].spans[0].style.fg, Some(Color::Red));
        assert_eq!(first, c.render(&palette));
    }
}
