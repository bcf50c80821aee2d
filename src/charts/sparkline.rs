//! One-line sparkline.

use crate::theme::{ColorToken, Palette};
use crate::ui::helpers::{fit_line, NO_DATA};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

const RAMP: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Pick one sample per output column.
fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    (0..width)
        .map(|col| values[col * values.len() / width])
        .collect()
}

/// Always exactly `width` characters wide.
pub fn render_sparkline(
    values: &[f64],
    width: usize,
    color: ColorToken,
    palette: &dyn Palette,
) -> Line<'static> {
    if values.is_empty() {
        return fit_line(
            Line::from(Span::styled(
                NO_DATA,
                Style::default().fg(palette.color(ColorToken::TextMuted)),
            )),
            width,
        );
    }
    if width == 0 {
        return Line::default();
    }
    let samples: Vec<f64> = downsample(values, width)
        .into_iter()
        .map(|v| if v.is_finite() { v } else { 0.0 })
        .collect();
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let glyphs: String = samples
        .iter()
        .map(|v| {
            if range <= 0.0 {
                // Flat input: one level, mid-ramp unless everything is zero.
                if max == 0.0 {
                    RAMP[0]
                } else {
                    RAMP[3]
                }
            } else {
                let level = ((v - min) / range * (RAMP.len() - 1) as f64).round() as usize;
                RAMP[level.min(RAMP.len() - 1)]
            }
        })
        .collect();
    Line::from(Span::styled(glyphs, Style::default().fg(palette.color(color))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeColors;
    use crate::ui::helpers::block_text;

    fn text(values: &[f64], width: usize) -> String {
        block_text(&[render_sparkline(values, width, ColorToken::AccentCyan, &ThemeColors::DEFAULT)])
            .remove(0)
    }

    #[test]
    fn test_width_matches_for_any_length() {
        let long: Vec<f64> = (0..500).map(|i| (i % 17) as f64).collect();
        for len in [1usize, 3, 20, 500] {
            for width in [1usize, 7, 20, 64] {
                assert_eq!(text(&long[..len], width).chars().count(), width);
            }
        }
        assert_eq!(text(&[], 30).chars().count(), 30);
    }

    #[test]
    fn test_flat_input_single_level() {
        let s = text(&[4.0; 12], 8);
        let first = s.chars().next().unwrap();
        assert!(s.chars().all(|c| c == first));
    }

    #[test]
    fn test_extremes_use_ramp_ends() {
        let s = text(&[0.0, 10.0], 2);
        assert_eq!(s, "▁█");
    }
}
