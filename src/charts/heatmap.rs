//! Density heatmap over a labelled row × column matrix.

use crate::theme::{ColorToken, Palette};
use crate::ui::helpers::{fit_block, no_data, safe_truncate_plain, TextBlock};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

const TIERS: [char; 5] = ['·', '░', '▒', '▓', '█'];

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub label: String,
    pub values: Vec<f64>,
}

impl HeatmapRow {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatmapOptions {
    /// Nearest-neighbour downsample to at most this many columns.
    pub max_columns: Option<usize>,
    /// Scale each row against its own maximum instead of the global one.
    pub row_scaled: bool,
}

/// Density tier 0..=4 for an intensity in `[0, 1]`.
pub fn tier(intensity: f64) -> u8 {
    match intensity {
        i if !i.is_finite() || i <= 0.0 => 0,
        i if i <= 0.25 => 1,
        i if i <= 0.5 => 2,
        i if i <= 0.75 => 3,
        _ => 4,
    }
}

/// Column indices kept when shrinking `cols` down to `target`.
fn sample_columns(cols: usize, target: usize) -> Vec<usize> {
    if target >= cols {
        return (0..cols).collect();
    }
    (0..target)
        .map(|j| (((j as f64 + 0.5) * cols as f64 / target as f64) as usize).min(cols - 1))
        .collect()
}

fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

/// `None` when every cell is zero; a placeholder when there is nothing at all.
pub fn render_heatmap(
    rows: &[HeatmapRow],
    width: usize,
    height: usize,
    palette: &dyn Palette,
    options: HeatmapOptions,
) -> Option<TextBlock> {
    let cols = rows.iter().map(|r| r.values.len()).max().unwrap_or(0);
    if cols == 0 || width == 0 || height == 0 {
        return Some(no_data(width, height, palette));
    }
    let global_max = positive_max(rows.iter().flat_map(|r| r.values.iter().copied()));
    if global_max <= 0.0 {
        return None;
    }

    let label_w = rows
        .iter()
        .map(|r| r.label.width())
        .max()
        .unwrap_or(0)
        .min(width / 3);
    let gutter = usize::from(label_w > 0);
    let avail = width.saturating_sub(label_w + gutter).max(1);
    let target = options.max_columns.unwrap_or(cols).min(avail).max(1);
    let picked = sample_columns(cols, target);

    let muted = Style::default().fg(palette.color(ColorToken::TextMuted));
    let lines = rows
        .iter()
        .take(height)
        .map(|row| {
            let max = if options.row_scaled {
                positive_max(row.values.iter().copied())
            } else {
                global_max
            };
            let max = if max > 0.0 { max } else { 1.0 };
            let label = safe_truncate_plain(&row.label, label_w);
            let mut spans = vec![Span::styled(
                format!("{}{}", label, " ".repeat(label_w - label.width() + gutter)),
                muted,
            )];
            spans.extend(picked.iter().map(|&c| {
                let v = row.values.get(c).copied().unwrap_or(0.0);
                let t = tier(v / max);
                Span::styled(
                    TIERS[t as usize].to_string(),
                    Style::default().fg(palette.color(ColorToken::Heat(t))),
                )
            }));
            Line::from(spans)
        })
        .collect();
    Some(fit_block(lines, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeColors;
    use crate::ui::helpers::block_text;

    #[test]
    fn test_all_zero_matrix_is_nothing() {
        let rows = vec![
            HeatmapRow::new("Mon", vec![0.0; 10]),
            HeatmapRow::new("Tue", vec![0.0; 10]),
        ];
        assert!(render_heatmap(&rows, 40, 5, &ThemeColors::DEFAULT, HeatmapOptions::default())
            .is_none());
    }

    #[test]
    fn test_empty_matrix_is_placeholder() {
        let block =
            render_heatmap(&[], 40, 3, &ThemeColors::DEFAULT, HeatmapOptions::default()).unwrap();
        assert!(block_text(&block)[0].contains("No data available"));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(tier(0.0), 0);
        assert_eq!(tier(0.1), 1);
        assert_eq!(tier(0.5), 2);
        assert_eq!(tier(0.7), 3);
        assert_eq!(tier(1.0), 4);
        assert_eq!(tier(f64::NAN), 0);
    }

    #[test]
    fn test_global_vs_row_scaling() {
        let rows = vec![
            HeatmapRow::new("a", vec![100.0, 50.0]),
            HeatmapRow::new("b", vec![10.0, 0.0]),
        ];
        let global =
            render_heatmap(&rows, 20, 2, &ThemeColors::DEFAULT, HeatmapOptions::default()).unwrap();
        let text = block_text(&global);
        assert!(text[0].starts_with("a █▒"));
        assert!(text[1].starts_with("b ░·"));

        let scaled = render_heatmap(
            &rows,
            20,
            2,
            &ThemeColors::DEFAULT,
            HeatmapOptions { row_scaled: true, ..Default::default() },
        )
        .unwrap();
        assert!(block_text(&scaled)[1].starts_with("b █·"));
    }

    #[test]
    fn test_downsample_columns() {
        assert_eq!(sample_columns(10, 5), vec![1, 3, 5, 7, 9]);
        assert_eq!(sample_columns(3, 5), vec![0, 1, 2]);
        let rows = vec![HeatmapRow::new("x", (0..50).map(|i| i as f64).collect())];
        let block = render_heatmap(
            &rows,
            40,
            1,
            &ThemeColors::DEFAULT,
            HeatmapOptions { max_columns: Some(12), row_scaled: false },
        )
        .unwrap();
        let cells: usize = block_text(&block)[0]
            .chars()
            .filter(|c| TIERS.contains(c))
            .count();
        assert_eq!(cells, 12);
        assert_eq!(block[0].width(), 40);
    }
}
