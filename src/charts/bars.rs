//! Horizontal and vertical bar charts.

use super::gauge::MIN_BAR_WIDTH;
use crate::theme::{ColorToken, Palette};
use crate::ui::helpers::{
    fit_height, fit_line, no_data, safe_truncate_plain, Formatter, TextBlock,
};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

const BAR: &str = "█";

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub color: ColorToken,
}

impl BarItem {
    pub fn new(label: impl Into<String>, value: f64, color: ColorToken) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Length of a bar in `units`, proportional to `max`. Anything strictly
/// positive shows at least one unit; zero and junk show nothing.
pub fn bar_length(value: f64, max: f64, units: usize) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = if max > 0.0 { max } else { 1.0 };
    (((value / max) * units as f64).round() as usize).clamp(1, units.max(1))
}

fn display_max(items: &[BarItem]) -> f64 {
    let max = items
        .iter()
        .map(|i| i.value)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// One row per item (as many as fit): label, bar, formatted value.
pub fn render_horizontal_bars(
    items: &[BarItem],
    width: usize,
    height: usize,
    format: Formatter<'_>,
    palette: &dyn Palette,
) -> TextBlock {
    if items.is_empty() || height == 0 {
        return no_data(width, height, palette);
    }
    let shown = &items[..items.len().min(height)];
    let max = display_max(shown);

    let label_w = shown
        .iter()
        .map(|i| i.label.width())
        .max()
        .unwrap_or(0)
        .min(width / 3)
        .max(1);
    let values: Vec<String> = shown.iter().map(|i| format(i.value)).collect();
    let value_w = values.iter().map(|v| v.width()).max().unwrap_or(0);
    let bar_w = width
        .saturating_sub(label_w + value_w + 2)
        .max(MIN_BAR_WIDTH);

    let muted = Style::default().fg(palette.color(ColorToken::TextMuted));
    let lines = shown
        .iter()
        .zip(values)
        .map(|(item, value)| {
            let len = bar_length(item.value, max, bar_w);
            let label = safe_truncate_plain(&item.label, label_w);
            let line = Line::from(vec![
                Span::styled(
                    format!("{}{} ", label, " ".repeat(label_w - label.width())),
                    Style::default().fg(palette.color(ColorToken::TextSecondary)),
                ),
                Span::styled(
                    BAR.repeat(len),
                    Style::default().fg(palette.color(item.color)),
                ),
                Span::raw(" ".repeat(bar_w - len + 1)),
                Span::styled(format!("{:>1$}", value, value_w), muted),
            ]);
            fit_line(line, width)
        })
        .collect();
    fit_height(lines, height)
}

/// Columns of full blocks with the labels along the bottom row.
pub fn render_vertical_bars(
    items: &[BarItem],
    width: usize,
    height: usize,
    palette: &dyn Palette,
) -> TextBlock {
    if items.is_empty() || width == 0 || height == 0 {
        return no_data(width, height, palette);
    }
    let count = items.len().min(width);
    let shown = &items[..count];
    let col_w = width / count;
    let bar_w = if col_w >= 3 { col_w - 1 } else { col_w };
    let chart_h = if height >= 2 { height - 1 } else { height };
    let max = display_max(shown);
    let levels: Vec<usize> = shown
        .iter()
        .map(|i| bar_length(i.value, max, chart_h))
        .collect();

    let mut lines = Vec::with_capacity(height);
    for row in 0..chart_h {
        let from_bottom = chart_h - 1 - row;
        let spans: Vec<Span<'static>> = shown
            .iter()
            .zip(&levels)
            .map(|(item, level)| {
                let cell = if from_bottom < *level {
                    BAR.repeat(bar_w)
                } else {
                    " ".repeat(bar_w)
                };
                Span::styled(
                    format!("{}{}", cell, " ".repeat(col_w - bar_w)),
                    Style::default().fg(palette.color(item.color)),
                )
            })
            .collect();
        lines.push(fit_line(Line::from(spans), width));
    }
    if height >= 2 {
        let muted = Style::default().fg(palette.color(ColorToken::TextMuted));
        let spans: Vec<Span<'static>> = shown
            .iter()
            .map(|item| {
                let label = safe_truncate_plain(&item.label, bar_w);
                Span::styled(
                    format!("{}{}", label, " ".repeat(col_w - label.width())),
                    muted,
                )
            })
            .collect();
        lines.push(fit_line(Line::from(spans), width));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeColors;
    use crate::ui::helpers::block_text;

    fn fmt(v: f64) -> String {
        format!("{v:.0}")
    }

    #[test]
    fn test_bar_length_minimum_unit() {
        assert_eq!(bar_length(0.001, 1000.0, 20), 1);
        assert_eq!(bar_length(0.0, 1000.0, 20), 0);
        assert_eq!(bar_length(f64::NAN, 10.0, 20), 0);
        assert_eq!(bar_length(1000.0, 1000.0, 20), 20);
        assert_eq!(bar_length(5.0, 0.0, 10), 10);
    }

    #[test]
    fn test_horizontal_bars() {
        let items = vec![
            BarItem::new("alpha", 100.0, ColorToken::AccentCyan),
            BarItem::new("beta", 0.01, ColorToken::AccentGreen),
            BarItem::new("gamma", 0.0, ColorToken::AccentPink),
        ];
        let block = render_horizontal_bars(&items, 40, 5, &fmt, &ThemeColors::DEFAULT);
        assert_eq!(block.len(), 5);
        let text = block_text(&block);
        let count = |s: &str| s.matches(BAR).count();
        assert!(count(&text[0]) > count(&text[1]));
        assert_eq!(count(&text[1]), 1);
        assert_eq!(count(&text[2]), 0);
        for line in &block {
            assert!(line.width() <= 40);
        }
    }

    #[test]
    fn test_horizontal_empty_is_placeholder() {
        let block = render_horizontal_bars(&[], 30, 2, &fmt, &ThemeColors::DEFAULT);
        assert!(block_text(&block)[0].contains("No data available"));
    }

    #[test]
    fn test_vertical_bars() {
        let items = vec![
            BarItem::new("a", 4.0, ColorToken::AccentCyan),
            BarItem::new("b", 2.0, ColorToken::AccentCyan),
            BarItem::new("c", 0.0, ColorToken::AccentCyan),
        ];
        let block = render_vertical_bars(&items, 12, 5, &ThemeColors::DEFAULT);
        assert_eq!(block.len(), 5);
        let text = block_text(&block);
        // 4 chart rows, tallest bar reaches the top
        assert!(text[0].starts_with("███"));
        assert!(text[3].starts_with("███ ███"));
        assert_eq!(text[3].matches('█').count(), 6);
        assert!(text[4].starts_with("a"));
    }
}
