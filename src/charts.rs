//! Chart renderers. Every renderer is a pure function from data and a target
//! size to a [`TextBlock`](crate::ui::helpers::TextBlock).

pub mod bars;
pub mod canvas;
pub mod gauge;
pub mod heatmap;
pub mod line_chart;
pub mod sparkline;
pub mod time_chart;

use crate::theme::{ColorToken, Palette};
use crate::timeseries::Series;
use crate::ui::helpers::{safe_truncate_plain, Formatter};
use chrono::NaiveDate;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Width of the value labels for an axis topped at `y_max`, capped at a
/// quarter of the chart.
pub(crate) fn y_axis_width(y_max: f64, width: usize, format: Formatter<'_>) -> usize {
    let top = format(y_max).width();
    let bottom = format(0.0).width();
    top.max(bottom).min(width / 4).max(1)
}

/// Left-hand value axis: max on the top row, zero on the bottom row, each
/// line ending in the axis rule. Labels are right-aligned in `label_w`.
pub(crate) fn y_axis_labels(
    y_max: f64,
    plot_h: usize,
    label_w: usize,
    format: Formatter<'_>,
) -> Vec<Line<'static>> {
    let top = format(y_max);
    let bottom = format(0.0);
    (0..plot_h)
        .map(|row| {
            let (text, rule) = if row == 0 {
                (safe_truncate_plain(&top, label_w).into_owned(), '┤')
            } else if row == plot_h - 1 {
                (safe_truncate_plain(&bottom, label_w).into_owned(), '┤')
            } else {
                (String::new(), '│')
            };
            Line::from(Span::styled(
                format!("{}{}{}", " ".repeat(label_w.saturating_sub(text.width())), text, rule),
                Style::default(),
            ))
        })
        .collect()
}

/// First and last bucket dates under the plot area.
pub(crate) fn axis_label_row(
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
    offset: usize,
    plot_w: usize,
    palette: &dyn Palette,
) -> Line<'static> {
    let style = Style::default().fg(palette.color(ColorToken::TextMuted));
    let first = first.map(|d| d.format("%m-%d").to_string()).unwrap_or_default();
    let last = last.map(|d| d.format("%m-%d").to_string()).unwrap_or_default();
    let mut text = first.clone();
    if plot_w >= first.width() + last.width() + 1 && last != first {
        text.push_str(&" ".repeat(plot_w - first.width() - last.width()));
        text.push_str(&last);
    }
    Line::from(vec![Span::raw(" ".repeat(offset)), Span::styled(text, style)])
}

pub(crate) fn legend_row(series: &[Series], palette: &dyn Palette) -> Line<'static> {
    let mut spans = Vec::with_capacity(series.len() * 2);
    for s in series {
        spans.push(Span::styled("● ", Style::default().fg(palette.color(s.color))));
        spans.push(Span::styled(
            format!("{}  ", s.label),
            Style::default().fg(palette.color(ColorToken::TextSecondary)),
        ));
    }
    Line::from(spans)
}

/// Options shared by the bucketed time charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeChartOptions {
    pub align: crate::timeseries::AlignOptions,
    /// Externally supplied animation frame. Only toggles emphasis on the
    /// newest bucket.
    pub pulse_frame: Option<u64>,
}

impl TimeChartOptions {
    pub(crate) fn pulse(&self) -> Modifier {
        match self.pulse_frame {
            Some(frame) if frame % 2 == 0 => Modifier::BOLD,
            _ => Modifier::empty(),
        }
    }
}
