//! Quota gauges.

use crate::theme::{ColorToken, Palette};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};

pub const FILLED: char = '█';
pub const TRACK: char = '░';
pub const MIN_BAR_WIDTH: usize = 4;

/// What a percentage measures. Decides which end of the scale is alarming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Share consumed; high is bad.
    #[default]
    Used,
    /// Share left; low is bad.
    Remaining,
}

impl Orientation {
    /// Threshold color for a percentage (<50 / 50-79 / >=80).
    pub fn color(self, percent: f64) -> ColorToken {
        let band = if percent < 50.0 {
            0
        } else if percent < 80.0 {
            1
        } else {
            2
        };
        match (self, band) {
            (_, 1) => ColorToken::Warning,
            (Orientation::Used, 0) | (Orientation::Remaining, 2) => ColorToken::Success,
            _ => ColorToken::Error,
        }
    }
}

/// One colored stretch of a segmented gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSegment {
    pub percent: f64,
    pub color: ColorToken,
}

/// Single-value gauge. Negative or non-finite input renders "N/A".
pub fn render_gauge(
    percent: f64,
    width: usize,
    orientation: Orientation,
    palette: &dyn Palette,
) -> Line<'static> {
    if !percent.is_finite() || percent < 0.0 {
        return not_available(width, palette);
    }
    let segment = GaugeSegment {
        percent,
        color: orientation.color(percent.min(100.0)),
    };
    render_segments(&[segment], width, orientation, palette)
}

/// Stacked gauge; segment percentages add up left to right. The label shows
/// the total.
pub fn render_segments(
    segments: &[GaugeSegment],
    width: usize,
    orientation: Orientation,
    palette: &dyn Palette,
) -> Line<'static> {
    let total: f64 = segments
        .iter()
        .filter(|s| s.percent.is_finite())
        .map(|s| s.percent.max(0.0))
        .sum();
    if segments.is_empty() || segments.iter().any(|s| !s.percent.is_finite() || s.percent < 0.0) {
        return not_available(width, palette);
    }
    let clamped = total.min(100.0);
    let label = format!(" {:.1}%", clamped);
    let bar_w = width.saturating_sub(label.len()).max(MIN_BAR_WIDTH);

    let mut spans = Vec::with_capacity(segments.len() + 2);
    let mut used = 0usize;
    let mut acc = 0.0;
    for seg in segments {
        acc += seg.percent;
        let end = filled_cells(acc, bar_w);
        if end > used {
            spans.push(Span::styled(
                FILLED.to_string().repeat(end - used),
                Style::default().fg(palette.color(seg.color)),
            ));
            used = end;
        }
    }
    if used < bar_w {
        spans.push(Span::styled(
            TRACK.to_string().repeat(bar_w - used),
            Style::default().fg(palette.color(ColorToken::Track)),
        ));
    }
    spans.push(Span::styled(
        label,
        Style::default()
            .fg(palette.color(orientation.color(clamped)))
            .add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

/// Cells covered by `percent` of `bar_w`. Never rounds past the mark; a full
/// 100% always covers the whole bar.
fn filled_cells(percent: f64, bar_w: usize) -> usize {
    if percent >= 100.0 {
        bar_w
    } else {
        ((percent.max(0.0) / 100.0) * bar_w as f64).floor() as usize
    }
}

fn not_available(width: usize, palette: &dyn Palette) -> Line<'static> {
    let bar_w = width.saturating_sub(4).max(MIN_BAR_WIDTH);
    Line::from(vec![
        Span::styled(
            TRACK.to_string().repeat(bar_w),
            Style::default().fg(palette.color(ColorToken::Track)),
        ),
        Span::styled(" N/A", Style::default().fg(palette.color(ColorToken::TextMuted))),
    ])
}
