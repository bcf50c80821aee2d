//! Helper functions and shared types for text-block rendering

use crate::theme::{ColorToken, Palette};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A rendered block: one styled line per terminal row.
pub type TextBlock = Vec<Line<'static>>;

/// Value formatter handed to chart renderers for axis labels and values.
pub type Formatter<'a> = &'a dyn Fn(f64) -> String;

pub const NO_DATA: &str = "No data available";

/// Helper: Safely truncate a string to a display width without breaking UTF-8 (no ellipsis)
/// Returns Cow to avoid allocation when no truncation needed
pub fn safe_truncate_plain(s: &str, max_width: usize) -> Cow<'_, str> {
    let mut used = 0;
    for (idx, ch) in s.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > max_width {
            return Cow::Owned(s[..idx].to_string());
        }
    }
    Cow::Borrowed(s)
}

/// Helper: Truncate a string to a display width and add ellipsis if truncated
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.into();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut result = safe_truncate_plain(s, max_width - 1).into_owned();
    result.push('…');
    result
}

/// Cut a styled line down to `max_width` columns, keeping span styles.
pub fn truncate_line(line: Line<'static>, max_width: usize) -> Line<'static> {
    if line.width() <= max_width {
        return line;
    }
    let mut remaining = max_width;
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        if remaining == 0 {
            break;
        }
        let w = span.width();
        if w <= remaining {
            remaining -= w;
            spans.push(span);
        } else {
            let cut = safe_truncate_plain(&span.content, remaining).into_owned();
            remaining = 0;
            spans.push(Span::styled(cut, span.style));
        }
    }
    Line::from(spans)
}

/// Like [`truncate_line`] but marks the cut with an ellipsis in the style of
/// the last visible span.
pub fn truncate_line_ellipsis(line: Line<'static>, max_width: usize) -> Line<'static> {
    if line.width() <= max_width {
        return line;
    }
    if max_width == 0 {
        return Line::default();
    }
    let mut cut = truncate_line(line, max_width - 1);
    let style = cut.spans.last().map(|s| s.style).unwrap_or_default();
    cut.spans.push(Span::styled("…", style));
    cut
}

/// Pad (or cut) a line to exactly `width` columns.
pub fn fit_line(line: Line<'static>, width: usize) -> Line<'static> {
    let mut line = truncate_line(line, width);
    let w = line.width();
    if w < width {
        line.spans.push(Span::raw(" ".repeat(width - w)));
    }
    line
}

/// Pad with empty lines or drop trailing lines so the block is exactly `height` tall.
pub fn fit_height(mut block: TextBlock, height: usize) -> TextBlock {
    block.truncate(height);
    block.resize_with(height, Line::default);
    block
}

/// Exact `width` × `height` block.
pub fn fit_block(block: TextBlock, width: usize, height: usize) -> TextBlock {
    fit_height(block, height)
        .into_iter()
        .map(|line| fit_line(line, width))
        .collect()
}

/// Explicit placeholder for an empty dataset.
pub fn no_data(width: usize, height: usize, palette: &dyn Palette) -> TextBlock {
    let text = truncate_with_ellipsis(NO_DATA, width);
    let pad = width.saturating_sub(text.width()) / 2;
    let line = Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(text, Style::default().fg(palette.color(ColorToken::TextMuted))),
    ]);
    fit_height(vec![line], height.max(1))
}

/// Join two lines side by side.
pub fn concat_lines(mut left: Line<'static>, right: Line<'static>) -> Line<'static> {
    left.spans.extend(right.spans);
    left
}

/// Plain text of a block, one string per line.
#[cfg(test)]
pub fn block_text(block: &[Line<'_>]) -> Vec<String> {
    block
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[inline]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".into();
    }
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[inline]
pub fn format_cost(value: f64) -> String {
    if value >= 1_000.0 {
        format!("${}", format_number(value))
    } else {
        format!("${:.2}", value)
    }
}
