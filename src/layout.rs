//! Panel grid: bordered, titled tiles packed into an exact character area.

use crate::theme::{ColorToken, Palette};
use crate::ui::helpers::{
    fit_height, fit_line, truncate_line, truncate_line_ellipsis, truncate_with_ellipsis,
    TextBlock,
};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

pub const MIN_ROW_HEIGHT: u16 = 3;
pub const MIN_PANEL_WIDTH: u16 = 8;
pub const PANEL_GAP: u16 = 1;
/// Border cells on each side of a panel.
pub const BORDER: u16 = 1;

/// A tile. Built fresh for every frame.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub icon: Option<String>,
    pub content: TextBlock,
    /// Relative width within its row; 0 counts as 1.
    pub span: u16,
    pub accent: ColorToken,
    pub focused: bool,
}

impl Panel {
    pub fn new(title: impl Into<String>, content: TextBlock) -> Self {
        Self {
            title: title.into(),
            icon: None,
            content,
            span: 1,
            accent: ColorToken::BorderDefault,
            focused: false,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn span(mut self, span: u16) -> Self {
        self.span = span;
        self
    }

    pub fn accent(mut self, accent: ColorToken) -> Self {
        self.accent = accent;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PanelRow {
    pub panels: Vec<Panel>,
    /// Relative height; 0 counts as 1.
    pub weight: u16,
}

impl PanelRow {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels, weight: 1 }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
}

/// Split `total` proportionally to `weights`. The last slot absorbs rounding
/// and every slot gets at least `floor`, even if that overshoots `total`.
fn proportional(weights: &[u16], total: u16, floor: u16) -> Vec<u16> {
    if weights.is_empty() {
        return Vec::new();
    }
    let weights: Vec<u32> = weights.iter().map(|w| u32::from((*w).max(1))).collect();
    let sum: u32 = weights.iter().sum();
    let mut out = Vec::with_capacity(weights.len());
    let mut used: u32 = 0;
    for (i, w) in weights.iter().enumerate() {
        let share = if i + 1 == weights.len() {
            u32::from(total).saturating_sub(used)
        } else {
            u32::from(total) * w / sum
        };
        used += share;
        out.push((share as u16).max(floor));
    }
    out
}

pub fn allocate_row_heights(weights: &[u16], total_h: u16) -> Vec<u16> {
    proportional(weights, total_h, MIN_ROW_HEIGHT)
}

/// Widths for panels in one row, after taking out the gaps between them.
pub fn allocate_column_widths(spans: &[u16], total_w: u16, gap: u16) -> Vec<u16> {
    let gaps = gap.saturating_mul(spans.len().saturating_sub(1) as u16);
    proportional(spans, total_w.saturating_sub(gaps), MIN_PANEL_WIDTH)
}

/// Bordered box with the title set into the top edge. Always `width` wide and
/// `height` tall.
pub fn render_panel(panel: &Panel, width: u16, height: u16, palette: &dyn Palette) -> TextBlock {
    let width = width.max(MIN_PANEL_WIDTH) as usize;
    let height = height.max(MIN_ROW_HEIGHT) as usize;
    let inner_w = width - 2 * BORDER as usize;
    let inner_h = height - 2 * BORDER as usize;

    let border_token = if panel.focused {
        ColorToken::BorderFocus
    } else {
        ColorToken::BorderDefault
    };
    let border = Style::default().fg(palette.color(border_token));
    let title_style = Style::default()
        .fg(palette.color(panel.accent))
        .add_modifier(Modifier::BOLD);

    let title = match &panel.icon {
        Some(icon) => format!(" {} {} ", icon, panel.title),
        None => format!(" {} ", panel.title),
    };
    // Keep at least one rule cell either side of the title.
    let title = truncate_with_ellipsis(&title, inner_w.saturating_sub(2));
    let rule = inner_w - title.width();
    let mut lines = Vec::with_capacity(height);
    lines.push(Line::from(vec![
        Span::styled("┌─", border),
        Span::styled(title, title_style),
        Span::styled(format!("{}┐", "─".repeat(rule.saturating_sub(1))), border),
    ]));

    let content = fit_height(panel.content.clone(), inner_h);
    for line in content {
        let line = fit_line(truncate_line_ellipsis(line, inner_w), inner_w);
        let mut spans = Vec::with_capacity(line.spans.len() + 2);
        spans.push(Span::styled("│", border));
        spans.extend(line.spans);
        spans.push(Span::styled("│", border));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(
        format!("└{}┘", "─".repeat(inner_w)),
        border,
    )));
    lines
}

/// Lay out every row and panel into exactly `total_h` lines, none wider than
/// `total_w`.
pub fn render_grid(rows: &[PanelRow], total_w: u16, total_h: u16, palette: &dyn Palette) -> TextBlock {
    let weights: Vec<u16> = rows.iter().map(|r| r.weight).collect();
    let heights = allocate_row_heights(&weights, total_h);
    let mut out: TextBlock = Vec::with_capacity(total_h as usize);

    for (row, &h) in rows.iter().zip(&heights) {
        if row.panels.is_empty() {
            out.extend(std::iter::repeat_with(Line::default).take(h as usize));
            continue;
        }
        let spans: Vec<u16> = row.panels.iter().map(|p| p.span).collect();
        let widths = allocate_column_widths(&spans, total_w, PANEL_GAP);
        let blocks: Vec<TextBlock> = row
            .panels
            .iter()
            .zip(&widths)
            .map(|(p, &w)| render_panel(p, w, h, palette))
            .collect();
        for y in 0..h as usize {
            let mut line_spans: Vec<Span<'static>> = Vec::new();
            for (i, block) in blocks.iter().enumerate() {
                if i > 0 {
                    line_spans.push(Span::raw(" ".repeat(PANEL_GAP as usize)));
                }
                line_spans.extend(block[y].spans.iter().cloned());
            }
            out.push(Line::from(line_spans));
        }
    }

    let total = heights.iter().map(|h| u32::from(*h)).sum::<u32>();
    if total != u32::from(total_h) {
        log::debug!("grid rows sum to {} lines, fitting to {}", total, total_h);
    }
    fit_height(out, total_h as usize)
        .into_iter()
        .map(|line| truncate_line(line, total_w as usize))
        .collect()
}
