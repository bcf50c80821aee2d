//! Builds the dashboard body for the current view from snapshots and state.

use crate::charts::bars::{render_horizontal_bars, render_vertical_bars, BarItem};
use crate::charts::gauge::render_gauge;
use crate::charts::heatmap::{render_heatmap, HeatmapOptions, HeatmapRow};
use crate::charts::line_chart::render_line_chart;
use crate::charts::sparkline::render_sparkline;
use crate::charts::time_chart::{render_bar_time_chart, render_stacked_time_chart};
use crate::charts::TimeChartOptions;
use crate::config::DashboardConfig;
use crate::layout::{
    allocate_column_widths, allocate_row_heights, render_grid, Panel, PanelRow, BORDER, PANEL_GAP,
};
use crate::snapshot::UsageSnapshot;
use crate::summary::summarize;
use crate::theme::{ColorToken, Palette};
use crate::timeseries::{align_series, Series};
use crate::ui::helpers::{
    fit_block, fit_line, format_cost, format_number, no_data, truncate_line_ellipsis,
    truncate_with_ellipsis, TextBlock,
};
use crate::view_mode::{DashboardState, ViewMode, WidthPolicy};
use chrono::{Datelike, Days, NaiveDate};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Lines a Grid card wants before rows start to squeeze.
const CARD_HEIGHT: u16 = 8;
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
/// Activity heatmap window, one column per week.
const HEATMAP_WEEKS: usize = 53;

/// Inputs shared by every panel builder for one frame.
struct Ctx<'a> {
    palette: &'a dyn Palette,
    frame: u64,
}

impl Ctx<'_> {
    fn style(&self, token: ColorToken) -> Style {
        Style::default().fg(self.palette.color(token))
    }

    fn chart_options(&self) -> TimeChartOptions {
        TimeChartOptions {
            pulse_frame: Some(self.frame),
            ..Default::default()
        }
    }
}

/// Mode strip for the top line: every selectable mode, the configured one
/// highlighted, plus a note when the width forces a different view.
pub fn render_mode_bar(
    configured: ViewMode,
    effective: ViewMode,
    width: u16,
    palette: &dyn Palette,
) -> Line<'static> {
    let mut spans = Vec::with_capacity(ViewMode::ALL.len() * 2 + 1);
    for mode in ViewMode::ALL {
        let style = if mode == configured {
            Style::default()
                .fg(palette.color(ColorToken::AccentCyan))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette.color(ColorToken::TextSecondary))
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw(" "));
    }
    if effective != configured {
        spans.push(Span::styled(
            format!("(narrow: showing {})", effective.label()),
            Style::default().fg(palette.color(ColorToken::Info)),
        ));
    }
    truncate_line_ellipsis(Line::from(spans), width as usize)
}

/// Render the body for `state` into exactly `height` lines.
pub fn render_dashboard(
    snapshots: &[UsageSnapshot],
    config: &DashboardConfig,
    state: &DashboardState,
    width: u16,
    height: u16,
    palette: &dyn Palette,
    frame: u64,
) -> TextBlock {
    let ctx = Ctx { palette, frame };
    let items = config.order_items(snapshots);
    if items.is_empty() {
        let panel = Panel::new("Usage", no_data(inner(width), inner(height), palette));
        return render_grid(&[PanelRow::new(vec![panel])], width, height, palette);
    }

    let view = WidthPolicy::default().effective(state.configured, items.len(), width);
    let active = state.tab_index(items.len());
    log::trace!("rendering {} items as {} at {}x{}", items.len(), view.as_str(), width, height);

    match view {
        ViewMode::Grid => grid_view(&ctx, &items, state, active, width, height),
        ViewMode::Stacked => stacked_view(&ctx, &items, state, active, width, height),
        ViewMode::Tabs => tabs_view(&ctx, &items, active, width, height),
        ViewMode::Split => split_view(&ctx, &items, active, width, height),
        ViewMode::Compare => compare_view(&ctx, &items, width, height),
    }
}

fn inner(outer: u16) -> usize {
    outer.saturating_sub(2 * BORDER) as usize
}

/// Lay out rows whose content is built once the final cell size is known.
/// Rows missing from `weights` weigh 1.
fn build_rows<T>(
    rows: &[Vec<(T, u16)>],
    weights: &[u16],
    width: u16,
    height: u16,
    mut build: impl FnMut(&T, usize, usize) -> Panel,
) -> Vec<PanelRow> {
    let weights: Vec<u16> = (0..rows.len())
        .map(|i| weights.get(i).copied().unwrap_or(1))
        .collect();
    let heights = allocate_row_heights(&weights, height);
    rows.iter()
        .zip(heights)
        .zip(weights)
        .map(|((row, h), weight)| {
            let spans: Vec<u16> = row.iter().map(|(_, span)| *span).collect();
            let widths = allocate_column_widths(&spans, width, PANEL_GAP);
            PanelRow::new(
                row.iter()
                    .zip(widths)
                    .map(|((item, span), w)| build(item, inner(w), inner(h)).span(*span))
                    .collect(),
            )
            .weight(weight)
        })
        .collect()
}

/// Card columns that fit `width`, at least one and at most one per item.
fn grid_columns(width: u16, items: usize) -> usize {
    let policy = WidthPolicy::default();
    let tile = policy.min_tile_width + 2 * policy.border + policy.gap;
    let fit = (width.saturating_add(policy.gap) / tile).max(1) as usize;
    fit.min(items.max(1))
}

fn grid_view(
    ctx: &Ctx,
    items: &[&UsageSnapshot],
    state: &DashboardState,
    active: usize,
    width: u16,
    height: u16,
) -> TextBlock {
    let columns = grid_columns(width, items.len());
    let visible_rows = (height / CARD_HEIGHT).max(1) as usize;
    let total_rows = items.len().div_ceil(columns);
    // Scroll counts items; show the row holding that item.
    let first_row = (state.scroll_offset(items.len()) / columns)
        .min(total_rows.saturating_sub(visible_rows));

    let rows: Vec<Vec<(usize, u16)>> = (0..items.len())
        .collect::<Vec<_>>()
        .chunks(columns)
        .skip(first_row)
        .take(visible_rows)
        .map(|chunk| chunk.iter().map(|&i| (i, 1)).collect())
        .collect();
    let panels = build_rows(&rows, &[], width, height, |&i, w, h| {
        card_panel(ctx, items[i], w, h).focused(i == active)
    });
    render_grid(&panels, width, height, ctx.palette)
}

fn stacked_view(
    ctx: &Ctx,
    items: &[&UsageSnapshot],
    state: &DashboardState,
    active: usize,
    width: u16,
    height: u16,
) -> TextBlock {
    let visible = (height / CARD_HEIGHT).max(1) as usize;
    let first = state.scroll_offset(items.len());
    let rows: Vec<Vec<(usize, u16)>> = (first..items.len())
        .take(visible)
        .map(|i| vec![(i, 1)])
        .collect();
    let panels = build_rows(&rows, &[], width, height, |&i, w, h| {
        card_panel(ctx, items[i], w, h).focused(i == active)
    });
    render_grid(&panels, width, height, ctx.palette)
}

fn tab_strip(ctx: &Ctx, items: &[&UsageSnapshot], active: usize, width: u16) -> Line<'static> {
    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, snap) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", ctx.style(ColorToken::BorderDefault)));
        }
        let style = if i == active {
            ctx.style(ColorToken::AccentCyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            ctx.style(ColorToken::TextSecondary)
        };
        spans.push(Span::styled(format!(" {} ", snap.account), style));
    }
    fit_line(truncate_line_ellipsis(Line::from(spans), width as usize), width as usize)
}

fn tabs_view(ctx: &Ctx, items: &[&UsageSnapshot], active: usize, width: u16, height: u16) -> TextBlock {
    let body_h = height.saturating_sub(1);
    let snap = items[active];
    let rows = build_rows(&[vec![((), 1)]], &[], width, body_h, |_, w, h| {
        detail_panel(ctx, snap, w, h).focused(true)
    });
    let mut out = vec![tab_strip(ctx, items, active, width)];
    out.extend(render_grid(&rows, width, body_h, ctx.palette));
    fit_block(out, width as usize, height as usize)
}

enum SplitCell {
    List,
    Detail,
}

fn split_view(ctx: &Ctx, items: &[&UsageSnapshot], active: usize, width: u16, height: u16) -> TextBlock {
    let cells = [vec![(SplitCell::List, 1), (SplitCell::Detail, 2)]];
    let panels = build_rows(&cells, &[], width, height, |cell, w, h| match cell {
        SplitCell::List => Panel::new("Accounts", account_list(ctx, items, active, w, h))
            .icon("≡")
            .accent(ColorToken::AccentBlue),
        SplitCell::Detail => detail_panel(ctx, items[active], w, h).focused(true),
    });
    render_grid(&panels, width, height, ctx.palette)
}

enum CompareCell {
    Primary,
    History,
    Volume,
    Daily,
}

fn compare_view(ctx: &Ctx, items: &[&UsageSnapshot], width: u16, height: u16) -> TextBlock {
    let totals: Vec<Series> = items
        .iter()
        .enumerate()
        .map(|(i, s)| s.total_history(&s.account, ColorToken::Series(i)))
        .collect();
    let cells = [
        vec![(CompareCell::Primary, 1), (CompareCell::History, 1)],
        vec![(CompareCell::Volume, 1), (CompareCell::Daily, 2)],
    ];
    let panels = build_rows(&cells, &[3, 2], width, height, |cell, w, h| match cell {
        CompareCell::Primary => Panel::new("Primary metric", primary_bars(ctx, items, w, h))
            .icon("▤")
            .accent(ColorToken::AccentYellow),
        CompareCell::History => {
            let content = render_line_chart(&totals, w, h, &format_number, ctx.palette)
                .unwrap_or_else(|| no_data(w, h, ctx.palette));
            Panel::new("History", content)
                .icon("∿")
                .accent(ColorToken::AccentMagenta)
        }
        CompareCell::Volume => {
            let bars: Vec<BarItem> = totals
                .iter()
                .map(|s| {
                    let total = s.points.iter().map(|(_, v)| v.max(0.0)).sum();
                    BarItem::new(s.label.clone(), total, s.color)
                })
                .collect();
            Panel::new("Volume", render_vertical_bars(&bars, w, h, ctx.palette))
                .icon("▥")
                .accent(ColorToken::AccentGreen)
        }
        CompareCell::Daily => {
            let combined = Series::new("all accounts", ColorToken::AccentBlue)
                .with_points(totals.iter().flat_map(|s| s.points.iter().cloned()));
            let content = render_bar_time_chart(
                &combined,
                w,
                h,
                &format_number,
                ctx.palette,
                ctx.chart_options(),
            )
            .unwrap_or_else(|| no_data(w, h, ctx.palette));
            Panel::new("Daily total", content)
                .icon("▦")
                .accent(ColorToken::AccentBlue)
        }
    });
    render_grid(&panels, width, height, ctx.palette)
}

fn primary_bars(ctx: &Ctx, items: &[&UsageSnapshot], w: usize, h: usize) -> TextBlock {
    let bars: Vec<BarItem> = items
        .iter()
        .filter_map(|s| {
            let (_, metric) = s.primary_metric()?;
            let percent = metric.percent()?;
            Some(BarItem::new(
                s.account.clone(),
                percent,
                metric.orientation.color(percent),
            ))
        })
        .collect();
    render_horizontal_bars(&bars, w, h, &|v: f64| format!("{v:.0}%"), ctx.palette)
}

fn status_line(ctx: &Ctx, snap: &UsageSnapshot, width: usize) -> Line<'static> {
    let line = Line::from(vec![
        Span::styled("● ", ctx.style(snap.status.color())),
        Span::styled(snap.status.label(), ctx.style(snap.status.color())),
        Span::styled(
            format!("  {}", snap.provider),
            ctx.style(ColorToken::TextMuted),
        ),
    ]);
    truncate_line_ellipsis(line, width)
}

/// Name and summary on one line, gauge on the next.
fn metric_lines(ctx: &Ctx, snap: &UsageSnapshot, width: usize) -> TextBlock {
    let mut lines = Vec::with_capacity(snap.metrics.len() * 2);
    for (name, metric) in &snap.metrics {
        let summary = summarize(metric);
        let name_w = name.width().min(width / 2);
        let name = truncate_with_ellipsis(name, name_w);
        let summary = truncate_with_ellipsis(&summary, width.saturating_sub(name.width() + 1));
        let pad = width.saturating_sub(name.width() + summary.width());
        lines.push(Line::from(vec![
            Span::styled(name, ctx.style(ColorToken::TextPrimary).add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(pad)),
            Span::styled(summary, ctx.style(ColorToken::TextSecondary)),
        ]));
        let percent = metric.percent().unwrap_or(-1.0);
        lines.push(render_gauge(percent, width, metric.orientation, ctx.palette));
    }
    lines
}

fn card_panel(ctx: &Ctx, snap: &UsageSnapshot, w: usize, h: usize) -> Panel {
    let mut lines = vec![status_line(ctx, snap, w)];
    if let Some(message) = &snap.message {
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(message, w),
            ctx.style(ColorToken::TextMuted),
        )));
    }
    lines.extend(metric_lines(ctx, snap, w));
    let total = snap.total_history("total", ColorToken::AccentCyan);
    if !total.points.is_empty() && h > 1 {
        // Keep the trend on the last line no matter how many metrics fit.
        lines.truncate(h - 1);
        lines.resize(h - 1, Line::default());
        let values = align_series(std::slice::from_ref(&total), true)
            .values
            .pop()
            .unwrap_or_default();
        lines.push(render_sparkline(&values, w, ColorToken::AccentCyan, ctx.palette));
    }
    Panel::new(snap.account.clone(), fit_block(lines, w, h))
        .icon("◆")
        .accent(snap.status.color())
}

fn account_list(ctx: &Ctx, items: &[&UsageSnapshot], active: usize, w: usize, h: usize) -> TextBlock {
    let lines = items
        .iter()
        .enumerate()
        .map(|(i, snap)| {
            let marker = if i == active { "▶ " } else { "  " };
            let percent = snap
                .primary_metric()
                .and_then(|(_, m)| m.percent().map(|p| (p, m.orientation)));
            let (value, token) = match percent {
                Some((p, orientation)) => (format!("{p:.0}%"), orientation.color(p)),
                None => ("-".to_string(), ColorToken::TextMuted),
            };
            let name_style = if i == active {
                ctx.style(ColorToken::TextPrimary).add_modifier(Modifier::BOLD)
            } else {
                ctx.style(ColorToken::TextSecondary)
            };
            let avail = w.saturating_sub(marker.width() + 2 + value.width() + 1);
            let name = truncate_with_ellipsis(&snap.account, avail);
            let pad = avail.saturating_sub(name.width()) + 1;
            Line::from(vec![
                Span::styled(marker, ctx.style(ColorToken::AccentCyan)),
                Span::styled("● ", ctx.style(snap.status.color())),
                Span::styled(name, name_style),
                Span::raw(" ".repeat(pad)),
                Span::styled(value, ctx.style(token)),
            ])
        })
        .collect();
    fit_block(lines, w, h)
}

/// Week columns by weekday rows over the summed history. Columns are
/// Monday-aligned calendar weeks, keeping at most the last
/// `HEATMAP_WEEKS`.
fn weekday_heatmap_rows(snap: &UsageSnapshot) -> Vec<HeatmapRow> {
    let total = snap.total_history("total", ColorToken::AccentGreen);
    // Sparse axis: only the days present, duplicates summed.
    let aligned = align_series(std::slice::from_ref(&total), false);
    let (Some(first), Some(last), Some(values)) =
        (aligned.dates.first(), aligned.dates.last(), aligned.values.first())
    else {
        return Vec::new();
    };
    let monday = |d: NaiveDate| d - Days::new(u64::from(d.weekday().num_days_from_monday()));
    let last_monday = monday(*last);
    let earliest = last_monday - Days::new(7 * (HEATMAP_WEEKS as u64 - 1));
    let first_monday = monday(*first).max(earliest);
    let weeks = ((last_monday - first_monday).num_days() / 7) as usize + 1;

    let mut grid = vec![vec![0.0; weeks]; 7];
    for (date, v) in aligned.dates.iter().zip(values) {
        if *date < first_monday {
            continue;
        }
        let day = date.weekday().num_days_from_monday() as usize;
        let week = ((*date - first_monday).num_days() / 7) as usize;
        grid[day][week] += v;
    }
    WEEKDAYS
        .iter()
        .zip(grid)
        .map(|(label, values)| HeatmapRow::new(*label, values))
        .collect()
}

fn section_title(ctx: &Ctx, title: &str, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        truncate_with_ellipsis(title, width),
        ctx.style(ColorToken::TextSecondary).add_modifier(Modifier::BOLD),
    ))
}

/// Everything known about one account, charts sharing the height left after
/// the gauges.
fn detail_panel(ctx: &Ctx, snap: &UsageSnapshot, w: usize, h: usize) -> Panel {
    let mut lines = vec![status_line(ctx, snap, w)];
    if let Some(message) = &snap.message {
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(message, w),
            ctx.style(ColorToken::Warning),
        )));
    }
    lines.extend(metric_lines(ctx, snap, w));

    let history = snap.history_series();
    let models = snap.model_series();
    let costs: Vec<BarItem> = snap
        .models
        .iter()
        .enumerate()
        .filter_map(|(i, m)| Some(BarItem::new(m.model.clone(), m.cost?, ColorToken::Series(i))))
        .collect();
    let heat = weekday_heatmap_rows(snap);

    type Section<'s> = (&'static str, Box<dyn Fn(usize, usize) -> Option<TextBlock> + 's>);
    let mut sections: Vec<Section> = Vec::new();
    if history.iter().any(Series::has_positive) {
        sections.push((
            "History",
            Box::new(|w: usize, h: usize| render_line_chart(&history, w, h, &format_number, ctx.palette)),
        ));
    }
    if models.iter().any(Series::has_positive) {
        sections.push((
            "Models",
            Box::new(|w: usize, h: usize| {
                render_stacked_time_chart(&models, w, h, &format_number, ctx.palette, ctx.chart_options())
            }),
        ));
    }
    if costs.iter().any(|b| b.value > 0.0) {
        sections.push((
            "Cost by model",
            Box::new(|w: usize, h: usize| Some(render_horizontal_bars(&costs, w, h, &format_cost, ctx.palette))),
        ));
    }
    if heat.iter().any(|r| r.values.iter().any(|v| *v > 0.0)) {
        sections.push((
            "Activity",
            Box::new(|w: usize, h: usize| {
                render_heatmap(&heat, w, h, ctx.palette, HeatmapOptions::default())
            }),
        ));
    }

    let rest = h.saturating_sub(lines.len() + 1);
    // Drop trailing sections until each one gets a title and three rows.
    let fits = (rest / 4).min(sections.len());
    if fits < sections.len() {
        log::debug!(
            "{}: room for {} of {} detail sections",
            snap.account,
            fits,
            sections.len()
        );
    }
    if fits > 0 {
        lines.push(Line::default());
        let heights = allocate_row_heights(&vec![1; fits], rest as u16);
        for ((title, render), section_h) in sections.iter().take(fits).zip(heights) {
            let chart_h = (section_h as usize).saturating_sub(1);
            lines.push(section_title(ctx, title, w));
            let chart = render(w, chart_h).unwrap_or_default();
            lines.extend(fit_block(chart, w, chart_h));
        }
    }
    Panel::new(snap.account.clone(), fit_block(lines, w, h))
        .icon("◆")
        .accent(snap.status.color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_snapshots;
    use crate::snapshot::{HistoryPoint, HistorySeries};
    use crate::theme::ThemeColors;
    use crate::ui::helpers::block_text;
    use crate::view_mode::Action;

    fn render(state: DashboardState, w: u16, h: u16) -> TextBlock {
        render_dashboard(
            &demo_snapshots(),
            &DashboardConfig::default(),
            &state,
            w,
            h,
            &ThemeColors::DEFAULT,
            0,
        )
    }

    #[test]
    fn test_every_view_fills_exact_size() {
        for mode in ViewMode::ALL {
            for (w, h) in [(120u16, 40u16), (80, 24), (40, 12)] {
                let block = render(DashboardState::new(mode), w, h);
                assert_eq!(block.len(), h as usize, "{mode:?} at {w}x{h}");
                for line in &block {
                    assert!(line.width() <= w as usize, "{mode:?} at {w}x{h}");
                }
            }
        }
    }

    #[test]
    fn test_narrow_terminal_renders_stacked() {
        let state = DashboardState::new(ViewMode::Compare);
        let narrow = WidthPolicy::default().two_column_min_width() - 1;
        let text = block_text(&render(state, narrow, 24));
        // one full-width card per row: a single top-left corner per border line
        assert!(text.iter().filter(|l| l.starts_with('┌')).all(|l| l.matches('┌').count() == 1));
        assert!(!text.iter().any(|l| l.contains("Primary metric")));
        assert_eq!(state.configured, ViewMode::Compare);
    }

    #[test]
    fn test_tabs_follow_active_tab() {
        let state = DashboardState::new(ViewMode::Tabs).apply(Action::NextTab, 4);
        let text = block_text(&render(state, 100, 30));
        assert!(text[0].contains("work") && text[0].contains("personal"));
        assert!(text[1].contains("personal"));
    }

    #[test]
    fn test_split_lists_every_account() {
        let text = block_text(&render(DashboardState::new(ViewMode::Split), 120, 30)).join("\n");
        for account in ["work", "personal", "team", "legacy"] {
            assert!(text.contains(account), "missing {account}");
        }
        assert!(text.contains("▶"));
    }

    #[test]
    fn test_compare_shows_primary_metric_bars() {
        let text = block_text(&render(DashboardState::new(ViewMode::Compare), 120, 20)).join("\n");
        assert!(text.contains("Primary metric"));
        assert!(text.contains("Daily total"));
        // work's first metric with a gauge is the 62% session
        assert!(text.contains("62%"));
    }

    #[test]
    fn test_empty_snapshots_show_placeholder() {
        let block = render_dashboard(
            &[],
            &DashboardConfig::default(),
            &DashboardState::default(),
            60,
            10,
            &ThemeColors::DEFAULT,
            0,
        );
        assert_eq!(block.len(), 10);
        assert!(block_text(&block).join("\n").contains("No data available"));
    }

    #[test]
    fn test_heatmap_rows_by_weekday() {
        let rows = weekday_heatmap_rows(&demo_snapshots()[0]);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].label, "Mon");
        // 84 days from a Saturday span 13 week columns
        assert_eq!(rows[0].values.len(), 13);
    }

    #[test]
    fn test_heatmap_weeks_follow_dates_on_sparse_history() {
        // More than a year between first and last day, so the axis is not
        // gap-filled and only the listed days exist.
        let mut snap = demo_snapshots().remove(0);
        let point = |date: &str, value| HistoryPoint {
            date: date.to_string(),
            value,
        };
        snap.history = vec![HistorySeries {
            label: "requests".into(),
            points: vec![
                point("2022-01-03", 5.0),
                point("2023-06-05", 1.0),
                point("2024-01-01", 2.0),
            ],
        }];
        let rows = weekday_heatmap_rows(&snap);
        let mon = &rows[0].values;
        assert_eq!(mon.len(), HEATMAP_WEEKS);
        // 2023-06-05 is 30 weeks before 2024-01-01
        assert_eq!(mon[HEATMAP_WEEKS - 1], 2.0);
        assert_eq!(mon[HEATMAP_WEEKS - 31], 1.0);
        // the 2022 day falls outside the window
        assert_eq!(mon.iter().sum::<f64>(), 3.0);
        assert!(rows[1..].iter().all(|r| r.values.iter().all(|v| *v == 0.0)));
    }

    #[test]
    fn test_grid_columns_at_extreme_widths() {
        assert_eq!(grid_columns(0, 4), 1);
        assert_eq!(grid_columns(u16::MAX, 4), 4);
        // 31-column tiles: 28 inner, two borders, one gap
        assert_eq!(grid_columns(u16::MAX, 10_000), (u16::MAX / 31) as usize);
        let two = WidthPolicy::default().two_column_min_width();
        assert_eq!(grid_columns(two, 4), 2);
    }

    #[test]
    fn test_mode_bar_notes_override() {
        let line = render_mode_bar(ViewMode::Grid, ViewMode::Stacked, 120, &ThemeColors::DEFAULT);
        let text = block_text(&[line]).remove(0);
        assert!(text.contains("Compare"));
        assert!(text.contains("narrow"));
    }
}
