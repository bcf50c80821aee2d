//! Bucketed time charts: stacked per-series bands and single-series bars.

use super::bars::bar_length;
use super::{axis_label_row, legend_row, y_axis_labels, y_axis_width, TimeChartOptions};
use crate::theme::Palette;
use crate::timeseries::{column_ranges, prepare, Bucket, Series};
use crate::ui::helpers::{concat_lines, fit_block, no_data, Formatter, TextBlock};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::ops::Range;

const BLOCK: char = '█';

struct Rows {
    legend_h: usize,
    axis_h: usize,
    plot_h: usize,
}

impl Rows {
    fn new(series_count: usize, height: usize) -> Self {
        let legend_h = usize::from(series_count > 1 && height >= 5);
        let axis_h = usize::from(height >= 3);
        Self {
            legend_h,
            axis_h,
            plot_h: height.saturating_sub(legend_h + axis_h).max(1),
        }
    }
}

/// Winner-take-all stacked chart: a cell belongs to the series whose
/// cumulative band contains that row's threshold.
///
/// `None` when all values are zero; a placeholder when there is no series.
pub fn render_stacked_time_chart(
    series: &[Series],
    width: usize,
    height: usize,
    format: Formatter<'_>,
    palette: &dyn Palette,
    options: TimeChartOptions,
) -> Option<TextBlock> {
    if series.is_empty() || width == 0 || height == 0 {
        return Some(no_data(width, height, palette));
    }
    let rows = Rows::new(series.len(), height);
    let plot_h = rows.plot_h;

    // The gutter width depends on the max, which depends on the binning: size
    // it from a full-width binning, then label the buckets actually drawn.
    let sizing = prepare(series, options.align, width)?;
    let label_w = y_axis_width(positive_max(sizing.iter().map(Bucket::total)), width, format);
    let plot_w = width.saturating_sub(label_w + 1).max(1);

    let buckets = prepare(series, options.align, plot_w)?;
    let max = positive_max(buckets.iter().map(Bucket::total));
    let labels = y_axis_labels(max, plot_h, label_w, format);
    let cumulative: Vec<Vec<f64>> = buckets
        .iter()
        .map(|b| {
            b.values
                .iter()
                .scan(0.0, |acc, v| {
                    *acc += v.max(0.0);
                    Some(*acc)
                })
                .collect()
        })
        .collect();

    let grid = paint(&buckets, plot_w, plot_h, |b, k| {
        let threshold = max * k as f64 / plot_h as f64;
        cumulative[b].iter().position(|c| *c > threshold)
    });

    let colors: Vec<Color> = series.iter().map(|s| palette.color(s.color)).collect();
    let last = column_ranges(buckets.len(), plot_w).pop();
    let mut lines = assemble(labels, grid, &colors, last, options.pulse());
    if rows.axis_h == 1 {
        lines.push(axis_label_row(
            buckets.first().map(|b| b.date),
            buckets.last().map(|b| b.date),
            label_w + 1,
            plot_w,
            palette,
        ));
    }
    if rows.legend_h == 1 {
        lines.push(legend_row(series, palette));
    }
    Some(fit_block(lines, width, height))
}

/// Single-series bars, one proportional column per bucket.
pub fn render_bar_time_chart(
    series: &Series,
    width: usize,
    height: usize,
    format: Formatter<'_>,
    palette: &dyn Palette,
    options: TimeChartOptions,
) -> Option<TextBlock> {
    if series.points.is_empty() || width == 0 || height == 0 {
        return Some(no_data(width, height, palette));
    }
    let rows = Rows::new(1, height);
    let plot_h = rows.plot_h;
    let single = std::slice::from_ref(series);

    let sizing = prepare(single, options.align, width)?;
    let label_w = y_axis_width(positive_max(sizing.iter().map(Bucket::total)), width, format);
    let plot_w = width.saturating_sub(label_w + 1).max(1);

    let buckets = prepare(single, options.align, plot_w)?;
    let max = positive_max(buckets.iter().map(Bucket::total));
    let labels = y_axis_labels(max, plot_h, label_w, format);
    let levels: Vec<usize> = buckets
        .iter()
        .map(|b| bar_length(b.total(), max, plot_h))
        .collect();
    let grid = paint(&buckets, plot_w, plot_h, |b, k| (k < levels[b]).then_some(0));

    let colors = [palette.color(series.color)];
    let last = column_ranges(buckets.len(), plot_w).pop();
    let mut lines = assemble(labels, grid, &colors, last, options.pulse());
    if rows.axis_h == 1 {
        lines.push(axis_label_row(
            buckets.first().map(|b| b.date),
            buckets.last().map(|b| b.date),
            label_w + 1,
            plot_w,
            palette,
        ));
    }
    Some(fit_block(lines, width, height))
}

fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Owner grid, top row first. `owner(bucket, k)` decides row `k` counted
/// from the bottom.
fn paint(
    buckets: &[Bucket],
    plot_w: usize,
    plot_h: usize,
    owner: impl Fn(usize, usize) -> Option<usize>,
) -> Vec<Vec<Option<usize>>> {
    let ranges = column_ranges(buckets.len(), plot_w);
    let mut grid = vec![vec![None; plot_w]; plot_h];
    for (row, cells) in grid.iter_mut().enumerate() {
        let k = plot_h - 1 - row;
        for (b, range) in ranges.iter().enumerate() {
            if let Some(s) = owner(b, k) {
                for cell in &mut cells[range.clone()] {
                    *cell = Some(s);
                }
            }
        }
    }
    grid
}

fn assemble(
    labels: Vec<Line<'static>>,
    grid: Vec<Vec<Option<usize>>>,
    colors: &[Color],
    pulse_cols: Option<Range<usize>>,
    pulse: Modifier,
) -> TextBlock {
    labels
        .into_iter()
        .zip(grid)
        .map(|(label, cells)| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            for (x, cell) in cells.into_iter().enumerate() {
                let style = match cell {
                    Some(s) => {
                        let mut style = Style::default().fg(colors.get(s).copied().unwrap_or_default());
                        if pulse_cols.as_ref().is_some_and(|r| r.contains(&x)) {
                            style = style.add_modifier(pulse);
                        }
                        style
                    }
                    None => Style::default(),
                };
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(if cell.is_some() { BLOCK } else { ' ' });
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            concat_lines(label, Line::from(spans))
        })
        .collect()
}
