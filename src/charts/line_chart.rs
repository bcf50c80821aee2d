//! Multi-series line chart drawn on the braille canvas.

use super::canvas::Canvas;
use super::{axis_label_row, legend_row, y_axis_labels, y_axis_width};
use crate::theme::Palette;
use crate::timeseries::{align_series, Bucket, Series};
use crate::ui::helpers::{concat_lines, fit_block, Formatter, TextBlock};
use ratatui::style::Color;

/// Headroom above the tallest point.
const Y_HEADROOM: f64 = 1.1;

/// `None` when no series has a positive value anywhere.
pub fn render_line_chart(
    series: &[Series],
    width: usize,
    height: usize,
    format: Formatter<'_>,
    palette: &dyn Palette,
) -> Option<TextBlock> {
    let series: Vec<Series> = series.iter().filter(|s| s.has_positive()).cloned().collect();
    if series.is_empty() || width == 0 || height == 0 {
        return None;
    }

    let legend_h = usize::from(series.len() > 1 && height >= 5);
    let axis_h = usize::from(height >= 3);
    let plot_h = height.saturating_sub(legend_h + axis_h).max(1);

    let aligned = align_series(&series, true);
    // Braille gives two pixel columns per character.
    let sizing = aligned.bin(width * 2);
    let label_w = y_axis_width(headroom(&sizing), width, format);
    let plot_w = width.saturating_sub(label_w + 1).max(1);

    let mut canvas = Canvas::new(
        u16::try_from(plot_w).unwrap_or(u16::MAX),
        u16::try_from(plot_h).unwrap_or(u16::MAX),
    );
    let (px_w, px_h) = canvas.size();
    let buckets = aligned.bin(px_w as usize);
    let y_max = headroom(&buckets);
    let labels = y_axis_labels(y_max, plot_h, label_w, format);
    let n = buckets.len();
    let to_x = |i: usize| -> i32 {
        if n <= 1 {
            px_w / 2
        } else {
            (i * (px_w as usize - 1) / (n - 1)) as i32
        }
    };
    let to_y = |v: f64| -> i32 { (px_h - 1) - ((v / y_max) * (px_h - 1) as f64).round() as i32 };

    for s in 0..series.len() {
        let mut prev: Option<(i32, i32)> = None;
        for (i, bucket) in buckets.iter().enumerate() {
            let point = (to_x(i), to_y(bucket.values[s]));
            let (x0, y0) = prev.unwrap_or(point);
            canvas.draw_line(x0, y0, point.0, point.1, s);
            prev = Some(point);
        }
    }
    if series.len() == 1 {
        canvas.fill_below(0);
    }

    let colors: Vec<Color> = series.iter().map(|s| palette.color(s.color)).collect();
    let mut lines: TextBlock = labels
        .into_iter()
        .zip(canvas.render(&colors))
        .map(|(label, row)| concat_lines(label, row))
        .collect();

    if axis_h == 1 {
        let first = buckets.first().map(|b| b.date);
        let last = buckets.last().map(|b| b.date);
        lines.push(axis_label_row(first, last, label_w + 1, plot_w, palette));
    }
    if legend_h == 1 {
        lines.push(legend_row(&series, palette));
    }
    Some(fit_block(lines, width, height))
}

/// Shared Y max: 10% above the tallest plotted value of any series.
fn headroom(buckets: &[Bucket]) -> f64 {
    let max = buckets
        .iter()
        .flat_map(|b| b.values.iter().copied())
        .fold(0.0, f64::max);
    if max > 0.0 {
        max * Y_HEADROOM
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ColorToken, ThemeColors};
    use crate::ui::helpers::block_text;

    fn fmt(v: f64) -> String {
        format!("{v:.0}")
    }

    fn series(label: &str, points: &[(&str, f64)]) -> Series {
        Series::new(label, ColorToken::Series(0)).with_points(points.iter().map(|(d, v)| (*d, *v)))
    }

    #[test]
    fn test_all_zero_series_omitted() {
        let s = series("idle", &[("2024-01-01", 0.0), ("2024-01-02", 0.0)]);
        assert!(render_line_chart(&[s], 40, 10, &fmt, &ThemeColors::DEFAULT).is_none());
        assert!(render_line_chart(&[], 40, 10, &fmt, &ThemeColors::DEFAULT).is_none());
    }

    #[test]
    fn test_exact_dimensions() {
        let a = series("a", &[("2024-01-01", 1.0), ("2024-01-05", 9.0), ("2024-01-09", 3.0)]);
        let b = series("b", &[("2024-01-03", 4.0)]);
        for (w, h) in [(40, 10), (20, 5), (12, 3), (8, 1)] {
            let block = render_line_chart(&[a.clone(), b.clone()], w, h, &fmt, &ThemeColors::DEFAULT)
                .unwrap();
            assert_eq!(block.len(), h);
            for line in &block {
                assert_eq!(line.width(), w);
            }
        }
    }

    #[test]
    fn test_single_series_fills_area() {
        let a = series("a", &[("2024-01-01", 5.0), ("2024-01-02", 5.0)]);
        let block = render_line_chart(&[a], 30, 6, &fmt, &ThemeColors::DEFAULT).unwrap();
        let text = block_text(&block);
        // Bottom plot row sits under the line, so it is solid braille
        assert!(text[4].contains('\u{28FF}'));
    }

    #[test]
    fn test_legend_lists_qualifying_series() {
        let a = series("alpha", &[("2024-01-01", 5.0), ("2024-01-02", 2.0)]);
        let b = series("beta", &[("2024-01-01", 1.0)]);
        let c = series("ghost", &[("2024-01-01", 0.0)]);
        let block = render_line_chart(&[a, b, c], 40, 8, &fmt, &ThemeColors::DEFAULT).unwrap();
        let legend = block_text(&block).pop().unwrap();
        assert!(legend.contains("alpha"));
        assert!(legend.contains("beta"));
        assert!(!legend.contains("ghost"));
    }

    fn top_label(block: &TextBlock) -> String {
        let first = block_text(block).remove(0);
        first.chars().take_while(|c| *c != '┤').collect::<String>().trim().to_string()
    }

    #[test]
    fn test_y_max_has_ten_percent_headroom() {
        let a = series("a", &[("2024-01-01", 20.0), ("2024-01-02", 100.0)]);
        let b = series("b", &[("2024-01-01", 40.0), ("2024-01-02", 10.0)]);
        let block = render_line_chart(&[a, b], 40, 8, &fmt, &ThemeColors::DEFAULT).unwrap();
        assert_eq!(top_label(&block), "110");
    }

    #[test]
    fn test_y_max_follows_binned_values() {
        // 200 daily points on a narrow chart: the spike is averaged with its
        // neighbours before it is plotted, and the axis follows.
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points: Vec<(String, f64)> = (0..200u64)
            .map(|i| {
                let day = crate::timeseries::format_day(start + chrono::Days::new(i));
                (day, if i == 100 { 500.0 } else { 1.0 })
            })
            .collect();
        let s = Series::new("spiky", ColorToken::Series(0)).with_points(points);
        let width = 30;
        let block = render_line_chart(std::slice::from_ref(&s), width, 6, &fmt, &ThemeColors::DEFAULT)
            .unwrap();
        let label = top_label(&block);
        let first = block_text(&block).remove(0);
        let label_w = first.chars().take_while(|c| *c != '┤').count();
        let px_w = (width - label_w - 1) * 2;
        let binned = align_series(std::slice::from_ref(&s), true).bin(px_w);
        let expected = headroom(&binned);
        assert!(expected < 500.0 * Y_HEADROOM);
        assert_eq!(label, fmt(expected));
    }
}
