//! Date-indexed series: shared axis, alignment, zero trimming and binning
//! down to the columns a chart actually has.

use crate::theme::ColorToken;
use chrono::NaiveDate;
use fxhash::FxHashMap;
use std::collections::BTreeSet;
use std::ops::Range;

/// Gap filling is skipped above this span so a stray ancient date cannot
/// blow the axis up to thousands of entries.
pub const MAX_GAP_FILL_DAYS: i64 = 370;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: ColorToken,
    /// ISO day string and value, in any order.
    pub points: Vec<(String, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, color: ColorToken) -> Self {
        Self {
            label: label.into(),
            color,
            points: Vec::new(),
        }
    }

    pub fn with_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.points
            .extend(points.into_iter().map(|(d, v)| (d.into(), v)));
        self
    }

    pub fn has_positive(&self) -> bool {
        self.points.iter().any(|(_, v)| v.is_finite() && *v > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    /// Expand the axis to every calendar day between first and last date.
    pub fill_gaps: bool,
    /// Days of zero context kept around the non-zero range when trimming.
    pub pad: usize,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            fill_gaps: true,
            pad: 1,
        }
    }
}

/// Several series resampled onto one date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub dates: Vec<NaiveDate>,
    /// `values[series][date_index]`
    pub values: Vec<Vec<f64>>,
}

/// One display column worth of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Midpoint of the dates folded into this bucket.
    pub date: NaiveDate,
    /// Mean value per series.
    pub values: Vec<f64>,
}

impl Bucket {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[inline]
fn clean(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_day(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Sorted union of every parseable date, optionally gap-filled.
pub fn date_axis(series: &[Series], fill_gaps: bool) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    for s in series {
        for (day, _) in &s.points {
            match parse_day(day) {
                Some(d) => {
                    dates.insert(d);
                }
                None => log::debug!("series {:?}: dropping unparseable date {:?}", s.label, day),
            }
        }
    }
    let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
        return Vec::new();
    };
    if fill_gaps && (last - first).num_days() <= MAX_GAP_FILL_DAYS {
        return first.iter_days().take_while(|d| *d <= last).collect();
    }
    dates.into_iter().collect()
}

/// Resample every series onto `axis`. Missing days are 0, repeated days add up.
pub fn align(series: &[Series], axis: &[NaiveDate]) -> Vec<Vec<f64>> {
    series
        .iter()
        .map(|s| {
            let mut by_day: FxHashMap<NaiveDate, f64> = FxHashMap::default();
            for (day, v) in &s.points {
                if let Some(d) = parse_day(day) {
                    *by_day.entry(d).or_insert(0.0) += clean(*v);
                }
            }
            axis.iter()
                .map(|d| by_day.get(d).copied().unwrap_or(0.0))
                .collect()
        })
        .collect()
}

pub fn align_series(series: &[Series], fill_gaps: bool) -> Aligned {
    let dates = date_axis(series, fill_gaps);
    let values = align(series, &dates);
    Aligned { dates, values }
}

impl Aligned {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn nonzero_at(&self, i: usize) -> bool {
        self.values.iter().any(|s| s[i] != 0.0)
    }

    /// Drop leading and trailing all-zero days, keeping `pad` days on each
    /// side of the active range. `None` when nothing is non-zero.
    pub fn trim(self, pad: usize) -> Option<Aligned> {
        let first = (0..self.len()).find(|&i| self.nonzero_at(i))?;
        let last = (0..self.len()).rev().find(|&i| self.nonzero_at(i))?;
        let start = first.saturating_sub(pad);
        let end = (last + pad).min(self.len() - 1);
        Some(Aligned {
            dates: self.dates[start..=end].to_vec(),
            values: self
                .values
                .iter()
                .map(|s| s[start..=end].to_vec())
                .collect(),
        })
    }

    /// Fold into at most `columns` contiguous buckets of averaged values.
    pub fn bin(&self, columns: usize) -> Vec<Bucket> {
        let n = self.len();
        let columns = columns.max(1);
        if n <= columns {
            return (0..n)
                .map(|i| Bucket {
                    date: self.dates[i],
                    values: self.values.iter().map(|s| s[i]).collect(),
                })
                .collect();
        }
        (0..columns)
            .map(|b| {
                let range = b * n / columns..(b + 1) * n / columns;
                let count = range.len() as f64;
                let first = self.dates[range.start];
                let last = self.dates[range.end - 1];
                Bucket {
                    date: first + chrono::Duration::days((last - first).num_days() / 2),
                    values: self
                        .values
                        .iter()
                        .map(|s| s[range.clone()].iter().sum::<f64>() / count)
                        .collect(),
                }
            })
            .collect()
    }
}

/// Full pipeline: axis, alignment, trimming, binning. `None` when every value
/// is zero (the chart is omitted).
pub fn prepare(series: &[Series], options: AlignOptions, columns: usize) -> Option<Vec<Bucket>> {
    let aligned = align_series(series, options.fill_gaps).trim(options.pad)?;
    let buckets = aligned.bin(columns);
    log::debug!(
        "prepared {} series: {} days -> {} buckets",
        series.len(),
        aligned.len(),
        buckets.len()
    );
    Some(buckets)
}

/// Pixel columns each bucket occupies within `width`.
///
/// Sparse data (fewer buckets than half the width) becomes one-column needles
/// at proportional positions; otherwise the width is split into contiguous
/// floor-based ranges that cover every column exactly once.
pub fn column_ranges(buckets: usize, width: usize) -> Vec<Range<usize>> {
    if buckets == 0 || width == 0 {
        return Vec::new();
    }
    if buckets < width / 2 {
        return (0..buckets)
            .map(|i| {
                let x = if buckets == 1 {
                    width / 2
                } else {
                    i * (width - 1) / (buckets - 1)
                };
                x..x + 1
            })
            .collect();
    }
    (0..buckets)
        .map(|i| i * width / buckets..(i + 1) * width / buckets)
        .collect()
}
