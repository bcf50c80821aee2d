//! Built-in sample accounts shown when no snapshot file is given.

use crate::charts::gauge::Orientation;
use crate::snapshot::{HistoryPoint, HistorySeries, Metric, ModelUsage, SnapshotStatus, UsageSnapshot};
use crate::timeseries::format_day;
use chrono::{Duration, NaiveDate};

const DAYS: i64 = 84;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}

/// Smooth, repeatable daily values: a weekly swing over a slow trend.
fn wave(day: i64, scale: f64, phase: f64) -> f64 {
    let weekly = ((day as f64 + phase) * std::f64::consts::TAU / 7.0).sin();
    let trend = 1.0 + day as f64 / DAYS as f64;
    let weekend = if (day + 5) % 7 >= 5 { 0.3 } else { 1.0 };
    (scale * trend * weekend * (1.2 + weekly)).max(0.0).round()
}

fn daily(scale: f64, phase: f64, skip_every: Option<i64>) -> Vec<HistoryPoint> {
    let start = base_date();
    (0..DAYS)
        .filter(|d| skip_every.map_or(true, |n| d % n != 0))
        .map(|d| HistoryPoint {
            date: format_day(start + Duration::days(d)),
            value: wave(d, scale, phase),
        })
        .collect()
}

fn metric(used: Option<f64>, limit: Option<f64>, remaining: Option<f64>, unit: &str, window: &str) -> Metric {
    Metric {
        used,
        limit,
        remaining,
        unit: unit.into(),
        window: window.into(),
        orientation: Orientation::Used,
    }
}

fn model(name: &str, cost: f64, scale: f64, phase: f64) -> ModelUsage {
    let daily = daily(scale, phase, None);
    let tokens = daily.iter().map(|p| p.value).sum();
    ModelUsage {
        model: name.into(),
        cost: Some(cost),
        tokens: Some(tokens),
        daily,
    }
}

pub fn demo_snapshots() -> Vec<UsageSnapshot> {
    let work = UsageSnapshot {
        account: "work".into(),
        provider: "anthropic".into(),
        status: SnapshotStatus::Ok,
        message: None,
        metrics: [
            ("session".to_string(), metric(Some(62.0), Some(100.0), None, "%", "5h")),
            ("weekly".to_string(), metric(Some(410.0), Some(500.0), None, "msgs", "7d")),
            ("credits".to_string(), metric(None, None, Some(18.4), "USD", "")),
        ]
        .into_iter()
        .collect(),
        history: vec![
            HistorySeries {
                label: "input".into(),
                points: daily(1_200.0, 0.0, None),
            },
            HistorySeries {
                label: "output".into(),
                points: daily(400.0, 2.0, None),
            },
        ],
        models: vec![
            model("sonnet", 42.10, 900.0, 0.0),
            model("opus", 88.75, 300.0, 3.0),
            model("haiku", 3.20, 500.0, 5.0),
        ],
    };

    let personal = UsageSnapshot {
        account: "personal".into(),
        provider: "openai".into(),
        status: SnapshotStatus::Degraded,
        message: Some("usage endpoint slow, showing cached data".into()),
        metrics: [
            ("monthly".to_string(), metric(Some(12.6), Some(20.0), None, "USD", "30d")),
            ("requests".to_string(), metric(Some(870.0), None, None, "req", "24h")),
        ]
        .into_iter()
        .collect(),
        history: vec![HistorySeries {
            label: "requests".into(),
            points: daily(300.0, 1.0, Some(3)),
        }],
        models: vec![model("gpt-4o", 9.40, 250.0, 1.0), model("o3", 3.20, 60.0, 4.0)],
    };

    let mut quota = metric(None, Some(1_000.0), Some(150.0), "req", "1d");
    quota.orientation = Orientation::Remaining;
    let team = UsageSnapshot {
        account: "team".into(),
        provider: "gemini".into(),
        status: SnapshotStatus::Ok,
        message: None,
        metrics: [("daily quota".to_string(), quota)].into_iter().collect(),
        history: vec![HistorySeries {
            label: "requests".into(),
            points: daily(700.0, 4.0, None),
        }],
        models: Vec::new(),
    };

    let broken = UsageSnapshot {
        account: "legacy".into(),
        provider: "custom".into(),
        status: SnapshotStatus::Error,
        message: Some("token expired".into()),
        ..Default::default()
    };

    vec![work, personal, team, broken]
}
