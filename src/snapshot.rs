//! Per-account usage snapshots and the JSON loader.

use crate::charts::gauge::Orientation;
use crate::theme::ColorToken;
use crate::timeseries::Series;
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse one JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Numbers, numeric strings and null. Anything else reads as missing
/// instead of failing the whole file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LenientF64(pub Option<f64>);

impl<'de> Deserialize<'de> for LenientF64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LenientVisitor;
        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = Option<f64>;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a numeric string or null")
            }
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Some(v as f64))
            }
            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Some(v as f64))
            }
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
                Ok(v.is_finite().then_some(v))
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
                Ok(v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            }
            fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
                Ok(None)
            }
            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(None)
            }
            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(None)
            }
            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(None)
            }
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(None)
            }
        }
        deserializer.deserialize_any(LenientVisitor).map(LenientF64)
    }
}

fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    LenientF64::deserialize(deserializer).map(|v| v.0)
}

fn lenient_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    LenientF64::deserialize(deserializer).map(|v| v.0.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Ok,
    Degraded,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SnapshotStatus {
    pub fn color(self) -> ColorToken {
        match self {
            SnapshotStatus::Ok => ColorToken::Success,
            SnapshotStatus::Degraded => ColorToken::Warning,
            SnapshotStatus::Error => ColorToken::Error,
            SnapshotStatus::Unknown => ColorToken::TextMuted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnapshotStatus::Ok => "OK",
            SnapshotStatus::Degraded => "Degraded",
            SnapshotStatus::Error => "Error",
            SnapshotStatus::Unknown => "Unknown",
        }
    }
}

/// One named measurement. Any of the numbers may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    #[serde(deserialize_with = "lenient")]
    pub used: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub limit: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub remaining: Option<f64>,
    pub unit: String,
    pub window: String,
    pub orientation: Orientation,
}

impl Metric {
    /// Gauge percentage in this metric's own orientation, or `None` when
    /// there is no positive limit to measure against.
    pub fn percent(&self) -> Option<f64> {
        let limit = self.limit.filter(|l| *l > 0.0)?;
        let used = self
            .used
            .or_else(|| self.remaining.map(|r| limit - r))?;
        let share = used / limit * 100.0;
        Some(match self.orientation {
            Orientation::Used => share,
            Orientation::Remaining => 100.0 - share,
        })
        .map(|p| p.max(0.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_or_zero")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub label: String,
    #[serde(default)]
    pub points: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelUsage {
    pub model: String,
    #[serde(deserialize_with = "lenient")]
    pub cost: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub tokens: Option<f64>,
    pub daily: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageSnapshot {
    pub account: String,
    pub provider: String,
    pub status: SnapshotStatus,
    pub message: Option<String>,
    pub metrics: BTreeMap<String, Metric>,
    pub history: Vec<HistorySeries>,
    pub models: Vec<ModelUsage>,
}

fn to_series(label: &str, color: ColorToken, points: &[HistoryPoint]) -> Series {
    Series::new(label, color).with_points(points.iter().map(|p| (p.date.clone(), p.value)))
}

impl UsageSnapshot {
    /// History as chart series, colored by position.
    pub fn history_series(&self) -> Vec<Series> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, h)| to_series(&h.label, ColorToken::Series(i), &h.points))
            .collect()
    }

    /// Per-model daily usage as chart series.
    pub fn model_series(&self) -> Vec<Series> {
        self.models
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.daily.is_empty())
            .map(|(i, m)| to_series(&m.model, ColorToken::Series(i), &m.daily))
            .collect()
    }

    /// The metric headlining this account: the first one with a gauge value,
    /// else the first one at all.
    pub fn primary_metric(&self) -> Option<(&str, &Metric)> {
        self.metrics
            .iter()
            .find(|(_, m)| m.percent().is_some())
            .or_else(|| self.metrics.iter().next())
            .map(|(name, m)| (name.as_str(), m))
    }

    /// Every history series summed into one.
    pub fn total_history(&self, label: &str, color: ColorToken) -> Series {
        Series::new(label, color).with_points(
            self.history
                .iter()
                .flat_map(|h| h.points.iter().map(|p| (p.date.clone(), p.value))),
        )
    }
}

/// Load a JSON array of snapshots.
pub fn load_snapshots(path: &Path) -> Result<Vec<UsageSnapshot>, LoadError> {
    let snapshots: Vec<UsageSnapshot> = read_json(path)?;
    log::info!("loaded {} snapshots from {}", snapshots.len(), path.display());
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_numbers() {
        let m: Metric = serde_json::from_str(
            r#"{"used": "42.5", "limit": 100, "remaining": null, "unit": "req"}"#,
        )
        .unwrap();
        assert_eq!(m.used, Some(42.5));
        assert_eq!(m.limit, Some(100.0));
        assert_eq!(m.remaining, None);

        let m: Metric =
            serde_json::from_str(r#"{"used": true, "limit": "n/a", "remaining": [1]}"#).unwrap();
        assert_eq!(m, Metric::default());
    }

    #[test]
    fn test_unknown_status() {
        let s: UsageSnapshot =
            serde_json::from_str(r#"{"account": "a", "status": "rate_limited"}"#).unwrap();
        assert_eq!(s.status, SnapshotStatus::Unknown);
        let s: UsageSnapshot = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert_eq!(s.status, SnapshotStatus::Degraded);
    }

    #[test]
    fn test_percent_respects_orientation() {
        let used = Metric {
            used: Some(30.0),
            limit: Some(120.0),
            ..Default::default()
        };
        assert_eq!(used.percent(), Some(25.0));

        let remaining = Metric {
            remaining: Some(90.0),
            limit: Some(120.0),
            orientation: Orientation::Remaining,
            ..Default::default()
        };
        assert_eq!(remaining.percent(), Some(75.0));

        let no_limit = Metric {
            used: Some(5.0),
            ..Default::default()
        };
        assert_eq!(no_limit.percent(), None);
    }

    #[test]
    fn test_primary_metric_prefers_gauge() {
        let mut s = UsageSnapshot::default();
        s.metrics.insert("a_credits".into(), Metric { used: Some(3.0), ..Default::default() });
        s.metrics.insert(
            "b_session".into(),
            Metric { used: Some(3.0), limit: Some(10.0), ..Default::default() },
        );
        assert_eq!(s.primary_metric().map(|(n, _)| n), Some("b_session"));
        assert!(UsageSnapshot::default().primary_metric().is_none());
    }

    #[test]
    fn test_history_series_colors_by_position() {
        let s: UsageSnapshot = serde_json::from_str(
            r#"{"history": [
                {"label": "in", "points": [{"date": "2024-01-01", "value": "3"}]},
                {"label": "out", "points": [{"date": "2024-01-01", "value": null}]}
            ]}"#,
        )
        .unwrap();
        let series = s.history_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].color, ColorToken::Series(1));
        assert_eq!(series[0].points, vec![("2024-01-01".to_string(), 3.0)]);
        assert_eq!(series[1].points[0].1, 0.0);
        assert_eq!(s.total_history("all", ColorToken::Info).points.len(), 2);
    }

    #[test]
    fn test_load_errors_carry_path() {
        let missing = Path::new("/definitely/not/here.json");
        let err = load_snapshots(missing).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("here.json"));

        let dir = std::env::temp_dir().join(format!("usage-dash-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(load_snapshots(&bad), Err(LoadError::Parse { .. })));
        let good = dir.join("good.json");
        std::fs::write(&good, r#"[{"account": "x"}]"#).unwrap();
        assert_eq!(load_snapshots(&good).unwrap()[0].account, "x");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
