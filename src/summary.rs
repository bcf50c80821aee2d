//! One-line metric summaries.
//!
//! Rules are tried in order and the first one whose predicate holds formats
//! the summary. New metric shapes get a new rule, not a new branch.

use crate::snapshot::Metric;
use crate::ui::helpers::{format_cost, format_number};

pub struct SummaryRule {
    pub name: &'static str,
    pub applies: fn(&Metric) -> bool,
    pub format: fn(&Metric) -> String,
}

pub const SUMMARY_RULES: &[SummaryRule] = &[
    SummaryRule {
        name: "used_of_limit",
        applies: |m| m.used.is_some() && m.limit.is_some(),
        format: |m| {
            format!(
                "{} / {}",
                amount(m, m.used.unwrap_or_default()),
                amount(m, m.limit.unwrap_or_default())
            )
        },
    },
    SummaryRule {
        name: "remaining_of_limit",
        applies: |m| m.remaining.is_some() && m.limit.is_some(),
        format: |m| {
            format!(
                "{} of {} left",
                amount(m, m.remaining.unwrap_or_default()),
                amount(m, m.limit.unwrap_or_default())
            )
        },
    },
    SummaryRule {
        name: "remaining",
        applies: |m| m.remaining.is_some(),
        format: |m| format!("{} left", amount(m, m.remaining.unwrap_or_default())),
    },
    SummaryRule {
        name: "used",
        applies: |m| m.used.is_some(),
        format: |m| format!("{} used", amount(m, m.used.unwrap_or_default())),
    },
    SummaryRule {
        name: "limit",
        applies: |m| m.limit.is_some(),
        format: |m| format!("limit {}", amount(m, m.limit.unwrap_or_default())),
    },
];

fn is_currency(unit: &str) -> bool {
    matches!(unit.trim().to_ascii_lowercase().as_str(), "$" | "usd")
}

/// A value with its unit attached.
fn amount(metric: &Metric, value: f64) -> String {
    if is_currency(&metric.unit) {
        format_cost(value)
    } else if metric.unit.is_empty() {
        format_number(value)
    } else {
        format!("{} {}", format_number(value), metric.unit)
    }
}

/// The rule that would summarize `metric`.
pub fn matching_rule(metric: &Metric) -> Option<&'static SummaryRule> {
    SUMMARY_RULES.iter().find(|rule| (rule.applies)(metric))
}

pub fn summarize(metric: &Metric) -> String {
    let body = matching_rule(metric)
        .map(|rule| (rule.format)(metric))
        .unwrap_or_else(|| "N/A".to_string());
    if metric.window.is_empty() {
        body
    } else {
        format!("{} · {}", body, metric.window)
    }
}
