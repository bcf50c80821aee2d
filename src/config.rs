//! Dashboard preferences: the stored view mode and per-account enable/order.

use crate::snapshot::{read_json, LoadError, UsageSnapshot};
use crate::view_mode::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPreference {
    pub account: String,
    pub enabled: bool,
    pub order: i32,
}

impl Default for ItemPreference {
    fn default() -> Self {
        Self {
            account: String::new(),
            enabled: true,
            order: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Kept as a string so a stale or unknown value still loads.
    pub view_mode: String,
    pub items: Vec<ItemPreference>,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let config: DashboardConfig = read_json(path)?;
        log::info!(
            "loaded config from {} (view_mode={:?}, {} items)",
            path.display(),
            config.view_mode,
            config.items.len()
        );
        Ok(config)
    }

    pub fn configured_mode(&self) -> ViewMode {
        if self.view_mode.trim().is_empty() {
            ViewMode::default()
        } else {
            ViewMode::parse(&self.view_mode)
        }
    }

    fn preference(&self, account: &str) -> Option<&ItemPreference> {
        self.items.iter().find(|p| p.account == account)
    }

    /// Enabled snapshots in display order. Accounts without a preference are
    /// shown after the ordered ones, in input order.
    pub fn order_items<'a>(&self, snapshots: &'a [UsageSnapshot]) -> Vec<&'a UsageSnapshot> {
        let mut shown: Vec<(Option<i32>, usize, &UsageSnapshot)> = snapshots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match self.preference(&s.account) {
                Some(p) if !p.enabled => {
                    log::debug!("account {:?} disabled in config", s.account);
                    None
                }
                Some(p) => Some((Some(p.order), i, s)),
                None => Some((None, i, s)),
            })
            .collect();
        // None sorts before Some, so key on is_none to push unconfigured last.
        shown.sort_by_key(|(order, i, _)| (order.is_none(), order.unwrap_or(0), *i));
        shown.into_iter().map(|(_, _, s)| s).collect()
    }
}
