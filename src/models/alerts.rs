//! Active alert models

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single active alert
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub event: String,
    pub status: String,
    pub effective: Option<DateTime<FixedOffset>>,
    pub expires: Option<DateTime<FixedOffset>>,
    pub severity: String,
    pub headline: String,
    /// Affected area description (`areaDesc` upstream)
    pub affected_areas: String,
}

/// Alerts for an area, in upstream order
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AlertSet {
    pub updated: Option<DateTime<FixedOffset>>,
    pub count: usize,
    pub alerts: Vec<Alert>,
}

impl AlertSet {
    #[must_use]
    pub fn new(updated: Option<DateTime<FixedOffset>>, alerts: Vec<Alert>) -> Self {
        Self {
            updated,
            count: alerts.len(),
            alerts,
        }
    }
}
