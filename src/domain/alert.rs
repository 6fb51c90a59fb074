//! The canonical alert record and its enumerations.
//!
//! Field names follow the upstream feed (camelCase) so that cached snapshots
//! remain plain arrays of the feed's own alert objects. Every field except
//! `id` tolerates being absent or `null`, and unknown enum values fall back
//! to an `Other` variant rather than failing the whole feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::AlertId;

/// Alert category reported by the feed.
///
/// Only [`AlertType::Planned`] alerts are eligible for publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    Planned,
    /// Network-wide notices. The feed spells this `SideWide`.
    #[serde(rename = "SideWide", alias = "SiteWide")]
    SiteWide,
    #[default]
    #[serde(other)]
    Other,
}

/// Transport mode an alert applies to. Used only to tag post text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Bus,
    Subway,
    Streetcar,
    Elevator,
    #[default]
    #[serde(other)]
    Other,
}

impl RouteType {
    /// Leading tag line for posts about this mode.
    #[must_use]
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::Bus => Some("🚌 [BUS ALERT]"),
            Self::Streetcar => Some("🚋 [STREETCAR ALERT]"),
            Self::Subway => Some("🚊 [SUBWAY ALERT]"),
            Self::Elevator => Some("♿️ [ACCESSIBILITY ALERT]"),
            Self::Other => None,
        }
    }
}

/// Service effect of an alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    NoService,
    Detour,
    SignificantDelays,
    #[default]
    #[serde(other)]
    Other,
}

/// Window during which an alert is in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePeriod {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
}

/// One transit service disruption record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alert_type: AlertType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_type: RouteType,
    /// Primary content-equality signal. `null` on the wire becomes empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub header_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Per-alert update time, RFC 3339.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_branch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effect: Effect,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effect_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_period: Option<ActivePeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_end: Option<String>,
}

impl Alert {
    /// Create a planned alert with the given id and header, all else defaulted.
    pub fn new(id: impl Into<AlertId>, header_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alert_type: AlertType::Planned,
            route_type: RouteType::Other,
            header_text: header_text.into(),
            description: None,
            last_updated: String::new(),
            priority: None,
            route: String::new(),
            route_branch: String::new(),
            title: String::new(),
            url: String::new(),
            effect: Effect::Other,
            effect_desc: String::new(),
            severity: String::new(),
            active_period: None,
            stop_start: None,
            stop_end: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = alert_type;
        self
    }

    #[must_use]
    pub fn with_route_type(mut self, route_type: RouteType) -> Self {
        self.route_type = route_type;
        self
    }

    #[must_use]
    pub fn with_last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = last_updated.into();
        self
    }

    #[must_use]
    pub fn is_planned(&self) -> bool {
        self.alert_type == AlertType::Planned
    }

    /// Parsed per-alert update time; `None` when absent or malformed.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.last_updated.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Trimmed header, `None` when there is nothing to post.
    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        let trimmed = self.header_text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
