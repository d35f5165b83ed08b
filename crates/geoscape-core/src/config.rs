//! Campaign tuning loaded from JSON, with defaults for every field.

use serde::{Deserialize, Serialize};

use geoscape_logic::constants::{
    AIRCRAFT_REFUEL_FACTOR, MAX_AIRCRAFT, RADAR_AIRCRAFT_RANGE, RADAR_AIRCRAFT_TRACKING_RANGE,
};

use crate::messages::MessageKind;

/// What to do with a new aircraft when its base has no free hangar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HangarPolicy {
    /// Keep the aircraft without a hangar slot and log the problem.
    AllowUnhoused,
    /// Refuse to create the aircraft.
    Refuse,
}

/// Which message kinds reach the player's message log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Kinds that are dropped instead of logged.
    pub muted: Vec<MessageKind>,
}

impl NotificationSettings {
    pub fn is_enabled(&self, kind: MessageKind) -> bool {
        !self.muted.contains(&kind)
    }
}

/// Campaign-wide tuning for air operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Fuel seconds restored per game second in base.
    pub refuel_factor: i32,
    /// Radar range given to new aircraft (degrees).
    pub aircraft_radar_range: i32,
    /// Radar tracking range given to new aircraft (degrees).
    pub aircraft_tracking_range: i32,
    /// Aircraft a single base may own.
    pub max_aircraft_per_base: usize,
    pub hangar_policy: HangarPolicy,
    /// A pursuer this close to its target (degrees) starts intercepting.
    pub engagement_range: f64,
    pub notifications: NotificationSettings,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            refuel_factor: AIRCRAFT_REFUEL_FACTOR,
            aircraft_radar_range: RADAR_AIRCRAFT_RANGE,
            aircraft_tracking_range: RADAR_AIRCRAFT_TRACKING_RANGE,
            max_aircraft_per_base: MAX_AIRCRAFT,
            hangar_policy: HangarPolicy::AllowUnhoused,
            engagement_range: 1.0,
            notifications: NotificationSettings::default(),
        }
    }
}

impl CampaignConfig {
    /// Parse a config document; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
