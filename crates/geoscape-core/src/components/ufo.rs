//! UFO component.

use geoscape_logic::catalog::{AircraftStats, AircraftTemplate};
use geoscape_logic::geometry::{GeoPos, Vec3};
use geoscape_logic::route::RouteProgress;

use super::common::CampaignDate;

/// An alien craft moving on the geoscape.
#[derive(Debug, Clone, PartialEq)]
pub struct Ufo {
    pub template_id: String,
    pub name: String,
    pub stats: AircraftStats,
    pub position: GeoPos,
    pub direction: Vec3,
    /// Current flight, if moving.
    pub route: Option<RouteProgress>,
    pub damage: i32,
    /// Mission this UFO serves.
    pub mission: Option<String>,
    /// Seen by PHALANX radar.
    pub detected: bool,
    /// Sitting on the ground at its destination.
    pub landed: bool,
    pub last_spotted: Option<CampaignDate>,
}

impl Ufo {
    pub fn from_template(template: &AircraftTemplate, position: GeoPos) -> Self {
        Self {
            template_id: template.id.clone(),
            name: template.name.clone(),
            stats: template.stats,
            position,
            direction: Vec3::new(1.0, 0.0, 0.0),
            route: None,
            damage: template.stats.damage,
            mission: None,
            detected: false,
            landed: false,
            last_spotted: None,
        }
    }

    /// Final waypoint of the current flight.
    pub fn destination(&self) -> Option<GeoPos> {
        self.route.as_ref().and_then(|r| r.destination())
    }

    pub fn is_flying(&self) -> bool {
        self.route.is_some()
    }
}
