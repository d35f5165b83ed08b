//! Flat aircraft status codes, names and location predicates.

use serde::{Deserialize, Serialize};

/// What an aircraft is doing. The campaign layer carries the payload for
/// each state; this enum is the tag used for display and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AircraftStatus {
    /// Not yet placed anywhere.
    None = 0,
    /// In base, tank filling.
    Refueling = 1,
    /// In base, ready.
    Home = 2,
    /// Airborne, holding position.
    Idle = 3,
    /// Airborne, flying to a map position.
    Transit = 4,
    /// Airborne, flying to a mission site.
    EnRouteToMission = 5,
    /// Airborne, chasing a UFO.
    PursuingUfo = 6,
    /// Over the mission site, waiting to drop the team.
    ReadyToDrop = 7,
    /// Airborne, engaged with a UFO.
    Intercepting = 8,
    /// Off the map, moving to a new home base.
    Transferring = 9,
    /// Airborne, flying home.
    Returning = 10,
}

impl AircraftStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Refueling),
            2 => Some(Self::Home),
            3 => Some(Self::Idle),
            4 => Some(Self::Transit),
            5 => Some(Self::EnRouteToMission),
            6 => Some(Self::PursuingUfo),
            7 => Some(Self::ReadyToDrop),
            8 => Some(Self::Intercepting),
            9 => Some(Self::Transferring),
            10 => Some(Self::Returning),
            _ => None,
        }
    }

    /// Aircraft parked in its home base.
    pub fn is_in_base(&self) -> bool {
        matches!(self, Self::Home | Self::Refueling)
    }

    /// Aircraft flying on the geoscape. Transferring aircraft are neither in
    /// base nor on the geoscape.
    pub fn is_on_geoscape(&self) -> bool {
        match self {
            Self::Idle
            | Self::Transit
            | Self::EnRouteToMission
            | Self::PursuingUfo
            | Self::ReadyToDrop
            | Self::Intercepting
            | Self::Returning => true,
            Self::None | Self::Refueling | Self::Home | Self::Transferring => false,
        }
    }

    /// Stable identifier used in save files.
    pub fn save_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Refueling => "refuel",
            Self::Home => "home",
            Self::Idle => "idle",
            Self::Transit => "transit",
            Self::EnRouteToMission => "mission",
            Self::PursuingUfo => "ufo",
            Self::ReadyToDrop => "drop",
            Self::Intercepting => "intercept",
            Self::Transferring => "transfer",
            Self::Returning => "returning",
        }
    }

    pub fn from_save_name(name: &str) -> Option<Self> {
        ALL_STATUSES.iter().copied().find(|s| s.save_name() == name)
    }

    /// Player-facing description.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "Nothing - should not be displayed",
            Self::Home => "at home base",
            Self::Refueling => "refuelling",
            Self::Idle => "idle",
            Self::Transit => "in transit",
            Self::EnRouteToMission => "enroute to mission",
            Self::PursuingUfo => "pursuing a UFO",
            Self::ReadyToDrop => "ready to drop soldiers",
            Self::Intercepting => "intercepting a UFO",
            Self::Transferring => "enroute to new home base",
            Self::Returning => "returning to base",
        }
    }
}

/// Every status, in code order.
pub const ALL_STATUSES: [AircraftStatus; 11] = [
    AircraftStatus::None,
    AircraftStatus::Refueling,
    AircraftStatus::Home,
    AircraftStatus::Idle,
    AircraftStatus::Transit,
    AircraftStatus::EnRouteToMission,
    AircraftStatus::PursuingUfo,
    AircraftStatus::ReadyToDrop,
    AircraftStatus::Intercepting,
    AircraftStatus::Transferring,
    AircraftStatus::Returning,
];

/// Status line shown for an aircraft; in-base aircraft of a base under
/// attack are on red alert.
pub fn status_display(status: AircraftStatus, base_under_attack: bool) -> &'static str {
    if base_under_attack && status.is_in_base() {
        "ON RED ALERT"
    } else {
        status.display_name()
    }
}
