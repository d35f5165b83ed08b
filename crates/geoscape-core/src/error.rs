//! Error types for fleet, crew and dispatch commands.
//!
//! Commands either succeed completely or return one of these and leave the
//! campaign untouched. Per-tick updates never fail.

use geoscape_logic::catalog::CatalogError;
use geoscape_logic::hangar::HangarError;

use crate::components::{AircraftId, BaseId, Ucn};

/// Errors from adding, removing or relocating aircraft.
#[derive(Debug)]
pub enum FleetError {
    UnknownBase(BaseId),
    UnknownAircraft(AircraftId),
    TemplateNotFound(String),
    /// The base already owns the maximum number of aircraft.
    BaseFull,
    /// Hangar assignment failed and the hangar policy refuses unhoused aircraft.
    HangarAssignmentFailed(HangarError),
    /// Destination base lacks an operational hangar of the right size.
    NoOperationalHangar,
    /// Destination hangar has no free slot.
    HangarFull,
    /// Destination crew quarters cannot take the aircraft's crew.
    InsufficientCrewQuarters,
    /// Destination storage cannot take the crew's equipment.
    InsufficientStorage,
    /// Destination is beyond the aircraft's remaining range.
    OutOfRange,
    /// Aircraft already belongs to that base.
    SameBase,
    /// Only aircraft parked in base can do this.
    NotInBase,
}

impl std::fmt::Display for FleetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetError::UnknownBase(b) => write!(f, "unknown base {}", b.0),
            FleetError::UnknownAircraft(a) => write!(f, "unknown aircraft {:?}", a),
            FleetError::TemplateNotFound(id) => write!(f, "aircraft template '{}' not found", id),
            FleetError::BaseFull => write!(f, "base cannot hold more aircraft"),
            FleetError::HangarAssignmentFailed(e) => write!(f, "hangar assignment failed: {}", e),
            FleetError::NoOperationalHangar => write!(f, "No operational hangars at that base."),
            FleetError::HangarFull => write!(f, "No free hangars at that base."),
            FleetError::InsufficientCrewQuarters => write!(f, "Insufficient free crew quarter space"),
            FleetError::InsufficientStorage => write!(f, "Insufficient storage space"),
            FleetError::OutOfRange => write!(f, "That base is beyond this aircraft's range."),
            FleetError::SameBase => write!(f, "aircraft already belongs to that base"),
            FleetError::NotInBase => write!(f, "aircraft is not in its base"),
        }
    }
}

impl std::error::Error for FleetError {}

impl From<CatalogError> for FleetError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => FleetError::TemplateNotFound(id),
            other => FleetError::TemplateNotFound(other.to_string()),
        }
    }
}

impl From<HangarError> for FleetError {
    fn from(e: HangarError) -> Self {
        match e {
            HangarError::NoOperationalHangar => FleetError::NoOperationalHangar,
            HangarError::HangarFull => FleetError::HangarFull,
        }
    }
}

/// Errors from sending aircraft somewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    UnknownAircraft(AircraftId),
    UnknownMission(String),
    UnknownUfo,
    UnknownBase(BaseId),
    /// Mission flights need at least one soldier aboard.
    NoCrew,
    /// Interceptions need a pilot.
    NoPilot,
    /// The home base has no hangar able to launch this aircraft.
    NoOperationalHangar,
    /// Not enough fuel for the requested flight.
    InsufficientFuel,
    /// The aircraft is not in a state that accepts this command.
    NotAvailable,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnknownAircraft(a) => write!(f, "unknown aircraft {:?}", a),
            DispatchError::UnknownMission(m) => write!(f, "unknown mission '{}'", m),
            DispatchError::UnknownUfo => write!(f, "unknown UFO"),
            DispatchError::UnknownBase(b) => write!(f, "unknown base {}", b.0),
            DispatchError::NoCrew => write!(f, "Assign one or more soldiers to this aircraft first."),
            DispatchError::NoPilot => write!(f, "This aircraft has no pilot."),
            DispatchError::NoOperationalHangar => write!(f, "No operational hangar for this aircraft."),
            DispatchError::InsufficientFuel => write!(f, "Insufficient fuel."),
            DispatchError::NotAvailable => write!(f, "aircraft cannot take this order now"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Errors from crew and pilot assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum CrewError {
    UnknownAircraft(AircraftId),
    UnknownEmployee(Ucn),
    /// The employee is not a pilot.
    NotAPilot(Ucn),
    /// Only soldiers can join a team.
    NotASoldier(Ucn),
    /// The employee works at a different base.
    WrongBase(Ucn),
    /// The employee already serves aboard an aircraft.
    AlreadyAssigned { ucn: Ucn, aircraft: AircraftId },
    /// The aircraft already has a pilot.
    PilotSeatTaken,
    /// No free team slot.
    TeamFull,
    /// The employee is not aboard that aircraft.
    NotAboard(Ucn),
}

impl std::fmt::Display for CrewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrewError::UnknownAircraft(a) => write!(f, "unknown aircraft {:?}", a),
            CrewError::UnknownEmployee(u) => write!(f, "unknown employee {}", u),
            CrewError::NotAPilot(u) => write!(f, "employee {} is not a pilot", u),
            CrewError::NotASoldier(u) => write!(f, "employee {} is not a soldier", u),
            CrewError::WrongBase(u) => write!(f, "employee {} works at another base", u),
            CrewError::AlreadyAssigned { ucn, aircraft } => {
                write!(f, "employee {} already serves aboard {:?}", ucn, aircraft)
            }
            CrewError::PilotSeatTaken => write!(f, "aircraft already has a pilot"),
            CrewError::TeamFull => write!(f, "no free seat in the team"),
            CrewError::NotAboard(u) => write!(f, "employee {} is not aboard", u),
        }
    }
}

impl std::error::Error for CrewError {}

/// Error type for save/load operations
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(bincode::Error),
    VersionMismatch { expected: u32, found: u32 },
    /// The save refers to something the campaign does not have.
    Inconsistent(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "Version mismatch: expected {}, found {}", expected, found)
            }
            SaveError::Inconsistent(msg) => write!(f, "Inconsistent save: {}", msg),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bincode::Error> for SaveError {
    fn from(e: bincode::Error) -> Self {
        SaveError::Bincode(e)
    }
}
