//! Geoscape Core - campaign air operations engine
//!
//! Runs the PHALANX fleet on the geoscape: aircraft owned by bases, flying
//! great-circle routes to missions, chasing UFOs, refueling at home, and
//! moving between bases, with crews drawn from the base's employees.
//!
//! # Architecture
//!
//! Aircraft and UFOs are entities in a `hecs` world:
//! - **Entities**: PHALANX aircraft (`Aircraft`), alien craft (`Ufo`)
//! - **Handles**: `AircraftId` / `UfoId` wrap generation-counted entities,
//!   so a stale handle never resolves to another aircraft
//! - **Systems**: per-tick flight logic that works on one aircraft and a
//!   snapshot of its surroundings, returning events the campaign applies
//!
//! Bases, missions and employees are plain campaign data. The global
//! aircraft index is the position in the campaign's aircraft list and
//! stays dense when aircraft are removed.
//!
//! # Example
//!
//! ```rust,no_run
//! use geoscape_core::prelude::*;
//! use geoscape_logic::catalog::AircraftCatalog;
//! use geoscape_logic::geometry::GeoPos;
//!
//! let catalog = AircraftCatalog::from_json(include_str!("../../../data/aircraft_catalog.json")).unwrap();
//! let mut campaign = Campaign::new(catalog, CampaignConfig::default());
//! let base = campaign.add_base(Base::new("Alpha", GeoPos::new(10.0, 50.0)).with_hangars(2, 2));
//! let craft = campaign.add_aircraft(base, "craft_inter_stiletto").unwrap();
//! campaign.send_to_position(craft, GeoPos::new(15.0, 45.0)).unwrap();
//!
//! loop {
//!     campaign.advance(60);
//! }
//! ```

pub mod components;
pub mod config;
pub mod crew;
pub mod dispatch;
pub mod employees;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod messages;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{CampaignConfig, HangarPolicy};
    pub use crate::dispatch::DispatchOutcome;
    pub use crate::employees::EmployeeKind;
    pub use crate::engine::Campaign;
    pub use crate::error::{CrewError, DispatchError, FleetError, SaveError};
    pub use crate::messages::{CampaignEvent, MessageKind};
}
