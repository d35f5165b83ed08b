//! Handles and shared value types.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Stable handle to a PHALANX aircraft. Generation-counted, so a stale
/// handle to a deleted aircraft never resolves to a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AircraftId(pub Entity);

/// Stable handle to a UFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UfoId(pub Entity);

/// Index of a base in the campaign's base list. Bases are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseId(pub usize);

/// Unique character number of an employee.
pub type Ucn = u32;

/// Seconds in one campaign day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Campaign clock: whole days plus seconds into the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignDate {
    pub day: i64,
    pub sec: i64,
}

impl CampaignDate {
    pub const fn new(day: i64, sec: i64) -> Self {
        Self { day, sec }
    }

    /// Advance by `seconds`, carrying into days.
    pub fn advance(&mut self, seconds: i64) {
        let total = self.sec + seconds;
        self.day += total.div_euclid(SECONDS_PER_DAY);
        self.sec = total.rem_euclid(SECONDS_PER_DAY);
    }

    pub fn total_seconds(&self) -> i64 {
        self.day * SECONDS_PER_DAY + self.sec
    }
}
