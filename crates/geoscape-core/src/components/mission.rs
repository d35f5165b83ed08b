//! Mission sites aircraft can fly to.

use geoscape_logic::geometry::GeoPos;

/// A mission site on the geoscape.
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub id: String,
    pub pos: GeoPos,
    /// Set once a transporter is over the site and the battle can start.
    pub active: bool,
}

impl Mission {
    pub fn new(id: impl Into<String>, pos: GeoPos) -> Self {
        Self {
            id: id.into(),
            pos,
            active: false,
        }
    }
}
