//! Aircraft templates and the read-only catalog they live in.
//!
//! Templates are loaded once from JSON data and never mutated afterwards.
//! Aircraft instances copy what they need and refer back to their template
//! by id.

use serde::{Deserialize, Serialize};

use crate::constants::{KILOMETER_PER_DEGREE, MAX_ACTIVETEAM, MAX_AIRCRAFTSLOT};

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Role of an aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AircraftKind {
    /// Troop carrier; flies missions with a team aboard.
    Transporter = 0,
    /// Fighter; pursues and engages UFOs.
    Interceptor = 1,
    /// Alien craft.
    Ufo = 2,
}

impl AircraftKind {
    /// Human-readable type string.
    pub fn type_string(&self) -> &'static str {
        match self {
            Self::Transporter => "Transporter",
            Self::Interceptor => "Interceptor",
            Self::Ufo => "UFO",
        }
    }
}

/// Hangar size class an aircraft occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SizeClass {
    Small = 0,
    Large = 1,
}

/// Where a slot sits on the airframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotPosition {
    NoseLeft,
    NoseCenter,
    NoseRight,
    WingLeft,
    WingRight,
    RearLeft,
    RearCenter,
    RearRight,
}

/// Weight class of a slot or of an item mounted in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemWeight {
    Light,
    Medium,
    Heavy,
}

/// One weapon or electronics slot as laid out by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotLayout {
    pub position: SlotPosition,
    pub size: ItemWeight,
    /// Item installed from the factory, if any.
    #[serde(default)]
    pub item: Option<String>,
    /// Weight of the factory item.
    #[serde(default)]
    pub item_weight: Option<ItemWeight>,
}

/// Flight and combat statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftStats {
    /// Cruise speed; `speed * seconds / 3600` is degrees flown.
    pub speed: i32,
    pub max_speed: i32,
    /// Fuel capacity in seconds of flight.
    pub fuel_size: i32,
    pub armour: i32,
    /// Hit points when undamaged.
    pub damage: i32,
    pub accuracy: i32,
    pub ecm: i32,
    /// Antimatter needed for a full tank (0 for conventional fuel).
    pub antimatter: i32,
    pub detection_range: i32,
}

/// Statistic selector for display conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Speed,
    MaxSpeed,
    FuelSize,
    Armour,
    Damage,
    Accuracy,
    Ecm,
    Antimatter,
    DetectionRange,
}

impl AircraftStats {
    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Speed => self.speed,
            StatKind::MaxSpeed => self.max_speed,
            StatKind::FuelSize => self.fuel_size,
            StatKind::Armour => self.armour,
            StatKind::Damage => self.damage,
            StatKind::Accuracy => self.accuracy,
            StatKind::Ecm => self.ecm,
            StatKind::Antimatter => self.antimatter,
            StatKind::DetectionRange => self.detection_range,
        }
    }
}

/// Convert a raw stat into the value shown to the player: speeds become
/// km/h rounded down to tens, fuel capacity is shown in thousands.
pub fn display_stat_value(stat: StatKind, value: i32) -> i32 {
    match stat {
        StatKind::Speed | StatKind::MaxSpeed => {
            10 * (KILOMETER_PER_DEGREE * value as f64 / 10.0) as i32
        }
        StatKind::FuelSize => value / 1000,
        _ => value,
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// Static definition of an aircraft type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftTemplate {
    /// Unique id used by data files and saves.
    pub id: String,
    pub name: String,
    /// Name given to newly built instances.
    #[serde(default)]
    pub default_name: String,
    pub kind: AircraftKind,
    pub size: SizeClass,
    #[serde(default)]
    pub weapon_slots: Vec<SlotLayout>,
    #[serde(default)]
    pub electronics_slots: Vec<SlotLayout>,
    pub stats: AircraftStats,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub max_team_size: usize,
}

impl AircraftTemplate {
    pub fn max_weapons(&self) -> usize {
        self.weapon_slots.len()
    }

    pub fn max_electronics(&self) -> usize {
        self.electronics_slots.len()
    }

    /// Structural validation applied at load time.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("empty id".into());
        }
        if self.stats.speed <= 0 {
            return Err(format!("speed must be positive (got {})", self.stats.speed));
        }
        if self.kind != AircraftKind::Ufo && self.stats.fuel_size <= 0 {
            return Err(format!(
                "fuel_size must be positive (got {})",
                self.stats.fuel_size
            ));
        }
        if self.max_team_size > MAX_ACTIVETEAM {
            return Err(format!(
                "max_team_size {} exceeds {}",
                self.max_team_size, MAX_ACTIVETEAM
            ));
        }
        if self.weapon_slots.len() > MAX_AIRCRAFTSLOT
            || self.electronics_slots.len() > MAX_AIRCRAFTSLOT
        {
            return Err(format!("more than {} slots of one type", MAX_AIRCRAFTSLOT));
        }
        Ok(())
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Errors raised while loading or querying the catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// No template with this id.
    NotFound(String),
    /// The data file is not valid JSON of the expected shape.
    Parse(String),
    /// A template failed validation.
    Invalid { id: String, reason: String },
    /// Two templates share one id.
    Duplicate(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "aircraft template '{}' not found", id),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {}", e),
            CatalogError::Invalid { id, reason } => {
                write!(f, "aircraft template '{}' is invalid: {}", id, reason)
            }
            CatalogError::Duplicate(id) => write!(f, "duplicate aircraft template '{}'", id),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

/// Read-only set of aircraft templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AircraftCatalog {
    templates: Vec<AircraftTemplate>,
}

impl AircraftCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load templates from a JSON array.
    ///
    /// A malformed document fails as a whole. Individual entries that do not
    /// parse, fail validation, or repeat an id are logged and skipped.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        for (i, value) in raw.into_iter().enumerate() {
            let template: AircraftTemplate = match serde_json::from_value(value) {
                Ok(t) => t,
                Err(e) => {
                    log::error!("aircraft catalog entry {}: {}", i, e);
                    continue;
                }
            };
            if let Err(e) = catalog.insert(template) {
                log::error!("aircraft catalog entry {}: {}", i, e);
            }
        }
        log::info!("Loaded {} aircraft templates", catalog.len());
        Ok(catalog)
    }

    /// Add a template after validating it.
    pub fn insert(&mut self, template: AircraftTemplate) -> Result<(), CatalogError> {
        if let Err(reason) = template.validate() {
            return Err(CatalogError::Invalid {
                id: template.id,
                reason,
            });
        }
        if self.get_silent(&template.id).is_some() {
            return Err(CatalogError::Duplicate(template.id));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Template by id; a miss is logged.
    pub fn get(&self, id: &str) -> Result<&AircraftTemplate, CatalogError> {
        self.get_silent(id).ok_or_else(|| {
            log::warn!("aircraft template '{}' not found", id);
            CatalogError::NotFound(id.to_string())
        })
    }

    /// Template by id without logging.
    pub fn get_silent(&self, id: &str) -> Option<&AircraftTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AircraftTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Data problems that do not prevent loading. Empty means clean.
    pub fn sanity_check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for t in &self.templates {
            if t.name.is_empty() {
                problems.push(format!("aircraft '{}' has no name", t.id));
            }
            if t.default_name.is_empty() {
                problems.push(format!("aircraft '{}' has no default name", t.id));
            }
            for slot in &t.weapon_slots {
                if let (Some(item), Some(weight)) = (&slot.item, slot.item_weight) {
                    if weight > slot.size {
                        problems.push(format!(
                            "aircraft '{}' has an item ({}) too heavy for its slot",
                            t.id, item
                        ));
                    }
                }
            }
            if t.kind != AircraftKind::Ufo {
                if has_duplicate_position(&t.weapon_slots) {
                    problems.push(format!(
                        "aircraft '{}' has 2 weapons slots at the same location",
                        t.id
                    ));
                }
                if has_duplicate_position(&t.electronics_slots) {
                    problems.push(format!(
                        "aircraft '{}' has 2 electronics slots at the same location",
                        t.id
                    ));
                }
            }
        }
        problems
    }
}

fn has_duplicate_position(slots: &[SlotLayout]) -> bool {
    slots
        .iter()
        .enumerate()
        .any(|(i, a)| slots[i + 1..].iter().any(|b| b.position == a.position))
}
