//! Player messages and collaborator events raised by air operations.
//!
//! Messages are what the player reads; events are what other subsystems
//! (map, radar, battlescape launcher, transfer screen) drain and react to.

use serde::{Deserialize, Serialize};

use crate::components::{AircraftId, BaseId, CampaignDate, UfoId};
use crate::config::NotificationSettings;

/// Category of a player message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Standard,
    NewAircraft,
    AircraftRefueled,
    AircraftCannotRefuel,
    AircraftLowFuel,
    InsufficientFuel,
    MissionReached,
    AircraftTransferred,
}

/// One entry of the message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub text: String,
    pub date: CampaignDate,
}

/// Chronological message log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message unless its kind is muted. Returns whether it was kept.
    pub fn push(
        &mut self,
        settings: &NotificationSettings,
        kind: MessageKind,
        title: impl Into<String>,
        text: impl Into<String>,
        date: CampaignDate,
    ) -> bool {
        if !settings.is_enabled(kind) {
            return false;
        }
        let text = text.into();
        log::debug!("message [{:?}] {}", kind, text);
        self.messages.push(Message {
            kind,
            title: title.into(),
            text,
            date,
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Something other subsystems need to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignEvent {
    /// An aircraft arrived over its mission; the battlescape can launch.
    MissionReached { aircraft: AircraftId, mission: String },
    /// The campaign clock should stop for a player decision.
    PauseRequested,
    /// An aircraft landed at its home base.
    AircraftReturnedHome { aircraft: AircraftId, base: BaseId },
    /// An aircraft was removed; drop any selection or transfer referring to it.
    AircraftRemoved { aircraft: AircraftId },
    /// An aircraft now belongs to another base.
    AircraftRehomed { aircraft: AircraftId, from: BaseId, to: BaseId },
    /// Aircraft positions changed; redraw radar coverage.
    RadarOverlayDirty,
    /// A base under attack launched its defenders against the attack mission.
    BaseDefenseLaunched { base: BaseId, mission: String },
    /// A UFO reached its destination and landed.
    UfoLanded { ufo: UfoId },
}
