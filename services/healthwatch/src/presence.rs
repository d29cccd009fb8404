//! Host visibility and network connectivity signals

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signal from the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceEvent {
    Hidden,
    Visible,
    Offline,
    Online,
    Focus,
}

impl fmt::Display for PresenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceEvent::Hidden => write!(f, "hidden"),
            PresenceEvent::Visible => write!(f, "visible"),
            PresenceEvent::Offline => write!(f, "offline"),
            PresenceEvent::Online => write!(f, "online"),
            PresenceEvent::Focus => write!(f, "focus"),
        }
    }
}

/// Narrow interface for anything that forwards host signals to the engine
pub trait PresenceListener {
    fn on_presence(&self, event: PresenceEvent);

    fn on_hidden(&self) {
        self.on_presence(PresenceEvent::Hidden);
    }

    fn on_visible(&self) {
        self.on_presence(PresenceEvent::Visible);
    }

    fn on_offline(&self) {
        self.on_presence(PresenceEvent::Offline);
    }

    fn on_online(&self) {
        self.on_presence(PresenceEvent::Online);
    }

    fn on_focus(&self) {
        self.on_presence(PresenceEvent::Focus);
    }
}

/// Last known visibility and connectivity of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub hidden: bool,
    pub online: bool,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            hidden: false,
            online: true,
        }
    }
}

impl Presence {
    /// Probing is suspended while hidden or offline
    pub fn suspended(&self) -> bool {
        self.hidden || !self.online
    }

    /// Record `event`. Returns true when the event should trigger an
    /// immediate probe.
    pub fn apply(&mut self, event: PresenceEvent) -> bool {
        match event {
            PresenceEvent::Hidden => {
                self.hidden = true;
                false
            }
            PresenceEvent::Visible => {
                self.hidden = false;
                true
            }
            PresenceEvent::Offline => {
                self.online = false;
                false
            }
            PresenceEvent::Online => {
                self.online = true;
                true
            }
            PresenceEvent::Focus => true,
        }
    }
}
