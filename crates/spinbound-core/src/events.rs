use serde::{Deserialize, Serialize};

/// Discrete outcomes of one session frame, consumed by the surrounding
/// scene/UI/audio layers. The core never calls into presentation code; it
/// returns these from `update` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Coins picked up this frame (count is per-frame, not cumulative).
    CoinsCollected { count: u32 },
    /// The player fell out of the world and was respawned.
    Respawned { tries: u32 },
    /// The door hold completed but coins are missing.
    CoinsInsufficient { missing: u32 },
    /// All coins collected and the door hold completed.
    LevelComplete { time_secs: f32, tries: u32 },
}

/// Per-frame door readout for the HUD prompt and hold bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DoorStatus {
    /// Player is inside the door's proximity rectangle.
    pub near: bool,
    /// Accumulated interact-hold time (s), clamped to `threshold`.
    pub hold: f32,
    /// Hold time required to trigger the door (s).
    pub threshold: f32,
    /// Coins still missing (0 when the door would open).
    pub missing: u32,
}

impl DoorStatus {
    /// Hold progress in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.threshold > 0.0 {
            (self.hold / self.threshold).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_clamped() {
        let status = DoorStatus {
            near: true,
            hold: 2.0,
            threshold: 0.7,
            missing: 0,
        };
        assert_eq!(status.fraction(), 1.0);

        let zero = DoorStatus::default();
        assert_eq!(zero.fraction(), 0.0, "Zero threshold must not divide by zero");
    }

    #[test]
    fn events_roundtrip_through_json() {
        let events = vec![
            SessionEvent::CoinsCollected { count: 2 },
            SessionEvent::Respawned { tries: 3 },
            SessionEvent::CoinsInsufficient { missing: 1 },
            SessionEvent::LevelComplete {
                time_secs: 41.25,
                tries: 3,
            },
        ];
        let json = serde_json::to_string(&events).expect("serialize");
        let back: Vec<SessionEvent> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, events);
    }
}
