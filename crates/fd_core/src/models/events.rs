use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dart::DartResult;
use super::drive::DriveResult;
use super::game::{ConversionKind, PendingStartReason, PlayerSide};

/// One record in the append-only game log.
///
/// The log is the source of truth: score, position and dart counts on the
/// aggregates are convenience caches that must stay re-derivable from here.
/// Entries are never edited; only undo may drop entries, and only from the
/// tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub player: PlayerSide,
    /// Owning drive; `None` for game-level events (quarter/OT/game markers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// Strictly monotonic over the whole log.
    pub sequence: u64,
}

impl GameEvent {
    pub fn new(
        event_type: EventType,
        player: PlayerSide,
        drive_id: Option<Uuid>,
        details: Option<EventDetails>,
        description: impl Into<String>,
        sequence: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            player,
            drive_id,
            details,
            description: description.into(),
            timestamp: Utc::now(),
            sequence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    GameStart,
    DriveStart,
    /// Offense dart within a live drive.
    Dart,
    /// The extra dart granted by the cushion rule.
    BonusDart,
    /// Field-goal declaration dart.
    FieldGoalAttempt,
    /// Punt declaration dart.
    PuntAttempt,
    /// PAT / two-point choice (records the choice only).
    ConversionChoice,
    /// The conversion dart itself.
    ConversionAttempt,
    // Drive-terminal markers, appended right after the dart that caused them.
    Touchdown,
    Bust,
    Interception,
    FieldGoalMake,
    FieldGoalMiss,
    Punt,
    QuarterEnd,
    OvertimeStart,
    OvertimePeriodStart,
    GameEnd,
}

impl EventType {
    /// Events that record a thrown dart. Undo targets the most recent of
    /// these.
    pub fn is_dart_class(self) -> bool {
        matches!(
            self,
            EventType::Dart
                | EventType::BonusDart
                | EventType::FieldGoalAttempt
                | EventType::PuntAttempt
                | EventType::ConversionAttempt
        )
    }

    /// Markers that close a drive with a terminal result.
    pub fn is_drive_terminal(self) -> bool {
        matches!(
            self,
            EventType::Touchdown
                | EventType::Bust
                | EventType::Interception
                | EventType::FieldGoalMake
                | EventType::FieldGoalMiss
                | EventType::Punt
        )
    }
}

/// Structured payload. All fields optional; each event type fills the ones
/// it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dart: Option<DartResult>,
    /// Yards credited to the drive by this dart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yards: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_after: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DriveResult>,
    /// Where the receiving player takes over (punt resolution).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiving_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub good: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<PendingStartReason>,
}
