use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::drive::DriveState;
use super::events::{EventDetails, EventType, GameEvent};

/// One of the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSide {
    A,
    B,
}

impl PlayerSide {
    pub fn opponent(self) -> Self {
        match self {
            PlayerSide::A => PlayerSide::B,
            PlayerSide::B => PlayerSide::A,
        }
    }
}

/// Game lifecycle. `Overtime` is entered only from a tied quarter 4 and
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Overtime,
    Completed,
}

/// Post-touchdown attempt type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Pat,
    TwoPoint,
}

/// Why the next drive starts at an overridden spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStartReason {
    Punt,
    Interception,
    MissedFieldGoal,
    TurnoverOnDowns,
}

/// Start-position override handed from one drive to the next, written by
/// punt/interception/missed-FG/downs resolution and consumed (then cleared)
/// by `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStart {
    pub position: u8,
    pub reason: PendingStartReason,
}

/// Full match snapshot. Every engine operation takes one of these and
/// returns a new one; nothing here is shared or mutated behind the host's
/// back.
///
/// Invariant: `current_drive`, when present, is a copy of the most recently
/// appended element of `drives` (same id) and has `result = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub player_a: String,
    pub player_b: String,
    pub score_a: u16,
    pub score_b: u16,
    /// 1-4 regulation; 5 and up are overtime periods.
    pub current_quarter: u8,
    pub possession: PlayerSide,
    /// Who received in quarter 1. Quarter 3 opens with the other player.
    pub first_possession: PlayerSide,
    pub status: GameStatus,
    pub winner: Option<PlayerSide>,
    pub current_drive: Option<DriveState>,
    /// Every drive ever started, in order. Append-only.
    pub drives: Vec<DriveState>,
    /// Append-only log, the source of truth for what happened. Only undo may
    /// remove entries, and only from the tail.
    pub events: Vec<GameEvent>,
    pub awaiting_conversion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_kind: Option<ConversionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_owner: Option<PlayerSide>,
    /// Terminal drives per player within the current overtime period.
    pub ot_drives_a: u8,
    pub ot_drives_b: u8,
    /// Possession that opens every overtime period. Sticky: set once at OT
    /// entry (or by the external coin flip) and never re-flipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ot_first_possession: Option<PlayerSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_drive_start: Option<PendingStart>,
}

impl GameState {
    pub fn new(
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        first_possession: PlayerSide,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_a: player_a.into(),
            player_b: player_b.into(),
            score_a: 0,
            score_b: 0,
            current_quarter: 1,
            possession: first_possession,
            first_possession,
            status: GameStatus::Active,
            winner: None,
            current_drive: None,
            drives: Vec::new(),
            events: Vec::new(),
            awaiting_conversion: false,
            conversion_kind: None,
            conversion_owner: None,
            ot_drives_a: 0,
            ot_drives_b: 0,
            ot_first_possession: None,
            pending_drive_start: None,
        }
    }

    pub fn score_of(&self, side: PlayerSide) -> u16 {
        match side {
            PlayerSide::A => self.score_a,
            PlayerSide::B => self.score_b,
        }
    }

    pub fn add_points(&mut self, side: PlayerSide, points: u16) {
        match side {
            PlayerSide::A => self.score_a += points,
            PlayerSide::B => self.score_b += points,
        }
    }

    pub fn subtract_points(&mut self, side: PlayerSide, points: u16) {
        match side {
            PlayerSide::A => self.score_a = self.score_a.saturating_sub(points),
            PlayerSide::B => self.score_b = self.score_b.saturating_sub(points),
        }
    }

    pub fn player_name(&self, side: PlayerSide) -> &str {
        match side {
            PlayerSide::A => &self.player_a,
            PlayerSide::B => &self.player_b,
        }
    }

    /// Next event sequence number. Strictly monotonic over the log.
    pub fn next_sequence(&self) -> u64 {
        self.events.last().map(|e| e.sequence + 1).unwrap_or(0)
    }

    /// Append a log entry with the next sequence number.
    pub fn push_event(
        &mut self,
        event_type: EventType,
        player: PlayerSide,
        drive_id: Option<Uuid>,
        details: Option<EventDetails>,
        description: impl Into<String>,
    ) {
        let sequence = self.next_sequence();
        self.events.push(GameEvent::new(
            event_type,
            player,
            drive_id,
            details,
            description,
            sequence,
        ));
    }

    /// Start a drive: append to history and set as current.
    pub fn begin_drive(&mut self, drive: DriveState) {
        self.drives.push(drive.clone());
        self.current_drive = Some(drive);
    }

    /// Copy the working drive back over its history slot so the invariant
    /// (current == last appended) holds after every mutation.
    pub fn sync_current_drive(&mut self) {
        if let Some(drive) = &self.current_drive {
            if let Some(last) = self.drives.last_mut() {
                if last.id == drive.id {
                    *last = drive.clone();
                }
            }
        }
    }

    /// Terminal drives a player has recorded in the given quarter.
    pub fn terminal_drives_in_quarter(&self, side: PlayerSide, quarter: u8) -> usize {
        self.drives
            .iter()
            .filter(|d| d.player == side && d.quarter == quarter && d.result.is_some())
            .count()
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }
}
