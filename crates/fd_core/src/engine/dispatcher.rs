//! Engine façade: routes incoming darts to the offense, kicking or
//! conversion module based on the current pending-state flags, and owns the
//! drive start/advance entry points.
//!
//! Routing order is fixed: completed-game guard, conversion sub-state, bonus
//! dart, then the normal offense path. `available_actions` is the read-only
//! projection of exactly this routing; no action is legal there that the
//! dispatch would reject, and vice versa.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{conversion, kicking, offense, progression};
use crate::error::{EngineError, Result};
use crate::models::{
    ConversionKind, DartHit, DriveState, EventDetails, EventType, GameState, PlayerSide,
};

/// Legal-move projection for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableActions {
    pub can_throw_dart: bool,
    pub can_attempt_fg: bool,
    pub can_punt: bool,
    pub can_choose_conversion: bool,
    pub can_use_bonus_dart: bool,
}

/// Create a fresh game with the opening possession.
pub fn new_game(
    player_a: impl Into<String>,
    player_b: impl Into<String>,
    first_possession: PlayerSide,
) -> GameState {
    let mut game = GameState::new(player_a, player_b, first_possession);
    let description = format!(
        "{} vs {}, {} receives first",
        game.player_a,
        game.player_b,
        game.player_name(first_possession)
    );
    game.push_event(
        EventType::GameStart,
        first_possession,
        None,
        None,
        description,
    );
    game
}

pub fn available_actions(game: &GameState) -> AvailableActions {
    if game.is_completed() {
        return AvailableActions::default();
    }

    if game.awaiting_conversion {
        return AvailableActions {
            can_choose_conversion: game.conversion_kind.is_none(),
            can_throw_dart: game.conversion_kind.is_some(),
            ..Default::default()
        };
    }

    let Some(drive) = game.current_drive.as_ref().filter(|d| d.is_live()) else {
        return AvailableActions::default();
    };

    if drive.awaiting_bonus_dart {
        return AvailableActions {
            can_throw_dart: true,
            can_use_bonus_dart: true,
            ..Default::default()
        };
    }

    AvailableActions {
        can_throw_dart: true,
        can_attempt_fg: drive.current_position >= kicking::FG_RANGE,
        can_punt: drive.dart_count == 3 && drive.current_position < kicking::FG_RANGE,
        can_choose_conversion: false,
        can_use_bonus_dart: false,
    }
}

/// Single entry point for a thrown dart.
pub fn apply_dart_hit(game: &GameState, hit: DartHit) -> Result<GameState> {
    if game.is_completed() {
        return Err(EngineError::GameCompleted);
    }
    if game.awaiting_conversion {
        return conversion::resolve_conversion_dart(game, hit);
    }
    if game
        .current_drive
        .as_ref()
        .is_some_and(|d| d.awaiting_bonus_dart)
    {
        return offense::resolve_bonus_dart(game, hit);
    }
    offense::resolve_offense_dart(game, hit)
}

/// Declared field-goal dart. Range is validated by the kicking module; an
/// armed bonus dart must be resolved before any kick.
pub fn attempt_field_goal(game: &GameState, hit: DartHit) -> Result<GameState> {
    if game.is_completed() {
        return Err(EngineError::GameCompleted);
    }
    if game
        .current_drive
        .as_ref()
        .is_some_and(|d| d.awaiting_bonus_dart)
    {
        return Err(EngineError::BonusDartPending);
    }
    kicking::resolve_field_goal(game, hit)
}

/// Declared punt dart. Eligibility (4th dart, own territory) is enforced
/// here, not in the kicking module.
pub fn attempt_punt(game: &GameState, hit: DartHit) -> Result<GameState> {
    if game.is_completed() {
        return Err(EngineError::GameCompleted);
    }
    let Some(drive) = game.current_drive.as_ref().filter(|d| d.is_live()) else {
        return Err(EngineError::NoActiveDrive);
    };
    if drive.awaiting_bonus_dart
        || drive.dart_count != 3
        || drive.current_position >= kicking::FG_RANGE
    {
        return Err(EngineError::PuntNotAvailable);
    }
    kicking::resolve_punt(game, hit)
}

/// Record the post-touchdown choice.
pub fn choose_conversion(game: &GameState, kind: ConversionKind) -> Result<GameState> {
    if game.is_completed() {
        return Err(EngineError::GameCompleted);
    }
    conversion::choose_conversion(game, kind)
}

/// Start the next drive at an explicit position. Defensive no-op when a
/// drive is already live, a conversion is pending, or the game is over; any
/// stale override is dropped in favor of the explicit spot.
pub fn start_next_drive(game: &GameState, start_position: u8) -> GameState {
    let mut next = game.clone();
    if !can_start_drive(&next) {
        return next;
    }
    next.pending_drive_start = None;
    begin_drive(&mut next, start_position);
    next
}

/// Start the next drive, consuming the pending override left by a punt,
/// interception, missed field goal or turnover on downs. Defaults to the 30.
pub fn advance(game: &GameState) -> GameState {
    let mut next = game.clone();
    if !can_start_drive(&next) {
        return next;
    }
    let start = next
        .pending_drive_start
        .take()
        .map(|p| p.position)
        .unwrap_or(progression::DEFAULT_DRIVE_START);
    begin_drive(&mut next, start);
    next
}

fn can_start_drive(game: &GameState) -> bool {
    !game.is_completed() && !game.awaiting_conversion && game.current_drive.is_none()
}

fn begin_drive(game: &mut GameState, start_position: u8) {
    let start_position = start_position.min(99);
    let drive = DriveState::new(game.possession, game.current_quarter, start_position);
    debug!(
        drive_id = %drive.id,
        player = ?drive.player,
        start_position,
        "drive starts"
    );
    game.push_event(
        EventType::DriveStart,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            start_position: Some(start_position),
            quarter: Some(game.current_quarter),
            ..Default::default()
        }),
        format!(
            "{} starts a drive at the {start_position}",
            game.player_name(drive.player)
        ),
    );
    game.begin_drive(drive);
}
