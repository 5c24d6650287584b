//! Offense dart resolution.
//!
//! The priority chain is a fixed contract; branches are checked in this
//! order and the first match wins:
//! 1. inner bull (automatic touchdown)
//! 2. interception (double/triple on segment 1 or 3)
//! 3. exact touchdown
//! 4. overshoot bust
//! 5. normal advance, with the 4th-dart checks (bonus cushion, turnover on
//!    downs)

use tracing::debug;

use super::board;
use super::progression;
use crate::error::{EngineError, Result};
use crate::models::{
    DartHit, DartResult, DriveResult, DriveState, EventDetails, EventType, GameState,
    Multiplier, PendingStart, PendingStartReason,
};

/// Segments that turn the ball over when hit on a double or triple ring.
const INTERCEPTION_SEGMENTS: [u8; 2] = [1, 3];

/// Cushion window: required distance at the start of the 4th dart.
const CUSHION_MIN_REQUIRED: u16 = 21;
const CUSHION_MAX_REQUIRED: u16 = 50;

/// Resolve a dart thrown during a live drive.
pub fn resolve_offense_dart(game: &GameState, hit: DartHit) -> Result<GameState> {
    let Some(drive) = game.current_drive.as_ref().filter(|d| d.is_live()) else {
        return Err(EngineError::NoActiveDrive);
    };
    debug_assert!(!drive.awaiting_bonus_dart, "bonus dart routed to offense");

    let dart = board::resolve_dart(hit)?;
    let mut next = game.clone();
    let mut drive = drive.clone();

    // 1. Inner bull: automatic touchdown, yards consumed = full remaining.
    if dart.inner_bull {
        let yards = drive.remaining();
        drive.dart_count += 1;
        drive.yards_gained += yards;
        drive.current_position = 100;
        log_dart(&mut next, &drive, dart, yards);
        score_touchdown(&mut next, &mut drive, "Inner bull, automatic touchdown");
        return finish(next, drive);
    }

    // 2. Interception: the ball changes hands at the mirrored spot.
    if INTERCEPTION_SEGMENTS.contains(&dart.segment)
        && matches!(dart.multiplier, Multiplier::Double | Multiplier::Triple)
    {
        drive.dart_count += 1;
        drive.result = Some(DriveResult::Interception);
        next.pending_drive_start = Some(PendingStart {
            position: 100 - drive.current_position,
            reason: PendingStartReason::Interception,
        });
        log_dart(&mut next, &drive, dart, 0);
        next.push_event(
            EventType::Interception,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                result: Some(DriveResult::Interception),
                pending_reason: Some(PendingStartReason::Interception),
                ..Default::default()
            }),
            format!("Intercepted on {}", dart.code()),
        );
        return finish(next, drive);
    }

    let required = drive.required_distance();
    let total_after = drive.yards_gained + dart.yards;

    // 3. Exact touchdown: cumulative yards land precisely on the goal line.
    if total_after == required {
        drive.dart_count += 1;
        drive.yards_gained = total_after;
        drive.current_position = 100;
        log_dart(&mut next, &drive, dart, dart.yards);
        score_touchdown(
            &mut next,
            &mut drive,
            format!("{} for the touchdown", dart.code()),
        );
        return finish(next, drive);
    }

    // 4. Overshoot: past the goal line is a bust, no position override.
    if total_after > required {
        drive.dart_count += 1;
        drive.result = Some(DriveResult::Bust);
        log_dart(&mut next, &drive, dart, 0);
        next.push_event(
            EventType::Bust,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                result: Some(DriveResult::Bust),
                ..Default::default()
            }),
            format!(
                "Bust: {} overshoots by {}",
                dart.code(),
                total_after - required
            ),
        );
        return finish(next, drive);
    }

    // 5. Normal advance.
    let required_before_dart = drive.remaining();
    drive.dart_count += 1;
    drive.yards_gained += dart.yards;
    drive.current_position += dart.yards as u8;
    log_dart(&mut next, &drive, dart, dart.yards);

    if drive.dart_count == 4 {
        let cushion_window = (CUSHION_MIN_REQUIRED..=CUSHION_MAX_REQUIRED)
            .contains(&required_before_dart);
        if drive.remaining() == 1 && cushion_window && !drive.used_bonus_dart {
            drive.awaiting_bonus_dart = true;
            debug!(drive_id = %drive.id, "one yard short, bonus dart granted");
            next.current_drive = Some(drive);
            next.sync_current_drive();
            return Ok(next);
        }

        drive.result = Some(DriveResult::Bust);
        next.pending_drive_start = Some(PendingStart {
            position: 100 - drive.current_position,
            reason: PendingStartReason::TurnoverOnDowns,
        });
        next.push_event(
            EventType::Bust,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                result: Some(DriveResult::Bust),
                pending_reason: Some(PendingStartReason::TurnoverOnDowns),
                ..Default::default()
            }),
            "Turnover on downs",
        );
        return finish(next, drive);
    }

    next.current_drive = Some(drive);
    next.sync_current_drive();
    Ok(next)
}

/// Resolve the extra dart granted by the cushion rule. A single-1 (either
/// ring) converts; anything else busts. The cushion is spent either way.
pub fn resolve_bonus_dart(game: &GameState, hit: DartHit) -> Result<GameState> {
    let Some(drive) = game
        .current_drive
        .as_ref()
        .filter(|d| d.is_live() && d.awaiting_bonus_dart)
    else {
        return Err(EngineError::NoBonusDartAvailable);
    };

    let dart = board::resolve_dart(hit)?;
    let mut next = game.clone();
    let mut drive = drive.clone();

    drive.awaiting_bonus_dart = false;
    drive.used_bonus_dart = true;
    drive.dart_count += 1;

    if dart.segment == 1 && dart.multiplier.is_single() {
        let yards = drive.remaining();
        drive.yards_gained += yards;
        drive.current_position = 100;
        log_bonus_dart(&mut next, &drive, dart, yards);
        score_touchdown(&mut next, &mut drive, "Bonus dart converts the touchdown");
    } else {
        drive.result = Some(DriveResult::Bust);
        next.pending_drive_start = Some(PendingStart {
            position: 100 - drive.current_position,
            reason: PendingStartReason::TurnoverOnDowns,
        });
        log_bonus_dart(&mut next, &drive, dart, 0);
        next.push_event(
            EventType::Bust,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                result: Some(DriveResult::Bust),
                pending_reason: Some(PendingStartReason::TurnoverOnDowns),
                ..Default::default()
            }),
            format!("Bonus dart {} misses, turnover on downs", dart.code()),
        );
    }

    finish(next, drive)
}

fn score_touchdown(game: &mut GameState, drive: &mut DriveState, description: impl Into<String>) {
    drive.result = Some(DriveResult::Touchdown);
    drive.points_scored = 6;
    game.add_points(drive.player, 6);
    game.awaiting_conversion = true;
    game.conversion_owner = Some(drive.player);
    game.push_event(
        EventType::Touchdown,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            points: Some(6),
            result: Some(DriveResult::Touchdown),
            ..Default::default()
        }),
        description,
    );
}

fn log_dart(game: &mut GameState, drive: &DriveState, dart: DartResult, yards: u16) {
    game.push_event(
        EventType::Dart,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            dart: Some(dart),
            yards: Some(yards),
            position_after: Some(drive.current_position),
            ..Default::default()
        }),
        format!("{} for {} yards", dart.code(), yards),
    );
}

fn log_bonus_dart(game: &mut GameState, drive: &DriveState, dart: DartResult, yards: u16) {
    game.push_event(
        EventType::BonusDart,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            dart: Some(dart),
            yards: Some(yards),
            position_after: Some(drive.current_position),
            ..Default::default()
        }),
        format!("Bonus dart: {} for {} yards", dart.code(), yards),
    );
}

fn finish(mut game: GameState, drive: DriveState) -> Result<GameState> {
    game.current_drive = Some(drive);
    game.sync_current_drive();
    progression::end_drive(&mut game);
    Ok(game)
}
