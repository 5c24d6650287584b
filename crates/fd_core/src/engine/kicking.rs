//! Field-goal and punt resolution. Both are terminal, single-dart actions;
//! eligibility for the punt (4th dart, own territory) is enforced by the
//! dispatcher before this module is called.

use tracing::debug;

use super::board;
use super::progression;
use crate::error::{EngineError, Result};
use crate::models::{
    DartHit, DriveResult, DriveState, EventDetails, EventType, GameState, Multiplier,
    PendingStart, PendingStartReason,
};

/// Minimum position to declare a field goal.
pub const FG_RANGE: u8 = 50;

/// Field-goal points. Doubles and triples on the target segment carry no
/// bonus.
const FG_POINTS: u8 = 3;

/// Resolve a declared field-goal dart.
///
/// The target band depends on the opponent yard line (`100 - position`):
/// from [40,50] out only segment 20 counts; inside 40, segments 20, 1 and 5
/// all count. Any non-miss ring on a target segment is a make.
pub fn resolve_field_goal(game: &GameState, hit: DartHit) -> Result<GameState> {
    let Some(drive) = game.current_drive.as_ref().filter(|d| d.is_live()) else {
        return Err(EngineError::NoActiveDrive);
    };
    if drive.current_position < FG_RANGE {
        return Err(EngineError::NotInFGRange {
            position: drive.current_position,
        });
    }

    let dart = board::resolve_dart(hit)?;
    let mut next = game.clone();
    let mut drive = drive.clone();

    let opponent_yard_line = 100 - drive.current_position;
    let target: &[u8] = if opponent_yard_line >= 40 {
        &[20]
    } else {
        &[20, 1, 5]
    };
    let made = !dart.multiplier.is_miss() && target.contains(&dart.segment);

    drive.dart_count += 1;
    next.push_event(
        EventType::FieldGoalAttempt,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            dart: Some(dart),
            good: Some(made),
            ..Default::default()
        }),
        format!(
            "Field goal attempt from the {opponent_yard_line}: {}",
            dart.code()
        ),
    );

    if made {
        drive.result = Some(DriveResult::FgMake);
        drive.points_scored = FG_POINTS;
        next.add_points(drive.player, FG_POINTS as u16);
        next.push_event(
            EventType::FieldGoalMake,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                points: Some(FG_POINTS),
                result: Some(DriveResult::FgMake),
                ..Default::default()
            }),
            "Field goal is good",
        );
    } else {
        drive.result = Some(DriveResult::FgMiss);
        // Missed kick turns the ball over at the mirrored spot.
        next.pending_drive_start = Some(PendingStart {
            position: 100 - drive.current_position,
            reason: PendingStartReason::MissedFieldGoal,
        });
        next.push_event(
            EventType::FieldGoalMiss,
            drive.player,
            Some(drive.id),
            Some(EventDetails {
                result: Some(DriveResult::FgMiss),
                pending_reason: Some(PendingStartReason::MissedFieldGoal),
                ..Default::default()
            }),
            "Field goal is no good",
        );
    }

    debug!(made, position = drive.current_position, "field goal resolved");
    finish(next, drive)
}

/// Resolve a declared punt dart.
///
/// The outcome table is expressed from the receiving player's perspective.
/// A miss is a blocked punt: the receiver takes over at the mirrored spot
/// and the inside-own-30 penalty never applies to it.
pub fn resolve_punt(game: &GameState, hit: DartHit) -> Result<GameState> {
    let Some(drive) = game.current_drive.as_ref().filter(|d| d.is_live()) else {
        return Err(EngineError::NoActiveDrive);
    };

    let dart = board::resolve_dart(hit)?;
    let mut next = game.clone();
    let mut drive = drive.clone();

    let punting_position = drive.current_position;
    let (mut receiving, blocked) = match dart.multiplier {
        Multiplier::Miss => (100 - punting_position, true),
        Multiplier::InnerBull => (5, false),
        Multiplier::OuterBull => (10, false),
        Multiplier::SingleInner => (30, false),
        Multiplier::SingleOuter => (20, false),
        Multiplier::Double => (100u8.min(20 + dart.segment * 2), false),
        Multiplier::Triple => (100u8.min(20 + dart.segment * 3), false),
    };

    // Short-field penalty: punting from inside the own 30 moves the receiver
    // up by the shortfall, capped at midfield. A return already past 50 on
    // its own is never pulled back.
    if !blocked && punting_position < 30 {
        let penalty = 30 - punting_position;
        receiving = receiving.max(50.min(receiving + penalty));
    }

    drive.dart_count += 1;
    drive.result = Some(DriveResult::Punt);
    next.pending_drive_start = Some(PendingStart {
        position: receiving,
        reason: PendingStartReason::Punt,
    });

    next.push_event(
        EventType::PuntAttempt,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            dart: Some(dart),
            receiving_position: Some(receiving),
            blocked: Some(blocked),
            ..Default::default()
        }),
        if blocked {
            format!("Punt blocked, receiver takes over at {receiving}")
        } else {
            format!("Punt: {} puts the receiver at {receiving}", dart.code())
        },
    );
    next.push_event(
        EventType::Punt,
        drive.player,
        Some(drive.id),
        Some(EventDetails {
            result: Some(DriveResult::Punt),
            pending_reason: Some(PendingStartReason::Punt),
            ..Default::default()
        }),
        "Drive ends on the punt",
    );

    debug!(receiving, blocked, "punt resolved");
    finish(next, drive)
}

fn finish(mut game: GameState, drive: DriveState) -> Result<GameState> {
    game.current_drive = Some(drive);
    game.sync_current_drive();
    progression::end_drive(&mut game);
    Ok(game)
}
