//! Bounded undo: unwind the single most recent dart-class event.
//!
//! The log is the source of truth, so undo works backwards from it: drop the
//! most recent dart event together with every event it caused (everything
//! appended after it), revert the score/status effects those entries
//! recorded, and recompute the owning drive's derived fields from the dart
//! events that remain.
//!
//! This is deliberately not replay-from-log. One undo directly after the
//! action it targets is exact; stacking undos across interleaved non-dart
//! events is outside the contract and may leave derived fields approximate.

use tracing::debug;

use crate::models::{
    EventType, GameEvent, GameState, GameStatus, PlayerSide,
};

/// Remove the most recent dart-class event and its side effects. Returns the
/// snapshot unchanged when no dart has been thrown.
pub fn undo(game: &GameState) -> GameState {
    let mut next = game.clone();

    let Some(index) = next
        .events
        .iter()
        .rposition(|e| e.event_type.is_dart_class())
    else {
        return next;
    };

    let removed = next.events[index].clone();
    let dropped: Vec<GameEvent> = next.events.drain(index..).collect();
    debug!(
        removed = ?removed.event_type,
        dropped = dropped.len(),
        "undoing last dart"
    );

    // Revert the side effects recorded after the dart, newest first. The
    // first dropped entry is the dart itself; its own effects are handled in
    // the per-kind blocks below.
    for event in dropped.iter().skip(1).rev() {
        revert_side_effect(&mut next, event);
    }

    let ended_drive = dropped
        .iter()
        .skip(1)
        .any(|e| e.event_type.is_drive_terminal());

    match removed.event_type {
        EventType::ConversionAttempt => revert_conversion_attempt(&mut next, &removed),
        _ => revert_drive_dart(&mut next, &removed, ended_drive),
    }

    next
}

fn revert_side_effect(game: &mut GameState, event: &GameEvent) {
    match event.event_type {
        EventType::GameEnd => {
            game.status = if game.current_quarter >= 5 {
                GameStatus::Overtime
            } else {
                GameStatus::Active
            };
            game.winner = None;
        }
        EventType::OvertimeStart => {
            game.status = GameStatus::Active;
            game.current_quarter = 4;
            game.ot_first_possession = None;
            game.ot_drives_a = 0;
            game.ot_drives_b = 0;
        }
        EventType::OvertimePeriodStart => {
            game.current_quarter -= 1;
            // Both players had completed their drives for the prior period.
            game.ot_drives_a = 2;
            game.ot_drives_b = 2;
        }
        EventType::QuarterEnd => {
            if let Some(quarter) = event.details.as_ref().and_then(|d| d.quarter) {
                game.current_quarter = quarter;
            }
        }
        EventType::Touchdown | EventType::FieldGoalMake => {
            if let Some(points) = event.details.as_ref().and_then(|d| d.points) {
                game.subtract_points(event.player, points as u16);
            }
            game.awaiting_conversion = false;
            game.conversion_kind = None;
            game.conversion_owner = None;
        }
        EventType::DriveStart => {
            // A drive begun after the undone dart is rolled back entirely.
            if game
                .drives
                .last()
                .is_some_and(|d| Some(d.id) == event.drive_id)
            {
                game.drives.pop();
            }
            game.current_drive = None;
        }
        // Terminal markers without score effects; the drive itself is
        // restored from the removed dart below.
        EventType::Bust
        | EventType::Interception
        | EventType::FieldGoalMiss
        | EventType::Punt => {}
        _ => {}
    }
}

/// Restore a drive to its pre-dart shape by recomputing the derived fields
/// from the dart events that remain for it.
fn revert_drive_dart(game: &mut GameState, removed: &GameEvent, ended_drive: bool) {
    let Some(drive_id) = removed.drive_id else {
        return;
    };
    let Some(drive) = game.drives.iter_mut().find(|d| d.id == drive_id) else {
        return;
    };

    let mut dart_count = 0u8;
    let mut yards_gained = 0u16;
    for event in game
        .events
        .iter()
        .filter(|e| e.drive_id == Some(drive_id) && e.event_type.is_dart_class())
    {
        dart_count += 1;
        if let Some(yards) = event.details.as_ref().and_then(|d| d.yards) {
            yards_gained += yards;
        }
    }

    drive.dart_count = dart_count;
    drive.yards_gained = yards_gained;
    drive.current_position = (drive.start_position as u16 + yards_gained).min(100) as u8;
    drive.result = None;
    drive.points_scored = 0;
    // The cushion state steps back with the dart: undoing the bonus dart
    // re-arms it, undoing the dart that granted it disarms it.
    drive.awaiting_bonus_dart = removed.event_type == EventType::BonusDart;
    if removed.event_type == EventType::BonusDart {
        drive.used_bonus_dart = false;
    }

    let restored = drive.clone();
    // A terminal dart in overtime had bumped the period counter; give it
    // back with the drive reopened.
    if game.status == GameStatus::Overtime && ended_drive {
        match restored.player {
            PlayerSide::A => game.ot_drives_a = game.ot_drives_a.saturating_sub(1),
            PlayerSide::B => game.ot_drives_b = game.ot_drives_b.saturating_sub(1),
        }
    }
    game.possession = restored.player;
    game.pending_drive_start = None;
    game.current_drive = Some(restored);
    game.sync_current_drive();
}

fn revert_conversion_attempt(game: &mut GameState, removed: &GameEvent) {
    if let Some(details) = &removed.details {
        if let Some(points) = details.points {
            game.subtract_points(removed.player, points as u16);
        }
        game.conversion_kind = details.conversion;
    }
    game.awaiting_conversion = true;
    game.conversion_owner = Some(removed.player);
    game.possession = removed.player.opponent();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dispatcher::{advance, apply_dart_hit, choose_conversion, new_game};
    use crate::engine::{dispatcher, kicking};
    use crate::models::{ConversionKind, DartHit, DriveResult, Multiplier};

    fn started() -> GameState {
        advance(&new_game("alice", "bob", PlayerSide::A))
    }

    #[test]
    fn undo_with_no_darts_is_noop() {
        let game = started();
        let back = undo(&game);
        assert_eq!(back, game);
    }

    #[test]
    fn undo_restores_a_plain_advance() {
        let game = started();
        let thrown = apply_dart_hit(&game, DartHit::new(20, Multiplier::Triple)).unwrap();
        let back = undo(&thrown);
        assert_eq!(back.current_drive, game.current_drive);
        assert_eq!(back.events.len(), game.events.len());
    }

    #[test]
    fn undo_restores_only_the_last_dart() {
        let game = started();
        let one = apply_dart_hit(&game, DartHit::new(10, Multiplier::SingleInner)).unwrap();
        let two = apply_dart_hit(&one, DartHit::new(12, Multiplier::Double)).unwrap();
        let back = undo(&two);
        let drive = back.current_drive.as_ref().unwrap();
        assert_eq!(drive.dart_count, 1);
        assert_eq!(drive.current_position, 40);
        assert_eq!(drive.yards_gained, 10);
    }

    #[test]
    fn undo_reopens_a_touchdown_drive() {
        let game = started();
        let one = apply_dart_hit(&game, DartHit::new(20, Multiplier::Double)).unwrap();
        let scored = apply_dart_hit(&one, DartHit::new(10, Multiplier::Triple)).unwrap();
        assert_eq!(scored.score_a, 6);
        assert!(scored.awaiting_conversion);

        let back = undo(&scored);
        assert_eq!(back.score_a, 0);
        assert!(!back.awaiting_conversion);
        assert!(back.conversion_owner.is_none());
        let drive = back.current_drive.as_ref().unwrap();
        assert!(drive.is_live());
        assert_eq!(drive.current_position, 70);
        assert_eq!(drive.dart_count, 1);
        assert_eq!(back.possession, PlayerSide::A);
    }

    #[test]
    fn undo_reopens_an_interception() {
        let game = started();
        let picked = apply_dart_hit(&game, DartHit::new(3, Multiplier::Triple)).unwrap();
        assert_eq!(
            picked.drives.last().unwrap().result,
            Some(DriveResult::Interception)
        );
        assert!(picked.pending_drive_start.is_some());

        let back = undo(&picked);
        let drive = back.current_drive.as_ref().unwrap();
        assert!(drive.is_live());
        assert_eq!(drive.dart_count, 0);
        assert!(back.pending_drive_start.is_none());
        assert_eq!(back.possession, PlayerSide::A);
    }

    #[test]
    fn undo_rolls_back_a_started_next_drive() {
        let game = started();
        let picked = apply_dart_hit(&game, DartHit::new(3, Multiplier::Double)).unwrap();
        let next_drive = advance(&picked);
        assert_eq!(
            next_drive.current_drive.as_ref().unwrap().player,
            PlayerSide::B
        );

        let back = undo(&next_drive);
        // The opponent's drive is gone and the original drive is live again.
        let drive = back.current_drive.as_ref().unwrap();
        assert_eq!(drive.player, PlayerSide::A);
        assert!(drive.is_live());
        assert_eq!(back.drives.len(), 1);
    }

    #[test]
    fn undo_restores_a_missed_field_goal() {
        // T10 moves the drive from 30 to 60, into range.
        let game = started();
        let game = apply_dart_hit(&game, DartHit::new(10, Multiplier::Triple)).unwrap();
        let missed =
            dispatcher::attempt_field_goal(&game, DartHit::new(7, Multiplier::SingleInner))
                .unwrap();
        assert!(missed.pending_drive_start.is_some());

        let back = undo(&missed);
        let drive = back.current_drive.as_ref().unwrap();
        assert!(drive.is_live());
        assert_eq!(drive.current_position, 60);
        assert!(back.pending_drive_start.is_none());
        assert!(drive.current_position >= kicking::FG_RANGE);
    }

    #[test]
    fn undo_restores_a_made_field_goal_score() {
        let game = started();
        let game = apply_dart_hit(&game, DartHit::new(10, Multiplier::Triple)).unwrap();
        let made =
            dispatcher::attempt_field_goal(&game, DartHit::new(20, Multiplier::Triple)).unwrap();
        assert_eq!(made.score_a, 3);

        let back = undo(&made);
        assert_eq!(back.score_a, 0);
        assert!(back.current_drive.as_ref().unwrap().is_live());
    }

    #[test]
    fn undo_restores_a_conversion_attempt() {
        let game = started();
        let one = apply_dart_hit(&game, DartHit::new(20, Multiplier::Double)).unwrap();
        let scored = apply_dart_hit(&one, DartHit::new(10, Multiplier::Triple)).unwrap();
        let chosen = choose_conversion(&scored, ConversionKind::Pat).unwrap();
        let converted = apply_dart_hit(&chosen, DartHit::new(1, Multiplier::SingleInner)).unwrap();
        assert_eq!(converted.score_a, 7);
        assert!(!converted.awaiting_conversion);

        let back = undo(&converted);
        assert_eq!(back.score_a, 6);
        assert!(back.awaiting_conversion);
        // The recorded choice survives; only the attempt is unwound.
        assert_eq!(back.conversion_kind, Some(ConversionKind::Pat));
        assert_eq!(back.conversion_owner, Some(PlayerSide::A));
    }

    #[test]
    fn undo_restores_the_bonus_dart_window() {
        // Three singles take the drive from 30 to 79; the 4th dart lands on
        // 99 with 21 required, granting the cushion.
        let mut game = started();
        for hit in [
            DartHit::new(20, Multiplier::SingleInner),
            DartHit::new(20, Multiplier::SingleOuter),
            DartHit::new(9, Multiplier::SingleInner),
        ] {
            game = apply_dart_hit(&game, hit).unwrap();
        }
        let short = apply_dart_hit(&game, DartHit::new(20, Multiplier::SingleInner)).unwrap();
        assert!(short.current_drive.as_ref().unwrap().awaiting_bonus_dart);

        let converted = apply_dart_hit(&short, DartHit::new(1, Multiplier::SingleOuter)).unwrap();
        assert_eq!(converted.score_a, 6);

        let back = undo(&converted);
        let drive = back.current_drive.as_ref().unwrap();
        assert!(drive.awaiting_bonus_dart);
        assert!(!drive.used_bonus_dart);
        assert_eq!(drive.current_position, 99);
        assert_eq!(back.score_a, 0);
    }

    #[test]
    fn sequences_stay_monotonic_after_undo() {
        let game = started();
        let one = apply_dart_hit(&game, DartHit::new(10, Multiplier::SingleInner)).unwrap();
        let back = undo(&one);
        let redone = apply_dart_hit(&back, DartHit::new(12, Multiplier::SingleInner)).unwrap();
        let sequences: Vec<u64> = redone.events.iter().map(|e| e.sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sequences, sorted, "sequences must be strictly increasing");
    }
}
