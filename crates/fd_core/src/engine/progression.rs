//! Drive, quarter, overtime and game-end transitions.
//!
//! This is the only module allowed to flip possession or mutate
//! quarter/status. Evaluation order is fixed:
//! 1. drive end (possession flip, OT counter)
//! 2. period check (both players at 2 terminal drives)
//! 3. quarter advance / overtime entry / game end
//!
//! Regulation quarter advance and overtime period restart are deliberately
//! separate paths: regulation flips naturally per drive (with the halftime
//! override into quarter 3), while every overtime period restarts from the
//! sticky `ot_first_possession`. Do not unify them.
//!
//! Every function here is total over well-formed snapshots; malformed
//! context (e.g. ending a drive that does not exist) is a no-op, since
//! callers may invoke these defensively.

use tracing::debug;

use crate::models::{EventDetails, EventType, GameState, GameStatus, PlayerSide};

/// Drives each player gets per quarter and per overtime period.
pub const DRIVES_PER_QUARTER: usize = 2;

/// Default start position when no override is pending.
pub const DEFAULT_DRIVE_START: u8 = 30;

/// Close out the current drive after its terminal result and event have been
/// written. Flips possession to the opponent; the pending start-position
/// override (if any) is consumed by the next `advance`, not here.
pub(crate) fn end_drive(game: &mut GameState) {
    let Some(drive) = game.current_drive.take() else {
        return;
    };
    debug_assert!(drive.result.is_some(), "ending a drive without a result");

    if game.status == GameStatus::Overtime {
        match drive.player {
            PlayerSide::A => game.ot_drives_a += 1,
            PlayerSide::B => game.ot_drives_b += 1,
        }
    }

    game.possession = drive.player.opponent();
    debug!(
        drive_id = %drive.id,
        result = ?drive.result,
        "drive ended, possession to {:?}", game.possession
    );

    // A touchdown leaves a conversion pending; the period check waits until
    // the conversion resolves so a quarter never turns over mid-score.
    if game.awaiting_conversion {
        return;
    }
    check_period_end(game);
}

/// Invoked by the conversion module once the attempt resolves, to run the
/// period check that `end_drive` deferred.
pub(crate) fn after_conversion(game: &mut GameState) {
    check_period_end(game);
}

fn check_period_end(game: &mut GameState) {
    match game.status {
        GameStatus::Active => check_regulation_quarter(game),
        GameStatus::Overtime => check_overtime_period(game),
        GameStatus::Completed => {}
    }
}

fn check_regulation_quarter(game: &mut GameState) {
    let quarter = game.current_quarter;
    let done_a = game.terminal_drives_in_quarter(PlayerSide::A, quarter);
    let done_b = game.terminal_drives_in_quarter(PlayerSide::B, quarter);
    if done_a < DRIVES_PER_QUARTER || done_b < DRIVES_PER_QUARTER {
        return;
    }

    game.push_event(
        EventType::QuarterEnd,
        game.possession,
        None,
        Some(EventDetails {
            quarter: Some(quarter),
            ..Default::default()
        }),
        format!("End of quarter {quarter}"),
    );

    if quarter == 4 {
        if game.score_a == game.score_b {
            enter_overtime(game);
        } else {
            complete_game(game);
        }
        return;
    }

    game.current_quarter = quarter + 1;
    if game.current_quarter == 3 {
        // Halftime: whoever did not receive to open the game receives now,
        // overriding the natural per-drive flip.
        game.possession = game.first_possession.opponent();
        debug!("halftime, possession forced to {:?}", game.possession);
    }
}

fn enter_overtime(game: &mut GameState) {
    game.status = GameStatus::Overtime;
    game.current_quarter = 5;
    game.ot_drives_a = 0;
    game.ot_drives_b = 0;
    // Placeholder until the external coin flip supplies the real first-OT
    // possession via `set_overtime_possession`. Sticky once set.
    game.ot_first_possession = Some(game.possession);
    game.push_event(
        EventType::OvertimeStart,
        game.possession,
        None,
        None,
        "Tied after regulation, overtime",
    );
}

fn check_overtime_period(game: &mut GameState) {
    if (game.ot_drives_a as usize) < DRIVES_PER_QUARTER
        || (game.ot_drives_b as usize) < DRIVES_PER_QUARTER
    {
        return;
    }

    if game.score_a != game.score_b {
        complete_game(game);
        return;
    }

    // Still tied: new period, same opening possession as at OT entry. No new
    // coin flip.
    game.current_quarter += 1;
    game.ot_drives_a = 0;
    game.ot_drives_b = 0;
    if let Some(first) = game.ot_first_possession {
        game.possession = first;
    }
    let period = game.current_quarter - 4;
    game.push_event(
        EventType::OvertimePeriodStart,
        game.possession,
        None,
        Some(EventDetails {
            quarter: Some(game.current_quarter),
            ..Default::default()
        }),
        format!("Still tied, overtime period {period}"),
    );
}

fn complete_game(game: &mut GameState) {
    game.status = GameStatus::Completed;
    game.winner = if game.score_a > game.score_b {
        Some(PlayerSide::A)
    } else if game.score_b > game.score_a {
        Some(PlayerSide::B)
    } else {
        None
    };

    let description = match game.winner {
        Some(side) => format!(
            "Final: {} {} - {} {}, {} wins",
            game.player_a,
            game.score_a,
            game.score_b,
            game.player_b,
            game.player_name(side)
        ),
        None => format!(
            "Final: {} {} - {} {}, tie",
            game.player_a, game.score_a, game.score_b, game.player_b
        ),
    };
    game.push_event(
        EventType::GameEnd,
        game.possession,
        None,
        Some(EventDetails {
            winner: game.winner,
            ..Default::default()
        }),
        description,
    );
    debug!(winner = ?game.winner, "game completed");
}

/// External coin-flip entry point for the first overtime possession.
///
/// Legal only between OT entry and the first drive of the first overtime
/// period. Later periods reuse the sticky `ot_first_possession` (their
/// counters are also zero, so the quarter check is what keeps the flip from
/// re-opening there); anywhere else it is a defensive no-op and returns the
/// snapshot unchanged.
pub fn set_overtime_possession(game: &GameState, side: PlayerSide) -> GameState {
    let mut next = game.clone();
    if next.status != GameStatus::Overtime
        || next.current_quarter != 5
        || next.current_drive.is_some()
        || next.ot_drives_a > 0
        || next.ot_drives_b > 0
    {
        return next;
    }
    next.possession = side;
    next.ot_first_possession = Some(side);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriveResult, DriveState};

    fn terminal_drive(player: PlayerSide, quarter: u8, result: DriveResult) -> DriveState {
        let mut drive = DriveState::new(player, quarter, 30);
        drive.result = Some(result);
        drive
    }

    fn game_with_quarter_drives(quarter: u8, a: usize, b: usize) -> GameState {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.current_quarter = quarter;
        for _ in 0..a {
            game.drives
                .push(terminal_drive(PlayerSide::A, quarter, DriveResult::Punt));
        }
        for _ in 0..b {
            game.drives
                .push(terminal_drive(PlayerSide::B, quarter, DriveResult::Punt));
        }
        game
    }

    #[test]
    fn end_drive_without_current_is_noop() {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        let before = game.clone();
        end_drive(&mut game);
        assert_eq!(game, before);
    }

    #[test]
    fn end_drive_flips_possession() {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.begin_drive(terminal_drive(PlayerSide::A, 1, DriveResult::Punt));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.possession, PlayerSide::B);
        assert!(game.current_drive.is_none());
    }

    #[test]
    fn quarter_holds_until_both_players_have_two_drives() {
        let mut game = game_with_quarter_drives(1, 2, 1);
        game.begin_drive(terminal_drive(PlayerSide::B, 1, DriveResult::Bust));
        game.sync_current_drive();
        let quarter_before = game.current_quarter;
        // B now has 1 finished in history; ending this one makes 2 and
        // closes the quarter.
        end_drive(&mut game);
        assert_eq!(quarter_before, 1);
        assert_eq!(game.current_quarter, 2);
    }

    #[test]
    fn quarter_does_not_advance_early() {
        let mut game = game_with_quarter_drives(1, 1, 1);
        game.begin_drive(terminal_drive(PlayerSide::A, 1, DriveResult::Punt));
        game.sync_current_drive();
        end_drive(&mut game);
        // A has 2, B has 1: still quarter 1.
        assert_eq!(game.current_quarter, 1);
    }

    #[test]
    fn halftime_forces_possession_to_non_opener() {
        let mut game = game_with_quarter_drives(2, 2, 1);
        assert_eq!(game.first_possession, PlayerSide::A);
        game.begin_drive(terminal_drive(PlayerSide::B, 2, DriveResult::Punt));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.current_quarter, 3);
        // A opened the game, so B receives after halftime even though the
        // natural flip after B's drive would hand the ball to A.
        assert_eq!(game.possession, PlayerSide::B);
    }

    #[test]
    fn quarter_four_decided_ends_game() {
        let mut game = game_with_quarter_drives(4, 2, 1);
        game.score_a = 14;
        game.score_b = 7;
        game.begin_drive(terminal_drive(PlayerSide::B, 4, DriveResult::Bust));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.winner, Some(PlayerSide::A));
        assert_eq!(
            game.events.last().unwrap().event_type,
            EventType::GameEnd
        );
    }

    #[test]
    fn quarter_four_tied_enters_overtime() {
        let mut game = game_with_quarter_drives(4, 2, 1);
        game.score_a = 10;
        game.score_b = 10;
        game.begin_drive(terminal_drive(PlayerSide::B, 4, DriveResult::Punt));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.status, GameStatus::Overtime);
        assert_eq!(game.current_quarter, 5);
        assert_eq!(game.ot_drives_a, 0);
        assert_eq!(game.ot_drives_b, 0);
        assert!(game.ot_first_possession.is_some());
    }

    #[test]
    fn overtime_period_ends_game_on_score_difference() {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.status = GameStatus::Overtime;
        game.current_quarter = 5;
        game.ot_first_possession = Some(PlayerSide::B);
        game.ot_drives_a = 2;
        game.ot_drives_b = 1;
        game.score_a = 13;
        game.score_b = 10;
        game.begin_drive(terminal_drive(PlayerSide::B, 5, DriveResult::Bust));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.winner, Some(PlayerSide::A));
    }

    #[test]
    fn tied_overtime_period_restarts_with_sticky_possession() {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.status = GameStatus::Overtime;
        game.current_quarter = 5;
        game.ot_first_possession = Some(PlayerSide::B);
        game.ot_drives_a = 2;
        game.ot_drives_b = 1;
        game.score_a = 10;
        game.score_b = 10;
        game.begin_drive(terminal_drive(PlayerSide::B, 5, DriveResult::Punt));
        game.sync_current_drive();
        end_drive(&mut game);
        assert_eq!(game.status, GameStatus::Overtime);
        assert_eq!(game.current_quarter, 6);
        assert_eq!(game.ot_drives_a, 0);
        assert_eq!(game.ot_drives_b, 0);
        // Sticky: period 2 opens with the same possession recorded at entry,
        // not the natural flip.
        assert_eq!(game.possession, PlayerSide::B);
        assert_eq!(game.ot_first_possession, Some(PlayerSide::B));
    }

    #[test]
    fn coin_flip_sets_first_ot_possession_once() {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.status = GameStatus::Overtime;
        game.current_quarter = 5;
        game.ot_first_possession = Some(PlayerSide::A);

        let game = set_overtime_possession(&game, PlayerSide::B);
        assert_eq!(game.possession, PlayerSide::B);
        assert_eq!(game.ot_first_possession, Some(PlayerSide::B));

        // After the first OT drive the flip entry point is inert.
        let mut later = game.clone();
        later.ot_drives_b = 1;
        let unchanged = set_overtime_possession(&later, PlayerSide::A);
        assert_eq!(unchanged.ot_first_possession, Some(PlayerSide::B));
    }

    #[test]
    fn coin_flip_inert_in_later_overtime_periods() {
        // Period 2 opens with both counters reset, exactly like OT entry; the
        // flip must still refuse to re-run there.
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.status = GameStatus::Overtime;
        game.current_quarter = 6;
        game.possession = PlayerSide::B;
        game.ot_first_possession = Some(PlayerSide::B);

        let unchanged = set_overtime_possession(&game, PlayerSide::A);
        assert_eq!(unchanged.ot_first_possession, Some(PlayerSide::B));
        assert_eq!(unchanged.possession, PlayerSide::B);
    }

    #[test]
    fn deferred_period_check_while_conversion_pending() {
        let mut game = game_with_quarter_drives(1, 2, 1);
        game.awaiting_conversion = true;
        let mut drive = terminal_drive(PlayerSide::B, 1, DriveResult::Touchdown);
        drive.points_scored = 6;
        game.begin_drive(drive);
        game.sync_current_drive();
        end_drive(&mut game);
        // Quarter check deferred until the conversion resolves.
        assert_eq!(game.current_quarter, 1);
        game.awaiting_conversion = false;
        after_conversion(&mut game);
        assert_eq!(game.current_quarter, 2);
    }
}
