//! Post-touchdown conversion: the PAT / two-point choice and the single
//! attempt dart. A conversion never starts a drive; once resolved,
//! Progression runs the period check the touchdown deferred.

use super::board;
use super::progression;
use crate::error::{EngineError, Result};
use crate::models::{ConversionKind, DartHit, EventDetails, EventType, GameState};

/// PAT target: any single ring on segments 1 through 5 (current rules
/// version).
const PAT_MAX_SEGMENT: u8 = 5;

/// Two-point target segment, any non-miss ring.
const TWO_POINT_SEGMENT: u8 = 2;

/// Record the conversion choice. Resolves nothing by itself.
pub fn choose_conversion(game: &GameState, kind: ConversionKind) -> Result<GameState> {
    if !game.awaiting_conversion {
        return Err(EngineError::NoConversionPending);
    }
    let mut next = game.clone();
    let owner = next.conversion_owner.unwrap_or(next.possession);
    next.conversion_kind = Some(kind);
    next.push_event(
        EventType::ConversionChoice,
        owner,
        None,
        Some(EventDetails {
            conversion: Some(kind),
            ..Default::default()
        }),
        match kind {
            ConversionKind::Pat => "Going for the extra point",
            ConversionKind::TwoPoint => "Going for two",
        },
    );
    Ok(next)
}

/// Resolve the conversion dart against the chosen type.
pub fn resolve_conversion_dart(game: &GameState, hit: DartHit) -> Result<GameState> {
    if !game.awaiting_conversion {
        return Err(EngineError::NoConversionPending);
    }
    let Some(kind) = game.conversion_kind else {
        return Err(EngineError::NoConversionTypeSelected);
    };

    let dart = board::resolve_dart(hit)?;
    let mut next = game.clone();
    let owner = next.conversion_owner.unwrap_or(next.possession);

    let (good, points) = match kind {
        ConversionKind::Pat => {
            let good = dart.multiplier.is_single()
                && dart.segment >= 1
                && dart.segment <= PAT_MAX_SEGMENT;
            (good, 1u8)
        }
        ConversionKind::TwoPoint => {
            let good = dart.segment == TWO_POINT_SEGMENT && !dart.multiplier.is_miss();
            (good, 2u8)
        }
    };
    let scored = if good { points } else { 0 };
    if good {
        next.add_points(owner, points as u16);
    }

    next.push_event(
        EventType::ConversionAttempt,
        owner,
        None,
        Some(EventDetails {
            dart: Some(dart),
            conversion: Some(kind),
            good: Some(good),
            points: Some(scored),
            ..Default::default()
        }),
        match (kind, good) {
            (ConversionKind::Pat, true) => format!("{} extra point is good", dart.code()),
            (ConversionKind::Pat, false) => format!("{} extra point is no good", dart.code()),
            (ConversionKind::TwoPoint, true) => {
                format!("{} two-point conversion is good", dart.code())
            }
            (ConversionKind::TwoPoint, false) => {
                format!("{} two-point conversion fails", dart.code())
            }
        },
    );

    next.awaiting_conversion = false;
    next.conversion_kind = None;
    next.conversion_owner = None;
    progression::after_conversion(&mut next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Multiplier, PlayerSide};

    fn game_awaiting_conversion() -> GameState {
        let mut game = GameState::new("alice", "bob", PlayerSide::A);
        game.score_a = 6;
        game.awaiting_conversion = true;
        game.conversion_owner = Some(PlayerSide::A);
        game.possession = PlayerSide::B;
        game
    }

    #[test]
    fn choice_requires_pending_conversion() {
        let game = GameState::new("alice", "bob", PlayerSide::A);
        let err = choose_conversion(&game, ConversionKind::Pat);
        assert!(matches!(err, Err(EngineError::NoConversionPending)));
    }

    #[test]
    fn choice_records_kind_without_resolving() {
        let game = game_awaiting_conversion();
        let next = choose_conversion(&game, ConversionKind::TwoPoint).unwrap();
        assert_eq!(next.conversion_kind, Some(ConversionKind::TwoPoint));
        assert!(next.awaiting_conversion);
        assert_eq!(next.score_a, 6);
        assert_eq!(
            next.events.last().unwrap().event_type,
            EventType::ConversionChoice
        );
    }

    #[test]
    fn attempt_requires_selected_type() {
        let game = game_awaiting_conversion();
        let err = resolve_conversion_dart(&game, DartHit::new(1, Multiplier::SingleInner));
        assert!(matches!(err, Err(EngineError::NoConversionTypeSelected)));
    }

    #[test]
    fn pat_scores_on_singles_one_through_five() {
        let base = game_awaiting_conversion();
        let chosen = choose_conversion(&base, ConversionKind::Pat).unwrap();
        for segment in 1u8..=5 {
            let next =
                resolve_conversion_dart(&chosen, DartHit::new(segment, Multiplier::SingleOuter))
                    .unwrap();
            assert_eq!(next.score_a, 7, "S{segment} should convert");
            assert!(!next.awaiting_conversion);
            assert!(next.conversion_kind.is_none());
        }
    }

    #[test]
    fn pat_fails_on_doubles_and_high_segments() {
        let base = game_awaiting_conversion();
        let chosen = choose_conversion(&base, ConversionKind::Pat).unwrap();
        let next =
            resolve_conversion_dart(&chosen, DartHit::new(3, Multiplier::Double)).unwrap();
        assert_eq!(next.score_a, 6);
        let next =
            resolve_conversion_dart(&chosen, DartHit::new(6, Multiplier::SingleInner)).unwrap();
        assert_eq!(next.score_a, 6);
        // Either way the pending state clears.
        assert!(!next.awaiting_conversion);
    }

    #[test]
    fn two_point_needs_segment_two_any_ring() {
        let base = game_awaiting_conversion();
        let chosen = choose_conversion(&base, ConversionKind::TwoPoint).unwrap();
        for multiplier in [
            Multiplier::SingleInner,
            Multiplier::SingleOuter,
            Multiplier::Double,
            Multiplier::Triple,
        ] {
            let next =
                resolve_conversion_dart(&chosen, DartHit::new(2, multiplier)).unwrap();
            assert_eq!(next.score_a, 8, "{multiplier:?} on 2 should convert");
        }
        let next =
            resolve_conversion_dart(&chosen, DartHit::new(0, Multiplier::Miss)).unwrap();
        assert_eq!(next.score_a, 6);
    }

    #[test]
    fn attempt_event_carries_owner_not_possession() {
        let base = game_awaiting_conversion();
        let chosen = choose_conversion(&base, ConversionKind::Pat).unwrap();
        let next =
            resolve_conversion_dart(&chosen, DartHit::new(1, Multiplier::SingleInner)).unwrap();
        let attempt = next.events.last().unwrap();
        assert_eq!(attempt.event_type, EventType::ConversionAttempt);
        assert_eq!(attempt.player, PlayerSide::A);
        assert_eq!(next.possession, PlayerSide::B);
    }
}
