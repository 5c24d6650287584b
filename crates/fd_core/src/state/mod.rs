//! Host-side game state holder.
//!
//! The engine itself is pure; this module is the single-writer serialization
//! point a host can use when it does not keep snapshots itself. One mutation
//! at a time goes through `apply`, which either installs the new snapshot or
//! leaves the old one in place on error.

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

use crate::error::{EngineError, Result};
use crate::models::GameState;

/// Global current-game slot.
pub static GAME_STATE: Lazy<Arc<RwLock<Option<GameState>>>> =
    Lazy::new(|| Arc::new(RwLock::new(None)));

/// Snapshot of the current game, if one is loaded.
pub fn get_state() -> Option<GameState> {
    GAME_STATE.read().expect("state lock poisoned").clone()
}

/// Install a game as current.
pub fn set_state(game: GameState) {
    *GAME_STATE.write().expect("state lock poisoned") = Some(game);
}

/// Drop the current game.
pub fn reset_state() {
    *GAME_STATE.write().expect("state lock poisoned") = None;
}

/// Run one engine operation against the current game and install the result.
/// Holding the write lock across the pure transition gives the single-writer
/// guarantee the engine assumes.
pub fn apply<F>(op: F) -> Result<GameState>
where
    F: FnOnce(&GameState) -> Result<GameState>,
{
    let mut slot = GAME_STATE.write().expect("state lock poisoned");
    let Some(game) = slot.as_ref() else {
        return Err(EngineError::NoGameLoaded);
    };
    let next = op(game)?;
    *slot = Some(next.clone());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::models::PlayerSide;

    // Tests share the global slot; keep them in one test to avoid ordering
    // flakes.
    #[test]
    fn state_lifecycle() {
        reset_state();
        assert!(get_state().is_none());

        let game = engine::new_game("alice", "bob", PlayerSide::A);
        set_state(game.clone());
        assert_eq!(get_state().unwrap().id, game.id);

        let advanced = apply(|g| Ok(engine::advance(g))).unwrap();
        assert!(advanced.current_drive.is_some());
        assert_eq!(get_state().unwrap(), advanced);

        // A failing op leaves the stored snapshot unchanged.
        let before = get_state().unwrap();
        let err = apply(|g| {
            engine::apply_dart_hit(
                g,
                crate::models::DartHit::new(99, crate::models::Multiplier::SingleInner),
            )
        });
        assert!(err.is_err());
        assert_eq!(get_state().unwrap(), before);

        reset_state();
        assert!(get_state().is_none());
    }
}
