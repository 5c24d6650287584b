use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::PlayerSide;

/// Terminal outcome of a drive. Exactly one is written per drive and it is
/// never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum DriveResult {
    Touchdown,
    FgMake,
    FgMiss,
    Punt,
    Bust,
    Interception,
}

/// One continuous possession by one player.
///
/// Positions are yard-line coordinates from the offense's perspective:
/// 0 is the own goal line, 100 the opponent's. Created by Progression when a
/// drive starts, mutated by Offense/Kicking while `result` is `None`, frozen
/// once a result is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    pub id: Uuid,
    pub player: PlayerSide,
    pub quarter: u8,
    pub start_position: u8,
    pub current_position: u8,
    /// 0-4 in the normal case; can reach 5 only through the bonus-dart
    /// cushion.
    pub dart_count: u8,
    pub yards_gained: u16,
    pub result: Option<DriveResult>,
    pub points_scored: u8,
    pub awaiting_bonus_dart: bool,
    pub used_bonus_dart: bool,
}

impl DriveState {
    pub fn new(player: PlayerSide, quarter: u8, start_position: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            quarter,
            start_position,
            current_position: start_position,
            dart_count: 0,
            yards_gained: 0,
            result: None,
            points_scored: 0,
            awaiting_bonus_dart: false,
            used_bonus_dart: false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.result.is_none()
    }

    /// Total distance this drive must cover for a touchdown.
    pub fn required_distance(&self) -> u16 {
        100 - self.start_position as u16
    }

    /// Yards still needed from the current spot.
    pub fn remaining(&self) -> u16 {
        100u16.saturating_sub(self.current_position as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drive_is_live_at_start_position() {
        let drive = DriveState::new(PlayerSide::A, 1, 30);
        assert!(drive.is_live());
        assert_eq!(drive.current_position, 30);
        assert_eq!(drive.required_distance(), 70);
        assert_eq!(drive.remaining(), 70);
        assert_eq!(drive.dart_count, 0);
    }

    #[test]
    fn result_serializes_snake_case() {
        let json = serde_json::to_string(&DriveResult::FgMake).unwrap();
        assert_eq!(json, "\"fg_make\"");
        let json = serde_json::to_string(&DriveResult::Interception).unwrap();
        assert_eq!(json, "\"interception\"");
    }
}
