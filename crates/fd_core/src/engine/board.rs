//! Dart resolution and board geometry.
//!
//! Two layers live here:
//! - `resolve_dart`: the pure rule mapping a validated hit to its
//!   yardage/scoring primitive.
//! - `Dartboard`: geometry that classifies a calibrated (x, y) point in
//!   warped board space into a `DartHit` (ring by radius, sector by angle).
//!   This is what a camera boundary feeds the engine with; manual entry
//!   hosts can skip it and submit `DartHit` directly.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{DartHit, DartResult, Multiplier};

/// Standard dartboard sector order, 20 at the top, clockwise.
pub const SECTOR_NUMBERS: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

pub const BULL_SEGMENT: u8 = 25;

/// Map a raw hit to its yardage primitive.
///
/// Total over the valid input domain; the only failure is a malformed
/// payload from the boundary (segment outside [0,20] and not 25, or a
/// bull/segment mismatch). Some camera boundaries report an off-board dart
/// as segment 0 with a single ring; that shape is folded into a miss.
pub fn resolve_dart(hit: DartHit) -> Result<DartResult> {
    validate_hit(hit)?;

    let multiplier = if hit.segment == 0 && !hit.multiplier.is_bull() {
        Multiplier::Miss
    } else {
        hit.multiplier
    };

    let (yards, inner_bull, outer_bull) = match multiplier {
        Multiplier::Miss => (0, false, false),
        // Automatic touchdown sentinel; yards value is not used downstream.
        Multiplier::InnerBull => (0, true, false),
        Multiplier::OuterBull => (25, false, true),
        _ => (hit.segment as u16 * multiplier.factor(), false, false),
    };

    Ok(DartResult {
        segment: hit.segment,
        multiplier,
        yards,
        inner_bull,
        outer_bull,
    })
}

fn validate_hit(hit: DartHit) -> Result<()> {
    let bad = match hit.multiplier {
        Multiplier::InnerBull | Multiplier::OuterBull => hit.segment != BULL_SEGMENT,
        Multiplier::Miss => false,
        _ => hit.segment > 20,
    };
    if bad {
        return Err(EngineError::InvalidDartPayload {
            segment: hit.segment,
            multiplier: hit.multiplier.to_string(),
        });
    }
    Ok(())
}

/// Ring radii as percentages of the outer double edge, plus the board's
/// rotational offset. Defaults follow the regulation board (radii in mm over
/// a 170mm outer double edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingCalibration {
    pub angle_offset_degrees: f64,
    pub inner_bull_pct: f64,
    pub outer_bull_pct: f64,
    pub triple_inner_pct: f64,
    pub triple_outer_pct: f64,
    pub double_inner_pct: f64,
    pub double_outer_pct: f64,
}

impl Default for RingCalibration {
    fn default() -> Self {
        Self {
            angle_offset_degrees: 0.0,
            inner_bull_pct: 3.7,
            outer_bull_pct: 9.4,
            triple_inner_pct: 57.1,
            triple_outer_pct: 62.9,
            double_inner_pct: 94.1,
            double_outer_pct: 100.0,
        }
    }
}

/// Calibrated board in warped image space.
#[derive(Debug, Clone)]
pub struct Dartboard {
    cx: f64,
    cy: f64,
    radius: f64,
    angle_offset_radians: f64,
    inner_bull: f64,
    outer_bull: f64,
    triple_inner: f64,
    triple_outer: f64,
    double_inner: f64,
    double_outer: f64,
}

impl Dartboard {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self::with_calibration(center_x, center_y, radius, RingCalibration::default())
    }

    pub fn with_calibration(
        center_x: f64,
        center_y: f64,
        radius: f64,
        cal: RingCalibration,
    ) -> Self {
        let pct = |p: f64| (p / 100.0) * radius;
        Self {
            cx: center_x,
            cy: center_y,
            radius,
            angle_offset_radians: cal.angle_offset_degrees.to_radians(),
            inner_bull: pct(cal.inner_bull_pct),
            outer_bull: pct(cal.outer_bull_pct),
            triple_inner: pct(cal.triple_inner_pct),
            triple_outer: pct(cal.triple_outer_pct),
            double_inner: pct(cal.double_inner_pct),
            double_outer: pct(cal.double_outer_pct),
        }
    }

    fn distance_from_center(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.cx;
        let dy = y - self.cy;
        (dx * dx + dy * dy).sqrt()
    }

    /// Ring classification by radius. Bulls win first, then the out-of-board
    /// check, then the triple/double bands, then the two single fills.
    fn ring_for_point(&self, x: f64, y: f64) -> Ring {
        let d = self.distance_from_center(x, y);

        if d <= self.inner_bull {
            return Ring::InnerBull;
        }
        if d <= self.outer_bull {
            return Ring::OuterBull;
        }
        if d > self.radius {
            return Ring::Miss;
        }
        if d >= self.triple_inner && d <= self.triple_outer {
            return Ring::Triple;
        }
        if d >= self.double_inner && d <= self.double_outer {
            return Ring::Double;
        }
        if d < self.triple_inner {
            return Ring::SingleInner;
        }
        if d < self.double_inner {
            return Ring::SingleOuter;
        }
        Ring::Miss
    }

    /// Sector index by angle, 0 radians straight up, increasing clockwise.
    fn sector_index_for_point(&self, x: f64, y: f64) -> usize {
        let dx = x - self.cx;
        let dy = y - self.cy;
        let mut theta = dx.atan2(-dy) + self.angle_offset_radians;

        let tau = std::f64::consts::TAU;
        if theta < 0.0 {
            theta += tau;
        } else if theta >= tau {
            theta -= tau;
        }

        let sector_width = tau / 20.0;
        ((theta / sector_width) as usize).min(19)
    }

    pub fn segment_for_point(&self, x: f64, y: f64) -> u8 {
        SECTOR_NUMBERS[self.sector_index_for_point(x, y)]
    }

    /// Classify a point into the hit the engine consumes.
    pub fn hit_for_point(&self, x: f64, y: f64) -> DartHit {
        match self.ring_for_point(x, y) {
            Ring::InnerBull => DartHit::new(BULL_SEGMENT, Multiplier::InnerBull),
            Ring::OuterBull => DartHit::new(BULL_SEGMENT, Multiplier::OuterBull),
            Ring::Miss => DartHit::new(0, Multiplier::Miss),
            Ring::Triple => DartHit::new(self.segment_for_point(x, y), Multiplier::Triple),
            Ring::Double => DartHit::new(self.segment_for_point(x, y), Multiplier::Double),
            Ring::SingleInner => {
                DartHit::new(self.segment_for_point(x, y), Multiplier::SingleInner)
            }
            Ring::SingleOuter => {
                DartHit::new(self.segment_for_point(x, y), Multiplier::SingleOuter)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ring {
    InnerBull,
    OuterBull,
    SingleInner,
    SingleOuter,
    Double,
    Triple,
    Miss,
}
