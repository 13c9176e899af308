//! Volume landmark calculation
//!
//! Weekly set landmarks per muscle group, scaled from a fixed base table by the
//! athlete's individual multipliers:
//!
//! - **MEV** (Minimum Effective Volume): fewest weekly sets that still drive progress
//! - **MAV** (Maximum Adaptive Volume): range where most progress happens
//! - **MRV** (Maximum Recoverable Volume): most sets the athlete can recover from
//!
//! The same multiplier product is applied to all three values, so ordering is
//! preserved whenever the product is positive. Degenerate inputs (negative,
//! zero, NaN) are not sanitized and propagate into the output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{MuscleGroup, VolumeParameters};
use crate::tiers::{Bound, Breakpoints};

/// Weekly set landmarks for one muscle group.
///
/// Values are whole numbers except when degenerate inputs produce NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct VolumeLandmarks {
    pub mev: f64,
    pub mav: f64,
    pub mrv: f64,
}

/// Base landmarks for an average trainee
const BASE_LANDMARKS: [(MuscleGroup, VolumeLandmarks); 9] = [
    (MuscleGroup::Chest, VolumeLandmarks { mev: 8.0, mav: 16.0, mrv: 22.0 }),
    (MuscleGroup::Back, VolumeLandmarks { mev: 10.0, mav: 18.0, mrv: 25.0 }),
    (MuscleGroup::Shoulders, VolumeLandmarks { mev: 8.0, mav: 16.0, mrv: 22.0 }),
    (MuscleGroup::Arms, VolumeLandmarks { mev: 6.0, mav: 14.0, mrv: 20.0 }),
    (MuscleGroup::Quads, VolumeLandmarks { mev: 8.0, mav: 15.0, mrv: 20.0 }),
    (MuscleGroup::Hamstrings, VolumeLandmarks { mev: 6.0, mav: 12.0, mrv: 18.0 }),
    (MuscleGroup::Glutes, VolumeLandmarks { mev: 4.0, mav: 12.0, mrv: 16.0 }),
    (MuscleGroup::Calves, VolumeLandmarks { mev: 8.0, mav: 14.0, mrv: 20.0 }),
    (MuscleGroup::Abs, VolumeLandmarks { mev: 6.0, mav: 16.0, mrv: 25.0 }),
];

/// Training age beyond which the multiplier stops growing (years)
const TRAINING_AGE_CEILING: f64 = 2.0;

const RECOVERY_MULTIPLIERS: Breakpoints<f64> = Breakpoints::new(
    &[(Bound::AtMost(3.0), 0.7), (Bound::AtMost(7.0), 1.0)],
    1.3,
);

const STRESS_MULTIPLIERS: Breakpoints<f64> = Breakpoints::new(
    &[
        (Bound::AtMost(2.0), 1.1),
        (Bound::AtMost(4.0), 1.0),
        (Bound::AtMost(6.0), 0.9),
        (Bound::AtMost(8.0), 0.7),
    ],
    0.6,
);

/// Volume landmark calculator
pub struct VolumeCalculator;

impl VolumeCalculator {
    /// Base landmarks for a muscle group before individualization
    pub fn base_landmarks(group: MuscleGroup) -> VolumeLandmarks {
        // table rows follow MuscleGroup declaration order
        BASE_LANDMARKS[group as usize].1
    }

    /// Landmarks for a muscle group looked up by name (case-insensitive).
    ///
    /// Unknown names yield `None`.
    pub fn landmarks_for(params: &VolumeParameters, muscle_group: &str) -> Option<VolumeLandmarks> {
        let group = muscle_group.parse::<MuscleGroup>().ok()?;
        Some(Self::landmarks_for_group(params, group))
    }

    pub fn landmarks_for_group(params: &VolumeParameters, group: MuscleGroup) -> VolumeLandmarks {
        let base = Self::base_landmarks(group);
        let factor = Self::combined_multiplier(params);

        let landmarks = VolumeLandmarks {
            mev: (base.mev * factor).round(),
            mav: (base.mav * factor).round(),
            mrv: (base.mrv * factor).round(),
        };
        debug!(
            muscle_group = %group,
            factor,
            mev = landmarks.mev,
            mav = landmarks.mav,
            mrv = landmarks.mrv,
            "Computed volume landmarks"
        );
        landmarks
    }

    /// Landmarks for all nine muscle groups
    pub fn all_landmarks(params: &VolumeParameters) -> BTreeMap<MuscleGroup, VolumeLandmarks> {
        MuscleGroup::ALL
            .into_iter()
            .map(|group| (group, Self::landmarks_for_group(params, group)))
            .collect()
    }

    /// Product of every individual multiplier
    pub fn combined_multiplier(params: &VolumeParameters) -> f64 {
        Self::training_age_multiplier(params.training_age)
            * Self::recovery_multiplier(params.recovery_capacity)
            * Self::stress_multiplier(params.stress_level)
            * params.volume_tolerance
    }

    /// 0.8 for a complete novice rising to 1.0 at the two-year ceiling
    pub fn training_age_multiplier(training_age: f64) -> f64 {
        // explicit comparison so NaN is not swallowed the way f64::min would
        let capped = if training_age > TRAINING_AGE_CEILING {
            TRAINING_AGE_CEILING
        } else {
            training_age
        };
        0.8 + 0.1 * capped
    }

    pub fn recovery_multiplier(recovery_capacity: f64) -> f64 {
        RECOVERY_MULTIPLIERS.lookup(recovery_capacity)
    }

    pub fn stress_multiplier(stress_level: f64) -> f64 {
        STRESS_MULTIPLIERS.lookup(stress_level)
    }
}
