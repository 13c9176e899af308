//! Periodization planning
//!
//! A fixed catalog of phase sequences, week-by-week progressions within a
//! phase, deload sizing at the end of a block and a simple projection of
//! strength gained over a phase.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::models::{RecoveryProfile, RecoveryTier};

/// How set volume moves across the weeks of a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeProgression {
    /// Starts at base and tapers toward the end
    Linear,
    /// Starts below base and climbs above it
    Ramping,
    /// Base every week
    Stable,
}

/// Physiological target of a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adaptation {
    Hypertrophy,
    Strength,
    Peaking,
    Recovery,
}

impl Adaptation {
    /// Expected 1RM gain over one phase
    pub fn projected_gain(&self) -> f64 {
        match self {
            Adaptation::Hypertrophy => 0.01,
            Adaptation::Strength => 0.025,
            Adaptation::Peaking => 0.03,
            Adaptation::Recovery => 0.0,
        }
    }
}

impl fmt::Display for Adaptation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adaptation::Hypertrophy => write!(f, "Hypertrophy"),
            Adaptation::Strength => write!(f, "Strength"),
            Adaptation::Peaking => write!(f, "Peaking"),
            Adaptation::Recovery => write!(f, "Recovery"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodizationPhase {
    pub name: Cow<'static, str>,
    pub duration_weeks: u32,
    /// Start and end intensity in %1RM, ascending
    pub intensity_range: [f64; 2],
    pub volume_progression: VolumeProgression,
    pub primary_adaptation: Adaptation,
}

const fn phase(
    name: &'static str,
    duration_weeks: u32,
    intensity_range: [f64; 2],
    volume_progression: VolumeProgression,
    primary_adaptation: Adaptation,
) -> PeriodizationPhase {
    PeriodizationPhase {
        name: Cow::Borrowed(name),
        duration_weeks,
        intensity_range,
        volume_progression,
        primary_adaptation,
    }
}

const HYPERTROPHY_FOCUSED: &[PeriodizationPhase] = &[
    phase("Accumulation", 4, [65.0, 75.0], VolumeProgression::Ramping, Adaptation::Hypertrophy),
    phase("Intensification", 3, [75.0, 85.0], VolumeProgression::Linear, Adaptation::Strength),
    phase("Deload", 1, [50.0, 60.0], VolumeProgression::Stable, Adaptation::Recovery),
];

const STRENGTH_FOCUSED: &[PeriodizationPhase] = &[
    phase("Hypertrophy Base", 3, [67.0, 75.0], VolumeProgression::Ramping, Adaptation::Hypertrophy),
    phase("Strength", 4, [80.0, 88.0], VolumeProgression::Linear, Adaptation::Strength),
    phase("Peaking", 2, [88.0, 95.0], VolumeProgression::Linear, Adaptation::Peaking),
    phase("Recovery", 1, [50.0, 60.0], VolumeProgression::Stable, Adaptation::Recovery),
];

const GENERAL_FITNESS: &[PeriodizationPhase] = &[
    phase("Foundation", 4, [60.0, 70.0], VolumeProgression::Stable, Adaptation::Hypertrophy),
    phase("Development", 4, [70.0, 80.0], VolumeProgression::Ramping, Adaptation::Strength),
    phase("Recovery", 1, [50.0, 60.0], VolumeProgression::Stable, Adaptation::Recovery),
];

/// Catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodizationModelKind {
    HypertrophyFocused,
    StrengthFocused,
    GeneralFitness,
}

impl PeriodizationModelKind {
    pub const ALL: [PeriodizationModelKind; 3] = [
        PeriodizationModelKind::HypertrophyFocused,
        PeriodizationModelKind::StrengthFocused,
        PeriodizationModelKind::GeneralFitness,
    ];

    pub fn phases(&self) -> &'static [PeriodizationPhase] {
        match self {
            PeriodizationModelKind::HypertrophyFocused => HYPERTROPHY_FOCUSED,
            PeriodizationModelKind::StrengthFocused => STRENGTH_FOCUSED,
            PeriodizationModelKind::GeneralFitness => GENERAL_FITNESS,
        }
    }

    pub fn total_weeks(&self) -> u32 {
        self.phases().iter().map(|p| p.duration_weeks).sum()
    }
}

impl FromStr for PeriodizationModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "hypertrophy-focused" | "hypertrophy" => Ok(Self::HypertrophyFocused),
            "strength-focused" | "strength" => Ok(Self::StrengthFocused),
            "general-fitness" | "general" => Ok(Self::GeneralFitness),
            _ => Err(format!("Unknown periodization model: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgression {
    pub week_in_phase: u32,
    pub target_volume_sets: u32,
    /// %1RM, one decimal
    pub target_intensity_percent: f64,
    pub focus: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeloadProtocolType {
    /// Reduced training continues
    Active,
    /// No training
    Passive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedDeloadProtocol {
    #[serde(rename = "type")]
    pub protocol_type: DeloadProtocolType,
    pub duration_days: u32,
    pub volume_reduction_percent: f64,
    pub intensity_reduction_percent: f64,
    pub specialization_focus: String,
}

/// Fatigue/threshold ratio beyond which only complete rest is prescribed
const PASSIVE_DELOAD_RATIO: f64 = 1.5;

/// Multiplier on deload reductions following a peaking phase
const PEAKING_DELOAD_AMPLIFIER: f64 = 1.25;

const DELOAD_DURATION_DAYS: u32 = 7;

/// Periodization planner
pub struct PeriodizationPlanner;

impl PeriodizationPlanner {
    /// The full model catalog
    pub fn models() -> BTreeMap<PeriodizationModelKind, &'static [PeriodizationPhase]> {
        PeriodizationModelKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.phases()))
            .collect()
    }

    /// Week-by-week volume and intensity targets for a phase
    pub fn generate_phase_progression(
        phase: &PeriodizationPhase,
        base_volume_sets: u32,
    ) -> Vec<WeeklyProgression> {
        let weeks = phase.duration_weeks;
        let [start, end] = phase.intensity_range;
        let base = f64::from(base_volume_sets);

        (1..=weeks)
            .map(|week| {
                // 0.0 on the first week, 1.0 on the last
                let progress = if weeks > 1 {
                    f64::from(week - 1) / f64::from(weeks - 1)
                } else {
                    0.0
                };

                let intensity = interpolate_intensity(start, end, progress);
                let volume_factor = match phase.volume_progression {
                    VolumeProgression::Stable => 1.0,
                    VolumeProgression::Ramping => 0.8 + 0.4 * progress,
                    VolumeProgression::Linear => 1.0 - 0.3 * progress,
                };
                let sets = (base * volume_factor).round() as u32;

                WeeklyProgression {
                    week_in_phase: week,
                    target_volume_sets: sets,
                    target_intensity_percent: intensity,
                    focus: format!(
                        "{} focus at {:.1}% 1RM",
                        phase.primary_adaptation, intensity
                    ),
                }
            })
            .collect()
    }

    /// Size the deload that closes a training block
    pub fn calculate_optimal_deload(
        cumulative_fatigue: f64,
        recovery: &RecoveryProfile,
        last_phase: &PeriodizationPhase,
    ) -> DetailedDeloadProtocol {
        let fatigue_ratio = cumulative_fatigue / recovery.fatigue_threshold;
        let tier = recovery.tier();

        if fatigue_ratio > PASSIVE_DELOAD_RATIO || tier == RecoveryTier::Poor {
            debug!(fatigue_ratio, %tier, "Passive deload selected");
            return DetailedDeloadProtocol {
                protocol_type: DeloadProtocolType::Passive,
                duration_days: DELOAD_DURATION_DAYS,
                volume_reduction_percent: 100.0,
                intensity_reduction_percent: 100.0,
                specialization_focus: "Complete rest".to_string(),
            };
        }

        let (mut volume, mut intensity) = match tier {
            RecoveryTier::Excellent => (30.0, 10.0),
            _ => (40.0, 15.0),
        };
        if fatigue_ratio > 1.0 {
            volume += 10.0;
        }

        let after_peaking = last_phase.primary_adaptation == Adaptation::Peaking;
        if after_peaking {
            volume = f64::min(volume * PEAKING_DELOAD_AMPLIFIER, 100.0);
            intensity = f64::min(intensity * PEAKING_DELOAD_AMPLIFIER, 100.0);
        }

        let specialization_focus = if after_peaking {
            "Active recovery after peaking: light technique work and mobility"
        } else {
            "Technique refinement and mobility at reduced loads"
        };

        debug!(fatigue_ratio, %tier, volume, intensity, "Active deload selected");
        DetailedDeloadProtocol {
            protocol_type: DeloadProtocolType::Active,
            duration_days: DELOAD_DURATION_DAYS,
            volume_reduction_percent: volume,
            intensity_reduction_percent: intensity,
            specialization_focus: specialization_focus.to_string(),
        }
    }

    /// Projected 1RM at the end of a phase
    pub fn project_adaptation(current_1rm: f64, phase: &PeriodizationPhase) -> f64 {
        round_to_one_decimal(current_1rm * (1.0 + phase.primary_adaptation.projected_gain()))
    }
}

/// The first week holds the range start as given, later weeks round to 0.1
fn interpolate_intensity(start: f64, end: f64, progress: f64) -> f64 {
    if progress == 0.0 {
        return start;
    }
    let rounded = round_to_one_decimal(start + (end - start) * progress);
    // rounding must not step back past the first week
    if end >= start {
        rounded.max(start)
    } else {
        rounded.min(start)
    }
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
