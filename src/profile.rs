//! Profile synthesis
//!
//! Composes the volume, weak point and periodization components with the
//! configured defaults into the `EnhancedUserProfile` handed to program
//! generation. Synthesis is a pure function of the submitted profile and the
//! synthesizer's defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, span, Level};

use crate::config::{EngineConfig, SynthesisDefaults};
use crate::error::Result;
use crate::models::{
    BodyRegion, ExperienceLevel, MuscleGroup, RecoveryProfile, UserProfile, VolumeParameters,
};
use crate::periodization::{PeriodizationModelKind, PeriodizationPhase};
use crate::tiers::{Bound, Breakpoints};
use crate::volume::{VolumeCalculator, VolumeLandmarks};
use crate::weak_points::{WeakPointAnalysisResult, WeakPointAnalyzer};

/// Target RPE bands and session-readiness adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpeProfile {
    pub hypertrophy_range: [f64; 2],
    pub strength_range: [f64; 2],
    pub autoregulation_deltas: AutoregulationDeltas,
}

impl Default for RpeProfile {
    fn default() -> Self {
        Self {
            hypertrophy_range: [7.0, 9.0],
            strength_range: [8.0, 10.0],
            autoregulation_deltas: AutoregulationDeltas::default(),
        }
    }
}

/// RPE offsets applied from the athlete's pre-session check-in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoregulationDeltas {
    pub ready_to_go: f64,
    pub feeling_good: f64,
    pub sore_tired: f64,
}

impl Default for AutoregulationDeltas {
    fn default() -> Self {
        Self {
            ready_to_go: 1.0,
            feeling_good: 0.0,
            sore_tired: -1.0,
        }
    }
}

/// Periodization model attached to a synthesized profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodizationModelProfile {
    #[serde(rename = "type")]
    pub model_type: String,
    pub source_model: PeriodizationModelKind,
    pub phases: Vec<PeriodizationPhase>,
}

impl PeriodizationModelProfile {
    pub fn linear(kind: PeriodizationModelKind) -> Self {
        Self {
            model_type: "linear".to_string(),
            source_model: kind,
            phases: kind.phases().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingHistory {
    /// Months
    pub total_training_time: f64,
    pub injury_history: Vec<BodyRegion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleFactors {
    pub activity_level: ActivityLevel,
    pub sleep_hours: f64,
    /// 1-10
    pub nutrition_quality: f64,
}

impl Default for LifestyleFactors {
    fn default() -> Self {
        Self {
            activity_level: ActivityLevel::Sedentary,
            sleep_hours: 7.0,
            nutrition_quality: 5.0,
        }
    }
}

/// Weak points as seen by program generation.
///
/// `weak_points` and `contraindications` come from the injury notes.
/// `strength_imbalances` is only present when all four 1RMs were submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedWeakPointAnalysis {
    pub weak_points: Vec<BodyRegion>,
    pub contraindications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_imbalances: Option<WeakPointAnalysisResult>,
}

/// Submitted profile plus every derived training parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedUserProfile {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub volume_parameters: VolumeParameters,
    pub volume_landmarks: BTreeMap<MuscleGroup, VolumeLandmarks>,
    pub weak_point_analysis: EnhancedWeakPointAnalysis,
    pub recovery_profile: RecoveryProfile,
    pub rpe_profile: RpeProfile,
    pub periodization_model: PeriodizationModelProfile,
    pub training_history: TrainingHistory,
    pub lifestyle_factors: LifestyleFactors,
}

impl EnhancedUserProfile {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Recovery capacity from combined frequency and duration points
const RECOVERY_CAPACITY: Breakpoints<f64> =
    Breakpoints::new(&[(Bound::Below(2.0), 3.0), (Bound::Below(4.0), 6.0)], 9.0);

/// Stress level from weekly frequency; fewer days reads as a busier life
const STRESS_LEVEL: Breakpoints<f64> =
    Breakpoints::new(&[(Bound::Below(3.0), 8.0), (Bound::Below(5.0), 6.0)], 3.0);

const LOW_RECOVERY_CAPACITY: f64 = 3.0;
const HIGH_STRESS_LEVEL: f64 = 8.0;

/// Builds enhanced profiles from onboarding answers
#[derive(Debug, Clone, Default)]
pub struct ProfileSynthesizer {
    defaults: SynthesisDefaults,
}

impl ProfileSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            defaults: config.synthesis.clone(),
        }
    }

    pub fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }

    /// Derive every training parameter for `profile`
    pub fn synthesize(&self, profile: &UserProfile) -> EnhancedUserProfile {
        let span = span!(Level::INFO, "synthesize", experience = ?profile.experience_level);
        let _enter = span.enter();

        let volume_parameters = Self::infer_volume_parameters(profile);
        let volume_landmarks = VolumeCalculator::all_landmarks(&volume_parameters);

        let injuries = WeakPointAnalyzer::parse_injury_text(profile.injuries_limitations.as_deref());
        let strength_imbalances = profile
            .strength_profile()
            .map(|strength| WeakPointAnalyzer::analyze_strength_ratios(&strength));

        let training_history = TrainingHistory {
            total_training_time: volume_parameters.training_age * 12.0,
            injury_history: injuries.identified_areas.clone(),
        };

        info!(
            weak_points = injuries.identified_areas.len(),
            strength_analysis = strength_imbalances.is_some(),
            model = ?self.defaults.periodization_model,
            "Synthesized enhanced profile"
        );

        EnhancedUserProfile {
            profile: profile.clone(),
            volume_parameters,
            volume_landmarks,
            weak_point_analysis: EnhancedWeakPointAnalysis {
                weak_points: injuries.identified_areas,
                contraindications: injuries.contraindications,
                strength_imbalances,
            },
            recovery_profile: self.defaults.recovery_profile.clone(),
            rpe_profile: self.defaults.rpe_profile.clone(),
            periodization_model: PeriodizationModelProfile::linear(self.defaults.periodization_model),
            training_history,
            lifestyle_factors: self.defaults.lifestyle_factors.clone(),
        }
    }

    /// Volume multipliers inferred from experience, frequency and session length
    pub fn infer_volume_parameters(profile: &UserProfile) -> VolumeParameters {
        let params = VolumeParameters {
            training_age: Self::training_age(profile.experience_level),
            recovery_capacity: Self::recovery_capacity(profile),
            stress_level: Self::stress_level(profile.training_frequency),
            volume_tolerance: 1.0,
        };
        debug!(?params, "Inferred volume parameters");
        params
    }

    /// Years of training implied by the experience level
    fn training_age(level: Option<ExperienceLevel>) -> f64 {
        match level.unwrap_or(ExperienceLevel::Beginner) {
            ExperienceLevel::Beginner => 0.25,
            ExperienceLevel::Intermediate => 1.25,
            ExperienceLevel::Advanced => 3.0,
        }
    }

    fn recovery_capacity(profile: &UserProfile) -> f64 {
        let (Some(frequency), Some(duration)) = (profile.training_frequency, profile.session_duration)
        else {
            return LOW_RECOVERY_CAPACITY;
        };

        let frequency_points = match frequency {
            4.. => 2,
            3 => 1,
            _ => 0,
        };
        let duration_points = match duration.min_minutes() {
            60.. => 2,
            45..=59 => 1,
            _ => 0,
        };

        RECOVERY_CAPACITY.lookup(f64::from(frequency_points + duration_points))
    }

    fn stress_level(frequency: Option<u8>) -> f64 {
        frequency
            .map(|days| STRESS_LEVEL.lookup(f64::from(days)))
            .unwrap_or(HIGH_STRESS_LEVEL)
    }
}
