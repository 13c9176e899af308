use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// Self-reported training experience bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// Session length bucket chosen during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionDuration {
    #[serde(rename = "30-45")]
    Minutes30To45,
    #[serde(rename = "45-60")]
    Minutes45To60,
    #[serde(rename = "60-75")]
    Minutes60To75,
    #[serde(rename = "75-90")]
    Minutes75To90,
    #[serde(rename = "90+")]
    Minutes90Plus,
}

impl SessionDuration {
    /// Lower bound of the bucket in minutes
    pub fn min_minutes(&self) -> u32 {
        match self {
            Self::Minutes30To45 => 30,
            Self::Minutes45To60 => 45,
            Self::Minutes60To75 => 60,
            Self::Minutes75To90 => 75,
            Self::Minutes90Plus => 90,
        }
    }
}

impl FromStr for SessionDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "30-45" => Ok(Self::Minutes30To45),
            "45-60" => Ok(Self::Minutes45To60),
            "60-75" => Ok(Self::Minutes60To75),
            "75-90" => Ok(Self::Minutes75To90),
            "90+" => Ok(Self::Minutes90Plus),
            _ => Err(format!("Unknown session duration: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(Self::Kg),
            "lb" | "lbs" | "pounds" => Ok(Self::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

/// Onboarding profile as handed over by the web application.
///
/// Structural validation happened upstream. Every field is optional on the
/// wire and unknown enum strings decode as missing, so the synthesizer can
/// fall back to its documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub experience_level: Option<ExperienceLevel>,

    /// Training days per week (1-7)
    #[serde(default)]
    pub training_frequency: Option<u8>,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub session_duration: Option<SessionDuration>,

    #[serde(default, deserialize_with = "lenient::or_empty")]
    pub equipment: Vec<String>,

    #[serde(default)]
    pub exercise_preferences: Option<String>,

    /// Free-text injuries and limitations
    #[serde(default)]
    pub injuries_limitations: Option<String>,

    #[serde(default, rename = "squat1RM")]
    pub squat_1rm: Option<f64>,

    #[serde(default, rename = "bench1RM")]
    pub bench_1rm: Option<f64>,

    #[serde(default, rename = "deadlift1RM")]
    pub deadlift_1rm: Option<f64>,

    #[serde(default, rename = "overheadPress1RM")]
    pub overhead_press_1rm: Option<f64>,

    /// Unknown or null units read as kilograms
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub weight_unit: WeightUnit,
}

impl UserProfile {
    /// Decode a profile from the onboarding JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Strength profile when all four 1RM estimates are present
    pub fn strength_profile(&self) -> Option<StrengthProfile> {
        Some(StrengthProfile {
            squat: self.squat_1rm?,
            bench: self.bench_1rm?,
            deadlift: self.deadlift_1rm?,
            overhead_press: self.overhead_press_1rm?,
        })
    }

    /// SHA256 over the canonical JSON encoding, usable as a memoization key
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Decoders that read null or unknown wire values as missing
mod lenient {
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| value.parse().ok()))
    }

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Default,
    {
        deserialize(deserializer).map(Option::unwrap_or_default)
    }

    pub fn or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Individual multipliers driving volume landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeParameters {
    /// Years of consistent training
    pub training_age: f64,
    /// 1-10
    pub recovery_capacity: f64,
    /// 1-10
    pub stress_level: f64,
    /// Direct multiplier, 1.0 is baseline
    pub volume_tolerance: f64,
}

/// The nine muscle groups tracked for weekly volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 9] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Quads,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::Abs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Abs => "abs",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    /// Case-insensitive lookup by name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MuscleGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| format!("Unknown muscle group: {}", s))
    }
}

/// Estimated one-rep maxes for the four main lifts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthProfile {
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub overhead_press: f64,
}

/// Body regions recognised in injury notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Knees,
    LowerBack,
    Shoulders,
    Elbows,
    Wrists,
    Hips,
    Ankles,
    Neck,
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyRegion::Knees => write!(f, "knees"),
            BodyRegion::LowerBack => write!(f, "lower back"),
            BodyRegion::Shoulders => write!(f, "shoulders"),
            BodyRegion::Elbows => write!(f, "elbows"),
            BodyRegion::Wrists => write!(f, "wrists"),
            BodyRegion::Hips => write!(f, "hips"),
            BodyRegion::Ankles => write!(f, "ankles"),
            BodyRegion::Neck => write!(f, "neck"),
        }
    }
}

/// Coarse recovery classification used by load and deload decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryTier {
    Poor,
    Average,
    Excellent,
}

impl fmt::Display for RecoveryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryTier::Poor => write!(f, "poor"),
            RecoveryTier::Average => write!(f, "average"),
            RecoveryTier::Excellent => write!(f, "excellent"),
        }
    }
}

/// How quickly an athlete sheds accumulated fatigue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryProfile {
    /// Cumulative fatigue above which a deload is due
    pub fatigue_threshold: f64,
    /// Multiplier on the base fatigue decay, 1.0 is baseline
    pub recovery_rate: f64,
    /// 1-10
    pub sleep_quality: f64,
    #[serde(default)]
    pub recovery_modalities: Vec<String>,
}

impl Default for RecoveryProfile {
    fn default() -> Self {
        Self {
            fatigue_threshold: 7.0,
            recovery_rate: 1.0,
            sleep_quality: 7.0,
            recovery_modalities: Vec::new(),
        }
    }
}

impl RecoveryProfile {
    /// Poor: slow decay or poor sleep. Excellent: fast decay and good sleep.
    pub fn tier(&self) -> RecoveryTier {
        if self.recovery_rate < 0.8 || self.sleep_quality <= 4.0 {
            RecoveryTier::Poor
        } else if self.recovery_rate >= 1.2 && self.sleep_quality >= 8.0 {
            RecoveryTier::Excellent
        } else {
            RecoveryTier::Average
        }
    }
}

/// Post-session report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFeedback {
    /// 0-10
    #[serde(rename = "lastSessionRPE")]
    pub last_session_rpe: f64,
    pub total_volume: f64,
    #[serde(default)]
    pub notes: Option<String>,
}
