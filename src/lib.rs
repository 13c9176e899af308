// Library interface for LiftRS
// Turns an onboarding profile into the training parameters used for program generation

pub mod autoregulation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod periodization;
pub mod profile;
pub mod tiers;
pub mod volume;
pub mod weak_points;

// Re-export commonly used types for convenience
pub use models::*;
pub use autoregulation::{AutoregulationEngine, DeloadRecommendation, LoadRecommendation, RpeTrend};
pub use config::{EngineConfig, SynthesisDefaults};
pub use error::{LiftRsError, Result};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use periodization::{PeriodizationModelKind, PeriodizationPhase, PeriodizationPlanner};
pub use profile::{EnhancedUserProfile, ProfileSynthesizer};
pub use volume::{VolumeCalculator, VolumeLandmarks};
pub use weak_points::{Severity, WeakPointAnalysisResult, WeakPointAnalyzer};
