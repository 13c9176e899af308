use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::logging::LogConfig;
use crate::models::RecoveryProfile;
use crate::periodization::PeriodizationModelKind;
use crate::profile::{LifestyleFactors, RpeProfile};

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration metadata
    #[serde(default)]
    pub metadata: ConfigMetadata,

    /// Values attached to every synthesized profile
    #[serde(default)]
    pub synthesis: SynthesisDefaults,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();

        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Non-individualized parts of an enhanced profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisDefaults {
    /// Catalog entry whose phases make up the linear model
    pub periodization_model: PeriodizationModelKind,
    pub recovery_profile: RecoveryProfile,
    pub rpe_profile: RpeProfile,
    pub lifestyle_factors: LifestyleFactors,
}

impl Default for SynthesisDefaults {
    fn default() -> Self {
        SynthesisDefaults {
            periodization_model: PeriodizationModelKind::HypertrophyFocused,
            recovery_profile: RecoveryProfile::default(),
            rpe_profile: RpeProfile::default(),
            lifestyle_factors: LifestyleFactors::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(ConfigError::from)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.metadata.updated_at = Utc::now();

        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(ConfigError::from)?;
        fs::write(path, toml_content).map_err(write_error)?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftrs")
            .join("config.toml")
    }

    /// Load the configuration at the default path, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Load a configuration file, or defaults when it is absent or invalid
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load_from_file(path).unwrap_or_else(|e| {
            warn!(
                path = %path.display(),
                error = %e,
                "Engine configuration unavailable, using defaults"
            );
            Self::default()
        })
    }

    /// Reject values the engine cannot compute with
    pub fn validate(&self) -> Result<()> {
        let recovery = &self.synthesis.recovery_profile;
        // negated comparisons also reject NaN
        if !(recovery.fatigue_threshold > 0.0) {
            return Err(invalid("synthesis.recovery_profile.fatigueThreshold", "must be positive"));
        }
        if !(recovery.recovery_rate > 0.0) {
            return Err(invalid("synthesis.recovery_profile.recoveryRate", "must be positive"));
        }

        let rpe = &self.synthesis.rpe_profile;
        for (field, [low, high]) in [
            ("synthesis.rpe_profile.hypertrophyRange", rpe.hypertrophy_range),
            ("synthesis.rpe_profile.strengthRange", rpe.strength_range),
        ] {
            if !(low <= high) {
                return Err(invalid(field, "range must be ascending"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::LiftRsError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
