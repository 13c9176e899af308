//! Autoregulation: fatigue, RPE trends, session loads and deload triggers
//!
//! Four independent, pure functions. None of them clamps its inputs:
//! a very poor recovery rate can drive cumulative fatigue negative, and a zero
//! base weight produces a NaN percentage change.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::models::{RecoveryProfile, RecoveryTier, SessionFeedback};

/// Fraction of accumulated fatigue shed between sessions at baseline recovery
pub const BASE_FATIGUE_DECAY: f64 = 0.3;

/// Net RPE change over a series that counts as a real trend
pub const MATERIAL_RPE_CHANGE: f64 = 1.0;

/// Session RPE band considered on target
pub const TARGET_RPE_RANGE: (f64, f64) = (7.0, 8.0);

/// Fatigue discount added per mesocycle week after the first
const WEEKLY_FATIGUE_DISCOUNT: f64 = 0.02;

/// Ceiling on the week-based discount before recovery scaling, reached in week 11
const MAX_WEEK_FATIGUE_DISCOUNT: f64 = 0.2;

const RPE_BELOW_TARGET_INCREASE: f64 = 0.03;
const RPE_ABOVE_TARGET_DECREASE: f64 = 0.05;

/// Plate increment recommendations snap to
const LOAD_INCREMENT: f64 = 2.5;

const DELOAD_DURATION_DAYS: u32 = 7;
const VOLUME_DELOAD_REDUCTION: f64 = 50.0;
const INTENSITY_DELOAD_REDUCTION: f64 = 20.0;

/// Direction of perceived exertion over recent sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpeTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for RpeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpeTrend::Increasing => write!(f, "increasing"),
            RpeTrend::Decreasing => write!(f, "decreasing"),
            RpeTrend::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeloadType {
    /// Cut sets, keep loads
    Volume,
    /// Cut loads, keep sets
    Intensity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRecommendation {
    pub recommended_weight: f64,
    pub percentage_change: f64,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeloadRecommendation {
    pub is_needed: bool,
    pub reason: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub deload_type: Option<DeloadType>,
    pub duration_days: u32,
    pub reduction_percentage: f64,
}

/// Autoregulation engine
pub struct AutoregulationEngine;

impl AutoregulationEngine {
    /// Decay prior fatigue and add the latest session's fatigue.
    ///
    /// `decayed = prior * (1 - 0.3 / recovery_rate)`; no floor is applied.
    pub fn track_cumulative_fatigue(prior: f64, session_fatigue: f64, recovery_rate: f64) -> f64 {
        let decayed = prior * (1.0 - BASE_FATIGUE_DECAY * (1.0 / recovery_rate));
        decayed + session_fatigue
    }

    /// Classify a series of session RPEs, oldest first
    pub fn analyze_rpe_trend(history: &[f64]) -> RpeTrend {
        if history.len() < 3 {
            return RpeTrend::Stable;
        }

        let change = history[history.len() - 1] - history[0];
        if change >= MATERIAL_RPE_CHANGE {
            RpeTrend::Increasing
        } else if change <= -MATERIAL_RPE_CHANGE {
            RpeTrend::Decreasing
        } else {
            RpeTrend::Stable
        }
    }

    /// Next-session load from mesocycle position, recovery and last-session RPE
    pub fn calculate_adaptive_load(
        base_weight: f64,
        week_in_mesocycle: u32,
        recovery: &RecoveryProfile,
        feedback: &SessionFeedback,
    ) -> LoadRecommendation {
        let mut reasoning = Vec::new();
        let tier = recovery.tier();

        let discount = Self::week_fatigue_discount(week_in_mesocycle, tier);
        if discount > 0.0 {
            reasoning.push(format!(
                "Week {} of mesocycle: {:.1}% fatigue discount ({} recovery)",
                week_in_mesocycle,
                discount * 100.0,
                tier
            ));
        }

        let (low, high) = TARGET_RPE_RANGE;
        let rpe = feedback.last_session_rpe;
        let rpe_adjustment = if rpe < low {
            reasoning.push(format!(
                "Last session RPE {:.1} below target {:.0}-{:.0}: +{:.0}% load",
                rpe,
                low,
                high,
                RPE_BELOW_TARGET_INCREASE * 100.0
            ));
            RPE_BELOW_TARGET_INCREASE
        } else if rpe > high {
            reasoning.push(format!(
                "Last session RPE {:.1} above target {:.0}-{:.0}: -{:.0}% load",
                rpe,
                low,
                high,
                RPE_ABOVE_TARGET_DECREASE * 100.0
            ));
            -RPE_ABOVE_TARGET_DECREASE
        } else {
            0.0
        };

        if reasoning.is_empty() {
            reasoning.push("No adjustment needed: RPE on target and fatigue not yet accumulated".to_string());
        }

        let raw = base_weight * (1.0 - discount) * (1.0 + rpe_adjustment);
        let recommended_weight = round_to_increment(raw, LOAD_INCREMENT);
        let percentage_change = round_to_one_decimal((recommended_weight - base_weight) / base_weight * 100.0);

        debug!(
            base_weight,
            week_in_mesocycle,
            %tier,
            rpe,
            recommended_weight,
            percentage_change,
            "Calculated adaptive load"
        );

        LoadRecommendation {
            recommended_weight,
            percentage_change,
            reasoning,
        }
    }

    /// Fatigue discount for a mesocycle week, scaled by recovery tier.
    ///
    /// Saturates at 20% before scaling, so the discount never exceeds 30%.
    pub fn week_fatigue_discount(week_in_mesocycle: u32, tier: RecoveryTier) -> f64 {
        let weeks_elapsed = f64::from(week_in_mesocycle.saturating_sub(1));
        let base = f64::min(WEEKLY_FATIGUE_DISCOUNT * weeks_elapsed, MAX_WEEK_FATIGUE_DISCOUNT);
        let scale = match tier {
            RecoveryTier::Poor => 1.5,
            RecoveryTier::Average => 1.0,
            RecoveryTier::Excellent => 0.5,
        };
        base * scale
    }

    /// Decide whether a deload is due.
    ///
    /// Fatigue above threshold wins over an increasing RPE trend.
    pub fn determine_deload_need(
        cumulative_fatigue: f64,
        fatigue_threshold: f64,
        rpe_trend: RpeTrend,
    ) -> DeloadRecommendation {
        let recommendation = if cumulative_fatigue > fatigue_threshold {
            DeloadRecommendation {
                is_needed: true,
                reason: format!(
                    "Cumulative fatigue {:.1} exceeds threshold {:.1}",
                    cumulative_fatigue, fatigue_threshold
                ),
                deload_type: Some(DeloadType::Volume),
                duration_days: DELOAD_DURATION_DAYS,
                reduction_percentage: VOLUME_DELOAD_REDUCTION,
            }
        } else if rpe_trend == RpeTrend::Increasing {
            DeloadRecommendation {
                is_needed: true,
                reason: "RPE is trending upward at the same loads".to_string(),
                deload_type: Some(DeloadType::Intensity),
                duration_days: DELOAD_DURATION_DAYS,
                reduction_percentage: INTENSITY_DELOAD_REDUCTION,
            }
        } else {
            DeloadRecommendation {
                is_needed: false,
                reason: format!(
                    "Fatigue {:.1} is within tolerance (threshold {:.1})",
                    cumulative_fatigue, fatigue_threshold
                ),
                deload_type: None,
                duration_days: 0,
                reduction_percentage: 0.0,
            }
        };

        if recommendation.is_needed {
            info!(
                cumulative_fatigue,
                fatigue_threshold,
                %rpe_trend,
                deload_type = ?recommendation.deload_type,
                "Deload recommended"
            );
        }
        recommendation
    }
}

fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).round() * increment
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(rpe: f64) -> SessionFeedback {
        SessionFeedback {
            last_session_rpe: rpe,
            total_volume: 12_000.0,
            notes: None,
        }
    }

    fn excellent() -> RecoveryProfile {
        RecoveryProfile {
            recovery_rate: 1.3,
            sleep_quality: 9.0,
            ..Default::default()
        }
    }

    fn poor() -> RecoveryProfile {
        RecoveryProfile {
            recovery_rate: 0.6,
            sleep_quality: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_fatigue_decay_without_new_load() {
        let fatigue = AutoregulationEngine::track_cumulative_fatigue(10.0, 0.0, 1.0);
        assert!((fatigue - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_fatigue_accumulates_session_load() {
        let fatigue = AutoregulationEngine::track_cumulative_fatigue(10.0, 3.0, 1.0);
        assert!((fatigue - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovery_rate_scales_decay() {
        let fast = AutoregulationEngine::track_cumulative_fatigue(10.0, 0.0, 2.0);
        let slow = AutoregulationEngine::track_cumulative_fatigue(10.0, 0.0, 0.5);
        assert!((fast - 8.5).abs() < 1e-9);
        assert!((slow - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_fatigue_has_no_floor() {
        // 1 - 0.3 / 0.1 = -2
        let fatigue = AutoregulationEngine::track_cumulative_fatigue(10.0, 0.0, 0.1);
        assert!(fatigue < 0.0);
    }

    #[test]
    fn test_rpe_trend_short_history_is_stable() {
        assert_eq!(AutoregulationEngine::analyze_rpe_trend(&[]), RpeTrend::Stable);
        assert_eq!(AutoregulationEngine::analyze_rpe_trend(&[6.0, 9.0]), RpeTrend::Stable);
    }

    #[test]
    fn test_rpe_trend_directions() {
        assert_eq!(
            AutoregulationEngine::analyze_rpe_trend(&[6.0, 7.0, 8.0]),
            RpeTrend::Increasing
        );
        assert_eq!(
            AutoregulationEngine::analyze_rpe_trend(&[9.0, 8.0, 7.5]),
            RpeTrend::Decreasing
        );
    }

    #[test]
    fn test_rpe_trend_small_swings_and_oscillation_are_stable() {
        assert_eq!(
            AutoregulationEngine::analyze_rpe_trend(&[7.0, 7.5, 7.5]),
            RpeTrend::Stable
        );
        assert_eq!(
            AutoregulationEngine::analyze_rpe_trend(&[6.0, 9.0, 6.0, 9.0, 6.5]),
            RpeTrend::Stable
        );
    }

    #[test]
    fn test_adaptive_load_on_target_first_week() {
        let rec = AutoregulationEngine::calculate_adaptive_load(
            100.0,
            1,
            &RecoveryProfile::default(),
            &feedback(7.5),
        );
        assert_eq!(rec.recommended_weight, 100.0);
        assert_eq!(rec.percentage_change, 0.0);
        assert_eq!(rec.reasoning.len(), 1);
        assert!(rec.reasoning[0].starts_with("No adjustment"));
    }

    #[test]
    fn test_adaptive_load_low_rpe_increases() {
        let rec = AutoregulationEngine::calculate_adaptive_load(
            100.0,
            1,
            &RecoveryProfile::default(),
            &feedback(6.0),
        );
        // 103 snaps to 102.5
        assert_eq!(rec.recommended_weight, 102.5);
        assert_eq!(rec.percentage_change, 2.5);
        assert!(rec.reasoning[0].contains("below target"));
    }

    #[test]
    fn test_adaptive_load_high_rpe_decreases() {
        let rec = AutoregulationEngine::calculate_adaptive_load(
            100.0,
            1,
            &RecoveryProfile::default(),
            &feedback(9.5),
        );
        assert_eq!(rec.recommended_weight, 95.0);
        assert_eq!(rec.percentage_change, -5.0);
    }

    #[test]
    fn test_adaptive_load_combines_adjustments_in_order() {
        // week 4 average recovery: 6% discount, then -5% for high RPE
        let rec = AutoregulationEngine::calculate_adaptive_load(
            200.0,
            4,
            &RecoveryProfile::default(),
            &feedback(9.0),
        );
        // 200 * 0.94 * 0.95 = 178.6 -> 177.5
        assert_eq!(rec.recommended_weight, 177.5);
        assert_eq!(rec.reasoning.len(), 2);
        assert!(rec.reasoning[0].starts_with("Week 4"));
        assert!(rec.reasoning[1].contains("above target"));
    }

    #[test]
    fn test_recovery_tier_scales_week_discount() {
        let average = AutoregulationEngine::week_fatigue_discount(4, RecoveryTier::Average);
        let poor_discount = AutoregulationEngine::week_fatigue_discount(4, RecoveryTier::Poor);
        let excellent_discount = AutoregulationEngine::week_fatigue_discount(4, RecoveryTier::Excellent);
        assert!(poor_discount > average && average > excellent_discount);
        assert_eq!(AutoregulationEngine::week_fatigue_discount(1, RecoveryTier::Poor), 0.0);
        assert_eq!(AutoregulationEngine::week_fatigue_discount(0, RecoveryTier::Poor), 0.0);

        let poor_load =
            AutoregulationEngine::calculate_adaptive_load(200.0, 5, &poor(), &feedback(7.5));
        let excellent_load =
            AutoregulationEngine::calculate_adaptive_load(200.0, 5, &excellent(), &feedback(7.5));
        assert!(poor_load.recommended_weight < excellent_load.recommended_weight);
    }

    #[test]
    fn test_week_discount_saturates_in_long_blocks() {
        let week_11 = AutoregulationEngine::week_fatigue_discount(11, RecoveryTier::Poor);
        let week_40 = AutoregulationEngine::week_fatigue_discount(40, RecoveryTier::Poor);
        assert_eq!(week_11, week_40);
        assert!((week_40 - 0.3).abs() < 1e-9);
        assert!(AutoregulationEngine::week_fatigue_discount(u32::MAX, RecoveryTier::Average) <= 0.2);

        let rec = AutoregulationEngine::calculate_adaptive_load(100.0, 40, &poor(), &feedback(7.5));
        assert_eq!(rec.recommended_weight, 70.0);
        assert_eq!(rec.percentage_change, -30.0);
        assert!(rec.reasoning[0].contains("30.0%"));
    }

    #[test]
    fn test_adaptive_load_is_deterministic() {
        let first = AutoregulationEngine::calculate_adaptive_load(142.5, 6, &poor(), &feedback(8.5));
        let second = AutoregulationEngine::calculate_adaptive_load(142.5, 6, &poor(), &feedback(8.5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_adaptive_load_rounds_to_increment() {
        let rec = AutoregulationEngine::calculate_adaptive_load(
            83.0,
            3,
            &RecoveryProfile::default(),
            &feedback(6.5),
        );
        let steps = rec.recommended_weight / 2.5;
        assert_eq!(steps, steps.round());
    }

    #[test]
    fn test_adaptive_load_zero_base_yields_nan_change() {
        let rec = AutoregulationEngine::calculate_adaptive_load(
            0.0,
            2,
            &RecoveryProfile::default(),
            &feedback(7.0),
        );
        assert_eq!(rec.recommended_weight, 0.0);
        assert!(rec.percentage_change.is_nan());
    }

    #[test]
    fn test_deload_for_excess_fatigue() {
        let deload = AutoregulationEngine::determine_deload_need(10.0, 7.0, RpeTrend::Stable);
        assert!(deload.is_needed);
        assert_eq!(deload.deload_type, Some(DeloadType::Volume));
        assert_eq!(deload.duration_days, 7);
        assert_eq!(deload.reduction_percentage, 50.0);
    }

    #[test]
    fn test_fatigue_takes_priority_over_rpe_trend() {
        let deload = AutoregulationEngine::determine_deload_need(10.0, 7.0, RpeTrend::Increasing);
        assert_eq!(deload.deload_type, Some(DeloadType::Volume));
    }

    #[test]
    fn test_deload_for_rising_rpe() {
        let deload = AutoregulationEngine::determine_deload_need(5.0, 7.0, RpeTrend::Increasing);
        assert!(deload.is_needed);
        assert_eq!(deload.deload_type, Some(DeloadType::Intensity));
        assert_eq!(deload.duration_days, 7);
        assert_eq!(deload.reduction_percentage, 20.0);
    }

    #[test]
    fn test_no_deload_within_tolerance() {
        // equal to threshold is not an excess
        let deload = AutoregulationEngine::determine_deload_need(7.0, 7.0, RpeTrend::Decreasing);
        assert!(!deload.is_needed);
        assert_eq!(deload.deload_type, None);
        assert!(deload.reason.contains("within tolerance"));
    }

    #[test]
    fn test_deload_serializes_type_field() {
        let deload = AutoregulationEngine::determine_deload_need(10.0, 7.0, RpeTrend::Stable);
        let json = serde_json::to_value(&deload).unwrap();
        assert_eq!(json["type"], "volume");
        assert_eq!(json["isNeeded"], true);
    }
}
