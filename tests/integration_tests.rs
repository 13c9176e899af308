use liftrs::autoregulation::{AutoregulationEngine, DeloadType, RpeTrend};
use liftrs::periodization::{Adaptation, DeloadProtocolType, PeriodizationModelKind, PeriodizationPlanner};
use liftrs::weak_points::{Severity, WeakPointAnalyzer, WeakPointCategory};
use liftrs::{
    BodyRegion, EngineConfig, MuscleGroup, ProfileSynthesizer, SessionFeedback, StrengthProfile,
    UserProfile, VolumeCalculator,
};

/// End-to-end workflows across the engine components

#[cfg(test)]
mod integration_tests {
    use super::*;

    const ONBOARDING_JSON: &str = r#"{
        "experienceLevel": "intermediate",
        "trainingFrequency": 4,
        "sessionDuration": "60-75",
        "equipment": ["barbell", "dumbbells", "rack"],
        "exercisePreferences": "Prefers free weights",
        "injuriesLimitations": "Tweaked my left knee last year, mild shoulder impingement",
        "squat1RM": 80,
        "bench1RM": 90,
        "deadlift1RM": 110,
        "overheadPress1RM": 60,
        "weightUnit": "kg"
    }"#;

    #[test]
    fn test_onboarding_json_to_enhanced_profile() -> anyhow::Result<()> {
        let profile = UserProfile::from_json(ONBOARDING_JSON)?;
        let enhanced = ProfileSynthesizer::new().synthesize(&profile);

        assert_eq!(enhanced.volume_parameters.training_age, 1.25);
        assert_eq!(enhanced.volume_parameters.recovery_capacity, 9.0);
        assert_eq!(enhanced.volume_parameters.stress_level, 6.0);
        assert_eq!(enhanced.volume_parameters.volume_tolerance, 1.0);
        assert_eq!(enhanced.training_history.total_training_time, 15.0);

        let areas = &enhanced.weak_point_analysis.weak_points;
        assert_eq!(areas, &vec![BodyRegion::Knees, BodyRegion::Shoulders]);

        let imbalances = enhanced
            .weak_point_analysis
            .strength_imbalances
            .as_ref()
            .expect("all four lifts were submitted");
        assert!(imbalances
            .primary_weak_points
            .contains(&WeakPointCategory::PosteriorChain));

        let json: serde_json::Value = serde_json::from_str(&enhanced.to_json_pretty()?)?;
        assert_eq!(json["sessionDuration"], "60-75");
        assert_eq!(json["squat1RM"], 80.0);
        assert_eq!(json["weakPointAnalysis"]["weakPoints"][0], "knees");
        assert_eq!(json["trainingHistory"]["totalTrainingTime"], 15.0);
        Ok(())
    }

    #[test]
    fn test_scenario_intermediate_volume_parameters() {
        let profile = UserProfile::from_json(
            r#"{"experienceLevel": "intermediate", "trainingFrequency": 4, "sessionDuration": "60-75"}"#,
        )
        .unwrap();
        let params = ProfileSynthesizer::infer_volume_parameters(&profile);

        assert_eq!(params.training_age, 1.25);
        assert_eq!(params.recovery_capacity, 9.0);
        assert_eq!(params.stress_level, 6.0);
        assert_eq!(params.volume_tolerance, 1.0);
    }

    #[test]
    fn test_scenario_balanced_strength_profile() {
        let result = WeakPointAnalyzer::analyze_strength_ratios(&StrengthProfile {
            squat: 120.0,
            bench: 90.0,
            deadlift: 150.0,
            overhead_press: 60.0,
        });

        assert!(result.issues.is_empty());
        assert_eq!(result.reassessment_period_weeks, 16);
    }

    #[test]
    fn test_scenario_weak_squat() {
        let result = WeakPointAnalyzer::analyze_strength_ratios(&StrengthProfile {
            squat: 80.0,
            bench: 90.0,
            deadlift: 110.0,
            overhead_press: 60.0,
        });

        assert!(result
            .primary_weak_points
            .contains(&WeakPointCategory::PosteriorChain));
        assert!(result
            .correction_exercises
            .iter()
            .any(|exercise| exercise.contains("deadlift") || exercise.contains("Hip thrust")));
    }

    #[test]
    fn test_scenario_fatigue_decay() {
        let fatigue = AutoregulationEngine::track_cumulative_fatigue(10.0, 0.0, 1.0);
        assert!((fatigue - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_volume_deload() {
        let deload = AutoregulationEngine::determine_deload_need(10.0, 7.0, RpeTrend::Stable);

        assert!(deload.is_needed);
        assert_eq!(deload.deload_type, Some(DeloadType::Volume));
        assert_eq!(deload.duration_days, 7);
        assert_eq!(deload.reduction_percentage, 50.0);
    }

    #[test]
    fn test_scenario_reassessment_periods() {
        assert_eq!(WeakPointAnalyzer::calculate_reassessment_period(&[Severity::High]), 8);
        assert_eq!(WeakPointAnalyzer::calculate_reassessment_period(&[Severity::Moderate]), 12);
        assert_eq!(WeakPointAnalyzer::calculate_reassessment_period(&[]), 16);
    }

    /// Walk a synthesized profile through a full mesocycle
    #[test]
    fn test_mesocycle_workflow() {
        let profile = UserProfile::from_json(ONBOARDING_JSON).unwrap();
        let enhanced = ProfileSynthesizer::new().synthesize(&profile);
        let recovery = &enhanced.recovery_profile;

        let chest = enhanced.volume_landmarks[&MuscleGroup::Chest];
        let base_sets = chest.mav as u32;

        let mut fatigue = 0.0;
        let mut rpe_history = Vec::new();
        let mut squat = profile.squat_1rm.unwrap();

        for phase in &enhanced.periodization_model.phases {
            let weeks = PeriodizationPlanner::generate_phase_progression(phase, base_sets);
            assert_eq!(weeks.len(), phase.duration_weeks as usize);

            for (week_index, week) in weeks.iter().enumerate() {
                assert!(week.target_intensity_percent >= phase.intensity_range[0]);
                assert!(week.target_intensity_percent <= phase.intensity_range[1]);

                let session_rpe = 7.0 + week_index as f64 * 0.5;
                rpe_history.push(session_rpe);
                fatigue = AutoregulationEngine::track_cumulative_fatigue(
                    fatigue,
                    f64::from(week.target_volume_sets) / 10.0,
                    recovery.recovery_rate,
                );

                let load = AutoregulationEngine::calculate_adaptive_load(
                    squat * week.target_intensity_percent / 100.0,
                    week.week_in_phase,
                    recovery,
                    &SessionFeedback {
                        last_session_rpe: session_rpe,
                        total_volume: f64::from(week.target_volume_sets),
                        notes: None,
                    },
                );
                assert_eq!(load.recommended_weight % 2.5, 0.0);
                assert!(!load.reasoning.is_empty());
            }

            squat = PeriodizationPlanner::project_adaptation(squat, phase);
        }

        // hypertrophy and strength phases add load, the deload week holds it
        assert!(squat > profile.squat_1rm.unwrap());

        let trend = AutoregulationEngine::analyze_rpe_trend(&rpe_history);
        let deload = AutoregulationEngine::determine_deload_need(
            fatigue,
            recovery.fatigue_threshold,
            trend,
        );
        assert_eq!(deload.is_needed, deload.deload_type.is_some());

        let last_phase = enhanced.periodization_model.phases.last().unwrap();
        let protocol = PeriodizationPlanner::calculate_optimal_deload(fatigue, recovery, last_phase);
        assert_eq!(protocol.duration_days, 7);
        assert!(protocol.volume_reduction_percent <= 100.0);
    }

    #[test]
    fn test_strength_block_ends_with_amplified_deload() {
        let phases = PeriodizationModelKind::StrengthFocused.phases();
        let peaking = phases
            .iter()
            .find(|phase| phase.primary_adaptation == Adaptation::Peaking)
            .unwrap();

        let recovery = ProfileSynthesizer::new().defaults().recovery_profile.clone();
        let protocol = PeriodizationPlanner::calculate_optimal_deload(5.0, &recovery, peaking);

        assert_eq!(protocol.protocol_type, DeloadProtocolType::Active);
        assert_eq!(protocol.volume_reduction_percent, 50.0);
    }

    #[test]
    fn test_configured_synthesizer() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("liftrs.toml");
        std::fs::write(
            &path,
            r#"
            [synthesis]
            periodization_model = "general-fitness"

            [synthesis.lifestyle_factors]
            activityLevel = "very_active"
            sleepHours = 8.0
            nutritionQuality = 8.0
            "#,
        )?;

        let config = EngineConfig::load_from_file(&path)?;
        let enhanced = ProfileSynthesizer::with_config(&config)
            .synthesize(&UserProfile::from_json(ONBOARDING_JSON)?);

        assert_eq!(
            enhanced.periodization_model.source_model,
            PeriodizationModelKind::GeneralFitness
        );
        assert_eq!(enhanced.lifestyle_factors.sleep_hours, 8.0);
        assert_eq!(enhanced.recovery_profile.fatigue_threshold, 7.0);
        Ok(())
    }

    #[test]
    fn test_identical_profiles_synthesize_identically() -> anyhow::Result<()> {
        let first = UserProfile::from_json(ONBOARDING_JSON)?;
        let second = UserProfile::from_json(ONBOARDING_JSON)?;
        assert_eq!(first.fingerprint()?, second.fingerprint()?);

        let synthesizer = ProfileSynthesizer::new();
        assert_eq!(
            synthesizer.synthesize(&first).to_json_pretty()?,
            synthesizer.synthesize(&second).to_json_pretty()?
        );
        Ok(())
    }

    #[test]
    fn test_sparse_profile_uses_conservative_defaults() {
        let profile = UserProfile::from_json(r#"{"experienceLevel": "expert"}"#).unwrap();
        let enhanced = ProfileSynthesizer::new().synthesize(&profile);

        // unknown level reads as beginner, missing schedule as low recovery and high stress
        assert_eq!(enhanced.volume_parameters.training_age, 0.25);
        assert_eq!(enhanced.volume_parameters.recovery_capacity, 3.0);
        assert_eq!(enhanced.volume_parameters.stress_level, 8.0);

        for group in MuscleGroup::ALL {
            let landmarks = enhanced.volume_landmarks[&group];
            let direct = VolumeCalculator::landmarks_for(&enhanced.volume_parameters, group.as_str())
                .unwrap();
            assert_eq!(landmarks, direct);
            assert!(landmarks.mev <= landmarks.mav && landmarks.mav <= landmarks.mrv);
        }
    }
}
