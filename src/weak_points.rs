//! Weak point and injury analysis
//!
//! Two independent analyses feed corrective work into a program:
//!
//! - **Strength ratios**: compares lift ratios against minimum standards and
//!   flags the movement pattern lagging behind.
//! - **Injury notes**: scans free-text limitations for body regions and
//!   collects the movements to avoid.
//!
//! Neither analysis guards against degenerate numbers. A zero denominator
//! yields an infinite or NaN ratio, which simply records no issue.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{BodyRegion, StrengthProfile};
use crate::tiers::{Bound, Breakpoints};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Moderate,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Moderate => write!(f, "Moderate"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Movement pattern flagged by a lagging strength ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakPointCategory {
    HorizontalPress,
    PosteriorChain,
    VerticalPress,
}

impl WeakPointCategory {
    /// Corrective exercises prescribed for this pattern
    pub fn correction_exercises(&self) -> &'static [&'static str] {
        match self {
            WeakPointCategory::HorizontalPress => {
                &["Close-grip bench press", "Paused bench press", "Dumbbell bench press"]
            }
            WeakPointCategory::PosteriorChain => {
                &["Romanian deadlift", "Hip thrust", "Back extension"]
            }
            WeakPointCategory::VerticalPress => {
                &["Seated dumbbell press", "Push press", "Close-grip bench press"]
            }
        }
    }
}

/// Reference ratio between two lifts
#[derive(Debug, Clone, Copy)]
pub struct RatioStandard {
    pub name: &'static str,
    pub minimum: f64,
    pub optimal: f64,
    pub category: WeakPointCategory,
    numerator: fn(&StrengthProfile) -> f64,
    denominator: fn(&StrengthProfile) -> f64,
}

impl RatioStandard {
    pub fn ratio(&self, profile: &StrengthProfile) -> f64 {
        (self.numerator)(profile) / (self.denominator)(profile)
    }
}

pub const RATIO_STANDARDS: [RatioStandard; 3] = [
    RatioStandard {
        name: "bench/deadlift",
        minimum: 0.60,
        optimal: 0.75,
        category: WeakPointCategory::HorizontalPress,
        numerator: bench,
        denominator: deadlift,
    },
    RatioStandard {
        name: "squat/deadlift",
        minimum: 0.75,
        optimal: 0.85,
        category: WeakPointCategory::PosteriorChain,
        numerator: squat,
        denominator: deadlift,
    },
    RatioStandard {
        name: "overhead/bench",
        minimum: 0.60,
        optimal: 0.70,
        category: WeakPointCategory::VerticalPress,
        numerator: overhead_press,
        denominator: bench,
    },
];

fn squat(p: &StrengthProfile) -> f64 {
    p.squat
}

fn bench(p: &StrengthProfile) -> f64 {
    p.bench
}

fn deadlift(p: &StrengthProfile) -> f64 {
    p.deadlift
}

fn overhead_press(p: &StrengthProfile) -> f64 {
    p.overhead_press
}

/// Severity by fraction of the standard minimum reached
const SEVERITY_BANDS: Breakpoints<Option<Severity>> = Breakpoints::new(
    &[
        (Bound::Below(0.9), Some(Severity::High)),
        (Bound::Below(1.0), Some(Severity::Moderate)),
    ],
    None,
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthRatioIssue {
    pub ratio_name: String,
    pub your_ratio: f64,
    pub minimum: f64,
    pub optimal: f64,
    pub severity: Severity,
    pub category: WeakPointCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakPointAnalysisResult {
    pub issues: Vec<StrengthRatioIssue>,
    pub primary_weak_points: Vec<WeakPointCategory>,
    pub correction_exercises: Vec<String>,
    pub reassessment_period_weeks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryParseResult {
    pub identified_areas: Vec<BodyRegion>,
    pub contraindications: Vec<String>,
}

struct RegionKeywords {
    region: BodyRegion,
    keywords: &'static [&'static str],
    contraindications: &'static [&'static str],
}

static REGION_KEYWORDS: [RegionKeywords; 8] = [
    RegionKeywords {
        region: BodyRegion::Knees,
        keywords: &["knee", "knees", "patella", "patellar", "acl", "mcl", "meniscus"],
        contraindications: &["deep squats", "lunges", "jumping movements"],
    },
    RegionKeywords {
        region: BodyRegion::LowerBack,
        keywords: &[
            "lower back", "back", "spine", "spinal", "disc", "discs", "lumbar", "sciatica",
            "herniated",
        ],
        contraindications: &["heavy deadlifts", "good mornings", "loaded spinal flexion"],
    },
    RegionKeywords {
        region: BodyRegion::Shoulders,
        keywords: &["shoulder", "shoulders", "rotator cuff", "rotator", "labrum", "impingement"],
        contraindications: &["overhead pressing", "behind-the-neck press", "dips"],
    },
    RegionKeywords {
        region: BodyRegion::Elbows,
        keywords: &["elbow", "elbows", "epicondylitis"],
        contraindications: &["skull crushers", "close-grip pressing"],
    },
    RegionKeywords {
        region: BodyRegion::Wrists,
        keywords: &["wrist", "wrists", "carpal"],
        contraindications: &["front rack position", "straight-bar curls"],
    },
    RegionKeywords {
        region: BodyRegion::Hips,
        keywords: &["hip", "hips", "groin"],
        contraindications: &["deep hip flexion", "wide-stance squats"],
    },
    RegionKeywords {
        region: BodyRegion::Ankles,
        keywords: &["ankle", "ankles", "achilles"],
        contraindications: &["box jumps", "running"],
    },
    RegionKeywords {
        region: BodyRegion::Neck,
        keywords: &["neck", "cervical"],
        contraindications: &["behind-the-neck press", "heavy shrugs"],
    },
];

/// One case-insensitive, word-bounded pattern per region
static REGION_PATTERNS: LazyLock<Vec<(&'static RegionKeywords, Regex)>> = LazyLock::new(|| {
    REGION_KEYWORDS
        .iter()
        .map(|entry| {
            let alternation = entry
                .keywords
                .iter()
                .map(|keyword| regex::escape(keyword))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})\b", alternation);
            (entry, Regex::new(&pattern).expect("valid region keyword regex"))
        })
        .collect()
});

/// Strength-ratio and injury-text analyzer
pub struct WeakPointAnalyzer;

impl WeakPointAnalyzer {
    /// Flag lagging movement patterns from 1RM ratios
    pub fn analyze_strength_ratios(profile: &StrengthProfile) -> WeakPointAnalysisResult {
        let mut issues = Vec::new();

        for standard in &RATIO_STANDARDS {
            let ratio = standard.ratio(profile);
            let Some(severity) = SEVERITY_BANDS.lookup(ratio / standard.minimum) else {
                continue;
            };

            debug!(ratio_name = standard.name, ratio, %severity, "Strength ratio below standard");
            issues.push(StrengthRatioIssue {
                ratio_name: standard.name.to_string(),
                your_ratio: ratio,
                minimum: standard.minimum,
                optimal: standard.optimal,
                severity,
                category: standard.category,
            });
        }

        let mut primary_weak_points = Vec::new();
        let mut correction_exercises = Vec::new();
        for issue in &issues {
            push_unique(&mut primary_weak_points, issue.category);
        }
        for category in &primary_weak_points {
            for exercise in category.correction_exercises() {
                push_unique(&mut correction_exercises, exercise.to_string());
            }
        }

        let severities: Vec<Severity> = issues.iter().map(|issue| issue.severity).collect();

        WeakPointAnalysisResult {
            reassessment_period_weeks: Self::calculate_reassessment_period(&severities),
            issues,
            primary_weak_points,
            correction_exercises,
        }
    }

    /// Weeks until ratios should be retested: 8 with any High issue, 12 with
    /// any Moderate issue, 16 otherwise
    pub fn calculate_reassessment_period(severities: &[Severity]) -> u32 {
        if severities.contains(&Severity::High) {
            8
        } else if severities.contains(&Severity::Moderate) {
            12
        } else {
            16
        }
    }

    /// Extract injured body regions and contraindicated movements from notes
    pub fn parse_injury_text(text: Option<&str>) -> InjuryParseResult {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return InjuryParseResult::default();
        };

        let mut result = InjuryParseResult::default();
        for (entry, pattern) in REGION_PATTERNS.iter() {
            if !pattern.is_match(text) {
                continue;
            }
            push_unique(&mut result.identified_areas, entry.region);
            for movement in entry.contraindications {
                push_unique(&mut result.contraindications, movement.to_string());
            }
        }

        debug!(
            areas = ?result.identified_areas,
            contraindications = result.contraindications.len(),
            "Parsed injury notes"
        );
        result
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
