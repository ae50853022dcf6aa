//! Quality validation of recovered steps
//!
//! Probes four completeness signals and decides whether a session holds
//! enough material for a full report.

use consol_core::{CollectedSteps, QualityAssessment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::profile::QualityProfile;

/// Attached to every insufficient assessment.
pub const RECOMMENDATIONS: [&str; 4] = [
    "Configure mais APIs para melhorar qualidade",
    "Execute nova análise com dados mais específicos",
    "Verifique conectividade de internet",
    "Considere análise manual dos dados intermediários",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Drivers,
    VisualProofs,
    ResearchSources,
    Insights,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::Drivers,
        Signal::VisualProofs,
        Signal::ResearchSources,
        Signal::Insights,
    ];

    fn label(self) -> &'static str {
        match self {
            Signal::Drivers => "Drivers mentais",
            Signal::VisualProofs => "Provas visuais",
            Signal::ResearchSources => "Fontes de pesquisa",
            Signal::Insights => "Insights",
        }
    }

    fn minimum(self, profile: &QualityProfile) -> u64 {
        match self {
            Signal::Drivers => profile.min_drivers,
            Signal::VisualProofs => profile.min_visual_proofs,
            Signal::ResearchSources => profile.min_research_sources,
            Signal::Insights => profile.min_insights,
        }
    }

    fn observe(self, collected: &CollectedSteps) -> u64 {
        match self {
            Signal::Drivers => collected.drivers().map_or(0, |d| d.count() as u64),
            Signal::VisualProofs => collected.visual_proofs().map_or(0, |p| p.len() as u64),
            Signal::ResearchSources => collected.research().map_or(0, |r| r.unique_sources),
            Signal::Insights => collected.insights().map_or(0, |i| i.len() as u64),
        }
    }
}

/// Single signal result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub signal: Signal,
    pub observed: u64,
    pub minimum: u64,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Ok,
    Fail,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Ok
    }

    fn problem(&self) -> String {
        format!(
            "{} insuficientes: {} < {}",
            self.signal.label(),
            self.observed,
            self.minimum
        )
    }
}

/// Validator that scores collected steps against a profile
pub struct QualityValidator {
    profile: QualityProfile,
}

impl QualityValidator {
    pub fn new(profile: QualityProfile) -> Self {
        Self { profile }
    }

    /// Create a validator for a specific mode
    pub fn for_mode(mode: &str) -> Self {
        Self::new(QualityProfile::for_mode(mode))
    }

    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    /// Per-signal results, in a fixed order.
    pub fn checks(&self, collected: &CollectedSteps) -> Vec<Check> {
        Signal::ALL
            .iter()
            .map(|&signal| {
                let observed = signal.observe(collected);
                let minimum = signal.minimum(&self.profile);
                Check {
                    signal,
                    observed,
                    minimum,
                    status: if observed >= minimum {
                        CheckStatus::Ok
                    } else {
                        CheckStatus::Fail
                    },
                }
            })
            .collect()
    }

    /// Score the collected steps. Pure: same input, same assessment.
    pub fn validate(&self, collected: &CollectedSteps) -> QualityAssessment {
        let checks = self.checks(collected);
        let total = checks.len() as u32;
        let satisfied = checks.iter().filter(|c| c.passed()).count() as u32;
        let ratio = f64::from(satisfied) / f64::from(total);

        let observed = |signal: Signal| {
            checks
                .iter()
                .find(|c| c.signal == signal)
                .map(|c| c.observed)
                .unwrap_or(0)
        };
        let research_sources = observed(Signal::ResearchSources);

        let mut problems: Vec<String> = checks
            .iter()
            .filter(|c| !c.passed())
            .map(Check::problem)
            .collect();

        let mut sufficient = ratio >= self.profile.sufficiency_ratio;
        if let Some(min_total) = self.profile.min_total_sources {
            if research_sources < min_total {
                sufficient = false;
                problems.push(format!(
                    "Total de fontes insuficiente: {} < {}",
                    research_sources, min_total
                ));
            }
        }

        let recommendations = if sufficient {
            Vec::new()
        } else {
            RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
        };

        debug!(satisfied, total, profile = %self.profile.name, "quality signals probed");
        let assessment = QualityAssessment {
            sufficient,
            score: ratio * 100.0,
            components_found: collected.available().len(),
            drivers: observed(Signal::Drivers),
            visual_proofs: observed(Signal::VisualProofs),
            research_sources,
            insights: observed(Signal::Insights),
            satisfied,
            total_signals: total,
            profile: self.profile.name.clone(),
            problems,
            recommendations,
        };
        info!(
            score = assessment.score,
            sufficient = assessment.sufficient,
            "quality validated"
        );
        assessment
    }
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new(QualityProfile::default())
    }
}
