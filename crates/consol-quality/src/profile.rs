//! Quality Profiles for consolidation
//!
//! Defines the signal minimums and the sufficiency policy. Two profiles
//! ship built in: `lenient` (used for consolidation) and `strict`.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;

/// Quality profile defining signal minimums and the sufficiency ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Profile name (e.g., "lenient@1.0", "strict@1.0")
    pub name: String,

    /// Operating mode
    pub mode: String,

    // === Signal minimums ===

    /// Minimum mental drivers
    pub min_drivers: u64,

    /// Minimum visual proofs
    pub min_visual_proofs: u64,

    /// Minimum unique research sources
    pub min_research_sources: u64,

    /// Minimum insights
    pub min_insights: u64,

    // === Policy ===

    /// Fraction of signals (0.0 to 1.0) that must meet their minimum
    pub sufficiency_ratio: f64,

    /// Extra hard floor on research sources
    #[serde(default)]
    pub min_total_sources: Option<u64>,
}

impl QualityProfile {
    /// Lenient profile: three of four signals are enough
    pub fn lenient() -> Self {
        Self {
            name: "lenient@1.0".to_string(),
            mode: "lenient".to_string(),
            min_drivers: 2,
            min_visual_proofs: 1,
            min_research_sources: 3,
            min_insights: 5,
            sufficiency_ratio: 0.6,
            min_total_sources: None,
        }
    }

    /// Strict profile: 75% of signals and at least 5 research sources
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            mode: "strict".to_string(),
            sufficiency_ratio: 0.75,
            min_total_sources: Some(5),
            ..Self::lenient()
        }
    }

    /// Load profile from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, QualityError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Get profile by mode name
    pub fn for_mode(mode: &str) -> Self {
        match mode {
            "strict" => Self::strict(),
            _ => Self::lenient(),
        }
    }

    /// Reject a sufficiency ratio outside 0..=1 (NaN included).
    pub fn validate(&self) -> Result<(), QualityError> {
        if !(0.0..=1.0).contains(&self.sufficiency_ratio) {
            return Err(QualityError::InvalidProfile(format!(
                "sufficiency_ratio {} outside 0..=1",
                self.sufficiency_ratio
            )));
        }
        Ok(())
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::lenient()
    }
}
