//! Consol Quality: completeness validation
//!
//! Decides whether the steps recovered for a session justify a full report,
//! checking against configurable profiles (lenient vs strict).
//!
//! # Example
//!
//! ```ignore
//! use consol_core::CollectedSteps;
//! use consol_quality::QualityValidator;
//!
//! let collected = CollectedSteps::from_value(serde_json::json!({
//!     "insights_exclusivos": ["i1", "i2"]
//! }));
//! let assessment = QualityValidator::for_mode("lenient").validate(&collected);
//! println!("score: {} sufficient: {}", assessment.score, assessment.sufficient);
//! ```

pub mod coverage;
pub mod error;
pub mod profile;
pub mod validator;

pub use coverage::{has_content, ModuleCoverage, BUSINESS_MODULES};
pub use error::QualityError;
pub use profile::QualityProfile;
pub use validator::{Check, CheckStatus, QualityValidator, Signal, RECOMMENDATIONS};

use consol_core::{CollectedSteps, QualityAssessment};

/// Quick evaluation function
pub fn validate(collected: &CollectedSteps, mode: &str) -> QualityAssessment {
    QualityValidator::for_mode(mode).validate(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quick_validate() {
        let collected = CollectedSteps::from_value(json!({
            "drivers_mentais_customizados": { "drivers_customizados": [1, 2, 3] },
            "provas_visuais_sugeridas": ["p1", "p2"],
            "pesquisa_web_massiva": { "unique_sources": 12 },
            "insights_exclusivos": ["a", "b", "c", "d", "e", "f"]
        }));
        assert!(validate(&collected, "lenient").sufficient);
        assert!(validate(&collected, "strict").sufficient);
    }

    #[test]
    fn test_revalidation_is_identical() {
        let collected = CollectedSteps::from_value(json!({
            "insights_exclusivos": ["a"],
            "pesquisa_web_massiva": { "unique_sources": 4 }
        }));
        let validator = QualityValidator::default();
        assert_eq!(validator.validate(&collected), validator.validate(&collected));
    }
}
