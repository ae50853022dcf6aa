//! Consol Assembly: report consolidation for an analysis session.
//!
//! # Flow
//!
//! ```text
//! StepStore → collect → QualityValidator → ReportAssembler → MultiFormatRenderer
//!                ↓             ↓                  ↓                  ↓
//!         CollectedSteps  Assessment   full|minimal|emergency   html|md|json|txt
//! ```

pub mod assembler;
pub mod cascade;
pub mod collect;
pub mod config;
pub mod error;
pub mod service;

pub use assembler::{critical_report, ReportAssembler, REPORT_CATEGORY};
pub use cascade::{guarded, Cascade, TierFailure};
pub use collect::{collect, BOOKKEEPING_STEPS};
pub use config::ConsolidationConfig;
pub use error::AssemblyError;
pub use service::{ConsolidationOutcome, ConsolidationService, OutcomeStatus};
