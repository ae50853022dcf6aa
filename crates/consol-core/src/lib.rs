//! Consol Core: Data Model, Report e Sessão
//!
//! Tipos compartilhados por validação, montagem, renderização e persistência.

pub mod collected;
pub mod data_model;
pub mod error;
pub mod format;
pub mod logging;
pub mod payload;
pub mod quality;
pub mod report;
pub mod session;

pub use collected::CollectedSteps;
pub use data_model::{StepFile, StepRecord, StepStatus, ERROR_CATEGORY};
pub use error::ConsolError;
pub use format::RenderFormat;
pub use payload::{display_text, Driver, MentalDrivers, ProjectData, StepKind, WebResearch};
pub use quality::QualityAssessment;
pub use report::{
    ConsolidationMetadata, CriticalReport, EmergencyReport, ExecutiveSummary, FinalDiagnostic,
    FullReport, Guarantees, IntermediateFiles, MinimalReport, PreservationSummary,
    ProblemDiagnosis, Report, ReportBody, ReportKind,
};
pub use session::SessionId;

/// Directory prefix under which a session's intermediate files are exposed.
pub const INTERMEDIATE_ROOT: &str = "relatorios_intermediarios";

/// Human-facing location of a session's intermediate files.
pub fn intermediate_location(session_id: &SessionId) -> String {
    format!("{}/{}/", INTERMEDIATE_ROOT, session_id)
}
