//! Consolidation service
//!
//! One explicitly constructed object owning the configuration and the step
//! store. Orchestrators call `consolidate` once per session.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use consol_core::{QualityAssessment, RenderFormat, Report, SessionId};
use consol_out::{MultiFormatRenderer, ReportRenderer, ReportStatistics, TemplatesFile};
use consol_quality::QualityValidator;
use consol_store::{FsStepStore, StepStore};

use crate::assembler::{ReportAssembler, REPORT_CATEGORY};
use crate::cascade::{guarded, TierFailure};
use crate::collect::collect;
use crate::config::ConsolidationConfig;
use crate::error::AssemblyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// Full or minimal report
    #[serde(rename = "consolidado_com_sucesso")]
    Consolidated,
    /// Emergency or critical report
    #[serde(rename = "consolidado_com_fallback")]
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationOutcome {
    pub session_id: SessionId,
    #[serde(rename = "relatorio_principal")]
    pub report: Report,
    #[serde(rename = "formatos_disponiveis")]
    pub formats: BTreeMap<RenderFormat, PathBuf>,
    #[serde(rename = "qualidade")]
    pub quality: Option<QualityAssessment>,
    #[serde(rename = "estatisticas_relatorio")]
    pub statistics: Option<ReportStatistics>,
    pub status: OutcomeStatus,
}

pub struct ConsolidationService {
    config: ConsolidationConfig,
    store: Arc<dyn StepStore>,
    validator: QualityValidator,
    assembler: ReportAssembler,
    renderer: MultiFormatRenderer,
}

impl ConsolidationService {
    pub fn new(
        config: ConsolidationConfig,
        store: Arc<dyn StepStore>,
    ) -> Result<Self, AssemblyError> {
        config.validate()?;
        let templates = TemplatesFile::embedded_with_overrides(config.templates_path.as_deref())?;
        let renderer = MultiFormatRenderer::with_settings(config.output_settings(), &templates)?
            .only(&config.formats);

        Ok(Self {
            validator: QualityValidator::new(config.profile.clone()),
            assembler: ReportAssembler::new(Arc::clone(&store)),
            renderer,
            config,
            store,
        })
    }

    /// Service over a filesystem store rooted at `config.store_root`.
    pub fn with_fs_store(config: ConsolidationConfig) -> Result<Self, AssemblyError> {
        let store = FsStepStore::open(&config.store_root)?;
        Self::new(config, Arc::new(store))
    }

    /// Register or replace the renderer of one format. Formats disabled in
    /// the configuration stay disabled.
    pub fn with_renderer(mut self, renderer: impl ReportRenderer + 'static) -> Self {
        let format = renderer.format();
        if self.config.formats.contains(&format) {
            self.renderer = self.renderer.with_renderer(renderer);
        } else {
            warn!(format = %format, "renderer ignored, format disabled by configuration");
        }
        self
    }

    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn StepStore> {
        &self.store
    }

    /// Consolidate one session. Never fails: the worst case is a critical
    /// report with no rendered files.
    pub fn consolidate(
        &self,
        pipeline_data: Value,
        session: &SessionId,
        force_minimal: bool,
    ) -> ConsolidationOutcome {
        info!(session = %session, force_minimal, "consolidation started");
        self.record(
            "consolidacao_iniciada",
            json!({
                "session_id": session,
                "timestamp": Utc::now(),
                "force_minimal": force_minimal,
            }),
            session,
        );

        let prepared = guarded(|| {
            let collected = collect(self.store.as_ref(), pipeline_data, session);
            let quality = self.validator.validate(&collected);
            Ok((collected, quality))
        });

        let (report, quality) = match prepared {
            Ok((collected, quality)) => {
                let assessment = serde_json::to_value(&quality).unwrap_or(Value::Null);
                self.record("validacao_qualidade", assessment, session);
                let report = self.assembler.assemble(&collected, &quality, session, force_minimal);
                (report, Some(quality))
            }
            Err(e) => {
                warn!(session = %session, error = %e, "collection failed, recovering");
                let report = self.assembler.recover(
                    session,
                    vec![TierFailure {
                        tier: "coleta",
                        error: e,
                    }],
                );
                (report, None)
            }
        };

        let status = if report.kind().is_regular() {
            OutcomeStatus::Consolidated
        } else {
            if let Err(e) = self.store.save_error(
                "consolidacao_final",
                &format!("consolidation fell back to {}", report.kind()),
                session,
            ) {
                warn!(error = %e, "failed to record consolidation error");
            }
            OutcomeStatus::Fallback
        };

        match report.to_value() {
            Ok(value) => self.record("relatorio_final_consolidado", value, session),
            Err(e) => warn!(error = %e, "report not serializable, not persisted"),
        }

        let formats = self.renderer.render_all(&report);
        let statistics = ReportStatistics::compute(&report)
            .map_err(|e| warn!(error = %e, "report statistics unavailable"))
            .ok();

        info!(
            session = %session,
            kind = %report.kind(),
            formats = formats.len(),
            "consolidation finished"
        );
        ConsolidationOutcome {
            session_id: session.clone(),
            report,
            formats,
            quality,
            statistics,
            status,
        }
    }

    /// Fire-and-forget step write.
    fn record(&self, name: &str, data: Value, session: &SessionId) {
        if let Err(e) = self.store.save_step(name, data, REPORT_CATEGORY, session) {
            warn!(step = name, error = %e, "failed to save consolidation step");
        }
    }
}
