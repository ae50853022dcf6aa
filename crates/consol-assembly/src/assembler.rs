//! Report Assembler
//!
//! Builds the report for a session from its collected steps and quality
//! assessment, degrading full → minimal → emergency → critical.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, warn};

use consol_core::{
    intermediate_location, CollectedSteps, ConsolidationMetadata, CriticalReport, EmergencyReport,
    ExecutiveSummary, FinalDiagnostic, FullReport, Guarantees, IntermediateFiles, MinimalReport,
    PreservationSummary, ProblemDiagnosis, QualityAssessment, Report, ReportBody, SessionId,
    StepFile, StepKind,
};
use consol_quality::ModuleCoverage;
use consol_store::StepStore;

use crate::cascade::{Cascade, TierFailure};
use crate::error::AssemblyError;

/// Category every report-level step is saved under.
pub const REPORT_CATEGORY: &str = "analise_completa";

const NOT_INFORMED: &str = "Não informado";
const TOP_FINDINGS: usize = 5;

const MINIMAL_NEXT_STEPS: [&str; 4] = [
    "Configure APIs faltantes para análise completa",
    "Execute nova análise com configuração completa",
    "Analise manualmente os arquivos intermediários salvos",
    "Considere executar componentes individuais para debug",
];

pub struct ReportAssembler {
    store: Arc<dyn StepStore>,
}

impl ReportAssembler {
    pub fn new(store: Arc<dyn StepStore>) -> Self {
        Self { store }
    }

    /// Always returns a report. Insufficient quality or `force_minimal`
    /// never yields a full report.
    pub fn assemble(
        &self,
        collected: &CollectedSteps,
        quality: &QualityAssessment,
        session: &SessionId,
        force_minimal: bool,
    ) -> Report {
        let mut cascade = Cascade::new();
        if quality.sufficient && !force_minimal {
            cascade = cascade.tier("completo", |_| self.full_report(collected, quality, session));
        } else {
            warn!(
                score = quality.score,
                force_minimal, "quality insufficient or minimal forced, skipping full report"
            );
        }
        cascade
            .tier("minimo", |_| self.minimal_report(collected, quality, session))
            .tier("emergencia", |failures| {
                self.emergency_report(session, &last_error(failures), Some(quality))
            })
            .finally(|failures| critical_report(session, failures))
    }

    /// Emergency then critical, for failures that happened before assembly.
    pub fn recover(&self, session: &SessionId, failures: Vec<TierFailure>) -> Report {
        Cascade::after(failures)
            .tier("emergencia", |failures| {
                self.emergency_report(session, &last_error(failures), None)
            })
            .finally(|failures| critical_report(session, failures))
    }

    pub fn full_report(
        &self,
        collected: &CollectedSteps,
        quality: &QualityAssessment,
        session: &SessionId,
    ) -> Result<Report, AssemblyError> {
        session.validate()?;

        let mut modules = BTreeMap::new();
        for kind in StepKind::PRINCIPAL {
            if let Some(value) = collected.module(kind) {
                modules.insert(kind.key().to_string(), value.clone());
            }
        }

        let project = collected.project();
        let segment = project.segmento.unwrap_or_else(|| NOT_INFORMED.to_string());
        let product = project.produto.unwrap_or_else(|| NOT_INFORMED.to_string());
        let drivers = collected.drivers().map_or(0, |d| d.count());
        let proofs = collected.visual_proofs().map_or(0, <[Value]>::len);

        let mut recommendations = Vec::new();
        if drivers > 0 {
            recommendations.push(format!(
                "Implemente os {} drivers mentais identificados",
                drivers
            ));
        }
        if proofs > 0 {
            recommendations.push(format!("Desenvolva as {} provas visuais sugeridas", proofs));
        }

        let summary = ExecutiveSummary {
            principais_descobertas: collected
                .insights()
                .map(|items| items.iter().take(TOP_FINDINGS).cloned().collect())
                .unwrap_or_default(),
            recomendacoes_imediatas: recommendations,
            proximos_passos: vec![
                format!("Implemente estratégias específicas para {}", segment),
                "Execute plano de ação detalhado".to_string(),
                "Monitore métricas de performance".to_string(),
                "Ajuste estratégias baseado em resultados".to_string(),
            ],
            segmento_analisado: segment,
            produto_servico: product,
            qualidade_analise: quality.score,
            componentes_gerados: collected.available().len(),
        };

        let body = ReportBody::Full(FullReport {
            qualidade_validada: true,
            score_qualidade: quality.score,
            resumo_executivo: summary,
            diagnostico_final: final_diagnostic(collected, quality),
            modules,
        });
        let files = self.session_files(collected, session);
        Ok(Report::new(session.clone(), body).with_metadata(self.metadata(
            session,
            quality,
            "completo",
            files,
        )))
    }

    pub fn minimal_report(
        &self,
        collected: &CollectedSteps,
        quality: &QualityAssessment,
        session: &SessionId,
    ) -> Result<Report, AssemblyError> {
        session.validate()?;

        let files = self.session_files(collected, session);
        let components = collected.available().to_vec();
        let location = self.store.session_location(session);

        let body = ReportBody::Minimal(MinimalReport {
            status: "parcial_mas_preservado".to_string(),
            qualidade_limitada: true,
            score_qualidade: quality.score,
            projeto_dados: collected
                .module(StepKind::ProjectData)
                .cloned()
                .unwrap_or_else(|| json!({})),
            arquivos_intermediarios: IntermediateFiles {
                localizacao: location,
                total_arquivos: files.len(),
                arquivos_disponiveis: files.clone(),
                instrucoes_acesso: "Acesse os arquivos diretamente no diretório para análise manual"
                    .to_string(),
            },
            dados_recuperados: collected.recovered().clone(),
            diagnostico_problemas: ProblemDiagnosis {
                problemas_identificados: quality.problems.clone(),
                recomendacoes: quality.recommendations.clone(),
                proximos_passos: MINIMAL_NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
            },
            resumo_preservacao: PreservationSummary {
                dados_perdidos: "NENHUM - Todos os dados intermediários foram salvos".to_string(),
                componentes_executados: components.len(),
                arquivos_salvos: files.len(),
                recuperacao_possivel: "SIM - Todos os dados podem ser recuperados".to_string(),
                valor_preservado: "ALTO - Análise pode ser completada manualmente".to_string(),
            },
            componentes_gerados: components,
        });
        Ok(Report::new(session.clone(), body).with_metadata(self.metadata(
            session,
            quality,
            "minimo",
            files,
        )))
    }

    /// Lists files tolerantly and persists itself as `relatorio_emergencia`.
    pub fn emergency_report(
        &self,
        session: &SessionId,
        cause: &str,
        quality: Option<&QualityAssessment>,
    ) -> Result<Report, AssemblyError> {
        let files = self.store.list_files(session).unwrap_or_else(|e| {
            warn!(session = %session, error = %e, "emergency report without file listing");
            Vec::new()
        });
        let location = intermediate_location(session);

        let body = ReportBody::Emergency(EmergencyReport {
            status: "ERRO_MAS_DADOS_PRESERVADOS".to_string(),
            erro_consolidacao: cause.to_string(),
            garantias: Guarantees {
                dados_perdidos: "NENHUM".to_string(),
                arquivos_salvos: "SIM".to_string(),
                recuperacao_possivel: "SIM".to_string(),
                localizacao_dados: location.clone(),
            },
            instrucoes_recuperacao: vec![
                format!("1. Acesse o diretório: {}", location),
                "2. Analise os arquivos JSON salvos em cada categoria".to_string(),
                "3. Use os dados para completar análise manualmente".to_string(),
                "4. Execute nova análise com APIs configuradas".to_string(),
            ],
            arquivos_disponiveis: files.clone(),
            valor_preservado: "ALTO - Todos os dados intermediários estão disponíveis".to_string(),
        });

        let mut report = Report::new(session.clone(), body);
        if let Some(quality) = quality {
            report = report.with_metadata(self.metadata(session, quality, "emergencia", files));
        }

        self.store
            .save_step("relatorio_emergencia", report.to_value()?, REPORT_CATEGORY, session)?;
        Ok(report)
    }

    /// Fresh listing of the session, or what collection saw if the store
    /// cannot list right now.
    fn session_files(&self, collected: &CollectedSteps, session: &SessionId) -> Vec<StepFile> {
        self.store.list_files(session).unwrap_or_else(|e| {
            warn!(session = %session, error = %e, "file listing failed, using collected listing");
            collected.files.clone()
        })
    }

    fn metadata(
        &self,
        session: &SessionId,
        quality: &QualityAssessment,
        kind: &str,
        files: Vec<StepFile>,
    ) -> ConsolidationMetadata {
        ConsolidationMetadata {
            session_id: session.clone(),
            timestamp_consolidacao: Utc::now(),
            qualidade_dados: quality.clone(),
            tipo_relatorio: kind.to_string(),
            arquivos_intermediarios: files,
            garantia_dados: "Todos os dados intermediários preservados".to_string(),
            acesso_direto: self.store.session_location(session),
        }
    }
}

fn final_diagnostic(collected: &CollectedSteps, quality: &QualityAssessment) -> FinalDiagnostic {
    let failed = StepKind::EXPECTED
        .iter()
        .map(|kind| kind.key())
        .filter(|key| !collected.contains(key))
        .map(str::to_string)
        .collect();

    let (status, evaluation, recommendation) = if quality.sufficient {
        (
            "SUCESSO_PARCIAL",
            "Análise bem-sucedida com qualidade adequada",
            "Prosseguir com implementação das estratégias",
        )
    } else {
        (
            "DADOS_PRESERVADOS",
            "Análise parcial mas dados preservados",
            "Configure APIs e execute nova análise para resultados completos",
        )
    };

    FinalDiagnostic {
        status_geral: status.to_string(),
        componentes_funcionaram: collected.available().to_vec(),
        componentes_falharam: failed,
        modulos_sem_dados: ModuleCoverage::inspect(collected).missing,
        qualidade_geral: quality.score,
        dados_preservados: true,
        recuperacao_possivel: true,
        avaliacao: evaluation.to_string(),
        recomendacao: recommendation.to_string(),
    }
}

fn last_error(failures: &[TierFailure]) -> String {
    failures
        .last()
        .map(|f| f.error.to_string())
        .unwrap_or_else(|| "falha desconhecida".to_string())
}

/// Last resort: builds a value, touches nothing.
pub fn critical_report(session: &SessionId, failures: &[TierFailure]) -> Report {
    let original = failures
        .first()
        .map(|f| f.error.to_string())
        .unwrap_or_else(|| "falha desconhecida".to_string());
    let fallback = last_error(failures);
    error!(
        session = %session,
        original = %original,
        fallback = %fallback,
        "critical report issued"
    );

    Report::new(
        session.clone(),
        ReportBody::Critical(CriticalReport {
            erro_original: original,
            erro_fallback: fallback,
            status: "CRITICO_MAS_SESSAO_PRESERVADA".to_string(),
            instrucao: format!("Verifique manualmente: {}", intermediate_location(session)),
        }),
    )
}
