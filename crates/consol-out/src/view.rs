//! Flat, template-friendly view of a report.
//!
//! Every report shape projects onto the same fields so one template per
//! format covers full, minimal and emergency reports alike.

use consol_core::{
    display_text, intermediate_location, payload::decode_object, ExecutiveSummary, MentalDrivers,
    Report, ReportBody, StepKind,
};
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub session_id: String,
    pub data: String,
    pub tipo: &'static str,
    pub resumo: Option<ExecutiveSummary>,
    pub drivers: Vec<DriverView>,
    pub insights: Vec<String>,
    pub componentes: Vec<String>,
    pub localizacao: String,
    pub total_arquivos: usize,
    pub status: String,
    pub avaliacao: String,
    pub recomendacao: String,
    pub instrucoes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverView {
    pub nome: String,
    pub gatilho: String,
    pub historia: String,
}

fn or_na(value: Option<String>) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl ReportView {
    pub fn from_report(report: &Report) -> Self {
        let mut view = ReportView {
            session_id: report.session_id.to_string(),
            data: report.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            tipo: report.kind().as_str(),
            resumo: None,
            drivers: Vec::new(),
            insights: Vec::new(),
            componentes: Vec::new(),
            localizacao: intermediate_location(&report.session_id),
            total_arquivos: 0,
            status: NOT_AVAILABLE.to_string(),
            avaliacao: NOT_AVAILABLE.to_string(),
            recomendacao: NOT_AVAILABLE.to_string(),
            instrucoes: Vec::new(),
        };

        match &report.body {
            ReportBody::Full(full) => {
                if let Some(drivers) = full
                    .modules
                    .get(StepKind::MentalDrivers.key())
                    .and_then(decode_object::<MentalDrivers>)
                {
                    view.drivers = drivers
                        .drivers()
                        .into_iter()
                        .map(|d| DriverView {
                            nome: or_na(d.nome),
                            gatilho: or_na(d.gatilho_central),
                            historia: or_na(d.roteiro_ativacao.historia_analogia),
                        })
                        .collect();
                }
                if let Some(insights) = full
                    .modules
                    .get(StepKind::Insights.key())
                    .and_then(|v| v.as_array())
                {
                    view.insights = insights.iter().map(display_text).collect();
                }
                if let Some(metadata) = &report.metadata_consolidacao {
                    view.localizacao = metadata.acesso_direto.clone();
                    view.total_arquivos = metadata.arquivos_intermediarios.len();
                }
                let diagnostic = &full.diagnostico_final;
                view.resumo = Some(full.resumo_executivo.clone());
                view.componentes = diagnostic.componentes_funcionaram.clone();
                view.status = diagnostic.status_geral.clone();
                view.avaliacao = diagnostic.avaliacao.clone();
                view.recomendacao = diagnostic.recomendacao.clone();
            }
            ReportBody::Minimal(minimal) => {
                let diagnosis = &minimal.diagnostico_problemas;
                view.componentes = minimal.componentes_gerados.clone();
                view.localizacao = minimal.arquivos_intermediarios.localizacao.clone();
                view.total_arquivos = minimal.arquivos_intermediarios.total_arquivos;
                view.status = minimal.status.clone();
                view.avaliacao = if diagnosis.problemas_identificados.is_empty() {
                    minimal.resumo_preservacao.valor_preservado.clone()
                } else {
                    diagnosis.problemas_identificados.join("; ")
                };
                view.recomendacao = or_na(diagnosis.proximos_passos.first().cloned());
                view.instrucoes = vec![minimal.arquivos_intermediarios.instrucoes_acesso.clone()];
            }
            ReportBody::Emergency(emergency) => {
                view.localizacao = emergency.garantias.localizacao_dados.clone();
                view.total_arquivos = emergency.arquivos_disponiveis.len();
                view.status = emergency.status.clone();
                view.avaliacao = emergency.erro_consolidacao.clone();
                view.recomendacao = emergency.valor_preservado.clone();
                view.instrucoes = emergency.instrucoes_recuperacao.clone();
            }
            ReportBody::Critical(critical) => {
                view.status = critical.status.clone();
                view.avaliacao = format!("{} / {}", critical.erro_original, critical.erro_fallback);
                view.recomendacao = critical.instrucao.clone();
                view.instrucoes = vec![critical.instrucao.clone()];
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consol_core::{CriticalReport, SessionId};

    #[test]
    fn test_critical_projection() {
        let report = Report::new(
            SessionId::new("sess-9"),
            ReportBody::Critical(CriticalReport {
                erro_original: "a".to_string(),
                erro_fallback: "b".to_string(),
                status: "CRITICO_MAS_SESSAO_PRESERVADA".to_string(),
                instrucao: "Verifique manualmente: relatorios_intermediarios/sess-9/".to_string(),
            }),
        );
        let view = ReportView::from_report(&report);
        assert_eq!(view.tipo, "emergencia_critica");
        assert_eq!(view.localizacao, "relatorios_intermediarios/sess-9/");
        assert_eq!(view.avaliacao, "a / b");
        assert!(view.resumo.is_none());
        assert!(view.drivers.is_empty());
    }

    #[test]
    fn test_missing_driver_fields_read_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some(String::new())), "N/A");
        assert_eq!(or_na(Some("x".to_string())), "x");
    }
}
