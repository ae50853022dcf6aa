//! End-to-end consolidation: store → validation → assembly → rendering.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use consol_assembly::{
    AssemblyError, ConsolidationConfig, ConsolidationService, OutcomeStatus, ReportAssembler,
};
use consol_core::{
    CollectedSteps, QualityAssessment, RenderFormat, Report, ReportBody, ReportKind, SessionId,
    StepFile, StepRecord,
};
use consol_out::{RenderError, ReportRenderer};
use consol_quality::QualityValidator;
use consol_store::{FsStepStore, MemoryStepStore, StepStore};
use serde_json::{json, Value};

fn scenario_a() -> Value {
    json!({
        "drivers_mentais_customizados": {
            "drivers_customizados": [{ "nome": "d1" }, { "nome": "d2" }]
        },
        "insights_exclusivos": ["i1", "i2", "i3", "i4", "i5"]
    })
}

fn scenario_b() -> Value {
    let mut steps = scenario_a();
    steps["provas_visuais_sugeridas"] = json!(["p1"]);
    steps["pesquisa_web_massiva"] = json!({ "unique_sources": 3 });
    steps
}

fn assemble(steps: Value, store: Arc<dyn StepStore>) -> (Report, QualityAssessment) {
    let collected = CollectedSteps::from_value(steps);
    let quality = QualityValidator::default().validate(&collected);
    let session = SessionId::new("sessao");
    let report = ReportAssembler::new(store).assemble(&collected, &quality, &session, false);
    (report, quality)
}

fn config_in(dir: &std::path::Path) -> ConsolidationConfig {
    ConsolidationConfig {
        store_root: dir.join("intermediarios"),
        output_root: dir.join("finais"),
        ..ConsolidationConfig::default()
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_a_half_signals_minimal() {
    let (report, quality) = assemble(scenario_a(), Arc::new(MemoryStepStore::new()));
    assert_eq!(quality.drivers, 2);
    assert_eq!(quality.insights, 5);
    assert_eq!(quality.visual_proofs, 0);
    assert_eq!(quality.research_sources, 0);
    assert_eq!(quality.satisfied, 2);
    assert_eq!(quality.score, 50.0);
    assert!(!quality.sufficient);
    assert_eq!(report.kind(), ReportKind::Minimal);
}

#[test]
fn test_scenario_b_all_signals_full() {
    let (report, quality) = assemble(scenario_b(), Arc::new(MemoryStepStore::new()));
    assert_eq!(quality.score, 100.0);
    assert!(quality.sufficient);
    assert_eq!(report.kind(), ReportKind::Full);

    let value = report.to_value().unwrap();
    assert_eq!(value["tipo"], "relatorio_completo");
    assert!(value.get("drivers_mentais_customizados").is_some());
    assert!(value.get("insights_exclusivos").is_some());
}

#[test]
fn test_scenario_c_empty_session() {
    let store = Arc::new(MemoryStepStore::new());
    let (report, quality) = assemble(json!({}), store);
    assert_eq!(quality.score, 0.0);
    assert!(!quality.sufficient);

    let ReportBody::Minimal(minimal) = &report.body else {
        panic!("expected minimal report, got {}", report.kind());
    };
    assert!(minimal.componentes_gerados.is_empty());
    assert_eq!(minimal.arquivos_intermediarios.total_arquivos, 0);
}

#[test]
fn test_scenario_c_counts_store_files() {
    let store = Arc::new(MemoryStepStore::new());
    let session = SessionId::new("sessao");
    store.save_error("coleta_dados", "timeout", &session).unwrap();
    store.save_error("avatar_ultra_detalhado", "quota", &session).unwrap();

    let (report, _) = assemble(json!({}), store.clone());
    let ReportBody::Minimal(minimal) = &report.body else {
        panic!("expected minimal report, got {}", report.kind());
    };
    assert_eq!(
        minimal.arquivos_intermediarios.total_arquivos,
        store.list_files(&session).unwrap().len()
    );
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_malformed_inputs_still_produce_reports() {
    let inputs = [
        json!({}),
        json!(null),
        json!([1, 2, 3]),
        json!({ "drivers_mentais_customizados": null, "insights_exclusivos": null }),
        json!({ "drivers_mentais_customizados": ["not", "an", "object"] }),
        json!({ "drivers_mentais_customizados": { "drivers_customizados": 7 } }),
        json!({ "provas_visuais_sugeridas": "p1", "pesquisa_web_massiva": [3] }),
        json!({ "insights_exclusivos": { "a": 1 }, "projeto_dados": "texto" }),
        json!({ "pesquisa_web_massiva": { "unique_sources": -4 } }),
    ];
    for input in inputs {
        let (report, _) = assemble(input.clone(), Arc::new(MemoryStepStore::new()));
        assert!(report.to_value().unwrap().is_object(), "input {}", input);
    }
}

#[test]
fn test_insufficient_never_full() {
    let partials = [
        json!({ "insights_exclusivos": ["a", "b", "c", "d", "e"] }),
        json!({
            "provas_visuais_sugeridas": ["p"],
            "pesquisa_web_massiva": { "unique_sources": 30 }
        }),
        scenario_a(),
    ];
    for steps in partials {
        let (report, quality) = assemble(steps, Arc::new(MemoryStepStore::new()));
        assert!(!quality.sufficient);
        assert_ne!(report.kind(), ReportKind::Full);
    }
}

#[test]
fn test_three_of_four_is_sufficient() {
    let mut steps = scenario_b();
    steps["insights_exclusivos"] = json!(["only one"]);
    let (report, quality) = assemble(steps, Arc::new(MemoryStepStore::new()));
    assert_eq!(quality.satisfied, 3);
    assert!(quality.sufficient);
    assert_eq!(report.kind(), ReportKind::Full);
}

// =============================================================================
// Service
// =============================================================================

#[test]
fn test_service_end_to_end_on_fs_store() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConsolidationService::with_fs_store(config_in(dir.path())).unwrap();
    let session = SessionId::new("a1b2c3d4e5f6");

    for (name, data) in scenario_b().as_object().unwrap() {
        service.store().save_step(name, data.clone(), "analise", &session).unwrap();
    }

    let pipeline_data = json!({ "projeto_dados": { "segmento": "Fitness" } });
    let outcome = service.consolidate(pipeline_data, &session, false);
    assert_eq!(outcome.status, OutcomeStatus::Consolidated);
    assert_eq!(outcome.report.kind(), ReportKind::Full);
    assert_eq!(outcome.quality.as_ref().unwrap().components_found, 4);
    assert_eq!(outcome.formats.len(), 4);
    for path in outcome.formats.values() {
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("relatorio_final_a1b2c3d4_"), "{}", name);
        assert!(path.starts_with(dir.path().join("finais").join("a1b2c3d4e5f6")));
    }
    assert!(outcome.statistics.is_some());

    let store = service.store();
    for step in ["consolidacao_iniciada", "validacao_qualidade", "relatorio_final_consolidado"] {
        assert!(store.load_step(step, &session).unwrap().is_some(), "missing {}", step);
    }
    let saved = store.load_step("relatorio_final_consolidado", &session).unwrap().unwrap();
    assert_eq!(saved.category, "analise_completa");
    assert_eq!(saved.data["resumo_executivo"]["segmento_analisado"], "Fitness");
}

#[test]
fn test_service_rerun_ignores_own_steps() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConsolidationService::with_fs_store(config_in(dir.path())).unwrap();
    let session = SessionId::new("rerun");

    let first = service.consolidate(Value::Null, &session, false);
    let second = service.consolidate(Value::Null, &session, false);
    assert_eq!(first.quality, second.quality);
    assert_eq!(second.quality.as_ref().map(|q| q.components_found), Some(0));
}

#[test]
fn test_service_listing_failure_keeps_minimal() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStepStore::new());
    store.fail_listing(true);
    let service = ConsolidationService::new(config_in(dir.path()), store.clone()).unwrap();
    let session = SessionId::new("quebrada");

    let outcome = service.consolidate(scenario_b(), &session, false);
    assert_eq!(outcome.status, OutcomeStatus::Consolidated);
    assert_eq!(outcome.report.kind(), ReportKind::Minimal);
    assert_eq!(outcome.formats.len(), 4);
    assert!(store
        .records(&session)
        .iter()
        .any(|r| r.name == "coleta_dados" && !r.is_success()));
}

#[test]
fn test_listing_failure_after_collection_keeps_full() {
    let store = Arc::new(MemoryStepStore::new());
    let session = SessionId::new("sessao");
    for (name, data) in scenario_b().as_object().unwrap() {
        store.save_step(name, data.clone(), "analise", &session).unwrap();
    }
    let collected = consol_assembly::collect(store.as_ref(), Value::Null, &session);
    store.fail_listing(true);

    let quality = QualityValidator::default().validate(&collected);
    let report = ReportAssembler::new(store).assemble(&collected, &quality, &session, false);
    assert_eq!(report.kind(), ReportKind::Full);
    let metadata = report.metadata_consolidacao.as_ref().unwrap();
    assert_eq!(metadata.arquivos_intermediarios.len(), 4);
    assert!(report.to_value().unwrap().get("insights_exclusivos").is_some());
}

#[test]
fn test_listing_failure_after_collection_keeps_minimal() {
    let store = Arc::new(MemoryStepStore::new());
    let session = SessionId::new("sessao");
    for (name, data) in scenario_a().as_object().unwrap() {
        store.save_step(name, data.clone(), "analise", &session).unwrap();
    }
    let collected = consol_assembly::collect(store.as_ref(), Value::Null, &session);
    store.fail_listing(true);

    let quality = QualityValidator::default().validate(&collected);
    let report = ReportAssembler::new(store).assemble(&collected, &quality, &session, false);
    let ReportBody::Minimal(minimal) = &report.body else {
        panic!("expected minimal report, got {}", report.kind());
    };
    assert_eq!(minimal.componentes_gerados.len(), 2);
    assert_eq!(minimal.arquivos_intermediarios.total_arquivos, 2);
}

/// Delegates to a memory store but crashes while listing steps.
struct CrashingStore {
    inner: MemoryStepStore,
}

impl StepStore for CrashingStore {
    fn put(&self, record: &StepRecord) -> consol_store::Result<PathBuf> {
        self.inner.put(record)
    }

    fn list_steps(&self, _session: &SessionId) -> consol_store::Result<BTreeSet<String>> {
        panic!("index corrupted")
    }

    fn load_step(
        &self,
        name: &str,
        session: &SessionId,
    ) -> consol_store::Result<Option<StepRecord>> {
        self.inner.load_step(name, session)
    }

    fn list_files(&self, session: &SessionId) -> consol_store::Result<Vec<StepFile>> {
        self.inner.list_files(session)
    }
}

#[test]
fn test_service_collection_crash_falls_back_to_emergency() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CrashingStore {
        inner: MemoryStepStore::new(),
    });
    let service = ConsolidationService::new(config_in(dir.path()), store.clone()).unwrap();
    let session = SessionId::new("quebrada");

    let outcome = service.consolidate(scenario_b(), &session, false);
    assert_eq!(outcome.status, OutcomeStatus::Fallback);
    assert_eq!(outcome.report.kind(), ReportKind::Emergency);
    assert!(outcome.quality.is_none());
    assert_eq!(outcome.formats.len(), 4);

    let records = store.inner.records(&session);
    assert!(records.iter().any(|r| r.name == "relatorio_emergencia"));
    assert!(records
        .iter()
        .any(|r| r.name == "consolidacao_final" && !r.is_success()));
}

#[test]
fn test_service_critical_for_unusable_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStepStore::new());
    let service = ConsolidationService::new(config_in(dir.path()), store).unwrap();

    let outcome = service.consolidate(json!({}), &SessionId::new("a/../b"), true);
    assert_eq!(outcome.report.kind(), ReportKind::Critical);
    assert_eq!(outcome.status, OutcomeStatus::Fallback);
}

struct FailingHtmlRenderer;

impl ReportRenderer for FailingHtmlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn render(&self, _report: &Report) -> Result<String, RenderError> {
        Err(RenderError::Render("injected".to_string()))
    }
}

#[test]
fn test_service_format_independence() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConsolidationService::new(config_in(dir.path()), Arc::new(MemoryStepStore::new()))
        .unwrap()
        .with_renderer(FailingHtmlRenderer);

    let outcome = service.consolidate(json!({}), &SessionId::new("formatos"), false);
    assert_eq!(outcome.formats.len(), 3);
    assert!(!outcome.formats.contains_key(&RenderFormat::Html));
}

#[test]
fn test_service_respects_enabled_formats() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConsolidationConfig {
        formats: vec![RenderFormat::Json],
        ..config_in(dir.path())
    };
    let service = ConsolidationService::new(config, Arc::new(MemoryStepStore::new())).unwrap();
    let outcome = service.consolidate(json!({}), &SessionId::new("so-json"), false);
    assert_eq!(outcome.formats.keys().copied().collect::<Vec<_>>(), vec![RenderFormat::Json]);

    let serialized = serde_json::to_value(&outcome).unwrap();
    assert_eq!(serialized["status"], "consolidado_com_sucesso");
    assert_eq!(serialized["relatorio_principal"]["tipo"], "relatorio_minimo");
    assert!(serialized["formatos_disponiveis"]["json"].is_string());
}

#[test]
fn test_custom_renderer_cannot_enable_disabled_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConsolidationConfig {
        formats: vec![RenderFormat::Json],
        ..config_in(dir.path())
    };
    let service = ConsolidationService::new(config, Arc::new(MemoryStepStore::new()))
        .unwrap()
        .with_renderer(FailingHtmlRenderer);

    let outcome = service.consolidate(json!({}), &SessionId::new("so-json"), false);
    assert_eq!(outcome.formats.keys().copied().collect::<Vec<_>>(), vec![RenderFormat::Json]);
}

#[test]
fn test_service_rejects_invalid_profile() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.profile.sufficiency_ratio = 2.0;
    let built = ConsolidationService::new(config, Arc::new(MemoryStepStore::new()));
    assert!(matches!(built, Err(AssemblyError::Config(_))));
}

#[test]
fn test_fs_store_feeds_validation() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FsStepStore::open(dir.path()).unwrap());
    let session = SessionId::new("fs");
    store.save_step("insights_exclusivos", json!(["x"]), "analise", &session).unwrap();
    let insights = json!(["a", "b", "c", "d", "e"]);
    store.save_step("insights_exclusivos", insights, "analise", &session).unwrap();

    let collected = consol_assembly::collect(store.as_ref(), Value::Null, &session);
    let quality = QualityValidator::default().validate(&collected);
    assert_eq!(quality.insights, 5);
    assert_eq!(collected.files.len(), 2);
}
