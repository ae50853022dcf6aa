//! Data collection: everything the step store holds for a session.
use serde_json::Value;
use tracing::{info, warn};

use consol_core::{CollectedSteps, SessionId};
use consol_store::StepStore;

/// Steps the consolidation writes about itself; never treated as analysis output.
pub const BOOKKEEPING_STEPS: [&str; 4] = [
    "consolidacao_iniciada",
    "validacao_qualidade",
    "relatorio_final_consolidado",
    "relatorio_emergencia",
];

/// Recover every successful step of the session. Never fails: store errors
/// degrade to empty sets and are logged.
pub fn collect(store: &dyn StepStore, pipeline_data: Value, session: &SessionId) -> CollectedSteps {
    let mut collected = CollectedSteps::new(pipeline_data);

    match store.list_steps(session) {
        Ok(names) => {
            for name in names {
                if BOOKKEEPING_STEPS.contains(&name.as_str()) {
                    continue;
                }
                match store.load_step(&name, session) {
                    Ok(Some(record)) if record.is_success() => {
                        collected.insert_step(name, record.data)
                    }
                    Ok(Some(_)) => warn!(step = %name, "step recorded as error, skipped"),
                    Ok(None) => warn!(step = %name, "listed step has no readable record"),
                    Err(e) => warn!(step = %name, error = %e, "failed to load step"),
                }
            }
        }
        Err(e) => {
            warn!(session = %session, error = %e, "failed to list steps");
            if let Err(e) = store.save_error("coleta_dados", &e.to_string(), session) {
                warn!(error = %e, "failed to record collection error");
            }
        }
    }

    let files = store.list_files(session).unwrap_or_else(|e| {
        warn!(session = %session, error = %e, "failed to list intermediate files");
        Vec::new()
    });

    info!(
        components = collected.available().len(),
        files = files.len(),
        "session data collected"
    );
    collected.with_files(files)
}
