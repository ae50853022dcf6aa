//! Everything recovered for one session, ready for validation and assembly.
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::data_model::StepFile;
use crate::payload::{decode_object, MentalDrivers, ProjectData, StepKind, WebResearch};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectedSteps {
    /// Data handed in directly by the orchestrator.
    pub pipeline_data: Map<String, Value>,
    /// Raw file listing of the session in the step store.
    pub files: Vec<StepFile>,
    steps: BTreeMap<String, Value>,
    available: Vec<String>,
}

impl CollectedSteps {
    /// Start a collection from orchestrator data. A non-object is ignored.
    pub fn new(pipeline_data: Value) -> Self {
        let pipeline_data = match pipeline_data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            pipeline_data,
            ..Default::default()
        }
    }

    /// Treat every key of a JSON object as a successfully recovered step.
    pub fn from_value(steps: Value) -> Self {
        let mut collected = Self::default();
        if let Value::Object(map) = steps {
            for (name, value) in map {
                collected.insert_step(name, value);
            }
        }
        collected
    }

    pub fn insert_step(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if !self.steps.contains_key(&name) {
            self.available.push(name.clone());
        }
        self.steps.insert(name, value);
    }

    pub fn with_files(mut self, files: Vec<StepFile>) -> Self {
        self.files = files;
        self
    }

    pub fn step(&self, name: &str) -> Option<&Value> {
        self.steps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Names of recovered steps, in recovery order.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn recovered(&self) -> &BTreeMap<String, Value> {
        &self.steps
    }

    /// A principal module: the recovered step first, then orchestrator data.
    pub fn module(&self, kind: StepKind) -> Option<&Value> {
        self.steps
            .get(kind.key())
            .or_else(|| self.pipeline_data.get(kind.key()))
    }

    pub fn drivers(&self) -> Option<MentalDrivers> {
        self.step(StepKind::MentalDrivers.key()).and_then(decode_object)
    }

    pub fn visual_proofs(&self) -> Option<&[Value]> {
        self.step(StepKind::VisualProofs.key())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn research(&self) -> Option<WebResearch> {
        self.step(StepKind::WebResearch.key()).and_then(decode_object)
    }

    pub fn insights(&self) -> Option<&[Value]> {
        self.step(StepKind::Insights.key())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn project(&self) -> ProjectData {
        self.module(StepKind::ProjectData)
            .and_then(decode_object)
            .unwrap_or_default()
    }
}
