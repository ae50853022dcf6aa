//! Fallback cascade
//!
//! Runs report tiers in order until one succeeds. A tier that returns an
//! error or panics hands over to the next one; the final tier cannot fail.
//!
//! ```text
//! full → minimal → emergency → critical
//!   ↓        ↓          ↓
//!  Err     Err        Err       (each recorded as a TierFailure)
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use consol_core::Report;
use tracing::{error, info};

use crate::error::AssemblyError;

/// A tier that did not produce a report.
#[derive(Debug)]
pub struct TierFailure {
    pub tier: &'static str,
    pub error: AssemblyError,
}

type TierFn<'a> = Box<dyn FnOnce(&[TierFailure]) -> Result<Report, AssemblyError> + 'a>;

pub struct Cascade<'a> {
    failures: Vec<TierFailure>,
    tiers: Vec<(&'static str, TierFn<'a>)>,
}

impl<'a> Cascade<'a> {
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
            tiers: Vec::new(),
        }
    }

    /// Start from failures that happened before the cascade was built.
    pub fn after(failures: Vec<TierFailure>) -> Self {
        Self {
            failures,
            tiers: Vec::new(),
        }
    }

    /// Add a tier. It sees every failure recorded so far.
    pub fn tier(
        mut self,
        name: &'static str,
        tier: impl FnOnce(&[TierFailure]) -> Result<Report, AssemblyError> + 'a,
    ) -> Self {
        self.tiers.push((name, Box::new(tier)));
        self
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Run tiers in order; `last` runs only when all of them failed.
    pub fn finally(self, last: impl FnOnce(&[TierFailure]) -> Report) -> Report {
        let mut failures = self.failures;

        for (name, tier) in self.tiers {
            match guarded(|| tier(&failures)) {
                Ok(report) => {
                    info!(tier = name, kind = %report.kind(), "report tier succeeded");
                    return report;
                }
                Err(e) => {
                    error!(tier = name, error = %e, "report tier failed");
                    failures.push(TierFailure { tier: name, error: e });
                }
            }
        }

        error!(failed = failures.len(), "every report tier failed");
        last(&failures)
    }
}

impl Default for Cascade<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `f`, turning a panic into `AssemblyError::Panic`.
pub fn guarded<T>(f: impl FnOnce() -> Result<T, AssemblyError>) -> Result<T, AssemblyError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(AssemblyError::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
