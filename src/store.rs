//! Request template store.
//!
//! Walks a simulation's templates in declaration order and returns the
//! response of the first template whose every field matches the request.

use crate::config::MatcherSettings;
use crate::error::MatchError;
use crate::models::{RequestDetails, RequestTemplateResponsePair, ResponseDetails, Simulation};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Extension point consulted when a lookup allows stateful selection.
///
/// Called only for templates that already matched the request. Returning
/// `false` skips the candidate and lets a later template be selected.
pub trait StatefulSelection: Send + Sync {
    fn admit(
        &self,
        request: &RequestDetails,
        index: usize,
        pair: &RequestTemplateResponsePair,
    ) -> bool;
}

/// Admits every candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl StatefulSelection for PassThrough {
    fn admit(&self, _: &RequestDetails, _: usize, _: &RequestTemplateResponsePair) -> bool {
        true
    }
}

/// Template matching engine.
///
/// Holds no simulation state; every lookup is handed the simulation to search.
pub struct RequestTemplateStore {
    settings: MatcherSettings,
    selection: Box<dyn StatefulSelection>,
}

impl Default for RequestTemplateStore {
    fn default() -> Self {
        Self::new(MatcherSettings::default())
    }
}

impl RequestTemplateStore {
    pub fn new(settings: MatcherSettings) -> Self {
        Self {
            settings,
            selection: Box::new(PassThrough),
        }
    }

    /// Replace the stateful selection hook.
    pub fn with_selection(mut self, selection: impl StatefulSelection + 'static) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Find the response for a request.
    ///
    /// Returns `Ok(None)` when no template matches. A malformed body
    /// comparison on a template whose other fields matched aborts the lookup,
    /// even if a later template would have matched.
    pub fn get_response<'a>(
        &self,
        request: &RequestDetails,
        allow_stateful_selection: bool,
        simulation: &'a Simulation,
    ) -> Result<Option<&'a ResponseDetails>, MatchError> {
        for (idx, (pair, compiled)) in simulation.entries().enumerate() {
            if let Some(field) = compiled.mismatched_field(request) {
                trace!(template = idx, field, "Field did not match");
                continue;
            }

            match compiled.matches_body(&request.body) {
                Ok(true) => {}
                Ok(false) => {
                    trace!(template = idx, "Body did not match");
                    continue;
                }
                Err(e) => {
                    warn!(
                        template = idx,
                        error = %e,
                        "Body template cannot be compared with request body"
                    );
                    return Err(e);
                }
            }

            if allow_stateful_selection && !self.selection.admit(request, idx, pair) {
                trace!(template = idx, "Template declined by stateful selection");
                continue;
            }

            if self.settings.log_matches {
                debug!(
                    template = idx,
                    method = %request.method,
                    destination = %request.destination,
                    path = %request.path,
                    "Request matched template"
                );
            }
            return Ok(Some(&pair.response));
        }

        if self.settings.log_unmatched {
            debug!(
                method = %request.method,
                destination = %request.destination,
                path = %request.path,
                templates = simulation.len(),
                "No template matched request"
            );
        }
        Ok(None)
    }

    /// Look up a request against the current snapshot of a handle.
    pub fn lookup(
        &self,
        request: &RequestDetails,
        allow_stateful_selection: bool,
        handle: &SimulationHandle,
    ) -> Result<Option<ResponseDetails>, MatchError> {
        let simulation = handle.load();
        Ok(self
            .get_response(request, allow_stateful_selection, &simulation)?
            .cloned())
    }
}

/// Shared, atomically replaceable simulation.
///
/// Readers get an immutable snapshot; `replace` publishes a new one without
/// disturbing lookups already holding the old snapshot.
pub struct SimulationHandle {
    current: ArcSwap<Simulation>,
}

impl Default for SimulationHandle {
    fn default() -> Self {
        Self::new(Simulation::default())
    }
}

impl SimulationHandle {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            current: ArcSwap::from_pointee(simulation),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Simulation> {
        self.current.load_full()
    }

    /// Publish a new simulation.
    pub fn replace(&self, simulation: Simulation) {
        info!(templates = simulation.len(), "Simulation replaced");
        self.current.store(Arc::new(simulation));
    }
}
