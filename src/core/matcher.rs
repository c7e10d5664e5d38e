use crate::core::constraint::{compile, Constraint};
use crate::core::evaluator::{evaluate, MatchMode};
use crate::core::schema::Schema;
use crate::models::{Listing, PreferenceProfile};
use std::sync::Arc;

/// Result of one matching run.
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<Listing>,
    pub total_candidates: usize,
}

/// Matching orchestrator: compiles a stored profile against the attribute
/// schema and evaluates the constraint set over the candidate pool.
///
/// # Pipeline
/// 1. Compile the sparse profile into typed constraints (schema order)
/// 2. Drop non-available candidates
/// 3. Evaluate constraints under the caller-selected mode
#[derive(Debug, Clone)]
pub struct Matcher {
    schema: Arc<Schema>,
}

impl Matcher {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Compile the profile's constraint set without evaluating it. Exposed
    /// for diagnostics and tests; ordering follows schema declaration order.
    pub fn compile_profile(&self, profile: &PreferenceProfile) -> Vec<Constraint> {
        compile(&self.schema, profile)
    }

    /// Find all listings in `candidates` that satisfy `profile` under `mode`.
    pub fn find_matches(
        &self,
        profile: &PreferenceProfile,
        candidates: Vec<Listing>,
        mode: MatchMode,
    ) -> MatchOutcome {
        let total_candidates = candidates.len();
        let constraints = compile(&self.schema, profile);

        tracing::debug!(
            "matching client {}: {} constraints over {} candidates ({:?})",
            profile.client_id,
            constraints.len(),
            total_candidates,
            mode
        );

        let matches = evaluate(candidates, &constraints, mode);

        MatchOutcome {
            matches,
            total_candidates,
        }
    }
}
