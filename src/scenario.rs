//! Scenario runner for comparing pricing models and batch projections
//!
//! Holds one set of assumptions and runs many projections against it.

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::projection::{PricingModelParams, ProjectionEngine, ProjectionResult};
use crate::statement::StatementData;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// // Same statement, every model the reseller is considering
/// let results = runner.compare_models(&statement, &offers);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with default in-memory assumptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> crate::Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?))
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> crate::Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions),
        }
    }

    /// Run a single projection
    pub fn run(&self, statement: &StatementData, params: &PricingModelParams) -> ProjectionResult {
        self.engine.project_params(statement, params)
    }

    /// Run several pricing models for one statement, in the order given
    pub fn compare_models(&self, statement: &StatementData, params: &[PricingModelParams]) -> Vec<ProjectionResult> {
        params
            .iter()
            .map(|p| self.engine.project_params(statement, p))
            .collect()
    }

    /// Run one pricing model across many statements in parallel.
    /// Output order matches input order.
    pub fn run_batch(&self, statements: &[StatementData], params: &PricingModelParams) -> Vec<ProjectionResult> {
        statements
            .par_iter()
            .map(|s| self.engine.project_params(s, params))
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }
}
