//! The generation loop: scenarios × iterations, with per-iteration fault isolation.
//!
//! Each iteration resolves to an `IterationOutcome`. A fault in one iteration is
//! logged and forgotten; counters move only after the sink accepted a batch, and
//! the loop always paces before the next call, whatever happened.

use tracing::{error, info, instrument, warn};

use crate::config::{Prompts, RunSettings};
use crate::domain::{RunCounters, Scenario};
use crate::error::GenError;
use crate::generator::{generate_batch, ChatModel};
use crate::sink::CorpusSink;

/// What a single iteration amounted to.
#[derive(Debug)]
pub enum IterationOutcome {
  Persisted(usize),
  Empty,
  Fault(GenError),
}

pub struct Driver<'a, M: ChatModel + ?Sized> {
  model: &'a M,
  sink: CorpusSink,
  prompts: &'a Prompts,
  settings: &'a RunSettings,
}

impl<'a, M: ChatModel + ?Sized> Driver<'a, M> {
  pub fn new(model: &'a M, sink: CorpusSink, prompts: &'a Prompts, settings: &'a RunSettings) -> Self {
    Self { model, sink, prompts, settings }
  }

  /// Attempt every scenario `batch_loops` times, in definition order, and return the counts.
  #[instrument(level = "info", skip_all, fields(scenarios = scenarios.len(), loops = self.settings.batch_loops))]
  pub async fn run(&self, scenarios: &[Scenario]) -> RunCounters {
    let mut counters = RunCounters::for_scenarios(scenarios);
    let loops = self.settings.batch_loops;

    for scenario in scenarios {
      info!(target: "generation", scenario = %scenario.key, "=== Generating scenario ===");

      for i in 0..loops {
        let iteration = i + 1;
        match self.run_iteration(scenario).await {
          IterationOutcome::Persisted(count) => {
            counters.record(&scenario.key, count);
            info!(
              target: "generation",
              scenario = %scenario.key, iteration, loops, count, total = counters.total,
              "Batch persisted"
            );
          }
          IterationOutcome::Empty => {
            warn!(target: "generation", scenario = %scenario.key, iteration, loops, "No usable records in reply");
          }
          IterationOutcome::Fault(e) => {
            error!(target: "generation", scenario = %scenario.key, iteration, loops, error = %e, "Iteration failed; skipping");
          }
        }

        tokio::time::sleep(self.settings.pace()).await;
      }

      info!(
        target: "generation",
        scenario = %scenario.key,
        count = counters.scenario_count(&scenario.key),
        "Scenario finished"
      );
    }

    info!(target: "generation", total = counters.total, output = %self.sink.path().display(), "Generation complete");
    counters
  }

  /// Generate and persist one batch. Every fault is folded into the outcome.
  pub async fn run_iteration(&self, scenario: &Scenario) -> IterationOutcome {
    let batch = match generate_batch(self.model, self.prompts, self.settings, scenario).await {
      Ok(batch) => batch,
      Err(e) => return IterationOutcome::Fault(e),
    };
    if batch.is_empty() {
      return IterationOutcome::Empty;
    }
    match self.sink.append(&batch) {
      Ok(n) => IterationOutcome::Persisted(n),
      Err(e) => IterationOutcome::Fault(e),
    }
  }
}
