//! hyphen-datagen · training data generator for reading '-' in Chinese text
//!
//! - Prompts an OpenAI-compatible chat model once per iteration, per scenario
//! - Salvages records from malformed / truncated JSON replies
//! - Appends `{instruction, input, output}` lines to a JSONL corpus
//!
//! Important env variables:
//!   OPENAI_API_KEY     : bearer token (DEEPSEEK_API_KEY is accepted too); required
//!   OPENAI_BASE_URL    : default "https://api.deepseek.com/v1"
//!   OPENAI_MODEL       : default "deepseek-chat"
//!   GEN_CONFIG_PATH    : path to TOML config (run settings, prompts, scenarios)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod seeds;
mod recovery;
mod normalize;
mod generator;
mod sink;
mod driver;
mod openai;

use std::time::Duration;
use tracing::info;

use crate::config::load_gen_config_from_env;
use crate::driver::Driver;
use crate::openai::OpenAI;
use crate::sink::CorpusSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_gen_config_from_env();
  let scenarios = cfg.scenarios();

  let model = OpenAI::from_env(Duration::from_secs(cfg.run.request_timeout_secs))
    .ok_or("OPENAI_API_KEY (or DEEPSEEK_API_KEY) must be set")?;
  info!(target: "hyphen_datagen", base_url = %model.base_url, model = %model.model, "Model client ready");

  let sink = CorpusSink::new(&cfg.run.output_file);
  info!(
    target: "hyphen_datagen",
    output = %cfg.run.output_file.display(),
    scenarios = scenarios.len(),
    loops = cfg.run.batch_loops,
    pace_ms = cfg.run.pace_ms,
    "Starting generation"
  );

  let driver = Driver::new(&model, sink, &cfg.prompts, &cfg.run);
  let counters = driver.run(&scenarios).await;

  for (key, count) in &counters.per_scenario {
    info!(target: "hyphen_datagen", scenario = %key, count, "Scenario total");
  }
  info!(target: "hyphen_datagen", total = counters.total, "All scenarios done");
  Ok(())
}
