//! One generation step: scenario → prompt → model reply → normalized batch.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::{Prompts, RunSettings};
use crate::domain::{NormalizedRecord, Scenario};
use crate::error::GenError;
use crate::normalize::normalize_all;
use crate::recovery::parse_reply;
use crate::util::{fill_template, trunc_for_log};

/// Text-in/text-out access to a chat model. Faults are returned, never retried here.
#[async_trait]
pub trait ChatModel: Send + Sync {
  async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String, GenError>;
}

pub fn build_user_prompt(prompts: &Prompts, settings: &RunSettings, scenario: &Scenario) -> String {
  let count = settings.examples_per_prompt.to_string();
  fill_template(
    &prompts.user_template,
    &[("description", scenario.description.as_str()), ("count", count.as_str())],
  )
}

/// Ask the model for one batch of examples and return whatever survives recovery
/// and normalization (possibly nothing).
#[instrument(level = "info", skip(model, prompts, settings, scenario), fields(scenario = %scenario.key))]
pub async fn generate_batch<M: ChatModel + ?Sized>(
  model: &M,
  prompts: &Prompts,
  settings: &RunSettings,
  scenario: &Scenario,
) -> Result<Vec<NormalizedRecord>, GenError> {
  let user = build_user_prompt(prompts, settings, scenario);
  let reply = model.complete(&prompts.system, &user, settings.temperature).await?;
  debug!(reply_len = reply.len(), preview = %trunc_for_log(&reply, 80), "Model reply received");

  let candidates = parse_reply(&reply);
  let records = normalize_all(&candidates, &prompts.instruction);
  debug!(candidates = candidates.len(), kept = records.len(), "Normalized batch");
  Ok(records)
}

#[cfg(test)]
pub(crate) mod testing {
  use std::collections::VecDeque;
  use std::sync::Mutex;

  use super::*;

  /// Replays canned replies in order and records every user prompt it was sent.
  #[derive(Default)]
  pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, GenError>>>,
    pub prompts: Mutex<Vec<String>>,
  }

  impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, GenError>>) -> Self {
      Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
      self.prompts.lock().unwrap().len()
    }
  }

  #[async_trait]
  impl ChatModel for ScriptedModel {
    async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> Result<String, GenError> {
      self.prompts.lock().unwrap().push(user.to_string());
      self.replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Ok(String::new()))
    }
  }
}
