//! Loading generator configuration (run settings + prompts + scenarios) from TOML.
//!
//! Every section is optional; anything missing falls back to the built-in defaults.
//! See `GenConfig`, `RunSettings` and `Prompts` for the expected schema.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Scenario;
use crate::seeds::default_scenarios;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GenConfig {
  #[serde(default)]
  pub run: RunSettings,
  #[serde(default)]
  pub prompts: Prompts,
  /// Replaces the built-in catalogue when non-empty. Order is generation order.
  #[serde(default)]
  pub scenarios: Vec<Scenario>,
}

impl GenConfig {
  /// Scenarios to iterate, in definition order.
  pub fn scenarios(&self) -> Vec<Scenario> {
    if self.scenarios.is_empty() { default_scenarios() } else { self.scenarios.clone() }
  }
}

/// Static knobs for the generation loop.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RunSettings {
  pub output_file: PathBuf,
  /// Model calls per scenario.
  pub batch_loops: usize,
  /// Delay between iterations, to stay under the provider's rate limit.
  pub pace_ms: u64,
  pub temperature: f32,
  /// How many sentences we ask for in one prompt.
  pub examples_per_prompt: usize,
  pub request_timeout_secs: u64,
}

impl Default for RunSettings {
  fn default() -> Self {
    Self {
      output_file: PathBuf::from("train_data.jsonl"),
      batch_loops: 50,
      pace_ms: 1000,
      temperature: 1.2,
      examples_per_prompt: 50,
      request_timeout_secs: 120,
    }
  }
}

impl RunSettings {
  pub fn pace(&self) -> Duration {
    Duration::from_millis(self.pace_ms)
  }
}

/// Prompts sent to the model plus the instruction stamped on every record.
/// `user_template` understands `{description}` and `{count}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub system: String,
  pub user_template: String,
  pub instruction: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "你是一个专业的数据生成助手。请只返回纯 JSON 格式的数据，不要包含其他解释性文字。".into(),
      user_template: r#"你是一个中文语料生成专家。请根据以下场景生成 {count} 条训练数据。
场景描述：【{description}】

要求：
1. 生成的句子必须包含连字符 '-'。
2. 必须明确 '-' 在该语境下的正确读音（汉字）。
3. 返回格式必须是纯 JSON 列表，不要包含 Markdown 标记。
4. 列表中的每个元素是一个字典，包含两个字段：
   - "input": 包含连字符的中文句子。
   - "output": 连字符在该句子中的正确读音（仅限一个汉字或词，如"比"、"负"、"至"、"减"、"杠"）。

参考示例：
[
    {"input": "最终比分定格在 105-98，主队获胜。", "output": "比"},
    {"input": "昨晚最低气温达到了 -15℃。", "output": "负"},
    {"input": "请参考第 10-15 页的内容。", "output": "至"},
    {"input": "咨询电话：021-88888888。", "output": "杠"},
    {"input": "5 - 3 = 2", "output": "减"}
]

请基于场景【{description}】生成 {count} 条数据："#
        .into(),
      instruction: "请判断下列句子中连字符'-'的正确读音，直接输出读音汉字。".into(),
    }
  }
}

/// Load `GenConfig` from GEN_CONFIG_PATH, falling back to defaults on any IO/parse error.
pub fn load_gen_config_from_env() -> GenConfig {
  let Ok(path) = std::env::var("GEN_CONFIG_PATH") else {
    info!(target: "hyphen_datagen", "GEN_CONFIG_PATH not set; using built-in config");
    return GenConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_gen_config(&s) {
      Ok(cfg) => {
        info!(target: "hyphen_datagen", %path, scenarios = cfg.scenarios.len(), "Loaded generator config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "hyphen_datagen", %path, error = %e, "Failed to parse TOML config; using defaults");
        GenConfig::default()
      }
    },
    Err(e) => {
      error!(target: "hyphen_datagen", %path, error = %e, "Failed to read TOML config file; using defaults");
      GenConfig::default()
    }
  }
}

pub fn parse_gen_config(s: &str) -> Result<GenConfig, toml::de::Error> {
  toml::from_str::<GenConfig>(s)
}
