//! Domain models: scenarios, corpus records, and run counters.

use serde::{Deserialize, Serialize};

/// A named context describing which reading of '-' we want the model to produce.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
  pub key: String,
  pub description: String,
}

impl Scenario {
  pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
    Self { key: key.into(), description: description.into() }
  }
}

/// One line of the training corpus. Field order is the on-disk order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedRecord {
  pub instruction: String,
  pub input: String,
  pub output: String,
}

/// Process-lifetime counters. Mutated only after a successful sink append.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunCounters {
  /// (scenario key, records persisted) in scenario definition order.
  pub per_scenario: Vec<(String, usize)>,
  pub total: usize,
}

impl RunCounters {
  /// Seed a zero entry for every scenario so the report keeps definition order.
  pub fn for_scenarios(scenarios: &[Scenario]) -> Self {
    Self {
      per_scenario: scenarios.iter().map(|s| (s.key.clone(), 0)).collect(),
      total: 0,
    }
  }

  pub fn record(&mut self, key: &str, count: usize) {
    match self.per_scenario.iter_mut().find(|(k, _)| k == key) {
      Some((_, n)) => *n += count,
      None => self.per_scenario.push((key.to_string(), count)),
    }
    self.total += count;
  }

  pub fn scenario_count(&self, key: &str) -> usize {
    self.per_scenario
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, n)| *n)
      .unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counters_accumulate_per_scenario_and_total() {
    let scenarios = vec![Scenario::new("SPORTS", "a"), Scenario::new("RANGE", "b")];
    let mut c = RunCounters::for_scenarios(&scenarios);
    c.record("RANGE", 3);
    c.record("SPORTS", 2);
    c.record("RANGE", 1);
    assert_eq!(c.scenario_count("RANGE"), 4);
    assert_eq!(c.scenario_count("SPORTS"), 2);
    assert_eq!(c.total, 6);
    assert_eq!(c.per_scenario[0].0, "SPORTS");
  }

  #[test]
  fn record_serializes_in_corpus_field_order() {
    let r = NormalizedRecord { instruction: "i".into(), input: "零下-5度".into(), output: "负".into() };
    let line = serde_json::to_string(&r).unwrap();
    assert_eq!(line, r#"{"instruction":"i","input":"零下-5度","output":"负"}"#);
  }
}
