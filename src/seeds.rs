//! Built-in scenario catalogue, used when the config file supplies none.

use crate::domain::Scenario;

/// The six hyphen readings we collect data for, in generation order.
pub fn default_scenarios() -> Vec<Scenario> {
  vec![
    Scenario::new("SPORTS", "体育比赛比分，读作'比'"),
    Scenario::new("TEMP_MATH", "温度、负数、股票跌幅，读作'负'"),
    Scenario::new("RANGE", "时间、年份、距离的范围，读作'至'或'到'"),
    Scenario::new("PHONE", "座机电话号码、各类编号，通常不发音或读作'杠'"),
    Scenario::new("MATH_SUB", "数学减法运算，读作'减'"),
    Scenario::new("CHEMISTRY", "化学同位素或特定专有名词，读作'杠' (如碳-14)"),
  ]
}
