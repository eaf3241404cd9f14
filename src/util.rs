//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings, by characters so CJK text never splits.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("【{d}】x{n}【{d}】", &[("d", "比分"), ("n", "5")]);
    assert_eq!(out, "【比分】x5【比分】");
  }

  #[test]
  fn fill_template_leaves_json_braces_alone() {
    let out = fill_template(r#"{"input": "a"} {count}"#, &[("count", "3")]);
    assert_eq!(out, r#"{"input": "a"} 3"#);
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    assert_eq!(trunc_for_log("短", 10), "短");
    let t = trunc_for_log("最终比分定格", 2);
    assert!(t.starts_with("最终…"));
  }
}
