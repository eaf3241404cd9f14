//! Salvaging JSON records from free-text model replies.
//!
//! Replies are supposed to be a bare JSON array of flat objects, but in practice they
//! arrive wrapped in markdown fences, followed by commentary, or cut off mid-object when
//! the model hits its token limit. The pipeline is:
//!
//!   strip fences → strict decode of the whole text → (on failure) incremental scan
//!
//! The scan decodes one value at a time and keeps every complete object it sees, so a
//! reply truncated after the k-th object still yields exactly those k objects.
//! Nothing here returns an error: the worst case is an empty vector.

use serde_json::{Deserializer, Value};
use tracing::{debug, info};

const FENCE: &str = "```";

/// Remove one leading code fence (with optional language tag) and one trailing fence.
pub fn strip_code_fence(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        // "```json", "```JSON", "```" all open a block.
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }
    text.trim().to_string()
}

/// Strict, all-or-nothing decode of the whole text.
///
/// An array yields its elements; any other JSON value is a one-element sequence
/// (the normalizer drops whatever is not a usable object).
pub fn decode_document(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        Ok(other) => Some(vec![other]),
        Err(_) => None,
    }
}

/// Recover the ordered run of complete JSON values from text that failed strict decoding.
///
/// Tolerates an unclosed leading `[`, junk between values, and a truncated tail.
pub fn scan_objects(text: &str) -> Vec<Value> {
    let mut recovered = Vec::new();

    let mut cursor = skip_whitespace(text, 0);
    if text[cursor..].starts_with('[') {
        cursor += 1;
    }

    loop {
        cursor = skip_whitespace(text, cursor);
        if cursor >= text.len() {
            break;
        }

        match decode_one(&text[cursor..]) {
            Some((value, consumed)) => {
                recovered.push(value);
                cursor = skip_whitespace(text, cursor + consumed);
                if text[cursor..].starts_with(',') {
                    cursor += 1;
                }
            }
            None => match next_object_start(text, cursor) {
                // Must move forward or we would retry the same spot forever.
                Some(next) if next > cursor => cursor = next,
                _ => break,
            },
        }
    }

    recovered
}

/// Full reply pipeline: fence stripping, fast path, then recovery.
pub fn parse_reply(raw: &str) -> Vec<Value> {
    let text = strip_code_fence(raw);
    if let Some(values) = decode_document(&text) {
        return values;
    }

    debug!(target: "recovery", text_len = text.len(), "Whole-document decode failed; scanning for complete objects");
    let values = scan_objects(&text);
    if !values.is_empty() {
        info!(target: "recovery", recovered = values.len(), "Salvaged objects from malformed reply");
    }
    values
}

/// Decode exactly one value at the start of `rest`, returning it and the bytes it used.
fn decode_one(rest: &str) -> Option<(Value, usize)> {
    let mut stream = Deserializer::from_str(rest).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Some((value, stream.byte_offset())),
        _ => None,
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start().len())
}

/// Byte offset of the next `{` strictly after the character at `cursor`.
fn next_object_start(text: &str, cursor: usize) -> Option<usize> {
    let step = text[cursor..].chars().next()?.len_utf8();
    let from = cursor + step;
    text[from..].find('{').map(|i| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_objects() -> Vec<Value> {
        vec![
            json!({"input": "最终比分定格在 105-98，主队获胜。", "output": "比"}),
            json!({"input": "昨晚最低气温达到了 -15℃。", "output": "负"}),
            json!({"input": "请参考第 10-15 页的内容。", "output": "至"}),
            json!({"input": "咨询电话：021-88888888。", "output": "杠"}),
            json!({"input": "5 - 3 = 2", "output": "减"}),
        ]
    }

    /// Serialize as a pretty-ish array and report the byte offset where each object ends.
    fn serialize_with_ends(objects: &[Value]) -> (String, Vec<usize>) {
        let mut text = String::from("[\n  ");
        let mut ends = Vec::new();
        for (i, obj) in objects.iter().enumerate() {
            if i > 0 {
                text.push_str(",\n  ");
            }
            text.push_str(&serde_json::to_string(obj).unwrap());
            ends.push(text.len());
        }
        text.push_str("\n]");
        (text, ends)
    }

    #[test]
    fn strips_fence_with_and_without_language_tag() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  ```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("```JSON [1]```"), "[1]");
        assert_eq!(strip_code_fence("[1]"), "[1]");
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        let once = strip_code_fence("```json\n[{\"input\":\"a\"}]\n```");
        assert_eq!(strip_code_fence(&once), once);
    }

    #[test]
    fn fast_path_matches_standard_decode() {
        let objects = sample_objects();
        let (text, _) = serialize_with_ends(&objects);
        assert_eq!(decode_document(&text), Some(objects.clone()));
        assert_eq!(parse_reply(&text), objects);
    }

    #[test]
    fn fast_path_rejects_trailing_commentary() {
        assert_eq!(decode_document(r#"[{"input":"a"}] 以上是数据"#), None);
    }

    #[test]
    fn non_array_document_is_single_candidate() {
        assert_eq!(decode_document(r#"{"input":"a"}"#), Some(vec![json!({"input": "a"})]));
    }

    #[test]
    fn truncation_yields_exact_prefix() {
        let objects = sample_objects();
        let (text, ends) = serialize_with_ends(&objects);

        for t in 0..text.len() {
            if !text.is_char_boundary(t) {
                continue;
            }
            let k = ends.iter().filter(|&&end| end <= t).count();
            let got = parse_reply(&text[..t]);
            assert_eq!(got, objects[..k].to_vec(), "truncated at byte {t}");
        }
    }

    #[test]
    fn noise_between_objects_is_skipped() {
        let text = r#"[{"input":"a-b","output":"至"}, 这里有一些说明文字 {残缺, {"input":"c-d","output":"杠"}]"#;
        let got = scan_objects(text);
        assert_eq!(
            got,
            vec![json!({"input":"a-b","output":"至"}), json!({"input":"c-d","output":"杠"})]
        );
    }

    #[test]
    fn leading_prose_before_array_is_tolerated() {
        let raw = "好的，以下是数据：\n[{\"input\":\"x\",\"output\":\"比\"}, {\"input\":\"y\"";
        assert_eq!(parse_reply(raw), vec![json!({"input":"x","output":"比"})]);
    }

    #[test]
    fn scanner_never_panics_on_garbage() {
        let inputs = [
            "",
            "   ",
            "[",
            "[,,,",
            "]]]",
            "{{{{",
            "{\"a\":",
            "XYZ",
            "\u{0}\u{1}\u{7f}\u{fffd}binary",
            "中文噪声没有任何括号",
            "{中{文{",
            "[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[[",
        ];
        for input in inputs {
            let _ = scan_objects(input);
            let _ = parse_reply(input);
        }
        assert!(scan_objects("").is_empty());
        assert!(scan_objects("中文噪声没有任何括号").is_empty());
    }

    #[test]
    fn end_to_end_reply_recovers_two_objects() {
        let raw = r#"[{"input":"比分 100-99，主队领先","output":"比"},{"input":"零下-5度","output":"负"}, XYZ"#;
        let got = parse_reply(raw);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0]["input"], "比分 100-99，主队领先");
        assert_eq!(got[1]["output"], "负");
    }

    #[test]
    fn fenced_truncated_reply_is_recovered() {
        let raw = "```json\n[{\"input\":\"碳-14\",\"output\":\"杠\"},\n{\"input\":\"碳";
        assert_eq!(parse_reply(raw), vec![json!({"input":"碳-14","output":"杠"})]);
    }
}
