//! Markdown front matter reader.
//!
//! The first line must be exactly `---` (trailing whitespace allowed) and the
//! block runs to the next `---` line. Anything else means there is no front
//! matter and the whole text is body, including an unterminated block.
//!
//! The block itself is YAML. Scalar values are kept as trimmed strings and
//! everything else is dropped. A block that fails to parse reads as empty.

use std::collections::BTreeMap;

use serde_yaml::Value;

const FENCE: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    pub fields: BTreeMap<String, String>,
    pub body: &'a str,
}

impl FrontMatter<'_> {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn parse_fields(block: &str) -> BTreeMap<String, String> {
    if block.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_yaml::from_str::<BTreeMap<String, Value>>(block) {
        Ok(raw) => raw
            .into_iter()
            .filter_map(|(key, value)| scalar(value).map(|value| (key, value)))
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "front matter is not valid YAML");
            BTreeMap::new()
        }
    }
}

pub fn parse(text: &str) -> FrontMatter<'_> {
    let no_front_matter = FrontMatter {
        fields: BTreeMap::new(),
        body: text,
    };

    let mut lines = text.split_inclusive('\n');
    let block_start = match lines.next() {
        Some(first) if first.trim_end() == FENCE => first.len(),
        _ => return no_front_matter,
    };

    let mut offset = block_start;
    for line in lines {
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == FENCE {
            return FrontMatter {
                fields: parse_fields(&text[block_start..line_start]),
                body: &text[offset..],
            };
        }
    }

    no_front_matter
}
