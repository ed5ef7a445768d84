//! Secret masking for MCP server definitions.

use std::collections::BTreeMap;

/// Replacement shown instead of a masked value.
pub const MASKED_VALUE: &str = "********";

/// Env values are always masked; keys stay visible.
pub fn mask_env(env: BTreeMap<String, String>) -> BTreeMap<String, String> {
    env.into_keys()
        .map(|key| (key, MASKED_VALUE.to_string()))
        .collect()
}

/// Header values are masked only when they look like a credential.
pub fn mask_headers(headers: BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .into_iter()
        .map(|(key, value)| {
            if is_secret_like(&value) {
                (key, MASKED_VALUE.to_string())
            } else {
                (key, value)
            }
        })
        .collect()
}

/// `${VAR}` interpolation, `sk-` API keys and `Bearer` tokens.
pub fn is_secret_like(value: &str) -> bool {
    value.contains("${") || value.starts_with("sk-") || value.starts_with("Bearer")
}
