//! # Prompt Templates
//!
//! Templates for every AI-backed endpoint. Placeholders use the `{name}`
//! syntax and are filled by [`render`]. Literal JSON examples inside the
//! templates are left untouched because their keys never match a placeholder.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub mod assistant;
pub mod listing;

fn placeholder() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([a-z_]+)\}").ok())
        .as_ref()
}

/// Substitutes each `{key}` in `template` with its value in a single pass.
///
/// Substituted values are never rescanned, so user text containing
/// `{reviews}` or similar stays literal. Unknown keys are left as written.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let Some(re) = placeholder() else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &Captures| {
        values
            .iter()
            .find(|(key, _)| *key == &caps[1])
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
