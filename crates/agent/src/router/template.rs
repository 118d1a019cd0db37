//! Query template rendering.

use creditpack_core::section::SectionContext;

/// Substitute `{section}` and `{<key>}` for every scalar context value.
///
/// Placeholders without a value are left in place.
pub fn render(template: &str, section_name: &str, context: &SectionContext) -> String {
    let mut out = template.replace("{section}", section_name);
    for (key, value) in context {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        out = out.replace(&format!("{{{key}}}"), &text);
    }
    out
}
