pub mod config_cmd;
pub mod draft;
pub mod route;
pub mod search;
pub mod tools;

use creditpack_core::section::SectionContext;

/// Parse `key=value` pairs into a context bundle.
///
/// Values that read as JSON scalars (numbers, booleans) keep their type;
/// everything else is a string.
pub fn parse_context(pairs: &[String]) -> Result<SectionContext, String> {
    let mut context = SectionContext::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("context entry '{pair}' is not KEY=VALUE"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("context entry '{pair}' has an empty key"));
        }
        let value = match serde_json::from_str::<serde_json::Value>(raw.trim()) {
            Ok(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => v,
            _ => serde_json::Value::String(raw.trim().to_string()),
        };
        context.insert(key.to_string(), value);
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_values() {
        let ctx = parse_context(&[
            "borrower=Acme Corp".to_string(),
            "amount=25000000".to_string(),
            "secured=true".to_string(),
        ])
        .unwrap();
        assert_eq!(ctx["borrower"], "Acme Corp");
        assert_eq!(ctx["amount"], 25_000_000);
        assert_eq!(ctx["secured"], true);
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_context(&["borrower".to_string()]).is_err());
        assert!(parse_context(&["=x".to_string()]).is_err());
    }
}
