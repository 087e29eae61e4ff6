use crate::error::{DashboardError, ErrorBag};
use serde_json::{json, Value};

pub const EXECUTION_FAILED: &str = "Execution failed";
pub const MAX_MESSAGE_CHARS: usize = 220;

/// Best effort human readable message out of an arbitrary error shape.
///
/// Order: `details` field, `message` field, raw string, `message` of a JSON
/// object embedded in the stringified value, then [`EXECUTION_FAILED`].
/// The message is cut at the first period and capped at 220 chars plus "...".
pub fn normalize_error_value(value: &Value) -> String {
    let message = extract_message(value).unwrap_or_else(|| EXECUTION_FAILED.to_string());
    shorten(&message)
}

pub fn normalize_error(err: &DashboardError) -> String {
    normalize_error_value(&error_to_value(err))
}

/// Shape a library error the way a wallet would report it
pub fn error_to_value(err: &DashboardError) -> Value {
    match &err.inner {
        ErrorBag::Web3Error(web3::Error::Rpc(rpc_err)) => json!({
            "message": rpc_err.message,
            "code": rpc_err.code.code(),
            "data": rpc_err.data,
        }),
        ErrorBag::CustomError(custom) => Value::String(custom.message().to_string()),
        ErrorBag::TransactionFailedError(failed) => Value::String(failed.message.clone()),
        _ => Value::String(err.user_message()),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn extract_message(value: &Value) -> Option<String> {
    if let Some(details) = non_empty_str(value.get("details")) {
        return Some(details);
    }
    if let Some(message) = non_empty_str(value.get("message")) {
        return Some(message);
    }
    if let Some(raw) = non_empty_str(Some(value)) {
        return Some(raw);
    }
    let stringified = value.to_string();
    let embedded = json_fragments(&stringified)
        .filter_map(|fragment| serde_json::from_str::<Value>(fragment).ok())
        .find_map(|embedded| non_empty_str(embedded.get("message")));
    embedded
}

/// Balanced `{...}` slices of the text, outermost first
fn json_fragments(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .filter_map(move |(start, _)| matching_brace(&text[start..]).map(|end| &text[start..=start + end]))
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn shorten(message: &str) -> String {
    let sentence = message.split('.').next().unwrap_or_default().trim();
    let sentence = if sentence.is_empty() {
        EXECUTION_FAILED
    } else {
        sentence
    };
    if sentence.chars().count() > MAX_MESSAGE_CHARS {
        let cut: String = sentence.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{cut}...")
    } else {
        sentence.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{err_create, err_custom_create};
    use std::time::Duration;

    #[test]
    fn test_details_take_precedence() {
        let value = json!({
            "details": "User rejected the request. Version: viem@1.0",
            "message": "Something else"
        });
        assert_eq!(normalize_error_value(&value), "User rejected the request");
    }

    #[test]
    fn test_message_and_raw_string() {
        let value = json!({"message": "insufficient funds for gas"});
        assert_eq!(normalize_error_value(&value), "insufficient funds for gas");

        let value = json!("nonce too low");
        assert_eq!(normalize_error_value(&value), "nonce too low");
    }

    #[test]
    fn test_embedded_json_message() {
        let value = json!({
            "error": {"code": -32000, "message": "execution reverted: not enough stake"}
        });
        assert_eq!(
            normalize_error_value(&value),
            "execution reverted: not enough stake"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(normalize_error_value(&Value::Null), EXECUTION_FAILED);
        assert_eq!(normalize_error_value(&json!({"code": 4001})), EXECUTION_FAILED);
        assert_eq!(normalize_error_value(&json!(12)), EXECUTION_FAILED);
        assert_eq!(normalize_error_value(&json!(".")), EXECUTION_FAILED);
    }

    #[test]
    fn test_length_cap() {
        let long = "x".repeat(500);
        let res = normalize_error_value(&json!({ "message": long }));
        assert_eq!(res.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert!(res.ends_with("..."));

        let exact = "y".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(normalize_error_value(&json!(exact.clone())), exact);
    }

    #[test]
    fn test_normalize_dashboard_error() {
        let err = err_custom_create!("Wallet refused to sign. Try again");
        assert_eq!(normalize_error(&err), "Wallet refused to sign");

        let err = err_create!(Duration::from_secs(5));
        assert_eq!(normalize_error(&err), "Time limit reached: 5s");
    }
}
