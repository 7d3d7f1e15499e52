use std::borrow::Cow;

use dune_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use serde::Serialize;

/// Prefix carried by every failed tool call.
pub const INVALID_INPUT_PREFIX: &str = "Invalid input:";

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Maps a control plane failure to an MCP error.
pub fn map_err(err: ControlError) -> ErrorData {
    let code = match err {
        ControlError::Validation(_) => ErrorCode::INVALID_PARAMS,
        ControlError::Config(_) | ControlError::Schema(_) | ControlError::Network(_) => {
            ErrorCode::INTERNAL_ERROR
        }
    };
    mcp_err(code, format!("{INVALID_INPUT_PREFIX} {err}"))
}

/// Renders records as a pretty-printed JSON text block.
pub fn json_result<S: Serialize>(records: &S) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(records).map_err(|err| {
        mcp_err(
            ErrorCode::INTERNAL_ERROR,
            format!("{INVALID_INPUT_PREFIX} failed to encode results: {err}"),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[cfg(test)]
mod tests {
    use dune_core::control::ConfigError;
    use dune_core::query::ValidationError;

    use super::*;

    #[test]
    fn validation_errors_are_invalid_params() {
        let err = map_err(ControlError::Validation(ValidationError::MissingField("address")));

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Invalid input: address is required");
    }

    #[test]
    fn runtime_errors_are_internal() {
        let err = map_err(ControlError::Config(ConfigError::MissingApiKey));

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, "Invalid input: DUNE_API_KEY is not set");
    }

    #[test]
    fn json_result_is_pretty_text() {
        let result = json_result(&vec![1, 2]).expect("encode");

        let value = serde_json::to_value(&result).expect("serialize result");
        assert_eq!(value["content"][0]["text"], "[\n  1,\n  2\n]");
    }
}
