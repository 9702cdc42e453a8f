use perpcity_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Ledger call failed in {operation}: {message}")]
    Ledger { operation: String, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Remote failure, tagged with the operation that issued it
    pub fn ledger(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Ledger {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Re-tag a ledger failure with the outer operation; other errors pass through
    pub fn in_operation(self, operation: &str) -> Self {
        match self {
            Self::Ledger {
                operation: inner,
                message,
            } => Self::Ledger {
                operation: format!("{} ({})", operation, inner),
                message,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Decode(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_pass_through() {
        let err: SdkError = CoreError::invalid_tick_range(10, -10).into();
        assert!(matches!(err, SdkError::Core(_)));
        assert!(err.to_string().contains("tick_lower (10)"));
    }

    #[test]
    fn test_ledger_context_is_nested() {
        let err = SdkError::ledger("cfgs", "execution reverted").in_operation("perp_config for perp 0xab");
        assert_eq!(
            err.to_string(),
            "Ledger call failed in perp_config for perp 0xab (cfgs): execution reverted"
        );

        let not_found = SdkError::NotFound("x".into()).in_operation("op");
        assert!(matches!(not_found, SdkError::NotFound(_)));
    }
}
