//! Error types for the market data crate.
//!
//! Providers never retry on their own. Callers decide what to do with a
//! failure; [`MarketDataError::is_transient`] tells them whether a later
//! attempt could plausibly succeed.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the requested fund code.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider answered but the series/quote was empty.
    #[error("No data available for {0}")]
    NoData(String),

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (non-success status, bad payload shape).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider payload could not be parsed.
    #[error("Failed to parse {provider} payload: {message}")]
    ParseError {
        /// The provider whose payload was malformed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The operation is not offered by this provider.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure is worth another attempt later (timeouts, network).
    ///
    /// Terminal failures (unknown code, malformed payload) return `false`.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network(_) => true,
            Self::ProviderError { .. } => true,
            Self::SymbolNotFound(_)
            | Self::NoData(_)
            | Self::ParseError { .. }
            | Self::NotSupported { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_is_terminal() {
        let error = MarketDataError::SymbolNotFound("000000".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_parse_error_is_terminal() {
        let error = MarketDataError::ParseError {
            provider: "FUND_DATA".to_string(),
            message: "missing series".to_string(),
        };
        assert!(!error.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        let error = MarketDataError::Timeout {
            provider: "FUND_DATA".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("110022".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: 110022");

        let error = MarketDataError::ProviderError {
            provider: "FUND_DATA".to_string(),
            message: "HTTP 502".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: FUND_DATA - HTTP 502");
    }
}
