//! Result and error types for pagematch.

use thiserror::Error;

/// Result type for pagematch operations
pub type PagematchResult<T> = Result<T, PagematchError>;

/// Errors that can occur while building locators, observing a session or
/// evaluating matchers
#[derive(Debug, Error)]
pub enum PagematchError {
    /// Locator template placeholder count differs from the supplied values
    #[error("Locator template {template:?} expects {expected} value(s), got {actual}")]
    TemplateArity {
        /// Offending template
        template: String,
        /// Placeholders found in the template
        expected: usize,
        /// Values supplied by the caller
        actual: usize,
    },

    /// Locator template contains an unsupported `%` sequence
    #[error("Invalid locator template {template:?}: {message}")]
    InvalidTemplate {
        /// Offending template
        template: String,
        /// Error message
        message: String,
    },

    /// Regular expression failed to compile
    #[error("Invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern as written by the caller
        pattern: String,
        /// Underlying compile error
        #[source]
        source: regex::Error,
    },

    /// Address could not be parsed or joined
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// No element matched the locator
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Rendered locator
        locator: String,
    },

    /// Remote side failed while producing structured state
    #[error("Remote failure at {address}: {message}")]
    RemoteFailure {
        /// Address that was fetched
        address: String,
        /// Error message
        message: String,
    },

    /// Navigation did not complete
    #[error("Navigation to {address} failed: {message}")]
    NavigationFailed {
        /// Target address
        address: String,
        /// Error message
        message: String,
    },

    /// Any other session failure
    #[error("Session error: {message}")]
    SessionError {
        /// Error message
        message: String,
    },

    /// Matcher did not match the subject
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Expectation and mismatch description
        message: String,
    },

    /// One or more soft assertions failed
    #[error("{count} soft assertion(s) failed:\n{}", .messages.join("\n"))]
    SoftAssertionsFailed {
        /// Number of failures
        count: usize,
        /// Individual failure messages
        messages: Vec<String>,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PagematchError {
    /// Element lookup found nothing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    /// Remote side reported a failure for a structured fetch
    #[must_use]
    pub const fn is_remote_failure(&self) -> bool {
        matches!(self, Self::RemoteFailure { .. })
    }

    /// Build a not-found error for a rendered locator
    #[must_use]
    pub fn not_found(locator: impl std::fmt::Display) -> Self {
        Self::ElementNotFound {
            locator: locator.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message() {
        let err = PagematchError::TemplateArity {
            template: "//a[text()='%s']".to_string(),
            expected: 1,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("expects 1 value(s), got 2"));
    }

    #[test]
    fn test_classifiers() {
        assert!(PagematchError::not_found("By.xpath: //a").is_not_found());
        let remote = PagematchError::RemoteFailure {
            address: "http://localhost/job/x/api/json".to_string(),
            message: "404".to_string(),
        };
        assert!(remote.is_remote_failure());
        assert!(!remote.is_not_found());
    }

    #[test]
    fn test_soft_failure_lists_messages() {
        let err = PagematchError::SoftAssertionsFailed {
            count: 2,
            messages: vec!["first".to_string(), "second".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 soft assertion(s) failed"));
        assert!(msg.contains("first\nsecond"));
    }

    #[test]
    fn test_from_url_error() {
        let err: PagematchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, PagematchError::InvalidAddress(_)));
    }
}
