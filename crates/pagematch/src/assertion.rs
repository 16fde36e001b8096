//! Assertions for test validation.
//!
//! [`assert_that`] evaluates a matcher and turns a mismatch into
//! [`PagematchError::AssertionFailed`]. [`SoftAssertions`] collects several
//! mismatches before failing.
//!
//! Errors raised while evaluating a matcher are never converted into
//! assertion failures; they propagate so the test ends with the underlying
//! failure.

use crate::matcher::Matcher;
use crate::result::{PagematchError, PagematchResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Render the failure report for a subject that did not match
#[must_use]
pub fn failure_message<T: ?Sized, M: Matcher<T> + ?Sized>(subject: &T, matcher: &M) -> String {
    let mismatch = matcher.describe_mismatch(subject).replace('\n', "\n          ");
    format!(
        "\nExpected: {}\n     but: {}",
        matcher.describe_expectation(),
        mismatch
    )
}

/// Evaluate a matcher against a subject without failing on mismatch
///
/// # Errors
///
/// Propagates any error returned by [`Matcher::matches`].
pub fn evaluate<T: ?Sized, M: Matcher<T> + ?Sized>(
    subject: &T,
    matcher: &M,
) -> PagematchResult<AssertionResult> {
    if matcher.matches(subject)? {
        Ok(AssertionResult::pass())
    } else {
        Ok(AssertionResult::fail(failure_message(subject, matcher)))
    }
}

/// Assert that `subject` satisfies `matcher`
///
/// # Errors
///
/// Returns [`PagematchError::AssertionFailed`] on mismatch, or the matcher's
/// own error unchanged.
pub fn assert_that<T: ?Sized, M: Matcher<T> + ?Sized>(
    subject: &T,
    matcher: &M,
) -> PagematchResult<()> {
    let result = evaluate(subject, matcher)?;
    if result.passed {
        Ok(())
    } else {
        tracing::debug!(message = %result.message, "assertion failed");
        Err(PagematchError::AssertionFailed {
            message: result.message,
        })
    }
}

/// Mode for soft assertions behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssertionMode {
    /// Collect all failures (default)
    #[default]
    Collect,
    /// Stop on first failure (like hard assertions)
    FailFast,
}

/// Soft assertions collector
///
/// ```ignore
/// let mut soft = SoftAssertions::new();
/// soft.check_that(&job, &has_action("Java Warnings"))?;
/// soft.check_that(&session, &has_content("Java Warnings: 0"))?;
/// soft.verify()?;
/// ```
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Vec<String>,
    mode: AssertionMode,
    assertion_count: usize,
}

impl SoftAssertions {
    /// Create a new soft assertions collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific mode
    #[must_use]
    pub fn with_mode(mode: AssertionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Record a mismatch instead of failing immediately.
    ///
    /// # Errors
    ///
    /// Matcher errors propagate immediately. In [`AssertionMode::FailFast`]
    /// the first mismatch is returned as [`PagematchError::AssertionFailed`].
    pub fn check_that<T: ?Sized, M: Matcher<T> + ?Sized>(
        &mut self,
        subject: &T,
        matcher: &M,
    ) -> PagematchResult<bool> {
        self.assertion_count += 1;
        let result = evaluate(subject, matcher)?;
        if result.passed {
            return Ok(true);
        }
        if self.mode == AssertionMode::FailFast {
            return Err(PagematchError::AssertionFailed {
                message: result.message,
            });
        }
        self.failures.push(result.message);
        Ok(false)
    }

    /// Collected failure messages
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Number of checks performed
    #[must_use]
    pub const fn assertion_count(&self) -> usize {
        self.assertion_count
    }

    /// Whether every check so far passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail if any check failed
    ///
    /// # Errors
    ///
    /// Returns [`PagematchError::SoftAssertionsFailed`] listing every failure.
    pub fn verify(self) -> PagematchResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(PagematchError::SoftAssertionsFailed {
                count: self.failures.len(),
                messages: self.failures,
            })
        }
    }
}
