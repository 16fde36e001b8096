//! Matcher protocol.
//!
//! A [`Matcher`] is a reusable, describable predicate over a subject. Besides
//! answering "does it match", every matcher can say what it expected and,
//! given a failing subject, why that subject failed:
//!
//! ```text
//! Expected: Text containing FAILURE
//!      but: was "http://ci/job/x/1/"
//!           "Build #12: SUCCESS"
//! ```
//!
//! Matching returns `Ok(false)` for a subject that simply does not match.
//! Absence conditions that answer the question being asked (element not
//! found, structured fetch failing) are folded into `Ok(false)` by the
//! concrete matchers; every other error is returned unchanged so real defects
//! are not reported as failed assertions.

use std::fmt::{self, Debug, Display};

use crate::result::PagematchResult;

/// A describable predicate over subjects of type `T`
pub trait Matcher<T: ?Sized> {
    /// Evaluate the subject.
    ///
    /// # Errors
    ///
    /// Returns any failure that is not the absence condition this matcher
    /// asks about.
    fn matches(&self, subject: &T) -> PagematchResult<bool>;

    /// What a matching subject looks like
    fn describe_expectation(&self) -> String;

    /// Why `subject` did not match. Never fails; observation errors are
    /// rendered inline.
    fn describe_mismatch(&self, subject: &T) -> String;
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn matches(&self, subject: &T) -> PagematchResult<bool> {
        (**self).matches(subject)
    }

    fn describe_expectation(&self) -> String {
        (**self).describe_expectation()
    }

    fn describe_mismatch(&self, subject: &T) -> String {
        (**self).describe_mismatch(subject)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn matches(&self, subject: &T) -> PagematchResult<bool> {
        (**self).matches(subject)
    }

    fn describe_expectation(&self) -> String {
        (**self).describe_expectation()
    }

    fn describe_mismatch(&self, subject: &T) -> String {
        (**self).describe_mismatch(subject)
    }
}

/// Text builder for expectation and mismatch descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    text: String,
}

impl Description {
    /// Create an empty description
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append plain text
    pub fn append_text(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.text.push_str(text.as_ref());
        self
    }

    /// Append a value in quoted, escaped form (`"O'Brien"`, `"a\nb"`)
    pub fn append_value<V: Debug + ?Sized>(&mut self, value: &V) -> &mut Self {
        self.text.push_str(&format!("{value:?}"));
        self
    }

    /// Append a value using its `Display` form
    pub fn append_display<V: Display + ?Sized>(&mut self, value: &V) -> &mut Self {
        self.text.push_str(&value.to_string());
        self
    }

    /// Append the rendered result of a fallible observation
    pub fn append_observed<V: Debug, E: Display>(&mut self, observed: &Result<V, E>) -> &mut Self {
        match observed {
            Ok(value) => self.append_value(value),
            Err(err) => self.append_text(format!("<unavailable: {err}>")),
        }
    }

    /// Consume into the built string
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Built text so far
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Inverts another matcher
#[derive(Debug, Clone)]
pub struct Not<M> {
    inner: M,
}

/// Match when `matcher` does not.
///
/// Errors from the inner matcher are returned unchanged, so an unexpected
/// failure is never mistaken for a successful negation.
#[must_use]
pub fn not<M>(matcher: M) -> Not<M> {
    Not { inner: matcher }
}

impl<M> Not<M> {
    /// The wrapped matcher
    #[must_use]
    pub const fn inner(&self) -> &M {
        &self.inner
    }
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn matches(&self, subject: &T) -> PagematchResult<bool> {
        self.inner.matches(subject).map(|matched| !matched)
    }

    fn describe_expectation(&self) -> String {
        format!("not {}", self.inner.describe_expectation())
    }

    fn describe_mismatch(&self, _subject: &T) -> String {
        format!("was {}", self.inner.describe_expectation())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::result::PagematchError;

    /// Matches even numbers; fails on negative input
    #[derive(Debug)]
    struct IsEven;

    impl Matcher<i32> for IsEven {
        fn matches(&self, subject: &i32) -> PagematchResult<bool> {
            if *subject < 0 {
                return Err(PagematchError::SessionError {
                    message: "negative".to_string(),
                });
            }
            Ok(subject % 2 == 0)
        }

        fn describe_expectation(&self) -> String {
            "an even number".to_string()
        }

        fn describe_mismatch(&self, subject: &i32) -> String {
            format!("was {subject}")
        }
    }

    mod description_tests {
        use super::*;

        #[test]
        fn test_append_text_and_value() {
            let mut d = Description::new();
            d.append_text("contains action titled ").append_value("O'Brien");
            assert_eq!(d.as_str(), "contains action titled \"O'Brien\"");
        }

        #[test]
        fn test_value_escapes_newlines() {
            let mut d = Description::new();
            d.append_value("a\nb");
            assert_eq!(d.into_string(), "\"a\\nb\"");
        }

        #[test]
        fn test_append_observed() {
            let ok: Result<String, PagematchError> = Ok("http://ci/".to_string());
            let err: Result<String, PagematchError> = Err(PagematchError::SessionError {
                message: "gone".to_string(),
            });
            let mut d = Description::new();
            d.append_observed(&ok).append_text(" ").append_observed(&err);
            assert_eq!(
                d.to_string(),
                "\"http://ci/\" <unavailable: Session error: gone>"
            );
        }

        #[test]
        fn test_append_display() {
            let mut d = Description::new();
            d.append_display(&crate::locator::Locator::xpath("/html"));
            assert_eq!(d.as_str(), "By.xpath: /html");
        }
    }

    mod not_tests {
        use super::*;

        #[test]
        fn test_inverts() {
            assert!(!not(IsEven).matches(&2).unwrap());
            assert!(not(IsEven).matches(&3).unwrap());
        }

        #[test]
        fn test_double_negation() {
            assert!(not(not(IsEven)).matches(&4).unwrap());
        }

        #[test]
        fn test_descriptions() {
            let m = not(IsEven);
            assert_eq!(m.describe_expectation(), "not an even number");
            assert_eq!(m.describe_mismatch(&2), "was an even number");
        }

        #[test]
        fn test_errors_propagate() {
            assert!(not(IsEven).matches(&-1).is_err());
        }
    }

    mod forwarding_tests {
        use super::*;

        #[test]
        fn test_reference_and_box() {
            let m = IsEven;
            assert!((&m).matches(&2).unwrap());
            let boxed: Box<dyn Matcher<i32>> = Box::new(IsEven);
            assert!(boxed.matches(&2).unwrap());
            assert_eq!(boxed.describe_expectation(), "an even number");
        }
    }
}
