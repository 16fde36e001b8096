//! Concrete matchers for sessions, page objects and text.
//!
//! | factory | subject | absence folded into `false` |
//! |---|---|---|
//! | [`has_content`] | [`Session`] | n/a |
//! | [`has_element`] | [`Session`] | element not found |
//! | [`has_action`] | [`PageObject`] | element not found |
//! | [`contains_regexp`] | `str` / `String` | n/a |
//! | [`page_object_exists`] | [`ContainerPageObject`] | any fetch failure |

use regex::{Regex, RegexBuilder};

use crate::locator::{by, Locator};
use crate::matcher::{Description, Matcher};
use crate::page_object::{ContainerPageObject, PageObject};
use crate::result::{PagematchError, PagematchResult};
use crate::session::Session;

/// Matches a session whose root document text contains a literal substring
#[derive(Debug, Clone)]
pub struct HasContent {
    content: String,
}

/// Assert that the given text is shown on the current page
#[must_use]
pub fn has_content(content: impl Into<String>) -> HasContent {
    HasContent {
        content: content.into(),
    }
}

impl<S: Session + ?Sized> Matcher<S> for HasContent {
    fn matches(&self, session: &S) -> PagematchResult<bool> {
        Ok(session.root_text()?.contains(&self.content))
    }

    fn describe_expectation(&self) -> String {
        format!("Text containing {}", self.content)
    }

    fn describe_mismatch(&self, session: &S) -> String {
        let mut d = Description::new();
        d.append_text("was ")
            .append_observed(&session.current_address())
            .append_text("\n")
            .append_observed(&session.root_text());
        d.into_string()
    }
}

/// Matches a session on which an element lookup does not raise not-found.
///
/// A lookup returning an empty list without error counts as a match. WebDriver
/// style `find_elements` never raises on zero results, so this matcher only
/// fails when the session explicitly reports not-found.
#[derive(Debug, Clone)]
pub struct HasElement {
    locator: Locator,
}

/// Assert that the current page has an element matching `locator`
#[must_use]
pub fn has_element(locator: Locator) -> HasElement {
    HasElement { locator }
}

impl<S: Session + ?Sized> Matcher<S> for HasElement {
    fn matches(&self, session: &S) -> PagematchResult<bool> {
        match session.find_elements(&self.locator) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => {
                tracing::debug!(locator = %self.locator, "element not found, treating as non-match");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn describe_expectation(&self) -> String {
        let mut d = Description::new();
        d.append_text("contains element that matches ")
            .append_display(&self.locator);
        d.into_string()
    }

    fn describe_mismatch(&self, session: &S) -> String {
        let mut d = Description::new();
        d.append_text("was at ")
            .append_observed(&session.current_address());
        d.into_string()
    }
}

/// Matches a page object whose page shows a side-panel action.
///
/// Evaluation navigates the session to the page first.
#[derive(Debug, Clone)]
pub struct HasAction {
    display_name: String,
    locator: Locator,
}

/// Assert that a page object's page has an action titled `display_name`
#[must_use]
pub fn has_action(display_name: impl Into<String>) -> HasAction {
    let display_name = display_name.into();
    let locator = by::action(&display_name);
    HasAction {
        display_name,
        locator,
    }
}

impl HasAction {
    /// Locator used to find the action
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl<P: PageObject + ?Sized> Matcher<P> for HasAction {
    fn matches(&self, page: &P) -> PagematchResult<bool> {
        page.open()?;
        match page.find(&self.locator) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => {
                tracing::debug!(
                    address = %page.address(),
                    action = %self.display_name,
                    "action not found"
                );
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn describe_expectation(&self) -> String {
        let mut d = Description::new();
        d.append_text("contains action titled ")
            .append_value(&self.display_name);
        d.into_string()
    }

    fn describe_mismatch(&self, page: &P) -> String {
        let mut d = Description::new();
        d.append_value(page.address().as_str())
            .append_text(" does not have action: ")
            .append_value(&self.display_name);
        d.into_string()
    }
}

/// Regular expression flags for [`contains_regexp_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    /// Match letters regardless of case
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries
    pub multi_line: bool,
    /// `.` also matches `\n`
    pub dot_matches_new_line: bool,
    /// Ignore whitespace and allow `#` comments in the pattern
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// No flags
    pub const NONE: Self = Self {
        case_insensitive: false,
        multi_line: false,
        dot_matches_new_line: false,
        ignore_whitespace: false,
    };

    /// Enable case-insensitive matching
    #[must_use]
    pub const fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Enable multi-line mode
    #[must_use]
    pub const fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    /// Let `.` match newlines
    #[must_use]
    pub const fn dot_matches_new_line(mut self) -> Self {
        self.dot_matches_new_line = true;
        self
    }

    /// Enable verbose patterns
    #[must_use]
    pub const fn ignore_whitespace(mut self) -> Self {
        self.ignore_whitespace = true;
        self
    }
}

/// Matches text containing a portion that matches a regular expression
#[derive(Debug, Clone)]
pub struct ContainsRegexp {
    pattern: String,
    regex: Regex,
}

/// Assert that a string contains a match for `pattern`
///
/// # Errors
///
/// Returns [`PagematchError::InvalidPattern`] if the pattern does not compile.
pub fn contains_regexp(pattern: &str) -> PagematchResult<ContainsRegexp> {
    contains_regexp_with(pattern, RegexFlags::NONE)
}

/// Assert that a string contains a match for `pattern` compiled with `flags`
///
/// # Errors
///
/// Returns [`PagematchError::InvalidPattern`] if the pattern does not compile.
pub fn contains_regexp_with(pattern: &str, flags: RegexFlags) -> PagematchResult<ContainsRegexp> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_matches_new_line)
        .ignore_whitespace(flags.ignore_whitespace)
        .build()
        .map_err(|source| PagematchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(ContainsRegexp {
        pattern: pattern.to_string(),
        regex,
    })
}

impl ContainsRegexp {
    /// Pattern as written by the caller
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Matcher<str> for ContainsRegexp {
    fn matches(&self, text: &str) -> PagematchResult<bool> {
        Ok(self.regex.is_match(text))
    }

    fn describe_expectation(&self) -> String {
        format!("Matches regexp {}", self.pattern)
    }

    fn describe_mismatch(&self, text: &str) -> String {
        let mut d = Description::new();
        d.append_text("was ").append_value(text);
        d.into_string()
    }
}

impl Matcher<String> for ContainsRegexp {
    fn matches(&self, text: &String) -> PagematchResult<bool> {
        Matcher::<str>::matches(self, text)
    }

    fn describe_expectation(&self) -> String {
        Matcher::<str>::describe_expectation(self)
    }

    fn describe_mismatch(&self, text: &String) -> String {
        Matcher::<str>::describe_mismatch(self, text)
    }
}

/// Matches a container page object whose structured state can be fetched
#[derive(Debug, Clone, Copy, Default)]
pub struct PageObjectExists;

/// Assert that a container page object exists on the remote side
#[must_use]
pub const fn page_object_exists() -> PageObjectExists {
    PageObjectExists
}

impl<P: ContainerPageObject + ?Sized> Matcher<P> for PageObjectExists {
    fn matches(&self, page: &P) -> PagematchResult<bool> {
        match page.structured_state() {
            Ok(_) => Ok(true),
            Err(err) => {
                tracing::debug!(
                    address = %page.address(),
                    error = %err,
                    "structured state unavailable, treating as missing"
                );
                Ok(false)
            }
        }
    }

    fn describe_expectation(&self) -> String {
        "Page object exists".to_string()
    }

    fn describe_mismatch(&self, page: &P) -> String {
        format!("{} does not exist", page.address())
    }
}
