//! Session - capability interface onto a live remote UI session
//!
//! The matcher and page-object layers never drive a browser themselves. They
//! consume an already established session through the [`Session`] trait,
//! which a WebDriver, CDP or Playwright binding implements.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  Matchers    │   │ Page objects │
//! └──────┬───────┘   └──────┬───────┘
//!        └───────┬──────────┘
//!                ▼
//!        ┌──────────────┐      ┌──────────────────────┐
//!        │ dyn Session  │◄─────┤ WebDriver / CDP / …  │
//!        └──────────────┘      │ MockSession (tests)  │
//!                              └──────────────────────┘
//! ```
//!
//! All calls are blocking. Timeout and retry policy belong to the
//! implementation.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::locator::Locator;
use crate::result::{PagematchError, PagematchResult};

/// Element handle returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier for the element within the session
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content
    pub text_content: Option<String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Text content, empty when the element has none
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or_default()
    }
}

/// Blocking capability interface onto a remote UI session.
///
/// Lookups report absence as [`PagematchError::ElementNotFound`] and
/// structured fetches report remote-side failures as
/// [`PagematchError::RemoteFailure`]; callers match on those variants.
pub trait Session {
    /// Navigate to an absolute address
    fn navigate(&self, address: &Url) -> PagematchResult<()>;

    /// Find the first element matching the locator
    fn find_element(&self, locator: &Locator) -> PagematchResult<ElementHandle>;

    /// Find all elements matching the locator
    fn find_elements(&self, locator: &Locator) -> PagematchResult<Vec<ElementHandle>>;

    /// Address currently displayed
    fn current_address(&self) -> PagematchResult<String>;

    /// Full text content of the root document
    fn root_text(&self) -> PagematchResult<String>;

    /// Fetch a structured (JSON) snapshot from an address
    fn fetch_structured_state(&self, address: &Url) -> PagematchResult<serde_json::Value>;
}

/// Scripted outcome of an element lookup on a [`MockSession`]
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    /// Lookup succeeds with these elements (possibly none)
    Found(Vec<ElementHandle>),
    /// Lookup raises not-found
    NotFound,
    /// Lookup fails with an unrelated session error
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    current_address: String,
    default_root_text: String,
    root_texts: HashMap<String, String>,
    lookups: HashMap<String, LookupOutcome>,
    scoped_lookups: HashMap<(String, String), LookupOutcome>,
    structured: HashMap<String, Result<serde_json::Value, String>>,
    navigation_failures: HashMap<String, String>,
    call_history: Vec<String>,
}

impl MockState {
    fn lookup(&self, locator: &Locator) -> Option<LookupOutcome> {
        let scoped_key = (
            self.current_address.clone(),
            locator.expression().to_string(),
        );
        self.scoped_lookups
            .get(&scoped_key)
            .or_else(|| self.lookups.get(locator.expression()))
            .cloned()
    }
}

/// In-memory session for unit testing matchers and page objects.
///
/// Lookups are keyed by locator expression, optionally scoped to the
/// address the session is on. Unscripted lookups behave like WebDriver:
/// `find_element` raises not-found and `find_elements` returns an empty list.
/// Scripting methods take `&self` so remote state can change while page
/// objects hold a borrow of the session.
#[derive(Debug, Default)]
pub struct MockSession {
    state: RefCell<MockState>,
}

impl MockSession {
    /// Create new mock session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock session already at `address`
    #[must_use]
    pub fn at(address: impl Into<String>) -> Self {
        let session = Self::new();
        session.state.borrow_mut().current_address = address.into();
        session
    }

    /// Root text shown on any address without a specific one
    pub fn set_root_text(&self, text: impl Into<String>) {
        self.state.borrow_mut().default_root_text = text.into();
    }

    /// Root text shown while the session is at `address`
    pub fn set_root_text_at(&self, address: impl Into<String>, text: impl Into<String>) {
        let _ = self
            .state
            .borrow_mut()
            .root_texts
            .insert(address.into(), text.into());
    }

    /// Add an element found by `locator` on every address
    pub fn add_element(&self, locator: &Locator, element: ElementHandle) {
        let mut state = self.state.borrow_mut();
        let entry = state
            .lookups
            .entry(locator.expression().to_string())
            .or_insert_with(|| LookupOutcome::Found(Vec::new()));
        push_found(entry, element);
    }

    /// Add an element found by `locator` only while at `address`
    pub fn add_element_at(
        &self,
        address: impl Into<String>,
        locator: &Locator,
        element: ElementHandle,
    ) {
        let mut state = self.state.borrow_mut();
        let entry = state
            .scoped_lookups
            .entry((address.into(), locator.expression().to_string()))
            .or_insert_with(|| LookupOutcome::Found(Vec::new()));
        push_found(entry, element);
    }

    /// Script the outcome of every lookup with `locator`
    pub fn set_lookup(&self, locator: &Locator, outcome: LookupOutcome) {
        let _ = self
            .state
            .borrow_mut()
            .lookups
            .insert(locator.expression().to_string(), outcome);
    }

    /// Remove all scripted outcomes for `locator`
    pub fn clear_lookup(&self, locator: &Locator) {
        let mut state = self.state.borrow_mut();
        let expression = locator.expression().to_string();
        let _ = state.lookups.remove(&expression);
        state.scoped_lookups.retain(|(_, expr), _| *expr != expression);
    }

    /// Serve a structured snapshot at `address`
    pub fn set_structured_state(&self, address: impl Into<String>, value: serde_json::Value) {
        let _ = self
            .state
            .borrow_mut()
            .structured
            .insert(address.into(), Ok(value));
    }

    /// Make the structured fetch at `address` fail remotely
    pub fn fail_structured_state(&self, address: impl Into<String>, message: impl Into<String>) {
        let _ = self
            .state
            .borrow_mut()
            .structured
            .insert(address.into(), Err(message.into()));
    }

    /// Make navigation to `address` fail
    pub fn fail_navigation(&self, address: impl Into<String>, message: impl Into<String>) {
        let _ = self
            .state
            .borrow_mut()
            .navigation_failures
            .insert(address.into(), message.into());
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state
            .borrow()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().call_history.push(call);
    }
}

fn push_found(entry: &mut LookupOutcome, element: ElementHandle) {
    match entry {
        LookupOutcome::Found(elements) => elements.push(element),
        other => *other = LookupOutcome::Found(vec![element]),
    }
}

impl Session for MockSession {
    fn navigate(&self, address: &Url) -> PagematchResult<()> {
        self.record(format!("navigate:{address}"));
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.navigation_failures.get(address.as_str()) {
            return Err(PagematchError::NavigationFailed {
                address: address.to_string(),
                message: message.clone(),
            });
        }
        state.current_address = address.to_string();
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> PagematchResult<ElementHandle> {
        self.record(format!("find_element:{}", locator.expression()));
        match self.state.borrow().lookup(locator) {
            Some(LookupOutcome::Found(elements)) => elements
                .into_iter()
                .next()
                .ok_or_else(|| PagematchError::not_found(locator)),
            Some(LookupOutcome::NotFound) | None => Err(PagematchError::not_found(locator)),
            Some(LookupOutcome::Fail(message)) => Err(PagematchError::SessionError { message }),
        }
    }

    fn find_elements(&self, locator: &Locator) -> PagematchResult<Vec<ElementHandle>> {
        self.record(format!("find_elements:{}", locator.expression()));
        match self.state.borrow().lookup(locator) {
            Some(LookupOutcome::Found(elements)) => Ok(elements),
            Some(LookupOutcome::NotFound) => Err(PagematchError::not_found(locator)),
            Some(LookupOutcome::Fail(message)) => Err(PagematchError::SessionError { message }),
            None => Ok(Vec::new()),
        }
    }

    fn current_address(&self) -> PagematchResult<String> {
        self.record("current_address".to_string());
        Ok(self.state.borrow().current_address.clone())
    }

    fn root_text(&self) -> PagematchResult<String> {
        self.record("root_text".to_string());
        let state = self.state.borrow();
        Ok(state
            .root_texts
            .get(&state.current_address)
            .unwrap_or(&state.default_root_text)
            .clone())
    }

    fn fetch_structured_state(&self, address: &Url) -> PagematchResult<serde_json::Value> {
        self.record(format!("fetch_structured_state:{address}"));
        match self.state.borrow().structured.get(address.as_str()) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(PagematchError::RemoteFailure {
                address: address.to_string(),
                message: message.clone(),
            }),
            None => Err(PagematchError::RemoteFailure {
                address: address.to_string(),
                message: "404 Not Found".to_string(),
            }),
        }
    }
}
