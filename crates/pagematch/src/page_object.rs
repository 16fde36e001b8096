//! Page Object Model Support
//!
//! Page objects are typed handles onto navigable regions of the remote UI.
//! They borrow the [`Session`] they observe and are reused across
//! assertions within one test.
//!
//! Two flavours exist:
//! - [`Page`]: state is observed by locating elements in rendered markup.
//! - [`ContainerPage`]: state is also available as a structured (JSON)
//!   snapshot served below the page's address.
//!
//! # Example
//!
//! ```ignore
//! struct JobPage<'s> {
//!     inner: ContainerPage<'s>,
//! }
//!
//! impl PageObject for JobPage<'_> {
//!     fn session(&self) -> &dyn Session {
//!         self.inner.session()
//!     }
//!
//!     fn address(&self) -> &Url {
//!         self.inner.address()
//!     }
//! }
//! ```

use url::Url;

use crate::locator::Locator;
use crate::result::PagematchResult;
use crate::session::{ElementHandle, Session};

/// Default path of the structured snapshot, relative to a container page
pub const DEFAULT_STRUCTURED_STATE_PATH: &str = "api/json";

/// Trait for page objects representing a navigable region of the remote UI.
///
/// Only [`PageObject::session`] and [`PageObject::address`] are required;
/// the remaining operations delegate to the session.
pub trait PageObject {
    /// Session this page is observed through
    fn session(&self) -> &dyn Session;

    /// Absolute address of the page
    fn address(&self) -> &Url;

    /// Navigate the session to this page. Repeated calls re-navigate to the
    /// same address.
    fn open(&self) -> PagematchResult<()> {
        tracing::debug!(address = %self.address(), "opening page");
        self.session().navigate(self.address())
    }

    /// Find the first element matching the locator on the current page
    fn find(&self, locator: &Locator) -> PagematchResult<ElementHandle> {
        self.session().find_element(locator)
    }

    /// Find all elements matching the locator on the current page
    fn find_all(&self, locator: &Locator) -> PagematchResult<Vec<ElementHandle>> {
        self.session().find_elements(locator)
    }

    /// Resolve an address relative to this page
    fn resolve(&self, relative: &str) -> PagematchResult<Url> {
        Ok(self.address().join(relative)?)
    }
}

/// Page object whose state can be fetched as a structured snapshot.
///
/// Existence of such an object is operational: it exists when the snapshot
/// fetch succeeds.
pub trait ContainerPageObject: PageObject {
    /// Path of the snapshot, relative to [`PageObject::address`]
    fn structured_state_path(&self) -> &str {
        DEFAULT_STRUCTURED_STATE_PATH
    }

    /// Absolute address of the snapshot
    fn structured_state_address(&self) -> PagematchResult<Url> {
        self.resolve(self.structured_state_path())
    }

    /// Fetch the current snapshot
    fn structured_state(&self) -> PagematchResult<serde_json::Value> {
        let address = self.structured_state_address()?;
        tracing::debug!(%address, "fetching structured state");
        self.session().fetch_structured_state(&address)
    }

    /// Fetch the current snapshot with a query string (e.g. `tree=jobs[name]`)
    fn structured_state_with_query(&self, query: &str) -> PagematchResult<serde_json::Value> {
        let mut address = self.structured_state_address()?;
        address.set_query(Some(query));
        tracing::debug!(%address, "fetching structured state");
        self.session().fetch_structured_state(&address)
    }
}

/// A rendered page object
#[derive(Clone)]
pub struct Page<'s> {
    session: &'s dyn Session,
    address: Url,
}

impl<'s> Page<'s> {
    /// Create a page object at `address`
    #[must_use]
    pub fn new(session: &'s dyn Session, address: Url) -> Self {
        Self { session, address }
    }

    /// Parse `address` and create a page object for it
    pub fn parse(session: &'s dyn Session, address: &str) -> PagematchResult<Self> {
        Ok(Self::new(session, Url::parse(address)?))
    }
}

impl std::fmt::Debug for Page<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("address", &self.address.as_str())
            .finish_non_exhaustive()
    }
}

impl PageObject for Page<'_> {
    fn session(&self) -> &dyn Session {
        self.session
    }

    fn address(&self) -> &Url {
        &self.address
    }
}

/// A container page object backed by a structured snapshot
#[derive(Clone)]
pub struct ContainerPage<'s> {
    session: &'s dyn Session,
    address: Url,
    structured_state_path: String,
}

impl<'s> ContainerPage<'s> {
    /// Create a container page at `address`.
    ///
    /// The address is normalized to end with `/` so relative paths resolve
    /// below it.
    #[must_use]
    pub fn new(session: &'s dyn Session, address: Url) -> Self {
        Self {
            session,
            address: as_container(address),
            structured_state_path: DEFAULT_STRUCTURED_STATE_PATH.to_string(),
        }
    }

    /// Parse `address` and create a container page for it
    pub fn parse(session: &'s dyn Session, address: &str) -> PagematchResult<Self> {
        Ok(Self::new(session, Url::parse(address)?))
    }

    /// Override the snapshot path
    #[must_use]
    pub fn with_structured_state_path(mut self, path: impl Into<String>) -> Self {
        self.structured_state_path = path.into();
        self
    }
}

impl std::fmt::Debug for ContainerPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerPage")
            .field("address", &self.address.as_str())
            .field("structured_state_path", &self.structured_state_path)
            .finish_non_exhaustive()
    }
}

impl PageObject for ContainerPage<'_> {
    fn session(&self) -> &dyn Session {
        self.session
    }

    fn address(&self) -> &Url {
        &self.address
    }
}

impl ContainerPageObject for ContainerPage<'_> {
    fn structured_state_path(&self) -> &str {
        &self.structured_state_path
    }
}

fn as_container(mut address: Url) -> Url {
    if !address.path().ends_with('/') {
        let path = format!("{}/", address.path());
        address.set_path(&path);
    }
    address
}
