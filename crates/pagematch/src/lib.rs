//! Pagematch: matchers and page objects for verifying remote UIs
//!
//! A small assertion layer for tests that drive a browser-controlled
//! application through an existing session handle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   PAGEMATCH Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Locator    │───►│ Page       │───►│ Session    │            │
//! │   │ builder    │    │ objects    │    │ (external) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │          │                 ▲                 ▲                  │
//! │          └──────►┌─────────┴───────┐         │                  │
//! │                  │ Matchers        │─────────┘                  │
//! │                  └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pagematch::prelude::*;
//!
//! let job = config.container_page(&session, "job/warnings/")?;
//! assert_that(&job, &page_object_exists())?;
//! assert_that(&job, &not(has_action("Java Warnings")))?;
//! assert_that(&session, &has_content("Java Warnings: 0"))?;
//! ```

#![warn(missing_docs)]

mod assertion;
mod config;
mod locator;
mod matcher;
mod matchers;
mod page_object;
mod result;
mod session;

pub use assertion::{
    assert_that, evaluate, failure_message, AssertionMode, AssertionResult, SoftAssertions,
};
pub use config::{PageConfig, PageConfigBuilder, BASE_URL_ENV, DEFAULT_BASE_URL, STATE_PATH_ENV};
pub use locator::{by, css_literal, xpath_literal, Dialect, Locator, ACTION_TEMPLATE};
pub use matcher::{not, Description, Matcher, Not};
pub use matchers::{
    contains_regexp, contains_regexp_with, has_action, has_content, has_element,
    page_object_exists, ContainsRegexp, HasAction, HasContent, HasElement, PageObjectExists,
    RegexFlags,
};
pub use page_object::{
    ContainerPage, ContainerPageObject, Page, PageObject, DEFAULT_STRUCTURED_STATE_PATH,
};
pub use result::{PagematchError, PagematchResult};
pub use session::{ElementHandle, LookupOutcome, MockSession, Session};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::{assert_that, SoftAssertions};
    pub use super::config::PageConfig;
    pub use super::locator::{by, Locator};
    pub use super::matcher::{not, Matcher};
    pub use super::matchers::{
        contains_regexp, contains_regexp_with, has_action, has_content, has_element,
        page_object_exists, RegexFlags,
    };
    pub use super::page_object::{ContainerPage, ContainerPageObject, Page, PageObject};
    pub use super::result::{PagematchError, PagematchResult};
    pub use super::session::{ElementHandle, Session};
}
