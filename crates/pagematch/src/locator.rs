//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable XPath or CSS expression. Locators are usually
//! built from a fixed template and caller-supplied values:
//!
//! ```ignore
//! let loc = Locator::xpath_template("//div[@id='tasks']/div/a[text()='%s']", &["O'Brien"])?;
//! assert_eq!(loc.expression(), r#"//div[@id='tasks']/div/a[text()="O'Brien"]"#);
//! ```
//!
//! # Template syntax
//!
//! - `%s` is a positional placeholder, optionally wrapped in matching quotes
//!   (`'%s'` or `"%s"`). The whole token is replaced by a quoted literal.
//! - A placeholder inside a longer literal (`'Build %s'`) splices the value
//!   into that literal: XPath gets a `concat()` of the pieces, CSS gets the
//!   value backslash-escaped in place.
//! - `%%` is a literal percent sign.
//! - Any other `%` sequence, or a literal left unterminated (`'%s"`), is
//!   rejected.
//!
//! Substituted values are always emitted as string literals of the target
//! dialect, so a value can never close the literal and inject new syntax.

use std::fmt;

use crate::result::{PagematchError, PagematchResult};

/// Template used to locate a named action in a page's side panel
pub const ACTION_TEMPLATE: &str = "//div[@id='tasks']/div/a[text()='%s']";

/// Selector dialect of a [`Locator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// XPath 1.0 expression
    XPath,
    /// CSS selector
    Css,
}

impl Dialect {
    /// Quote `value` as a string literal of this dialect
    #[must_use]
    pub fn literal(self, value: &str) -> String {
        match self {
            Self::XPath => xpath_literal(value),
            Self::Css => css_literal(value),
        }
    }
}

/// An engine-specific expression that locates zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// XPath expression (e.g., "//div[@id='tasks']")
    XPath(String),
    /// CSS selector (e.g., "div#tasks > a")
    Css(String),
}

impl Locator {
    /// Create a raw XPath locator
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Create a raw CSS locator
    #[must_use]
    pub fn css(expression: impl Into<String>) -> Self {
        Self::Css(expression.into())
    }

    /// Build an XPath locator from a template and substitution values
    ///
    /// # Errors
    ///
    /// Returns [`PagematchError::TemplateArity`] if the placeholder count
    /// differs from `values.len()`, or [`PagematchError::InvalidTemplate`] for
    /// malformed `%` sequences.
    pub fn xpath_template(template: &str, values: &[&str]) -> PagematchResult<Self> {
        expand(template, values, Dialect::XPath).map(Self::XPath)
    }

    /// Build a CSS locator from a template and substitution values
    ///
    /// # Errors
    ///
    /// Same as [`Locator::xpath_template`].
    pub fn css_template(template: &str, values: &[&str]) -> PagematchResult<Self> {
        expand(template, values, Dialect::Css).map(Self::Css)
    }

    /// The raw expression string
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::XPath(s) | Self::Css(s) => s,
        }
    }

    /// Dialect of this locator
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        match self {
            Self::XPath(_) => Dialect::XPath,
            Self::Css(_) => Dialect::Css,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XPath(s) => write!(f, "By.xpath: {s}"),
            Self::Css(s) => write!(f, "By.cssSelector: {s}"),
        }
    }
}

/// Quote a value as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so values holding both quote kinds are
/// split around `'` and joined with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    join_xpath_parts(xpath_literal_parts(value))
}

/// Quoted XPath pieces that concatenate to `value`
fn xpath_literal_parts(value: &str) -> Vec<String> {
    if !value.contains('\'') {
        return vec![format!("'{value}'")];
    }
    if !value.contains('"') {
        return vec![format!("\"{value}\"")];
    }

    let mut parts = Vec::new();
    for (i, chunk) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{chunk}'"));
        }
    }
    parts
}

fn join_xpath_parts(mut parts: Vec<String>) -> String {
    match parts.len() {
        0 => "''".to_string(),
        1 => parts.pop().unwrap_or_default(),
        _ => format!("concat({})", parts.join(", ")),
    }
}

/// Quote a value as a CSS string literal
#[must_use]
pub fn css_literal(value: &str) -> String {
    format!("'{}'", css_escape(value))
}

/// Escape a value for use inside a CSS string of either quote kind
fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            }
            // newlines are not allowed inside CSS strings
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out
}

/// Top-level piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// Template text copied verbatim
    Text(&'a str),
    /// Placeholder replaced by a complete literal
    Placeholder,
    /// String literal of the template with placeholders inside it
    Quoted { quote: char, pieces: Vec<Piece<'a>> },
}

/// Piece of a quoted template literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Value,
}

fn is_special(c: char) -> bool {
    matches!(c, '%' | '\'' | '"')
}

fn invalid_template(template: &str, rest: &str, what: &str) -> PagematchError {
    let offset = template.len() - rest.len();
    PagematchError::InvalidTemplate {
        template: template.to_string(),
        message: format!("{what} at byte {offset}"),
    }
}

fn parse(template: &str, dialect: Dialect) -> PagematchResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(first) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("%s") {
            segments.push(Segment::Placeholder);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%%") {
            segments.push(Segment::Text(&rest[..1]));
            rest = tail;
        } else if first == '%' {
            return Err(invalid_template(template, rest, "unsupported '%' sequence"));
        } else if first == '\'' || first == '"' {
            let (pieces, tail) = parse_quoted(template, &rest[1..], first, dialect)?;
            // a literal holding only a placeholder is replaced as a whole
            segments.push(if pieces == [Piece::Value] {
                Segment::Placeholder
            } else {
                Segment::Quoted {
                    quote: first,
                    pieces,
                }
            });
            rest = tail;
        } else {
            let end = rest.find(is_special).unwrap_or(rest.len());
            segments.push(Segment::Text(&rest[..end]));
            rest = &rest[end..];
        }
    }

    Ok(segments)
}

/// Parse the body of a literal opened by `quote`; returns its pieces and
/// the template text after the closing quote
fn parse_quoted<'a>(
    template: &str,
    body: &'a str,
    quote: char,
    dialect: Dialect,
) -> PagematchResult<(Vec<Piece<'a>>, &'a str)> {
    let mut pieces = Vec::new();
    let mut rest = body;

    loop {
        if let Some(tail) = rest.strip_prefix(quote) {
            return Ok((pieces, tail));
        }
        if rest.is_empty() {
            let opened = &template[template.len() - body.len() - 1..];
            return Err(invalid_template(template, opened, "unterminated string literal"));
        }
        if let Some(tail) = rest.strip_prefix("%s") {
            pieces.push(Piece::Value);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%%") {
            pieces.push(Piece::Text(&rest[..1]));
            rest = tail;
        } else if rest.starts_with('%') {
            return Err(invalid_template(template, rest, "unsupported '%' sequence"));
        } else {
            let end = literal_run(rest, quote, dialect);
            pieces.push(Piece::Text(&rest[..end]));
            rest = &rest[end..];
        }
    }
}

/// Length of the plain text run at the start of a literal body
fn literal_run(rest: &str, quote: char, dialect: Dialect) -> usize {
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == quote || c == '%' {
            return i;
        }
        // CSS strings allow backslash escapes, including of the quote
        if c == '\\' && dialect == Dialect::Css {
            let _ = chars.next();
        }
    }
    rest.len()
}

/// XPath expression for a template literal with values spliced in
fn xpath_quoted(pieces: &[Piece<'_>], values: &mut impl Iterator<Item = String>) -> String {
    let mut parts = Vec::new();
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(t) => text.push_str(t),
            Piece::Value => {
                let value = values.next().unwrap_or_default();
                if !text.is_empty() {
                    parts.extend(xpath_literal_parts(&std::mem::take(&mut text)));
                }
                if !value.is_empty() {
                    parts.extend(xpath_literal_parts(&value));
                }
            }
        }
    }
    if !text.is_empty() {
        parts.extend(xpath_literal_parts(&text));
    }
    join_xpath_parts(parts)
}

fn expand(template: &str, values: &[&str], dialect: Dialect) -> PagematchResult<String> {
    let segments = parse(template, dialect)?;
    let expected: usize = segments
        .iter()
        .map(|s| match s {
            Segment::Text(_) => 0,
            Segment::Placeholder => 1,
            Segment::Quoted { pieces, .. } => {
                pieces.iter().filter(|p| **p == Piece::Value).count()
            }
        })
        .sum();
    if expected != values.len() {
        return Err(PagematchError::TemplateArity {
            template: template.to_string(),
            expected,
            actual: values.len(),
        });
    }

    let extra: usize = values.iter().map(|v| v.len() + 2).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut values = values.iter().map(|v| (*v).to_string());
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder => {
                if let Some(value) = values.next() {
                    out.push_str(&dialect.literal(&value));
                }
            }
            Segment::Quoted { quote, pieces } => {
                let has_value = pieces.contains(&Piece::Value);
                if dialect == Dialect::XPath && has_value {
                    out.push_str(&xpath_quoted(&pieces, &mut values));
                    continue;
                }
                out.push(quote);
                for piece in pieces {
                    match piece {
                        Piece::Text(t) => out.push_str(t),
                        Piece::Value => {
                            out.push_str(&css_escape(&values.next().unwrap_or_default()));
                        }
                    }
                }
                out.push(quote);
            }
        }
    }

    tracing::trace!(template, expression = %out, "built locator");
    Ok(out)
}

/// Stateless locator factory functions.
///
/// Each function quotes its argument with [`xpath_literal`], so display
/// strings from the application under test are safe to pass through.
pub mod by {
    use super::{xpath_literal, Locator};
    use crate::result::PagematchResult;

    /// Templated XPath locator
    pub fn xpath(template: &str, values: &[&str]) -> PagematchResult<Locator> {
        Locator::xpath_template(template, values)
    }

    /// Templated CSS locator
    pub fn css(template: &str, values: &[&str]) -> PagematchResult<Locator> {
        Locator::css_template(template, values)
    }

    /// Element with the given `id` attribute
    #[must_use]
    pub fn id(id: &str) -> Locator {
        Locator::XPath(format!("//*[@id={}]", xpath_literal(id)))
    }

    /// Element with the given `name` attribute
    #[must_use]
    pub fn name(name: &str) -> Locator {
        Locator::XPath(format!("//*[@name={}]", xpath_literal(name)))
    }

    /// Form element with the given `path` attribute
    #[must_use]
    pub fn path(path: &str) -> Locator {
        Locator::XPath(format!("//*[@path={}]", xpath_literal(path)))
    }

    /// Anchor pointing at `href`
    #[must_use]
    pub fn href(href: &str) -> Locator {
        Locator::XPath(format!("//a[@href={}]", xpath_literal(href)))
    }

    /// Anchor identified by its text, title or id
    #[must_use]
    pub fn link(text: &str) -> Locator {
        let lit = xpath_literal(text);
        Locator::XPath(format!("//a[text()={lit} or @title={lit} or @id={lit}]"))
    }

    /// Button identified by its caption, name or id
    #[must_use]
    pub fn button(text: &str) -> Locator {
        let lit = xpath_literal(text);
        Locator::XPath(format!(
            "//button[text()={lit} or @name={lit} or @id={lit}] | \
             //input[(@type='submit' or @type='button') and (@value={lit} or @name={lit} or @id={lit})]"
        ))
    }

    /// Input identified by its name, id or path
    #[must_use]
    pub fn input(name: &str) -> Locator {
        let lit = xpath_literal(name);
        Locator::XPath(format!("//input[@name={lit} or @id={lit} or @path={lit}]"))
    }

    /// Checkbox identified by its name, id or label text
    #[must_use]
    pub fn checkbox(label: &str) -> Locator {
        let lit = xpath_literal(label);
        Locator::XPath(format!(
            "//input[@type='checkbox' and (@name={lit} or @id={lit})] | \
             //label[text()={lit}]/input[@type='checkbox']"
        ))
    }

    /// Select option identified by its text or value
    #[must_use]
    pub fn option(text: &str) -> Locator {
        let lit = xpath_literal(text);
        Locator::XPath(format!("//option[normalize-space(.)={lit} or @value={lit}]"))
    }

    /// Side-panel action with the given display name
    #[must_use]
    pub fn action(display_name: &str) -> Locator {
        Locator::XPath(format!(
            "//div[@id='tasks']/div/a[text()={}]",
            xpath_literal(display_name)
        ))
    }
}
