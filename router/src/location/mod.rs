use crate::{Mode, RouterError};
use core::fmt;
use std::{borrow::Cow, rc::Rc, str::FromStr};

#[cfg(feature = "browser")]
mod history;
mod memory;
mod query;
mod server;
#[cfg(feature = "browser")]
pub use history::*;
pub use memory::*;
pub use query::*;
pub use server::*;

/// Base that relative locations are resolved against.
pub(crate) const BASE: &str = "http://localhost";

/// A parsed location: path, query and hash fragment.
///
/// The path always starts with `/` and never ends with one, unless it is the
/// root. The hash is stored without its leading `#`, and is `None` rather
/// than empty when the location has no fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    path: String,
    query: Query,
    hash: Option<String>,
}

impl Default for Url {
    fn default() -> Self {
        Self {
            path: "/".into(),
            query: Query::new(),
            hash: None,
        }
    }
}

impl Url {
    /// Parses an absolute or path-relative URL.
    pub fn parse(input: &str) -> Result<Self, RouterError> {
        Self::parse_with_base(input, BASE)
    }

    pub fn parse_with_base(
        input: &str,
        base: &str,
    ) -> Result<Self, RouterError> {
        let invalid = |source| RouterError::InvalidUrl {
            url: input.to_string(),
            source,
        };
        let base = url::Url::parse(base).map_err(invalid)?;
        let parsed = url::Url::options()
            .base_url(Some(&base))
            .parse(input)
            .map_err(invalid)?;
        // `mailto:`, `data:` and the like have no path to route
        if parsed.cannot_be_a_base() {
            return Err(RouterError::NotRoutable(input.to_string()));
        }

        Ok(Self {
            path: normalize_path(parsed.path()).to_string(),
            query: Query::parse(parsed.query().unwrap_or_default()),
            hash: parsed
                .fragment()
                .filter(|hash| !hash.is_empty())
                .map(String::from),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut String {
        &mut self.path
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn hash_mut(&mut self) -> &mut Option<String> {
        &mut self.hash
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets the hash; an empty string clears it.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        let hash = hash.into();
        self.hash = (!hash.is_empty()).then_some(hash);
        self
    }

    /// Serializes the location back into a path, query string and hash.
    pub fn to_full_path(&self) -> String {
        let mut path = if self.path.is_empty() {
            String::from("/")
        } else {
            self.path.clone()
        };
        let search = self.query.to_query_string();
        if !search.is_empty() {
            path.push('?');
            path.push_str(&search);
        }
        if let Some(hash) = self.hash.as_deref().filter(|h| !h.is_empty()) {
            path.push('#');
            path.push_str(hash);
        }
        path
    }
}

impl FromStr for Url {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Url {
    type Error = RouterError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        Self::parse(url)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_path())
    }
}

/// Strips a single trailing `/`, never reducing the root to an empty path.
pub(crate) fn normalize_path(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    match path.strip_suffix('/') {
        Some("") | None => path,
        Some(stripped) => stripped,
    }
}

/// Anything that can be written to the host's history.
///
/// Strings are passed through untouched; a [`Url`] is serialized.
pub trait ToHref {
    fn to_href(&self) -> Cow<'_, str>;
}

impl ToHref for str {
    fn to_href(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ToHref for String {
    fn to_href(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ToHref for Url {
    fn to_href(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_full_path())
    }
}

/// A description of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChange {
    /// The serialized new URL.
    pub value: String,
    /// Whether the new location adds a history entry or overwrites the
    /// current one.
    pub mode: Mode,
    /// If true, the host scrolls to the top once history is updated.
    pub scroll: bool,
}

/// The environment a router runs in: where the current location comes from,
/// where history entries go, and which events drive navigation.
pub trait LocationProvider {
    /// The host's current location, if it has one.
    fn current(&self) -> Option<String>;

    /// Adds a history entry for `href`.
    fn push_state(&self, href: &str) -> Result<(), RouterError>;

    /// Overwrites the current history entry with `href`.
    fn replace_state(&self, href: &str) -> Result<(), RouterError>;

    /// Sets up the host's global event listeners. They stay attached until
    /// the returned [`Listeners`] is removed or dropped.
    fn listen(&self, handlers: HostHandlers) -> Result<Listeners, RouterError>;

    fn scroll_to_top(&self) {}

    /// Brings the element named by a hash fragment into view.
    fn scroll_to_hash(&self, _hash: &str) {}

    /// Update the host's history to reflect a new location.
    fn complete_navigation(
        &self,
        loc: &LocationChange,
    ) -> Result<(), RouterError> {
        match loc.mode {
            Mode::Push => self.push_state(&loc.value)?,
            Mode::Replace => self.replace_state(&loc.value)?,
        }
        if loc.scroll {
            self.scroll_to_top();
        }
        Ok(())
    }
}

/// Callbacks a host invokes for back/forward navigation and for clicks.
#[derive(Clone)]
pub struct HostHandlers {
    /// Called after the host's location changed on its own.
    pub on_pop: Rc<dyn Fn()>,
    /// Called for every click; returns `true` if the router took over and
    /// the host's default navigation must be prevented.
    pub on_click: Rc<dyn Fn(&LinkClick) -> bool>,
}

impl fmt::Debug for HostHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandlers").finish_non_exhaustive()
    }
}

/// Event listeners attached by a host. Removing them happens at most once.
#[must_use = "dropping `Listeners` detaches them"]
pub struct Listeners {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Listeners {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Listeners for a host that has nothing to listen to.
    pub fn inert() -> Self {
        Self { cleanup: None }
    }

    pub fn is_attached(&self) -> bool {
        self.cleanup.is_some()
    }

    pub fn remove(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// The `<a>` element nearest to a click target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
    pub target: Option<String>,
    pub rel: Option<String>,
    pub download: bool,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }
}

/// A click as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    /// The nearest anchor ancestor of the click target, if any.
    pub anchor: Option<Anchor>,
    /// The mouse button; `0` is the primary button.
    pub button: i16,
    /// Whether meta, alt, ctrl or shift was held.
    pub modifier_key: bool,
    pub default_prevented: bool,
}

impl LinkClick {
    /// A plain primary-button click on `anchor`.
    pub fn on(anchor: Anchor) -> Self {
        Self {
            anchor: Some(anchor),
            ..Default::default()
        }
    }
}

/// Decides whether a click should be handled by the router, returning the
/// `href` to navigate to if so.
pub fn handle_anchor_click(click: &LinkClick) -> Option<&str> {
    if click.default_prevented || click.button != 0 || click.modifier_key {
        return None;
    }

    let a = click.anchor.as_ref()?;
    let href = a.href.as_deref().filter(|href| !href.is_empty())?;

    // let browser handle this event if link has target
    if a.target.is_some() {
        return None;
    }

    // let browser handle event if it has rel=external or download
    let mut rel = a.rel.as_deref().unwrap_or_default().split([' ', '\t']);
    if a.download || rel.any(|p| p == "external") {
        return None;
    }

    // absolute links leave the app; bare fragments keep native scrolling
    if has_scheme(href) || href.starts_with('#') {
        return None;
    }

    Some(href)
}

/// Whether `href` leaves the app: protocol-relative (`//host`) or starting
/// with a URI scheme (`https:`, `mailto:`, `javascript:`, ...).
pub fn has_scheme(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    let Some(end) = href.find([':', '/', '?', '#']) else {
        return false;
    };
    let (scheme, rest) = href.split_at(end);
    let mut chars = scheme.chars();
    rest.starts_with(':')
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_url_without_origin() {
        let url = Url::parse("/foo/bar").unwrap();
        assert_eq!(url.path(), "/foo/bar");
    }

    #[test]
    fn should_parse_url_without_slash() {
        let url = Url::parse("foo/bar").unwrap();
        assert_eq!(url.path(), "/foo/bar");
    }

    #[test]
    fn should_parse_with_origin() {
        let url = Url::parse("https://www.example.com/foo/bar?a=b").unwrap();
        assert_eq!(url.path(), "/foo/bar");
        assert_eq!(url.query().get_str("a"), Some("b"));
    }

    #[test]
    fn normalizes_trailing_slashes() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/a/"), "/a");
        assert_eq!(normalize_path("/a//"), "/a/");
        assert_eq!(normalize_path("/a"), "/a");
    }

    #[test]
    fn strings_pass_through_to_href() {
        assert_eq!("/a/?x=%20".to_href(), "/a/?x=%20");
        let url = Url::default().with_hash("top");
        assert_eq!(url.to_href(), "/#top");
    }

    #[test]
    fn detects_schemes() {
        assert!(has_scheme("https://example.com/"));
        assert!(has_scheme("//cdn.example.com/x.js"));
        assert!(has_scheme("mailto:someone@example.com"));
        assert!(has_scheme("tel:+100"));
        assert!(has_scheme("javascript:void(0)"));
        assert!(has_scheme("sms:123"));
        assert!(has_scheme("data:text/plain,hi"));
        assert!(has_scheme("ftp:x"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("/user"));
        assert!(!has_scheme("/a:b"));
        assert!(!has_scheme("user?next=http://x"));
        assert!(!has_scheme("page#at:12"));
        assert!(!has_scheme("1up:x"));
        assert!(!has_scheme(":x"));
    }

    #[test]
    fn urls_without_a_path_are_rejected() {
        for input in ["mailto:a@b", "javascript:void(0)", "data:,hi"] {
            assert_eq!(
                Url::parse(input),
                Err(RouterError::NotRoutable(input.to_string()))
            );
        }
        assert_eq!(Url::parse("https://example.com").unwrap().path(), "/");
    }
}
