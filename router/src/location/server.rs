use super::{HostHandlers, Listeners, LocationProvider};
use crate::RouterError;
use std::sync::Arc;

/// The location of a server-side request.
///
/// There is no history to write to and no events to listen for: navigations
/// only update the router's own state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestUrl(Arc<str>);

impl RequestUrl {
    /// Creates a server-side request URL from a path.
    pub fn new(path: &str) -> Self {
        Self(path.into())
    }
}

impl AsRef<str> for RequestUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for RequestUrl {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LocationProvider for RequestUrl {
    fn current(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn push_state(&self, href: &str) -> Result<(), RouterError> {
        tracing::trace!(href, "no history on the server, skipping push");
        Ok(())
    }

    fn replace_state(&self, href: &str) -> Result<(), RouterError> {
        tracing::trace!(href, "no history on the server, skipping replace");
        Ok(())
    }

    fn listen(
        &self,
        _handlers: HostHandlers,
    ) -> Result<Listeners, RouterError> {
        Ok(Listeners::inert())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Url;

    #[test]
    pub fn defaults_to_root() {
        let current = RequestUrl::default().current().unwrap();
        assert_eq!(Url::parse(&current).unwrap().path(), "/");
    }

    #[test]
    pub fn should_parse_with_base() {
        let request = RequestUrl::new("https://www.example.com/foo/bar?a=b");
        let url = Url::parse(request.as_ref()).unwrap();
        assert_eq!(url.path(), "/foo/bar");
        assert_eq!(url.query().get_str("a"), Some("b"));
    }

    #[test]
    pub fn history_writes_are_accepted() {
        let request = RequestUrl::new("/");
        assert_eq!(request.push_state("/a"), Ok(()));
        assert_eq!(request.replace_state("/b"), Ok(()));
        assert_eq!(request.current().as_deref(), Some("/"));
    }
}
