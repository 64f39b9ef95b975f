use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// Navigation was requested with a mode other than `push` or `replace`.
    #[error("Invalid mode {0:?}")]
    InvalidMode(String),
    /// A route was declared without anything to show when it matches.
    #[error("route {0:?} needs a component, a render function or children")]
    NoMatch(String),
    /// A router primitive was used outside of a mounted router.
    #[error("router primitives must be used within a mounted router")]
    MissingRouterContext,
    /// The host does not expose a history API.
    #[error("history is not available in this environment")]
    HistoryUnavailable,
    /// The host refused a history write.
    #[error("history update failed: {0}")]
    History(String),
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The URL has no path, like `mailto:` or `javascript:` URLs.
    #[error("url {0:?} has no path to route")]
    NotRoutable(String),
    #[error("Config Error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for RouterError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
