use crate::{location::Url, RouterError};
use core::fmt;
use std::str::FromStr;

/// How a navigation is recorded in the host's history.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Adds a new history entry.
    #[default]
    Push,
    /// Overwrites the current history entry.
    Replace,
}

impl FromStr for Mode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Mode::Push),
            "replace" => Ok(Mode::Replace),
            other => Err(RouterError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Push => "push",
            Mode::Replace => "replace",
        })
    }
}

/// Options that can be used to configure a navigation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub mode: Mode,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self { mode: Mode::Push }
    }

    pub fn replace() -> Self {
        Self {
            mode: Mode::Replace,
        }
    }
}

impl From<Mode> for NavigateOptions {
    fn from(mode: Mode) -> Self {
        Self { mode }
    }
}

/// Where to navigate: a URL string, a structured [`Url`], or a function
/// computing the next location from the current one.
pub enum NavigationTarget {
    Literal(String),
    Structured(Url),
    Callback(Box<dyn FnOnce(&Url) -> Url>),
}

impl NavigationTarget {
    pub fn callback(f: impl FnOnce(&Url) -> Url + 'static) -> Self {
        NavigationTarget::Callback(Box::new(f))
    }

    /// Turns the target into a location, given the current one.
    pub fn resolve(self, current: &Url) -> Result<Url, RouterError> {
        match self {
            NavigationTarget::Literal(href) => Url::parse(&href),
            NavigationTarget::Structured(url) => Ok(url),
            NavigationTarget::Callback(f) => Ok(f(current)),
        }
    }
}

impl fmt::Debug for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(href) => {
                f.debug_tuple("Literal").field(href).finish()
            }
            Self::Structured(url) => {
                f.debug_tuple("Structured").field(url).finish()
            }
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(href: &str) -> Self {
        NavigationTarget::Literal(href.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(href: String) -> Self {
        NavigationTarget::Literal(href)
    }
}

impl From<&String> for NavigationTarget {
    fn from(href: &String) -> Self {
        NavigationTarget::Literal(href.clone())
    }
}

impl From<Url> for NavigationTarget {
    fn from(url: Url) -> Self {
        NavigationTarget::Structured(url)
    }
}

impl From<&Url> for NavigationTarget {
    fn from(url: &Url) -> Self {
        NavigationTarget::Structured(url.clone())
    }
}
