use crate::{location::Url, NavigationTarget};
use core::fmt;
use std::rc::Rc;

/// Where a [`Switch`](super::Switch) sends the user when none of its routes
/// match.
#[derive(Clone)]
pub enum Redirect {
    Literal(String),
    Structured(Url),
    /// Computes the target from the location that failed to match.
    Callback(Rc<dyn Fn(&Url) -> NavigationTarget>),
}

impl Redirect {
    pub fn callback(f: impl Fn(&Url) -> NavigationTarget + 'static) -> Self {
        Redirect::Callback(Rc::new(f))
    }

    /// The navigation this redirect performs from `url`.
    pub fn target(&self, url: &Url) -> NavigationTarget {
        match self {
            Redirect::Literal(href) => {
                NavigationTarget::Literal(href.clone())
            }
            Redirect::Structured(to) => {
                NavigationTarget::Structured(to.clone())
            }
            Redirect::Callback(f) => f(url),
        }
    }
}

impl fmt::Debug for Redirect {
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

impl From<&str> for Redirect {
    fn from(href: &str) -> Self {
        Redirect::Literal(href.to_string())
    }
}

impl From<String> for Redirect {
    fn from(href: String) -> Self {
        Redirect::Literal(href)
    }
}

impl From<Url> for Redirect {
    fn from(url: Url) -> Self {
        Redirect::Structured(url)
    }
}
