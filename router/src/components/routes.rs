use super::{Redirect, Route, RouterHandle};
use crate::{
    hooks::{provide_params, ParamsScope},
    location::Url,
    params::ParamsMap,
    NavigateOptions, NavigationTarget, RouteMatchId, RouterError,
};
use core::fmt;

/// An ordered list of routes, of which at most one is shown.
///
/// Routes are tried in declaration order and the first match wins: there is
/// no ranking by specificity.
pub struct Switch<V> {
    routes: Vec<Route<V>>,
    redirect: Option<Redirect>,
}

/// The route a [`Switch`] chose, with the params it extracted.
pub struct SwitchMatch<'a, V> {
    pub route: &'a Route<V>,
    pub params: ParamsMap,
}

impl<V> SwitchMatch<'_, V> {
    pub fn id(&self) -> RouteMatchId {
        self.route.id()
    }

    /// Renders the route with its params provided to
    /// [`use_params`](crate::hooks::use_params).
    pub fn view(&self) -> V
    where
        V: Clone,
    {
        let _scope = self.provide_params();
        self.route.view(&self.params)
    }

    /// Provides this match's params while content built ahead of time, like
    /// a route's children, is rendered.
    pub fn provide_params(&self) -> ParamsScope {
        provide_params(&self.params)
    }
}

impl<V> fmt::Debug for SwitchMatch<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchMatch")
            .field("route", &self.route)
            .field("params", &self.params)
            .finish()
    }
}

/// The outcome of resolving a location against a [`Switch`].
#[derive(Debug)]
pub enum Resolution<'a, V> {
    Matched(SwitchMatch<'a, V>),
    /// Nothing matched and the switch wants to navigate elsewhere.
    Redirect(NavigationTarget),
    /// Nothing matched and there is nowhere to redirect to.
    Empty,
}

impl<'a, V> Resolution<'a, V> {
    pub fn into_match(self) -> Option<SwitchMatch<'a, V>> {
        match self {
            Resolution::Matched(matched) => Some(matched),
            _ => None,
        }
    }
}

impl<V> Switch<V> {
    pub fn new(routes: impl IntoIterator<Item = Route<V>>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            redirect: None,
        }
    }

    /// Navigates to `to` (with a new history entry) whenever no route
    /// matches.
    pub fn redirect(mut self, to: impl Into<Redirect>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn routes(&self) -> &[Route<V>] {
        &self.routes
    }

    /// Picks the first route matching `url`. `parent` holds the params of
    /// an enclosing match, which routes inherit.
    pub fn resolve(
        &self,
        url: &Url,
        parent: &ParamsMap,
    ) -> Resolution<'_, V> {
        let matched = self.routes.iter().find_map(|route| {
            route
                .test(url, parent)
                .map(|params| SwitchMatch { route, params })
        });
        match (matched, &self.redirect) {
            (Some(matched), _) => Resolution::Matched(matched),
            (None, Some(redirect)) => {
                Resolution::Redirect(redirect.target(url))
            }
            (None, None) => Resolution::Empty,
        }
    }

    /// Resolves the router's current location.
    ///
    /// If nothing matches and a redirect is set, the router navigates there
    /// and the new location is resolved once more.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn run(
        &self,
        router: &RouterHandle,
    ) -> Result<Option<SwitchMatch<'_, V>>, RouterError> {
        let url = router.get_url();
        match self.resolve(&url, &ParamsMap::new()) {
            Resolution::Matched(matched) => Ok(Some(matched)),
            Resolution::Empty => Ok(None),
            Resolution::Redirect(target) => {
                tracing::debug!(
                    from = %url,
                    ?target,
                    "no route matched, redirecting"
                );
                router.navigate(target, NavigateOptions::default())?;
                let url = router.get_url();
                Ok(self.resolve(&url, &ParamsMap::new()).into_match())
            }
        }
    }
}

impl<V> fmt::Debug for Switch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("routes", &self.routes)
            .field("redirect", &self.redirect)
            .finish()
    }
}
