use crate::{
    components::RouterHandle,
    location::{Query, Url},
    params::{ParamValue, ParamsMap},
    NavigateOptions, NavigationTarget, RoutePattern, RouterError,
};
use std::{cell::RefCell, marker::PhantomData};

thread_local! {
    static ROUTERS: RefCell<Vec<RouterHandle>> =
        const { RefCell::new(Vec::new()) };
    static PARAMS: RefCell<Vec<ParamsMap>> =
        const { RefCell::new(Vec::new()) };
}

/// Makes a router available to the `use_*` functions until dropped.
///
/// Scopes nest: the innermost router wins, and dropping a scope restores
/// whatever was provided before it.
#[must_use = "the router is only provided while the scope is alive"]
pub struct RouterScope {
    depth: usize,
    // the stack is per-thread
    _not_send: PhantomData<*const ()>,
}

pub fn provide_router(router: &RouterHandle) -> RouterScope {
    let depth = ROUTERS.with(|routers| {
        let mut routers = routers.borrow_mut();
        routers.push(router.clone());
        routers.len() - 1
    });
    RouterScope {
        depth,
        _not_send: PhantomData,
    }
}

impl Drop for RouterScope {
    fn drop(&mut self) {
        ROUTERS.with(|routers| routers.borrow_mut().truncate(self.depth));
    }
}

/// Returns the router provided by the nearest [`RouterScope`].
pub fn use_router() -> Result<RouterHandle, RouterError> {
    ROUTERS
        .with(|routers| routers.borrow().last().cloned())
        .ok_or(RouterError::MissingRouterContext)
}

pub fn use_url() -> Result<Url, RouterError> {
    Ok(use_router()?.get_url())
}

pub fn use_path() -> Result<String, RouterError> {
    Ok(use_url()?.path().to_string())
}

pub fn use_query() -> Result<Query, RouterError> {
    Ok(use_url()?.query().clone())
}

pub fn use_hash() -> Result<Option<String>, RouterError> {
    Ok(use_url()?.hash().map(String::from))
}

/// Returns a function that navigates the current router.
pub fn use_navigate() -> Result<
    impl Fn(NavigationTarget, NavigateOptions) -> Result<(), RouterError>,
    RouterError,
> {
    let router = use_router()?;
    Ok(move |to: NavigationTarget, options: NavigateOptions| {
        router.navigate(to, options)
    })
}

/// Tests the current location against `pattern`.
pub fn use_match(pattern: &str) -> Result<Option<ParamsMap>, RouterError> {
    let url = use_url()?;
    Ok(RoutePattern::new(pattern).test(&url))
}

/// Makes the params of a match available to [`use_params`] until dropped.
#[must_use = "the params are only provided while the scope is alive"]
pub struct ParamsScope {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

/// Provides the params of the route being rendered. Nested routes already
/// carry their parent's params, so the innermost scope is all that is read.
pub fn provide_params(params: &ParamsMap) -> ParamsScope {
    let depth = PARAMS.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(params.clone());
        stack.len() - 1
    });
    ParamsScope {
        depth,
        _not_send: PhantomData,
    }
}

impl Drop for ParamsScope {
    fn drop(&mut self) {
        PARAMS.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// The params of the route being rendered; empty outside of one.
pub fn use_params() -> ParamsMap {
    PARAMS
        .with(|stack| stack.borrow().last().cloned())
        .unwrap_or_default()
}

/// A single param of the route being rendered, or an empty string if the
/// route has no such param.
pub fn use_param(key: &str) -> ParamValue {
    PARAMS
        .with(|stack| {
            stack.borrow().last().and_then(|params| params.get(key).cloned())
        })
        .unwrap_or_else(|| ParamValue::Str(String::new()))
}
