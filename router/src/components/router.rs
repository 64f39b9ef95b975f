use crate::{
    location::{
        handle_anchor_click, HostHandlers, LinkClick, Listeners,
        LocationChange, LocationProvider, Query, QueryValue, Url,
    },
    params::ParamsMap,
    Mode, NavigateOptions, NavigationTarget, RoutePattern, RouterError,
    RouterOptions,
};
use core::fmt;
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

type Subscriber = Rc<dyn Fn(&Url)>;

struct RouterInner {
    url: RefCell<Url>,
    host: Rc<dyn LocationProvider>,
    options: RouterOptions,
    subscribers: RefCell<Vec<(usize, Subscriber)>>,
    next_subscriber: Cell<usize>,
    listeners: RefCell<Option<Listeners>>,
}

/// A mounted router: the single source of truth for the current location.
///
/// Cloning is cheap and every clone refers to the same router. The host's
/// listeners are detached by [`unmount`](Self::unmount), or once the last
/// handle is dropped.
#[derive(Clone)]
pub struct RouterHandle {
    inner: Rc<RouterInner>,
}

/// Creates a router on top of `host` and starts listening to it.
///
/// The initial location is `options.initial_url` if set, otherwise the
/// host's current location, otherwise `/`.
pub fn create_router(
    options: RouterOptions,
    host: impl LocationProvider + 'static,
) -> Result<RouterHandle, RouterError> {
    RouterHandle::new(options, host)
}

impl RouterHandle {
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn new(
        options: RouterOptions,
        host: impl LocationProvider + 'static,
    ) -> Result<Self, RouterError> {
        let host: Rc<dyn LocationProvider> = Rc::new(host);
        let initial = match options.initial_url.as_deref() {
            Some(url) => Url::parse(url)?,
            None => match host.current() {
                Some(href) => Url::parse(&href)?,
                None => Url::default(),
            },
        };
        tracing::debug!(url = %initial, "mounting router");

        let inner = Rc::new(RouterInner {
            url: RefCell::new(initial),
            host,
            options,
            subscribers: Default::default(),
            next_subscriber: Default::default(),
            listeners: Default::default(),
        });

        let handlers = HostHandlers {
            on_pop: {
                let router = Rc::downgrade(&inner);
                Rc::new(move || {
                    if let Some(router) = Self::upgrade(&router) {
                        router.handle_pop();
                    }
                })
            },
            on_click: {
                let router = Rc::downgrade(&inner);
                Rc::new(move |click: &LinkClick| {
                    Self::upgrade(&router)
                        .map(|router| router.handle_click(click))
                        .unwrap_or(false)
                })
            },
        };
        let listeners = inner.host.listen(handlers)?;
        *inner.listeners.borrow_mut() = Some(listeners);

        Ok(Self { inner })
    }

    fn upgrade(inner: &Weak<RouterInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// A snapshot of the current location.
    pub fn get_url(&self) -> Url {
        self.inner.url.borrow().clone()
    }

    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    /// Whether the host's listeners are still attached.
    pub fn is_mounted(&self) -> bool {
        self.inner
            .listeners
            .borrow()
            .as_ref()
            .is_some_and(Listeners::is_attached)
    }

    /// Navigates to `to`.
    ///
    /// Nothing happens if the target serializes to the current location:
    /// no history entry is written and no subscriber is notified.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn navigate(
        &self,
        to: impl Into<NavigationTarget>,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let prev = self.get_url();
        let target = to.into().resolve(&prev)?;

        // canonical form, so equal locations compare equal
        let next = Url::parse(&target.to_full_path())?;
        let href = next.to_full_path();
        if href == prev.to_full_path() {
            tracing::trace!(%href, "already there");
            return Ok(());
        }

        let change = LocationChange {
            value: href,
            mode: options.mode,
            scroll: self.inner.options.scroll_up,
        };
        self.inner.host.complete_navigation(&change)?;
        tracing::debug!(
            href = %change.value,
            mode = %change.mode,
            "navigated"
        );
        self.set_url(next);
        Ok(())
    }

    /// Like [`navigate`](Self::navigate), with the mode given by name.
    ///
    /// Fails with [`RouterError::InvalidMode`] unless `mode` is `"push"` or
    /// `"replace"`, before anything else happens.
    pub fn navigate_with_mode(
        &self,
        to: impl Into<NavigationTarget>,
        mode: &str,
    ) -> Result<(), RouterError> {
        let mode = mode.parse::<Mode>()?;
        self.navigate(to, mode.into())
    }

    pub fn set_path(
        &self,
        path: impl Into<String>,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let path = path.into();
        self.navigate(
            NavigationTarget::callback(move |url| url.clone().with_path(path)),
            options,
        )
    }

    pub fn set_query(
        &self,
        query: Query,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        self.navigate(
            NavigationTarget::callback(move |url| {
                url.clone().with_query(query)
            }),
            options,
        )
    }

    /// Sets a single query key, or removes it if `value` is `None`.
    pub fn set_query_param(
        &self,
        key: impl Into<String>,
        value: Option<QueryValue>,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let key = key.into();
        self.navigate(
            NavigationTarget::callback(move |url| {
                let mut url = url.clone();
                match value {
                    Some(value) => url.query_mut().replace(key, value),
                    None => {
                        url.query_mut().remove(&key);
                    }
                }
                url
            }),
            options,
        )
    }

    /// Sets the hash fragment; an empty string removes it.
    pub fn set_hash(
        &self,
        hash: impl Into<String>,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let hash = hash.into();
        self.navigate(
            NavigationTarget::callback(move |url| url.clone().with_hash(hash)),
            options,
        )
    }

    /// Tests the current location against a pattern.
    pub fn matches(&self, pattern: &str) -> Option<ParamsMap> {
        RoutePattern::new(pattern).test(&self.inner.url.borrow())
    }

    /// Calls `listener` with the new location after every change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Url) + 'static,
    ) -> Subscription {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            router: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Detaches the host's listeners. Later calls do nothing.
    pub fn unmount(&self) {
        let listeners = self.inner.listeners.borrow_mut().take();
        if let Some(mut listeners) = listeners {
            listeners.remove();
            tracing::debug!("router unmounted");
        }
    }

    fn set_url(&self, url: Url) {
        *self.inner.url.borrow_mut() = url.clone();
        // subscribers may navigate, so none of our borrows can be held
        let subscribers = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect::<Vec<_>>();
        for subscriber in subscribers {
            subscriber(&url);
        }
    }

    fn handle_pop(&self) {
        let Some(href) = self.inner.host.current() else {
            return;
        };
        match Url::parse(&href) {
            Ok(url) => {
                let changed = url != *self.inner.url.borrow();
                if changed {
                    tracing::debug!(%href, "location changed by the host");
                    self.set_url(url);
                }
            }
            Err(e) => tracing::warn!("ignoring host location: {e}"),
        }
    }

    /// Returns `true` if the click was turned into a navigation.
    fn handle_click(&self, click: &LinkClick) -> bool {
        let Some(href) = handle_anchor_click(click) else {
            return false;
        };
        let (path, hash) = match href.split_once('#') {
            Some((path, hash)) => (path, Some(hash)),
            None => (href, None),
        };

        if !path.is_empty() {
            if let Err(e) = self.navigate(path, NavigateOptions::push()) {
                tracing::error!(href, "could not follow link: {e}");
                return false;
            }
        }
        if let Some(hash) = hash.filter(|hash| !hash.is_empty()) {
            if let Err(e) = self.set_hash(hash, NavigateOptions::replace()) {
                tracing::error!(href, "could not follow link: {e}");
            }
            self.inner.host.scroll_to_hash(hash);
        }
        true
    }
}

impl fmt::Debug for RouterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHandle")
            .field("url", &self.inner.url.borrow())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// Keeps a listener subscribed to location changes. Dropping it
/// unsubscribes.
#[must_use = "dropping a `Subscription` unsubscribes immediately"]
pub struct Subscription {
    router: Weak<RouterInner>,
    id: usize,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
