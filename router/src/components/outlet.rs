use super::{SwitchMatch, ViewKey};
use crate::{params::ParamsMap, RouteMatchId};

/// What a rendering layer has to do with its view after a new match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletChange {
    /// Same route, same params: nothing to do.
    Unchanged,
    /// Same route with new params: update them in place.
    ParamsChanged,
    /// A different route that renders the same view: keep it mounted and
    /// pass it the new params.
    Rerendered,
    /// A different view: tear down the old one and mount the new one.
    Mounted,
    /// Nothing matches any more: tear down the old view.
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
struct Mounted {
    id: RouteMatchId,
    key: ViewKey,
    params: ParamsMap,
}

/// Tracks the currently shown match of a [`Switch`](super::Switch), so that
/// the view is only replaced when the matched route actually changes.
#[derive(Debug, Default)]
pub struct Outlet {
    current: Option<Mounted>,
}

impl Outlet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The route currently shown, if any.
    pub fn current(&self) -> Option<RouteMatchId> {
        self.current.as_ref().map(|mounted| mounted.id)
    }

    pub fn params(&self) -> Option<&ParamsMap> {
        self.current.as_ref().map(|mounted| &mounted.params)
    }

    pub fn update<V>(
        &mut self,
        matched: Option<&SwitchMatch<'_, V>>,
    ) -> OutletChange {
        let next = matched.map(|matched| Mounted {
            id: matched.route.id(),
            key: matched.route.view_key(),
            params: matched.params.clone(),
        });
        let change = match (&self.current, &next) {
            (None, None) => OutletChange::Unchanged,
            (Some(_), None) => OutletChange::Cleared,
            (None, Some(_)) => OutletChange::Mounted,
            (Some(prev), Some(next)) if prev.id == next.id => {
                if prev.params == next.params {
                    OutletChange::Unchanged
                } else {
                    OutletChange::ParamsChanged
                }
            }
            (Some(prev), Some(next)) if prev.key == next.key => {
                OutletChange::Rerendered
            }
            (Some(_), Some(_)) => OutletChange::Mounted,
        };
        tracing::trace!(?change, route = ?next.as_ref().map(|n| n.id));
        self.current = next;
        change
    }
}
