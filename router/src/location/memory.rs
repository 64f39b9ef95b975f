use super::{HostHandlers, LinkClick, Listeners, LocationProvider};
use crate::RouterError;
use std::{cell::RefCell, rc::Rc};

/// An in-memory history stack.
///
/// Useful wherever there is no browser: tests, native shells, or anything
/// that drives navigation itself. Cloning shares the same stack.
#[derive(Clone, Default)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    entries: Vec<String>,
    index: usize,
    handlers: Vec<(usize, HostHandlers)>,
    next_id: usize,
    pushes: usize,
    replaces: usize,
    scrolls: Vec<Scroll>,
}

/// A scroll performed by a [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scroll {
    Top,
    Hash(String),
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        let history = Self::default();
        history.inner.borrow_mut().entries.push(initial.to_string());
        history
    }

    /// Every entry in the stack, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.clone()
    }

    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn pushes(&self) -> usize {
        self.inner.borrow().pushes
    }

    pub fn replaces(&self) -> usize {
        self.inner.borrow().replaces
    }

    pub fn history_writes(&self) -> usize {
        let state = self.inner.borrow();
        state.pushes + state.replaces
    }

    pub fn scrolls(&self) -> Vec<Scroll> {
        self.inner.borrow().scrolls.clone()
    }

    /// Number of routers currently listening to this history.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Moves `delta` entries through the stack, the way the back and forward
    /// buttons do. Returns `false` if that would leave the stack.
    pub fn go(&self, delta: isize) -> bool {
        let handlers = {
            let mut state = self.inner.borrow_mut();
            let Some(index) = state.index.checked_add_signed(delta) else {
                return false;
            };
            if index >= state.entries.len() {
                return false;
            }
            state.index = index;
            state
                .handlers
                .iter()
                .map(|(_, h)| Rc::clone(&h.on_pop))
                .collect::<Vec<_>>()
        };
        for on_pop in handlers {
            on_pop();
        }
        true
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Dispatches a click to every listener. Returns `true` if one of them
    /// prevented the default action.
    pub fn click(&self, click: &LinkClick) -> bool {
        let handlers = self
            .inner
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| Rc::clone(&h.on_click))
            .collect::<Vec<_>>();
        let mut click = click.clone();
        for on_click in handlers {
            if on_click(&click) {
                click.default_prevented = true;
            }
        }
        click.default_prevented
    }
}

impl LocationProvider for MemoryHistory {
    fn current(&self) -> Option<String> {
        let state = self.inner.borrow();
        state.entries.get(state.index).cloned()
    }

    fn push_state(&self, href: &str) -> Result<(), RouterError> {
        let mut state = self.inner.borrow_mut();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(href.to_string());
        state.index = state.entries.len() - 1;
        state.pushes += 1;
        Ok(())
    }

    fn replace_state(&self, href: &str) -> Result<(), RouterError> {
        let mut state = self.inner.borrow_mut();
        let index = state.index;
        match state.entries.get_mut(index) {
            Some(entry) => *entry = href.to_string(),
            None => state.entries.push(href.to_string()),
        }
        state.replaces += 1;
        Ok(())
    }

    fn listen(&self, handlers: HostHandlers) -> Result<Listeners, RouterError> {
        let id = {
            let mut state = self.inner.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.handlers.push((id, handlers));
            id
        };
        let inner = Rc::clone(&self.inner);
        Ok(Listeners::new(move || {
            inner.borrow_mut().handlers.retain(|(i, _)| *i != id);
        }))
    }

    fn scroll_to_top(&self) {
        self.inner.borrow_mut().scrolls.push(Scroll::Top);
    }

    fn scroll_to_hash(&self, hash: &str) {
        self.inner
            .borrow_mut()
            .scrolls
            .push(Scroll::Hash(hash.to_string()));
    }
}
