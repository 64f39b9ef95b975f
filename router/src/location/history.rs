use super::{Anchor, HostHandlers, LinkClick, Listeners, LocationProvider};
use crate::RouterError;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, Event, MouseEvent, Window};

/// The browser's `window.history` and `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserUrl;

fn window() -> Result<Window, RouterError> {
    web_sys::window().ok_or(RouterError::HistoryUnavailable)
}

fn js_error(e: JsValue) -> RouterError {
    RouterError::History(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl BrowserUrl {
    fn history() -> Result<web_sys::History, RouterError> {
        window()?
            .history()
            .map_err(|_| RouterError::HistoryUnavailable)
    }
}

impl LocationProvider for BrowserUrl {
    fn current(&self) -> Option<String> {
        web_sys::window()?.location().href().ok()
    }

    fn push_state(&self, href: &str) -> Result<(), RouterError> {
        Self::history()?
            .push_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(js_error)
    }

    fn replace_state(&self, href: &str) -> Result<(), RouterError> {
        Self::history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(js_error)
    }

    fn scroll_to_top(&self) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }

    fn scroll_to_hash(&self, hash: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document())
        else {
            return;
        };
        let id = js_sys::decode_uri(hash)
            .ok()
            .map(String::from)
            .unwrap_or_else(|| hash.to_string());
        if let Some(el) = document.get_element_by_id(&id) {
            el.scroll_into_view();
        }
    }

    fn listen(&self, handlers: HostHandlers) -> Result<Listeners, RouterError> {
        let window = window()?;
        let document =
            window.document().ok_or(RouterError::HistoryUnavailable)?;

        let on_click = handlers.on_click;
        let click = Closure::wrap(Box::new(move |ev: Event| {
            if on_click(&link_click(&ev)) {
                ev.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        // handle popstate event (forward/back navigation)
        let on_pop = handlers.on_pop;
        let pop = Closure::wrap(
            Box::new(move |_: Event| on_pop()) as Box<dyn FnMut(Event)>
        );

        document
            .add_event_listener_with_callback(
                "click",
                click.as_ref().unchecked_ref(),
            )
            .map_err(js_error)?;
        if let Err(e) = window.add_event_listener_with_callback(
            "popstate",
            pop.as_ref().unchecked_ref(),
        ) {
            _ = document.remove_event_listener_with_callback(
                "click",
                click.as_ref().unchecked_ref(),
            );
            return Err(js_error(e));
        }

        Ok(Listeners::new(move || {
            _ = document.remove_event_listener_with_callback(
                "click",
                click.as_ref().unchecked_ref(),
            );
            _ = window.remove_event_listener_with_callback(
                "popstate",
                pop.as_ref().unchecked_ref(),
            );
        }))
    }
}

fn link_click(ev: &Event) -> LinkClick {
    let mouse = ev.dyn_ref::<MouseEvent>();
    let anchor = ev
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
        .map(|a| Anchor {
            href: a.get_attribute("href"),
            target: a.get_attribute("target"),
            rel: a.get_attribute("rel"),
            download: a.has_attribute("download"),
        });
    LinkClick {
        anchor,
        button: mouse.map(MouseEvent::button).unwrap_or(0),
        modifier_key: mouse
            .map(|m| {
                m.meta_key() || m.alt_key() || m.ctrl_key() || m.shift_key()
            })
            .unwrap_or(false),
        default_prevented: ev.default_prevented(),
    }
}
