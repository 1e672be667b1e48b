//! Browser backend, enabled with the `web` feature.
//!
//! [`WebHistory`] drives the [History API] and [`WebDocument`] the page title
//! and body. [`install`] binds `popstate` and `DOMContentLoaded` to a router
//! for the rest of the session.
//!
//! ```ignore
//! use spa_navigator::{web, Router};
//!
//! let router = Router::new(routes(), web::WebHistory::new()?, web::WebDocument::new()?);
//! web::install(&router);
//! ```
//!
//! [History API]: https://developer.mozilla.org/en-US/docs/Web/API/History_API

use crate::bridge::HistoryBridge;
use crate::error::HistoryError;
use crate::history::{Document, HistoryProvider, HistoryState};
use crate::router::Router;
use crate::{error_log, warn_log};
use gloo_events::EventListener;
use url::Url;
use wasm_bindgen::JsValue;
use web_sys::{History, Window};

fn js_error(value: &JsValue) -> HistoryError {
    HistoryError::new(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

fn to_js(state: &HistoryState) -> JsValue {
    js_sys::JSON::parse(&state.to_string()).unwrap_or(JsValue::NULL)
}

fn from_js(value: &JsValue) -> Option<HistoryState> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let text: String = js_sys::JSON::stringify(value).ok()?.into();
    serde_json::from_str(&text).ok()
}

/// A [`HistoryProvider`] backed by `window.history` and `window.location`.
pub struct WebHistory {
    window: Window,
    history: History,
}

impl WebHistory {
    /// Bind to the global window.
    pub fn new() -> Result<Self, HistoryError> {
        let window = web_sys::window().ok_or_else(|| HistoryError::new("no global window"))?;
        let history = window.history().map_err(|err| js_error(&err))?;
        Ok(Self { window, history })
    }
}

impl HistoryProvider for WebHistory {
    fn current_url(&self) -> Url {
        let href = self.window.location().href().unwrap_or_default();
        Url::parse(&href).unwrap_or_else(|err| {
            warn_log!("Unparsable location '{}': {}", href, err);
            Url::parse(crate::history::MEMORY_ORIGIN).expect("memory origin is a valid URL")
        })
    }

    fn state(&self) -> Option<HistoryState> {
        self.history.state().ok().and_then(|state| from_js(&state))
    }

    fn push_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError> {
        self.history
            .push_state_with_url(&to_js(&state), "", Some(url.as_str()))
            .map_err(|err| js_error(&err))
    }

    fn replace_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError> {
        self.history
            .replace_state_with_url(&to_js(&state), "", Some(url.as_str()))
            .map_err(|err| js_error(&err))
    }
}

/// A [`Document`] backed by `window.document`.
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    /// Bind to the global document.
    pub fn new() -> Result<Self, HistoryError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| HistoryError::new("no global document"))?;
        Ok(Self { document })
    }
}

impl Document for WebDocument {
    fn set_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn render_fatal_error(&mut self, message: &str) {
        match self.document.body() {
            Some(body) => body.set_inner_html(&format!("<h1>{}</h1>", message)),
            None => error_log!("No document body to render the error surface into"),
        }
    }
}

/// Bind `popstate` and document-ready to `router` for the rest of the session.
///
/// The listeners are never removed. If the document has already loaded, the
/// initial resolution runs immediately.
pub fn install(router: &Router) {
    let Some(window) = web_sys::window() else {
        error_log!("No global window; history events are not bound");
        return;
    };
    let bridge = HistoryBridge::new(router.clone());

    let on_popstate = bridge.clone();
    EventListener::new(&window, "popstate", move |_event| {
        let bridge = on_popstate.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let state = bridge.router().current_state();
            bridge.popstate(state.as_ref()).await;
        });
    })
    .forget();

    let Some(document) = window.document() else {
        error_log!("No global document; initial resolution skipped");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_event| {
            wasm_bindgen_futures::spawn_local(async move {
                bridge.document_ready().await;
            });
        })
        .forget();
    } else {
        wasm_bindgen_futures::spawn_local(async move {
            bridge.document_ready().await;
        });
    }
}
