use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{window, CustomEvent, CustomEventInit};

pub const PROMPT_CHANGE: &str = "terminal-prompt-change";

/// Tell the page something changed. A `window.__terminalCallback(type, detail)` set by
/// the page wins; otherwise a bubbling `CustomEvent` goes to the window and the document.
pub fn emit_terminal_event(event_type: &str, detail: &serde_json::Value) {
    let Some(win) = window() else {
        warn!("no window, dropping {event_type} event");
        return;
    };
    let detail_js = serde_wasm_bindgen::to_value(detail).unwrap_or(JsValue::NULL);

    if let Ok(callback) = js_sys::Reflect::get(win.as_ref(), &"__terminalCallback".into()) {
        if let Ok(callback) = callback.dyn_into::<js_sys::Function>() {
            match callback.call2(&JsValue::NULL, &event_type.into(), &detail_js) {
                Ok(_) => return,
                Err(e) => warn!("__terminalCallback failed for {event_type}: {e:?}"),
            }
        }
    }

    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail_js);
    let event = match CustomEvent::new_with_event_init_dict(event_type, &init) {
        Ok(event) => event,
        Err(e) => {
            error!("could not create {event_type} event: {e:?}");
            return;
        }
    };

    if let Err(e) = win.dispatch_event(&event) {
        error!("window dispatch of {event_type} failed: {e:?}");
    }
    if let Some(doc) = win.document() {
        if let Err(e) = doc.dispatch_event(&event) {
            error!("document dispatch of {event_type} failed: {e:?}");
        }
    }
    debug!("dispatched {event_type}");
}

pub fn emit_prompt_change(prompt: &str) {
    emit_terminal_event(PROMPT_CHANGE, &serde_json::json!({ "prompt": prompt }));
}
