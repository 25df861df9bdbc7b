//! JSON wire form of viewer updates and the browser-side push shim.
//!
//! A host that can evaluate script in the page (a notebook kernel, a
//! webview) forwards each [`ViewerUpdate`] as a
//! `window.__trajview_push('<json>')` call. [`BRIDGE_JS`] defines that
//! function before any widget code loads.

use crate::error::TrajviewError;
use crate::viewer::ViewerUpdate;

/// Name of the `CustomEvent` dispatched on `window` for each update.
pub const UPDATE_EVENT: &str = "trajview-update";

impl ViewerUpdate<'_> {
    /// Serialize to the JSON object pushed to the browser.
    pub fn to_json(&self) -> Result<String, TrajviewError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Script that hands `update` to the browser-side receiver.
pub fn push_script(update: &ViewerUpdate<'_>) -> Result<String, TrajviewError> {
    let json = update.to_json()?;
    Ok(format!("window.__trajview_push('{}')", escape_js_single(&json)))
}

/// Escape text for embedding inside a single-quoted JS string literal.
fn escape_js_single(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// JavaScript evaluated once per page, before any widget code.
///
/// Defines `window.__trajview_push` and dispatches [`UPDATE_EVENT`] with the
/// parsed update as `detail`. Partial updates are merged into a buffered
/// full state; a listener attaching later receives that state immediately.
pub const BRIDGE_JS: &str = r#"
(function() {
    if (window.__trajview_push) { return; }
    var state = null;

    function dispatch(detail) {
        window.dispatchEvent(new CustomEvent('trajview-update', { detail: detail }));
    }

    window.__trajview_push = function(json) {
        var update = JSON.parse(json);
        if (state === null || update.topology) {
            state = update;
        } else {
            state = {
                frame: update.frame,
                coordinates: update.coordinates,
                topology: state.topology
            };
        }
        dispatch(update);
    };

    // When a widget adds a listener, replay the buffered state to that
    // listener only.
    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        if (this === window && type === 'trajview-update' && state !== null && fn) {
            var replay = new CustomEvent('trajview-update', { detail: state });
            if (typeof fn === 'function') {
                fn.call(window, replay);
            } else if (typeof fn.handleEvent === 'function') {
                fn.handleEvent(replay);
            }
        }
    };
})();
"#;
