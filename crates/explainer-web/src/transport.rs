//! Reflects the timeline into the page: scene containers, progress bar, buttons, dots.

use crate::constants::*;
use crate::controls::{bool_attr, dot_state, marker_reached, progress_width_css};
use crate::dom::{set_attr, set_hidden};
use explainer_core::{SceneId, SceneSignals, TimelineSnapshot};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn render(document: &web::Document, snapshot: &TimelineSnapshot, signals: &[SceneSignals]) {
    for (i, s) in signals.iter().enumerate() {
        let container = format!("{}{}", SCENE_CONTAINER_PREFIX, i);
        set_attr(document, &container, ATTR_ACTIVE, bool_attr(s.is_active));
        if i == SceneId::Decision.index() {
            set_attr(document, &container, ATTR_SHOW_DROP, bool_attr(s.show_drop));
        }
        let dot = format!("{}{}", SCENE_DOT_PREFIX, i);
        set_attr(document, &dot, ATTR_STATE, dot_state(i, snapshot.scene).as_str());
    }

    set_attr(
        document,
        PROGRESS_FILL_ID,
        "style",
        &progress_width_css(snapshot.progress),
    );
    if let Ok(markers) = document.query_selector_all(PROGRESS_MARKER_SELECTOR) {
        for k in 0..markers.length() {
            if let Some(el) = markers.item(k).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                let _ = el.set_attribute(
                    ATTR_REACHED,
                    bool_attr(marker_reached(k as usize, snapshot.scene)),
                );
            }
        }
    }

    set_hidden(document, PAUSE_BUTTON_ID, snapshot.complete);
    set_attr(document, PAUSE_BUTTON_ID, ATTR_PAUSED, bool_attr(snapshot.paused));
    set_attr(
        document,
        PAUSE_BUTTON_ID,
        "aria-label",
        if snapshot.paused { "Play" } else { "Pause" },
    );
    set_attr(document, REPLAY_BUTTON_ID, ATTR_COMPLETE, bool_attr(snapshot.complete));
}
