#![cfg(target_arch = "wasm32")]
use explainer_core::{SceneId, StageConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod canvas;
mod constants;
mod controls;
mod dom;
mod player;
mod timer;
mod transport;

use player::Player;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("explainer-web starting");
    Ok(())
}

/// Bind the explainer to the page's canvases and controls and start playback.
///
/// A fixed `seed` makes every engine's layout reproducible across reloads.
#[wasm_bindgen]
pub fn mount(seed: Option<u32>) -> Result<ExplainerHandle, JsValue> {
    let document =
        dom::window_document().ok_or_else(|| JsValue::from_str("no window document"))?;
    let config = StageConfig {
        seed: seed.map(u64::from),
        ..StageConfig::default()
    };
    let player = Player::mount(document, config)
        .map_err(|e| JsValue::from_str(&format!("mount failed: {:#}", e)))?;
    Ok(ExplainerHandle {
        player: Some(player),
    })
}

/// Script-facing handle; `destroy` (or `free`) tears everything down.
#[wasm_bindgen]
pub struct ExplainerHandle {
    player: Option<Rc<Player>>,
}

#[wasm_bindgen]
impl ExplainerHandle {
    /// Returns the paused state after toggling.
    pub fn toggle_pause(&self) -> bool {
        self.player.as_ref().map(|p| p.toggle_pause()).unwrap_or(false)
    }

    pub fn replay(&self) {
        if let Some(p) = &self.player {
            p.replay();
        }
    }

    pub fn seek(&self, index: usize) -> Result<(), JsValue> {
        let Some(p) = &self.player else {
            return Err(JsValue::from_str("explainer destroyed"));
        };
        p.seek(index).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn progress(&self) -> f64 {
        self.player
            .as_ref()
            .map(|p| p.with_stage(|s| s.playback().progress()))
            .unwrap_or(0.0)
    }

    pub fn current_scene(&self) -> usize {
        self.player
            .as_ref()
            .map(|p| p.with_stage(|s| s.playback().current_scene()))
            .unwrap_or(0)
    }

    pub fn is_paused(&self) -> bool {
        self.player
            .as_ref()
            .map(|p| p.with_stage(|s| s.playback().is_paused()))
            .unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.player
            .as_ref()
            .map(|p| p.with_stage(|s| s.playback().is_complete()))
            .unwrap_or(false)
    }

    pub fn scene_labels() -> js_sys::Array {
        SceneId::ALL
            .iter()
            .map(|s| JsValue::from_str(s.label()))
            .collect()
    }

    pub fn destroy(&mut self) {
        if let Some(p) = self.player.take() {
            p.teardown();
        }
    }
}

impl Drop for ExplainerHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}
