// DOM contract between the page markup and the wasm front-end.

pub const AMBIENT_CANVAS_ID: &str = "explainer-ambient";
pub const SCENE_CANVAS_PREFIX: &str = "scene-canvas-"; // + scene index
pub const SCENE_CONTAINER_PREFIX: &str = "scene-"; // + scene index
pub const SCENE_DOT_PREFIX: &str = "scene-dot-"; // + scene index

pub const PROGRESS_FILL_ID: &str = "progress-fill";
pub const PROGRESS_MARKER_SELECTOR: &str = ".progress-marker";
pub const PAUSE_BUTTON_ID: &str = "pause-toggle";
pub const REPLAY_BUTTON_ID: &str = "replay";

// Attributes written on every transport update
pub const ATTR_ACTIVE: &str = "data-active";
pub const ATTR_SHOW_DROP: &str = "data-show-drop";
pub const ATTR_STATE: &str = "data-state";
pub const ATTR_REACHED: &str = "data-reached";
pub const ATTR_PAUSED: &str = "data-paused";
pub const ATTR_COMPLETE: &str = "data-complete";
