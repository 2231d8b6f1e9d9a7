// Shared timing and palette constants used by both web and native frontends.

// Timeline
pub const SCENE_DURATION_MS: f64 = 5500.0; // 5.5 seconds per scene
pub const TOTAL_SCENES: usize = 5;
pub const TOTAL_DURATION_MS: f64 = SCENE_DURATION_MS * TOTAL_SCENES as f64; // ~27.5 seconds total
pub const TICK_INTERVAL_MS: u32 = 50; // 20Hz controller ticks

// Scene 4 "drop" trigger
pub const DROP_SCENE_INDEX: usize = 3;
pub const DROP_TRIGGER_OFFSET_MS: f64 = 1500.0; // into the scene window

// Constant-timestep simulation increments (seconds per frame)
pub const FRAME_DT: f32 = 0.016;
pub const WAVE_FRAME_DT: f32 = 0.012;

// Palette hues (degrees)
pub const HUE_LAVENDER: f32 = 270.0;
pub const HUE_TEAL: f32 = 185.0;
pub const HUE_MIST: f32 = 260.0;

// Default headless viewport
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;
