#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod paint;
pub mod rng;
pub mod scenes;
pub mod sim;
pub mod stage;
pub mod timeline;
pub mod viz;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use paint::*;
pub use scenes::*;
pub use sim::*;
pub use stage::*;
pub use timeline::*;
pub use viz::{Viewport, Visualization};
