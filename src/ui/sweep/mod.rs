pub mod controller;
pub mod event_handler;
pub mod renderer;
pub mod state;
pub mod types;
pub mod utils;

pub use types::*;
pub use utils::*;

pub use controller::{SweepCommand, SweepController, SweepEvent};
pub use event_handler::EventHandler;
pub use renderer::SweepRenderer;
