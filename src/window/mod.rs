pub mod chrome;
mod controller;
mod manager;

pub use controller::{DragState, HeaderHit, ResizeState, Visibility, WindowController};
pub use manager::{WindowId, WindowManager};
