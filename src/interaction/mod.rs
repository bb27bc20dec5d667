//! Pointer input and the drag-and-drop interaction

pub mod drag;
pub mod pointer;

pub use drag::{ClickOutcome, DragController, DragState};
pub use pointer::{PointerTracker, Viewport};
