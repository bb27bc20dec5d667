//! # User Interface Module
//!
//! Dear ImGui overlay for the sandbox.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`panel`] - The control panel: status, helper toggles, camera reset, event log
//!
//! While the pointer is over the panel, clicks and camera drags do not reach
//! the scene.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{sandbox_panel, EventLog, PanelAction, PanelSnapshot};
