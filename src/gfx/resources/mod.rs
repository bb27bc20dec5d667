// src/gfx/resources/mod.rs
//! GPU resources shared across pipelines

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{object_bind_group_layout, GlobalBindings, GlobalUniform, ShadowBindings};
pub use texture_resource::TextureResource;
