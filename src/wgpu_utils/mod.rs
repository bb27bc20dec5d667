// src/wgpu_utils/mod.rs
//! Small wrappers around common wgpu chores

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;
