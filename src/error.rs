//! Error types for the sandbox
//!
//! Start-up failures (window, surface, adapter, device) are fatal and bubble up
//! to `main`. Model loading failures are not: they are delivered to the frame
//! loop as [`SandboxEvent::ModelLoadFailed`](crate::sandbox::SandboxEvent) and
//! the session keeps running.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong inside the sandbox
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to create the event loop")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create a rendering surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,

    #[error("rendering stopped")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to load model '{}'", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model '{}' contains no triangles", path.display())]
    EmptyModel { path: PathBuf },

    #[error("loader for '{}' stopped before reporting a result", path.display())]
    LoaderDisconnected { path: PathBuf },
}

pub type Result<T, E = SandboxError> = std::result::Result<T, E>;
