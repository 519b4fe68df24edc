use thiserror::Error;

/// Failures surfaced by the engine runtime.
///
/// Startup failures (window, surface, adapter, device) are fatal and abort
/// the program. Asset failures are reported through the log and the affected
/// draw is skipped instead of being returned as an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create a rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to decode bitmap `{path}`: {source}")]
    ImageDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
