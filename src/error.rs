//! Error taxonomy
//!
//! Everything fallible happens at setup or reconfiguration time; per-frame
//! update and render calls are infallible once initialization succeeds
//! (surface loss is handled inline by the game loop).

use thiserror::Error;

/// Fatal startup failures. Any of these aborts initialization and the
/// process exits non-zero.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no suitable GPU adapter found: {0}")]
    AdapterUnavailable(String),

    #[error("failed to create the GPU device: {0}")]
    DeviceRequest(String),

    #[error("failed to create the rendering surface: {0}")]
    SurfaceCreation(String),

    #[error(transparent)]
    RenderTarget(#[from] RenderTargetError),
}

/// Render-target (re)configuration failures.
///
/// Fatal when raised during initialization; logged and skipped when raised
/// by a runtime resize or sample-count change, in which case the previous
/// targets stay in service.
#[derive(Debug, Error)]
pub enum RenderTargetError {
    #[error("unsupported sample count {0} (expected 1, 2, 4, or 8)")]
    UnsupportedSampleCount(u32),

    #[error("render target allocation failed: {0}")]
    Incomplete(String),

    #[error("frame readback failed: {0}")]
    Readback(String),
}
