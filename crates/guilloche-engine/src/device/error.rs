use thiserror::Error;

/// Device-level failures reported upward to the owning controller.
///
/// Recovery (recreating the device, rebuilding pipeline caches) is the
/// controller's decision; nothing here retries automatically.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No supported GPU API / adapter / device could be obtained at init.
    #[error("no supported GPU adapter or device available")]
    Unavailable,

    /// The surface was invalidated at runtime (device reset, display change).
    #[error("rendering surface lost")]
    ContextLost,
}
