//! Device error queue polling
//!
//! Errors raised by the GPU are queued on the device instead of being
//! returned from each call. Risky call sequences are followed by a drain of
//! that queue; every code is logged with the call site and then dropped.
//! Nothing here turns a device error into control flow.

use crate::render::api::device::{DeviceErrorCode, GraphicsDevice};

/// Drain the device error queue, logging each code with its call site
///
/// Returns the drained codes so callers can count them. Prefer the
/// [`check_device_errors!`](crate::check_device_errors) macro, which fills
/// in `file` and `line`.
pub fn log_device_errors(device: &mut dyn GraphicsDevice, file: &str, line: u32) -> Vec<DeviceErrorCode> {
    let errors = device.drain_errors();
    for error in &errors {
        log::error!("{} | {} ({})", error, file, line);
    }
    errors
}

/// Drain and log the device error queue at the current source location
#[macro_export]
macro_rules! check_device_errors {
    ($device:expr) => {
        $crate::render::api::error_check::log_device_errors($device, file!(), line!())
    };
}
