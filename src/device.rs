//! Device selection for inference.

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
}

/// Returns the device models run on.
///
/// The rten backend only executes on the CPU, so `force_cpu = false` is
/// accepted but still yields [`Device::Cpu`].
#[must_use]
pub fn select_device(force_cpu: bool) -> Device {
    if force_cpu {
        info!("Accelerators disabled, using CPU for inference");
    } else {
        info!("No accelerator backend available, using CPU for inference");
    }
    Device::Cpu
}
