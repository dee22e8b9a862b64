//! Buffer device-address resolution.

use veil_api::{ApiVersion, Buffer, DeviceAddress, DeviceDispatch, DeviceExtensions};

/// Live device capability state: the negotiated API version and the
/// extensions enabled at device creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub api_version: ApiVersion,
    pub extensions: DeviceExtensions,
}

/// Resolves `buffer`'s raw device address, or `0` if no capability path is
/// enabled.
///
/// Paths are tried in fixed order: the core entry point on API 1.2+, then
/// the vendor extension, then the standardized extension. The first
/// available path is the only one invoked, whatever address it returns.
/// Callers must treat `0` as "feature unsupported" and skip
/// address-dependent instrumentation.
pub fn buffer_device_address(
    device: &DeviceInfo,
    dispatch: &impl DeviceDispatch,
    buffer: Buffer,
) -> DeviceAddress {
    // Capability state is probed on every call. Feature enablement is
    // negotiated on an instance-level validator and is not inherited by the
    // device-level one, so it cannot be checked or cached at construction
    // time.
    if device.api_version >= ApiVersion::V1_2 {
        return dispatch.get_buffer_device_address(buffer);
    }
    if device
        .extensions
        .contains(DeviceExtensions::EXT_BUFFER_DEVICE_ADDRESS)
    {
        return dispatch.get_buffer_device_address_ext(buffer);
    }
    if device
        .extensions
        .contains(DeviceExtensions::KHR_BUFFER_DEVICE_ADDRESS)
    {
        return dispatch.get_buffer_device_address_khr(buffer);
    }
    tracing::debug!(?buffer, "no buffer device address capability enabled");
    0
}
