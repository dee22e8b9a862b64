//! `veil-api` is the narrow graphics-API surface the veil instrumentation
//! core is written against.
//!
//! It deliberately models only what command-stream instrumentation touches:
//!
//! - Opaque 64-bit object handles ([`CommandBuffer`], [`Pipeline`],
//!   [`DescriptorSet`], …).
//! - The binding vocabulary: bind points, shader stages, push-constant
//!   ranges, and safe-value descriptor writes (see [`DescriptorWrite`]).
//! - Device capability state: the negotiated [`ApiVersion`] and the
//!   [`DeviceExtensions`] enabled at device creation.
//! - The driver-call seam: [`CommandDispatch`] for recording into a command
//!   buffer and [`DeviceDispatch`] for device-level address queries.
//!
//! The dispatch traits are implemented by the embedding layer's real
//! dispatch tables; the `test-utils` feature provides a call-logging
//! [`recording::RecordingDispatch`] double.

mod dispatch;
mod handles;
mod types;

#[cfg(feature = "test-utils")]
pub mod recording;

pub use dispatch::{CommandDispatch, DeviceDispatch};
pub use handles::{Buffer, CommandBuffer, DescriptorSet, ImageView, Pipeline, PipelineLayout, Sampler, ShaderObject};
pub use types::{
    ApiVersion, DescriptorBufferInfo, DescriptorImageInfo, DescriptorType, DescriptorWrite,
    DeviceAddress, DeviceExtensions, PipelineBindPoint, PushConstantRange, ShaderStage,
    ShaderStageFlags, MAX_BOUND_DESCRIPTOR_SETS, MAX_PUSH_CONSTANT_BYTES,
};
