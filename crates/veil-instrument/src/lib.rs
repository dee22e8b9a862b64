//! Transparent command-stream instrumentation core.
//!
//! A validation layer that injects its own commands into an application's
//! command buffer (extra descriptor binds, bounds-checking dispatches) has to
//! leave the application-visible binding state bit-for-bit untouched once
//! recording continues. This crate provides the pieces that make injection
//! transparent:
//!
//! - The per-bind-point record of what the application currently has bound:
//!   pipeline or per-stage shader objects, descriptor sets with dynamic
//!   offsets, pending push-descriptor writes, push-constant bytes (see
//!   [`CommandBufferState`]).
//! - An owned snapshot of that record, taken before injected commands are
//!   recorded and replayed through the driver-call seam afterwards (see
//!   [`CapturedBindState`] and [`with_restored_bind_state`]).
//! - Binding of the reserved diagnostic descriptor set, selecting
//!   per-command table slots with dynamic offsets so one static set serves
//!   every injected command (see [`bind_diag_descriptor_set`]).
//! - Device-address resolution for a buffer across the mutually exclusive
//!   capability paths, newest first (see [`buffer_device_address`]).
//!
//! Everything here is synchronous CPU-side bookkeeping. Recording is
//! single-threaded per command buffer; the caller's lock discipline covers
//! the whole capture → inject → restore cycle.

mod device_address;
mod diag;
mod snapshot;
mod state;

#[cfg(test)]
mod tests;

pub use device_address::{buffer_device_address, DeviceInfo};
pub use diag::{
    bind_diag_descriptor_set, DiagSetLayout, DiagSlots, DIAG_SET_INDEX, DIAG_SLOT_COUNT,
    DIAG_WORD_BYTES,
};
pub use snapshot::{
    with_restored_bind_state, CapturedBindState, CapturedProgram, CapturedPushConstants,
};
pub use state::{
    BindPointState, BoundDescriptorSet, BoundPipeline, BoundShader, CommandBufferState, StateError,
};
