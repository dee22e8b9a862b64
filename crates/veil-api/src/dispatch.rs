//! The driver-call seam.
//!
//! The instrumentation core never talks to a driver directly; it records
//! through [`CommandDispatch`] and queries through [`DeviceDispatch`]. The
//! embedding layer implements both over its real dispatch tables.

use crate::handles::{Buffer, CommandBuffer, DescriptorSet, Pipeline, PipelineLayout, ShaderObject};
use crate::types::{DescriptorWrite, DeviceAddress, PipelineBindPoint, ShaderStage, ShaderStageFlags};

/// Commands recorded into a command buffer.
///
/// All methods mirror the native API's argument shapes. Recording calls do
/// not fail; an invalid argument is a bug in the caller and is the driver
/// layer's problem to surface.
pub trait CommandDispatch {
    fn cmd_bind_pipeline(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        pipeline: Pipeline,
    );

    fn cmd_bind_descriptor_sets(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        first_set: u32,
        sets: &[DescriptorSet],
        dynamic_offsets: &[u32],
    );

    fn cmd_push_descriptor_set(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        set: u32,
        writes: &[DescriptorWrite],
    );

    fn cmd_push_constants(
        &self,
        command_buffer: CommandBuffer,
        layout: PipelineLayout,
        stage_flags: ShaderStageFlags,
        offset: u32,
        data: &[u8],
    );

    /// Binds one shader object per listed stage. `stages` and `shaders` are
    /// parallel slices of equal length.
    fn cmd_bind_shaders(
        &self,
        command_buffer: CommandBuffer,
        stages: &[ShaderStage],
        shaders: &[ShaderObject],
    );
}

/// Device-level queries used by instrumentation.
///
/// The three address entry points are mutually exclusive capability paths;
/// the caller picks exactly one per query based on live device state.
pub trait DeviceDispatch {
    /// Core entry point (API 1.2+).
    fn get_buffer_device_address(&self, buffer: Buffer) -> DeviceAddress;

    /// Vendor-extension entry point.
    fn get_buffer_device_address_ext(&self, buffer: Buffer) -> DeviceAddress;

    /// Standardized-extension entry point.
    fn get_buffer_device_address_khr(&self, buffer: Buffer) -> DeviceAddress;
}
