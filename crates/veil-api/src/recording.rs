//! Call-logging dispatch double for tests.
//!
//! `RecordingDispatch` implements both dispatch traits and appends one
//! [`RecordedCall`] per driver call, so tests can assert the exact sequence
//! and arguments a component issued. Address queries answer from a
//! configurable table (default `0` for unknown buffers).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dispatch::{CommandDispatch, DeviceDispatch};
use crate::handles::{Buffer, CommandBuffer, DescriptorSet, Pipeline, PipelineLayout, ShaderObject};
use crate::types::{
    DescriptorWrite, DeviceAddress, PipelineBindPoint, ShaderStage, ShaderStageFlags,
};

/// Which of the three mutually exclusive address entry points was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPath {
    Core,
    Ext,
    Khr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    BindPipeline {
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        pipeline: Pipeline,
    },
    BindDescriptorSets {
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        first_set: u32,
        sets: Vec<DescriptorSet>,
        dynamic_offsets: Vec<u32>,
    },
    PushDescriptorSet {
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        set: u32,
        writes: Vec<DescriptorWrite>,
    },
    PushConstants {
        command_buffer: CommandBuffer,
        layout: PipelineLayout,
        stage_flags: ShaderStageFlags,
        offset: u32,
        data: Vec<u8>,
    },
    BindShaders {
        command_buffer: CommandBuffer,
        stages: Vec<ShaderStage>,
        shaders: Vec<ShaderObject>,
    },
    GetBufferDeviceAddress {
        buffer: Buffer,
        path: AddressPath,
    },
}

#[derive(Debug, Default)]
pub struct RecordingDispatch {
    calls: RefCell<Vec<RecordedCall>>,
    addresses: HashMap<Buffer, DeviceAddress>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the address every path will report for `buffer`.
    pub fn with_address(mut self, buffer: Buffer, address: DeviceAddress) -> Self {
        self.addresses.insert(buffer, address);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Drains the log, leaving it empty for the next phase of a test.
    pub fn take_calls(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: RecordedCall) {
        self.calls.borrow_mut().push(call);
    }

    fn address_for(&self, buffer: Buffer, path: AddressPath) -> DeviceAddress {
        self.record(RecordedCall::GetBufferDeviceAddress { buffer, path });
        self.addresses.get(&buffer).copied().unwrap_or(0)
    }
}

impl CommandDispatch for RecordingDispatch {
    fn cmd_bind_pipeline(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        pipeline: Pipeline,
    ) {
        self.record(RecordedCall::BindPipeline {
            command_buffer,
            bind_point,
            pipeline,
        });
    }

    fn cmd_bind_descriptor_sets(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        first_set: u32,
        sets: &[DescriptorSet],
        dynamic_offsets: &[u32],
    ) {
        self.record(RecordedCall::BindDescriptorSets {
            command_buffer,
            bind_point,
            layout,
            first_set,
            sets: sets.to_vec(),
            dynamic_offsets: dynamic_offsets.to_vec(),
        });
    }

    fn cmd_push_descriptor_set(
        &self,
        command_buffer: CommandBuffer,
        bind_point: PipelineBindPoint,
        layout: PipelineLayout,
        set: u32,
        writes: &[DescriptorWrite],
    ) {
        self.record(RecordedCall::PushDescriptorSet {
            command_buffer,
            bind_point,
            layout,
            set,
            writes: writes.to_vec(),
        });
    }

    fn cmd_push_constants(
        &self,
        command_buffer: CommandBuffer,
        layout: PipelineLayout,
        stage_flags: ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) {
        self.record(RecordedCall::PushConstants {
            command_buffer,
            layout,
            stage_flags,
            offset,
            data: data.to_vec(),
        });
    }

    fn cmd_bind_shaders(
        &self,
        command_buffer: CommandBuffer,
        stages: &[ShaderStage],
        shaders: &[ShaderObject],
    ) {
        self.record(RecordedCall::BindShaders {
            command_buffer,
            stages: stages.to_vec(),
            shaders: shaders.to_vec(),
        });
    }
}

impl DeviceDispatch for RecordingDispatch {
    fn get_buffer_device_address(&self, buffer: Buffer) -> DeviceAddress {
        self.address_for(buffer, AddressPath::Core)
    }

    fn get_buffer_device_address_ext(&self, buffer: Buffer) -> DeviceAddress {
        self.address_for(buffer, AddressPath::Ext)
    }

    fn get_buffer_device_address_khr(&self, buffer: Buffer) -> DeviceAddress {
        self.address_for(buffer, AddressPath::Khr)
    }
}
