//! Binding vocabulary and device capability types.

use bitflags::bitflags;

use crate::handles::{Buffer, ImageView, Sampler};

/// Raw GPU-visible virtual address of a buffer resource. `0` means "no
/// address available".
pub type DeviceAddress = u64;

/// Maximum number of descriptor sets that can be bound to one bind point.
///
/// Valid set indices are `0..MAX_BOUND_DESCRIPTOR_SETS`.
pub const MAX_BOUND_DESCRIPTOR_SETS: u32 = 32;

/// Size cap for the command buffer's inline push-constant storage.
pub const MAX_PUSH_CONSTANT_BYTES: u32 = 256;

/// The pipeline type a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineBindPoint {
    Graphics,
    Compute,
    RayTracing,
}

/// A single programmable stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
    Task,
    Mesh,
}

impl ShaderStage {
    pub const fn flag(self) -> ShaderStageFlags {
        match self {
            Self::Vertex => ShaderStageFlags::VERTEX,
            Self::TessellationControl => ShaderStageFlags::TESSELLATION_CONTROL,
            Self::TessellationEvaluation => ShaderStageFlags::TESSELLATION_EVALUATION,
            Self::Geometry => ShaderStageFlags::GEOMETRY,
            Self::Fragment => ShaderStageFlags::FRAGMENT,
            Self::Compute => ShaderStageFlags::COMPUTE,
            Self::Task => ShaderStageFlags::TASK,
            Self::Mesh => ShaderStageFlags::MESH,
        }
    }

    /// Stages that bind through the graphics bind point.
    pub const fn is_graphics(self) -> bool {
        !matches!(self, Self::Compute)
    }
}

bitflags! {
    /// Stage mask used by push-constant ranges.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const TESSELLATION_CONTROL = 1 << 1;
        const TESSELLATION_EVALUATION = 1 << 2;
        const GEOMETRY = 1 << 3;
        const FRAGMENT = 1 << 4;
        const COMPUTE = 1 << 5;
        const TASK = 1 << 6;
        const MESH = 1 << 7;
    }
}

bitflags! {
    /// Device extensions relevant to instrumentation, as enabled at device
    /// creation time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceExtensions: u32 {
        /// Vendor buffer-device-address extension.
        const EXT_BUFFER_DEVICE_ADDRESS = 1 << 0;
        /// Standardized buffer-device-address extension.
        const KHR_BUFFER_DEVICE_ADDRESS = 1 << 1;
        const KHR_PUSH_DESCRIPTOR = 1 << 2;
        const EXT_SHADER_OBJECT = 1 << 3;
    }
}

/// Packed `major.minor.patch` API version, ordered by numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(u32);

impl ApiVersion {
    pub const V1_0: Self = Self::new(1, 0);
    pub const V1_1: Self = Self::new(1, 1);
    pub const V1_2: Self = Self::new(1, 2);
    pub const V1_3: Self = Self::new(1, 3);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self((major << 22) | (minor << 12))
    }

    pub const fn major(self) -> u32 {
        self.0 >> 22
    }

    pub const fn minor(self) -> u32 {
        (self.0 >> 12) & 0x3ff
    }
}

/// One contiguous push-constant window declared by a pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantRange {
    pub stage_flags: ShaderStageFlags,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
    InputAttachment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBufferInfo {
    pub buffer: Buffer,
    pub offset: u64,
    /// `None` binds from `offset` to the end of the buffer.
    pub range: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorImageInfo {
    pub sampler: Sampler,
    pub image_view: ImageView,
}

/// One descriptor write supplied directly at bind time (push descriptors).
///
/// Unlike the raw API's pointer-carrying write structure this is a value
/// type, so a pending write can be copied and replayed later without any
/// lifetime tie to the recorder that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorWrite {
    pub binding: u32,
    pub array_element: u32,
    pub descriptor_type: DescriptorType,
    pub buffers: Vec<DescriptorBufferInfo>,
    pub images: Vec<DescriptorImageInfo>,
}
