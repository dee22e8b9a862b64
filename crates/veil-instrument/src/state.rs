//! Command-buffer bind-state tracking.
//!
//! [`CommandBufferState`] is the recording-time model the surrounding layer
//! keeps per command buffer: for each bind point, either a bound pipeline
//! object or a set of independently bound shader-stage objects, the ordered
//! descriptor-set bindings, pending push-descriptor writes, and the command
//! buffer's push-constant bytes with the ranges they were pushed against.
//!
//! The recording mutators validate their inputs; the read side is consumed
//! by snapshot capture and stays free of driver calls.

use veil_api::{
    CommandBuffer, DescriptorSet, DescriptorWrite, Pipeline, PipelineBindPoint, PipelineLayout,
    PushConstantRange, ShaderObject, ShaderStage, MAX_BOUND_DESCRIPTOR_SETS,
    MAX_PUSH_CONSTANT_BYTES,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    #[error("descriptor set index {index} exceeds the bound-set limit {limit}")]
    DescriptorSetIndexOutOfRange { index: u32, limit: u32 },

    #[error("push constant write [{offset}, {end}) exceeds the {limit}-byte limit")]
    PushConstantOutOfRange { offset: u32, end: u64, limit: u32 },

    #[error("bind_shaders called with {stages} stages but {shaders} shader handles")]
    ShaderArityMismatch { stages: usize, shaders: usize },
}

/// The pipeline object bound at a bind point, with the layout state capture
/// needs alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPipeline {
    pub pipeline: Pipeline,
    pub layout: PipelineLayout,
    /// Push-constant ranges declared by `layout`.
    pub push_constant_ranges: Vec<PushConstantRange>,
}

/// One occupied descriptor-set slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDescriptorSet {
    pub set: DescriptorSet,
    pub dynamic_offsets: Vec<u32>,
    /// Marks the single slot whose contents are supplied by push-descriptor
    /// writes rather than a persistent allocation.
    pub push_descriptor: bool,
}

/// One independently bound shader-stage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundShader {
    pub stage: ShaderStage,
    pub shader: ShaderObject,
}

/// Everything bound at one bind point.
///
/// A pipeline object and shader-stage objects are mutually exclusive binding
/// models; the mutators on [`CommandBufferState`] keep at most one of the two
/// populated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindPointState {
    pipeline: Option<BoundPipeline>,
    sets: Vec<Option<BoundDescriptorSet>>,
    push_descriptor_writes: Vec<DescriptorWrite>,
    shaders: Vec<BoundShader>,
}

impl BindPointState {
    pub fn pipeline(&self) -> Option<&BoundPipeline> {
        self.pipeline.as_ref()
    }

    /// Descriptor-set slots indexed by set number; unbound slots are `None`.
    pub fn descriptor_sets(&self) -> &[Option<BoundDescriptorSet>] {
        &self.sets
    }

    pub fn push_descriptor_writes(&self) -> &[DescriptorWrite] {
        &self.push_descriptor_writes
    }

    pub fn shaders(&self) -> &[BoundShader] {
        &self.shaders
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBufferState {
    handle: CommandBuffer,
    graphics: BindPointState,
    compute: BindPointState,
    push_constant_data: Vec<u8>,
    /// Ranges of the layout the most recent push-constant update was recorded
    /// against. Compared against a pipeline layout's declared ranges to decide
    /// whether the bytes are still meaningful for that layout.
    push_constant_ranges: Vec<PushConstantRange>,
}

impl CommandBufferState {
    pub fn new(handle: CommandBuffer) -> Self {
        Self {
            handle,
            graphics: BindPointState::default(),
            compute: BindPointState::default(),
            push_constant_data: Vec::new(),
            push_constant_ranges: Vec::new(),
        }
    }

    pub fn handle(&self) -> CommandBuffer {
        self.handle
    }

    pub fn bind_state(&self, bind_point: PipelineBindPoint) -> &BindPointState {
        match bind_point {
            PipelineBindPoint::Graphics => &self.graphics,
            PipelineBindPoint::Compute => &self.compute,
            PipelineBindPoint::RayTracing => {
                panic!("ray tracing bind state is not tracked")
            }
        }
    }

    fn bind_state_mut(&mut self, bind_point: PipelineBindPoint) -> &mut BindPointState {
        match bind_point {
            PipelineBindPoint::Graphics => &mut self.graphics,
            PipelineBindPoint::Compute => &mut self.compute,
            PipelineBindPoint::RayTracing => {
                panic!("ray tracing bind state is not tracked")
            }
        }
    }

    pub fn push_constant_data(&self) -> &[u8] {
        &self.push_constant_data
    }

    pub fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    /// Records a pipeline bind. Any shader-stage objects previously bound at
    /// this bind point are displaced by the pipeline.
    pub fn bind_pipeline(&mut self, bind_point: PipelineBindPoint, pipeline: BoundPipeline) {
        let state = self.bind_state_mut(bind_point);
        state.pipeline = Some(pipeline);
        state.shaders.clear();
    }

    /// Records a descriptor-set bind at `set_index`.
    pub fn bind_descriptor_set(
        &mut self,
        bind_point: PipelineBindPoint,
        set_index: u32,
        bound: BoundDescriptorSet,
    ) -> Result<(), StateError> {
        if set_index >= MAX_BOUND_DESCRIPTOR_SETS {
            return Err(StateError::DescriptorSetIndexOutOfRange {
                index: set_index,
                limit: MAX_BOUND_DESCRIPTOR_SETS,
            });
        }
        let state = self.bind_state_mut(bind_point);
        let slot = set_index as usize;
        if state.sets.len() <= slot {
            state.sets.resize(slot + 1, None);
        }
        state.sets[slot] = Some(bound);
        Ok(())
    }

    /// Replaces the pending push-descriptor writes for this bind point.
    pub fn set_push_descriptor_writes(
        &mut self,
        bind_point: PipelineBindPoint,
        writes: Vec<DescriptorWrite>,
    ) {
        self.bind_state_mut(bind_point).push_descriptor_writes = writes;
    }

    /// Records a push-constant update made against a layout declaring
    /// `ranges`. The byte window must fit the inline storage cap.
    pub fn push_constants(
        &mut self,
        ranges: &[PushConstantRange],
        offset: u32,
        data: &[u8],
    ) -> Result<(), StateError> {
        let end = offset as u64 + data.len() as u64;
        if end > MAX_PUSH_CONSTANT_BYTES as u64 {
            return Err(StateError::PushConstantOutOfRange {
                offset,
                end,
                limit: MAX_PUSH_CONSTANT_BYTES,
            });
        }
        if self.push_constant_ranges != ranges {
            self.push_constant_ranges = ranges.to_vec();
        }
        let end = end as usize;
        if self.push_constant_data.len() < end {
            self.push_constant_data.resize(end, 0);
        }
        self.push_constant_data[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    /// Records per-stage shader-object binds. `stages` and `shaders` are
    /// parallel; a null shader handle unbinds its stage. Binding any stage
    /// displaces the pipeline object at the affected bind point.
    pub fn bind_shaders(
        &mut self,
        stages: &[ShaderStage],
        shaders: &[ShaderObject],
    ) -> Result<(), StateError> {
        if stages.len() != shaders.len() {
            return Err(StateError::ShaderArityMismatch {
                stages: stages.len(),
                shaders: shaders.len(),
            });
        }
        for (&stage, &shader) in stages.iter().zip(shaders) {
            let bind_point = if stage.is_graphics() {
                PipelineBindPoint::Graphics
            } else {
                PipelineBindPoint::Compute
            };
            let state = self.bind_state_mut(bind_point);
            state.pipeline = None;
            if shader.is_null() {
                state.shaders.retain(|bound| bound.stage != stage);
            } else if let Some(bound) = state.shaders.iter_mut().find(|bound| bound.stage == stage)
            {
                bound.shader = shader;
            } else {
                state.shaders.push(BoundShader { stage, shader });
            }
        }
        Ok(())
    }
}
