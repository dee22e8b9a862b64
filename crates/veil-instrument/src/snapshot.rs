//! Bind-state snapshot and replay.
//!
//! Injected validation commands rebind the very slots the application was
//! using, so before injection the current bind state is captured into an
//! owned [`CapturedBindState`] and replayed through the driver-call seam once
//! injection is done. Capture copies values, never references: the live
//! state keeps mutating while injected commands are recorded, and restore
//! must replay exactly what capture saw.

use veil_api::{
    CommandBuffer, CommandDispatch, DescriptorSet, DescriptorWrite, Pipeline, PipelineBindPoint,
    PipelineLayout, PushConstantRange,
};

use crate::state::{BoundShader, CommandBufferState};

/// Push-constant bytes captured together with the ranges they were recorded
/// against. The pairing is what makes replay safe: bytes are never restored
/// through a layout whose ranges differ from the captured ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPushConstants {
    pub data: Vec<u8>,
    pub ranges: Vec<PushConstantRange>,
}

/// What was executing at the captured bind point: a pipeline object with its
/// attendant bindings, or independently bound shader-stage objects. The two
/// are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedProgram {
    Pipeline {
        pipeline: Pipeline,
        layout: PipelineLayout,
        /// `(set handle, set index)` in ascending set-index order. Parallel
        /// to `dynamic_offsets`.
        descriptor_sets: Vec<(DescriptorSet, u32)>,
        dynamic_offsets: Vec<Vec<u32>>,
        push_descriptor_set_index: Option<u32>,
        push_descriptor_writes: Vec<DescriptorWrite>,
        push_constants: Option<CapturedPushConstants>,
    },
    Shaders(Vec<BoundShader>),
}

/// Owned snapshot of one bind point's state, alive for one
/// capture → inject → restore cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedBindState {
    command_buffer: CommandBuffer,
    bind_point: PipelineBindPoint,
    program: CapturedProgram,
}

impl CapturedBindState {
    /// Captures the bind point's current state. Read-only: no driver calls.
    ///
    /// Only the graphics and compute bind points carry restorable state;
    /// passing any other bind point is a caller bug and panics.
    pub fn capture(state: &CommandBufferState, bind_point: PipelineBindPoint) -> Self {
        assert!(
            matches!(
                bind_point,
                PipelineBindPoint::Graphics | PipelineBindPoint::Compute
            ),
            "bind state capture supports only the graphics and compute bind points"
        );
        let bound = state.bind_state(bind_point);

        let program = if let Some(pipeline) = bound.pipeline() {
            let mut descriptor_sets = Vec::new();
            let mut dynamic_offsets = Vec::new();
            let mut push_descriptor_set_index = None;
            for (index, slot) in bound.descriptor_sets().iter().enumerate() {
                let Some(slot) = slot else { continue };
                descriptor_sets.push((slot.set, index as u32));
                dynamic_offsets.push(slot.dynamic_offsets.clone());
                if slot.push_descriptor {
                    push_descriptor_set_index = Some(index as u32);
                }
            }

            let push_constants = if pipeline.push_constant_ranges == state.push_constant_ranges() {
                Some(CapturedPushConstants {
                    data: state.push_constant_data().to_vec(),
                    ranges: pipeline.push_constant_ranges.clone(),
                })
            } else {
                if !state.push_constant_data().is_empty() {
                    tracing::debug!(
                        ?bind_point,
                        "pipeline layout ranges differ from the recorded push constants; \
                         skipping push constant restore"
                    );
                }
                None
            };

            CapturedProgram::Pipeline {
                pipeline: pipeline.pipeline,
                layout: pipeline.layout,
                descriptor_sets,
                dynamic_offsets,
                push_descriptor_set_index,
                push_descriptor_writes: bound.push_descriptor_writes().to_vec(),
                push_constants,
            }
        } else {
            CapturedProgram::Shaders(bound.shaders().to_vec())
        };

        Self {
            command_buffer: state.handle(),
            bind_point,
            program,
        }
    }

    pub fn command_buffer(&self) -> CommandBuffer {
        self.command_buffer
    }

    pub fn bind_point(&self) -> PipelineBindPoint {
        self.bind_point
    }

    pub fn program(&self) -> &CapturedProgram {
        &self.program
    }

    /// Replays the captured state into the command buffer.
    ///
    /// May be called any number of times; every call re-issues all driver
    /// calls. The caller decides when the injected commands for this cycle
    /// are done and restores exactly then.
    pub fn restore(&self, dispatch: &impl CommandDispatch) {
        match &self.program {
            CapturedProgram::Pipeline {
                pipeline,
                layout,
                descriptor_sets,
                dynamic_offsets,
                push_descriptor_set_index,
                push_descriptor_writes,
                push_constants,
            } => {
                dispatch.cmd_bind_pipeline(self.command_buffer, self.bind_point, *pipeline);

                // Bound sets need not be contiguous; one call per set keeps
                // gaps left by unbound slots intact.
                for ((set, index), offsets) in descriptor_sets.iter().zip(dynamic_offsets) {
                    if set.is_null() {
                        continue;
                    }
                    dispatch.cmd_bind_descriptor_sets(
                        self.command_buffer,
                        self.bind_point,
                        *layout,
                        *index,
                        &[*set],
                        offsets,
                    );
                }

                if !push_descriptor_writes.is_empty() {
                    if let Some(set_index) = push_descriptor_set_index {
                        dispatch.cmd_push_descriptor_set(
                            self.command_buffer,
                            self.bind_point,
                            *layout,
                            *set_index,
                            push_descriptor_writes,
                        );
                    }
                }

                if let Some(push_constants) = push_constants {
                    if !push_constants.data.is_empty() {
                        for range in &push_constants.ranges {
                            if range.size == 0 {
                                continue;
                            }
                            let start = range.offset as usize;
                            if start >= push_constants.data.len() {
                                continue;
                            }
                            let end = push_constants
                                .data
                                .len()
                                .min(start + range.size as usize);
                            dispatch.cmd_push_constants(
                                self.command_buffer,
                                *layout,
                                range.stage_flags,
                                range.offset,
                                &push_constants.data[start..end],
                            );
                        }
                    }
                }
            }
            CapturedProgram::Shaders(shaders) => {
                if !shaders.is_empty() {
                    let stages: Vec<_> = shaders.iter().map(|bound| bound.stage).collect();
                    let handles: Vec<_> = shaders.iter().map(|bound| bound.shader).collect();
                    dispatch.cmd_bind_shaders(self.command_buffer, &stages, &handles);
                }
            }
        }
    }
}

/// Runs `inject` bracketed by a capture and a restore of `bind_point`.
///
/// `inject` receives the dispatch so it can record the validation commands
/// for this cycle; whatever it returns is passed through.
pub fn with_restored_bind_state<D: CommandDispatch, T>(
    dispatch: &D,
    state: &CommandBufferState,
    bind_point: PipelineBindPoint,
    inject: impl FnOnce(&D) -> T,
) -> T {
    let saved = CapturedBindState::capture(state, bind_point);
    let value = inject(dispatch);
    saved.restore(dispatch);
    value
}
