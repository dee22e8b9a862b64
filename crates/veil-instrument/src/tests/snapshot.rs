use veil_api::recording::{RecordedCall, RecordingDispatch};
use veil_api::CommandDispatch;
use veil_api::{
    CommandBuffer, DescriptorBufferInfo, DescriptorSet, DescriptorType, DescriptorWrite,
    Buffer, Pipeline, PipelineBindPoint, PipelineLayout, PushConstantRange, ShaderObject,
    ShaderStage, ShaderStageFlags,
};

use crate::snapshot::{with_restored_bind_state, CapturedBindState, CapturedProgram};
use crate::state::{BoundDescriptorSet, BoundPipeline, CommandBufferState};

const CB: CommandBuffer = CommandBuffer::from_raw(0xcb);

fn graphics_ranges() -> Vec<PushConstantRange> {
    vec![
        PushConstantRange {
            stage_flags: ShaderStageFlags::VERTEX,
            offset: 0,
            size: 8,
        },
        PushConstantRange {
            stage_flags: ShaderStageFlags::FRAGMENT,
            offset: 8,
            size: 8,
        },
    ]
}

/// Graphics pipeline at 0x10/layout 0x11, sets bound at indices 0 and 2
/// (index 1 left empty), push constants recorded against the layout's ranges.
fn recorded_graphics_state() -> CommandBufferState {
    let mut state = CommandBufferState::new(CB);
    state.bind_pipeline(
        PipelineBindPoint::Graphics,
        BoundPipeline {
            pipeline: Pipeline::from_raw(0x10),
            layout: PipelineLayout::from_raw(0x11),
            push_constant_ranges: graphics_ranges(),
        },
    );
    state
        .bind_descriptor_set(
            PipelineBindPoint::Graphics,
            0,
            BoundDescriptorSet {
                set: DescriptorSet::from_raw(0x51),
                dynamic_offsets: vec![16, 32],
                push_descriptor: false,
            },
        )
        .unwrap();
    state
        .bind_descriptor_set(
            PipelineBindPoint::Graphics,
            2,
            BoundDescriptorSet {
                set: DescriptorSet::from_raw(0x52),
                dynamic_offsets: Vec::new(),
                push_descriptor: false,
            },
        )
        .unwrap();
    state
        .push_constants(&graphics_ranges(), 0, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16])
        .unwrap();
    state
}

#[test]
fn restore_rebinds_captured_pipeline_state_exactly() {
    let state = recorded_graphics_state();
    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);

    assert_eq!(
        dispatch.calls(),
        vec![
            RecordedCall::BindPipeline {
                command_buffer: CB,
                bind_point: PipelineBindPoint::Graphics,
                pipeline: Pipeline::from_raw(0x10),
            },
            RecordedCall::BindDescriptorSets {
                command_buffer: CB,
                bind_point: PipelineBindPoint::Graphics,
                layout: PipelineLayout::from_raw(0x11),
                first_set: 0,
                sets: vec![DescriptorSet::from_raw(0x51)],
                dynamic_offsets: vec![16, 32],
            },
            RecordedCall::BindDescriptorSets {
                command_buffer: CB,
                bind_point: PipelineBindPoint::Graphics,
                layout: PipelineLayout::from_raw(0x11),
                first_set: 2,
                sets: vec![DescriptorSet::from_raw(0x52)],
                dynamic_offsets: vec![],
            },
            RecordedCall::PushConstants {
                command_buffer: CB,
                layout: PipelineLayout::from_raw(0x11),
                stage_flags: ShaderStageFlags::VERTEX,
                offset: 0,
                data: vec![1, 2, 3, 4, 5, 6, 7, 8],
            },
            RecordedCall::PushConstants {
                command_buffer: CB,
                layout: PipelineLayout::from_raw(0x11),
                stage_flags: ShaderStageFlags::FRAGMENT,
                offset: 8,
                data: vec![9, 10, 11, 12, 13, 14, 15, 16],
            },
        ]
    );
}

#[test]
fn snapshot_is_pipeline_or_shader_objects_never_both() {
    let mut state = recorded_graphics_state();
    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    match snapshot.program() {
        CapturedProgram::Pipeline { .. } => {}
        CapturedProgram::Shaders(_) => panic!("pipeline-mode capture produced shader objects"),
    }

    state
        .bind_shaders(&[ShaderStage::Vertex], &[ShaderObject::from_raw(0x71)])
        .unwrap();
    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    match snapshot.program() {
        CapturedProgram::Shaders(shaders) => assert_eq!(shaders.len(), 1),
        CapturedProgram::Pipeline { .. } => {
            panic!("shader-object capture still reports a pipeline")
        }
    }
}

#[test]
fn mismatched_push_constant_ranges_suppress_restore() {
    let mut state = recorded_graphics_state();
    // Overwrite with a push recorded against a different layout's single range.
    state
        .push_constants(
            &[PushConstantRange {
                stage_flags: ShaderStageFlags::VERTEX,
                offset: 0,
                size: 4,
            }],
            0,
            &[1, 2, 3, 4],
        )
        .unwrap();

    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);
    assert!(
        !dispatch
            .calls()
            .iter()
            .any(|call| matches!(call, RecordedCall::PushConstants { .. })),
        "stale push constants must not be replayed"
    );
}

#[test]
fn push_descriptor_writes_replay_at_the_captured_set_index() {
    let writes = vec![DescriptorWrite {
        binding: 0,
        array_element: 0,
        descriptor_type: DescriptorType::UniformBuffer,
        buffers: vec![DescriptorBufferInfo {
            buffer: Buffer::from_raw(0xb0),
            offset: 0,
            range: Some(64),
        }],
        images: Vec::new(),
    }];

    let mut state = recorded_graphics_state();
    state
        .bind_descriptor_set(
            PipelineBindPoint::Graphics,
            1,
            BoundDescriptorSet {
                set: DescriptorSet::from_raw(0x53),
                dynamic_offsets: Vec::new(),
                push_descriptor: true,
            },
        )
        .unwrap();
    state.set_push_descriptor_writes(PipelineBindPoint::Graphics, writes.clone());

    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);

    let replayed = dispatch
        .calls()
        .into_iter()
        .find_map(|call| match call {
            RecordedCall::PushDescriptorSet { set, writes, .. } => Some((set, writes)),
            _ => None,
        })
        .expect("captured push-descriptor writes were not replayed");
    assert_eq!(replayed, (1, writes));
}

#[test]
fn compute_shader_object_restore_is_one_batched_bind() {
    let mut state = CommandBufferState::new(CB);
    state
        .bind_shaders(&[ShaderStage::Compute], &[ShaderObject::from_raw(0x71)])
        .unwrap();

    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Compute);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);

    assert_eq!(
        dispatch.calls(),
        vec![RecordedCall::BindShaders {
            command_buffer: CB,
            stages: vec![ShaderStage::Compute],
            shaders: vec![ShaderObject::from_raw(0x71)],
        }]
    );
}

#[test]
fn graphics_shader_objects_restore_in_captured_order() {
    let mut state = CommandBufferState::new(CB);
    state
        .bind_shaders(
            &[ShaderStage::Vertex, ShaderStage::Fragment],
            &[ShaderObject::from_raw(0x71), ShaderObject::from_raw(0x72)],
        )
        .unwrap();

    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);

    assert_eq!(
        dispatch.calls(),
        vec![RecordedCall::BindShaders {
            command_buffer: CB,
            stages: vec![ShaderStage::Vertex, ShaderStage::Fragment],
            shaders: vec![ShaderObject::from_raw(0x71), ShaderObject::from_raw(0x72)],
        }]
    );
}

#[test]
fn empty_bind_point_restores_nothing() {
    let state = CommandBufferState::new(CB);
    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Compute);
    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);
    assert!(dispatch.calls().is_empty());
}

#[test]
fn recapture_without_mutation_yields_identical_snapshots() {
    let state = recorded_graphics_state();
    let first = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    let second = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);
    assert_eq!(first, second);
}

#[test]
fn snapshot_is_immune_to_later_state_mutation() {
    let mut state = recorded_graphics_state();
    let snapshot = CapturedBindState::capture(&state, PipelineBindPoint::Graphics);

    // Mutations after capture model the injected commands rebinding the same
    // slots mid-cycle.
    state
        .bind_descriptor_set(
            PipelineBindPoint::Graphics,
            0,
            BoundDescriptorSet {
                set: DescriptorSet::from_raw(0xdead),
                dynamic_offsets: vec![0],
                push_descriptor: false,
            },
        )
        .unwrap();
    state
        .push_constants(&graphics_ranges(), 0, &[0xff; 16])
        .unwrap();

    let dispatch = RecordingDispatch::new();
    snapshot.restore(&dispatch);
    let calls = dispatch.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        RecordedCall::BindDescriptorSets { sets, .. } if sets == &[DescriptorSet::from_raw(0x51)]
    )));
    assert!(calls.iter().any(|call| matches!(
        call,
        RecordedCall::PushConstants { data, .. } if data == &[1, 2, 3, 4, 5, 6, 7, 8]
    )));
}

#[test]
fn with_restored_bind_state_brackets_the_injected_commands() {
    let state = recorded_graphics_state();
    let dispatch = RecordingDispatch::new();

    let value = with_restored_bind_state(
        &dispatch,
        &state,
        PipelineBindPoint::Graphics,
        |dispatch| {
            dispatch.cmd_bind_pipeline(
                CB,
                PipelineBindPoint::Graphics,
                Pipeline::from_raw(0x7777),
            );
            42
        },
    );
    assert_eq!(value, 42);

    let calls = dispatch.calls();
    // Injected bind first, then the restore sequence starting with the
    // application pipeline.
    assert_eq!(
        calls[0],
        RecordedCall::BindPipeline {
            command_buffer: CB,
            bind_point: PipelineBindPoint::Graphics,
            pipeline: Pipeline::from_raw(0x7777),
        }
    );
    assert_eq!(
        calls[1],
        RecordedCall::BindPipeline {
            command_buffer: CB,
            bind_point: PipelineBindPoint::Graphics,
            pipeline: Pipeline::from_raw(0x10),
        }
    );
}

#[test]
#[should_panic(expected = "graphics and compute")]
fn ray_tracing_capture_is_a_contract_violation() {
    let state = CommandBufferState::new(CB);
    let _ = CapturedBindState::capture(&state, PipelineBindPoint::RayTracing);
}
