//! Diagnostic descriptor-set binding.
//!
//! Injected validation commands all read from one static "diagnostic common"
//! descriptor set: a command-index table and an error-log table. Rather than
//! allocating a set per injected command, the binder reuses the one set and
//! varies two dynamic offsets, one word per slot.

use veil_api::{
    CommandBuffer, CommandDispatch, DescriptorSet, PipelineBindPoint, PipelineLayout,
};

/// Byte stride of one table slot; the instrumented code indexes the tables as
/// 32-bit words.
pub const DIAG_WORD_BYTES: u32 = std::mem::size_of::<u32>() as u32;

/// Reserved set index the diagnostic set binds at. Application sets live
/// strictly below it.
pub const DIAG_SET_INDEX: u32 = 7;

/// Slot capacity of the command-index and error-log tables. Must agree with
/// the table sizing compiled into the instrumented shaders.
pub const DIAG_SLOT_COUNT: u32 = 4096;

/// Where the diagnostic set lives and how many slots its tables carry.
/// Supplied at composition time; [`Default`] is the conventional layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagSetLayout {
    pub set_index: u32,
    pub slot_count: u32,
}

impl Default for DiagSetLayout {
    fn default() -> Self {
        Self {
            set_index: DIAG_SET_INDEX,
            slot_count: DIAG_SLOT_COUNT,
        }
    }
}

/// Per-injected-command table slots. Both indices must be below the layout's
/// `slot_count`; that is a caller contract, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagSlots {
    pub command_index: u32,
    pub error_logger_index: u32,
}

/// Binds the diagnostic common set for one injected command.
///
/// Issues exactly one bind-descriptor-sets call at the reserved set index,
/// with dynamic offsets selecting the command-index slot and the error-log
/// slot in that order.
pub fn bind_diag_descriptor_set(
    dispatch: &impl CommandDispatch,
    command_buffer: CommandBuffer,
    bind_point: PipelineBindPoint,
    layout: PipelineLayout,
    diag_set: DescriptorSet,
    slots: DiagSlots,
    set_layout: &DiagSetLayout,
) {
    assert!(
        slots.command_index < set_layout.slot_count,
        "command index {} out of range (slot count {})",
        slots.command_index,
        set_layout.slot_count
    );
    assert!(
        slots.error_logger_index < set_layout.slot_count,
        "error logger index {} out of range (slot count {})",
        slots.error_logger_index,
        set_layout.slot_count
    );

    let dynamic_offsets = [
        slots.command_index * DIAG_WORD_BYTES,
        slots.error_logger_index * DIAG_WORD_BYTES,
    ];
    dispatch.cmd_bind_descriptor_sets(
        command_buffer,
        bind_point,
        layout,
        set_layout.set_index,
        &[diag_set],
        &dynamic_offsets,
    );
}
