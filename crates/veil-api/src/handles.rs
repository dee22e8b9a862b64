//! Opaque object handles.
//!
//! Handles are plain 64-bit values, never dereferenced here; ownership and
//! lifetime of the underlying driver objects belong to the embedding layer.
//! A raw value of `0` is the null handle.

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const NULL: Self = Self(0);

            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> u64 {
                self.0
            }

            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

handle! {
    /// A command buffer in the recording state.
    CommandBuffer
}

handle! {
    /// A monolithic pipeline object (fixed-function + shader state bound as a unit).
    Pipeline
}

handle! {
    /// A pipeline layout (descriptor-set layouts + push-constant ranges).
    PipelineLayout
}

handle! {
    /// A bound collection of resource bindings.
    DescriptorSet
}

handle! {
    /// A buffer resource.
    Buffer
}

handle! {
    /// An independently bound per-stage shader object.
    ShaderObject
}

handle! {
    Sampler
}

handle! {
    ImageView
}
