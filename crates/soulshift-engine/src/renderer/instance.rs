use bytemuck::{Pod, Zeroable};

/// Per-instance sprite data read by the JS renderer straight out of wasm
/// memory. 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Center X in world space.
    pub x: f32,
    /// Center Y in world space.
    pub y: f32,
    /// Drawn width in world units. Negative mirrors the sprite horizontally.
    pub width: f32,
    /// Drawn height in world units.
    pub height: f32,
    /// Atlas column.
    pub sprite_col: f32,
    /// Atlas row.
    pub atlas_row: f32,
    /// Atlas index.
    pub atlas: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// All sprite instances for one frame.
pub struct RenderBuffer {
    /// Ordered by blend mode: alpha-blended instances first, additive
    /// instances from `additive_start` on.
    pub instances: Vec<RenderInstance>,
    pub additive_start: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(256),
            additive_start: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.additive_start = 0;
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn set_additive_start(&mut self, start: u32) {
        self.additive_start = start;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Flat float view of the instances.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for reads from JS.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
