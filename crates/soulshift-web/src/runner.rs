use soulshift_engine::{
    build_render_buffer, codes, pack_lights, Camera2D, InputEvent, InputQueue, ParallaxBackground, Rect,
    RenderBuffer, World, WorldConfig, WorldError,
};

/// Drives one level for the browser host.
///
/// The exported free functions in `lib.rs` keep a `thread_local!` SceneRunner,
/// because wasm-bindgen cannot export a struct holding the world directly.
pub struct SceneRunner {
    world: World,
    camera: Camera2D,
    parallax: ParallaxBackground,
    input: InputQueue,
    render_buffer: RenderBuffer,
    /// Flat light data, `PointLight::FLOATS` per light.
    light_buffer: Vec<f32>,
    parallax_buffer: Vec<f32>,
    debug_visible: bool,
    debug_text: String,
}

impl SceneRunner {
    pub fn new(world: World, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Camera2D::new(viewport_width, viewport_height);
        camera.set_bounds(Rect::new(0.0, 0.0, world.width(), world.height()));
        if let Some(player) = world.player() {
            camera.look_at(player.visual.center());
        }

        Self {
            world,
            camera,
            parallax: ParallaxBackground::three_layer(),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(),
            light_buffer: Vec::new(),
            parallax_buffer: Vec::new(),
            debug_visible: false,
            debug_text: String::new(),
        }
    }

    /// Build the world from JSON documents. An empty config keeps the defaults.
    pub fn from_json(
        map_json: &str,
        manifest_json: &str,
        config_json: &str,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<Self, WorldError> {
        let config = if config_json.trim().is_empty() {
            WorldConfig::default()
        } else {
            WorldConfig::from_json(config_json)?
        };
        let world = World::from_json(map_json, manifest_json, config)?;
        Ok(Self::new(world, viewport_width, viewport_height))
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: deliver queued input, advance the world, follow the
    /// player and rebuild the buffers the host reads.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            self.handle_input(event);
        }

        self.world.tick(dt);

        if let Some(player) = self.world.player() {
            self.camera.follow(player.visual.center(), dt);
        }

        build_render_buffer(self.world.entities(), &self.camera, &mut self.render_buffer);
        pack_lights(self.world.lights(), &mut self.light_buffer);
        self.parallax.write_floats(self.camera.center, &mut self.parallax_buffer);

        self.debug_text.clear();
        if self.debug_visible {
            self.debug_text = self.world.debug_strings().join("\n");
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code: codes::F5 } => {
                self.debug_visible = !self.debug_visible;
                log::debug!("debug overlay {}", if self.debug_visible { "on" } else { "off" });
            }
            InputEvent::KeyUp { key_code: codes::F5 } => {}
            InputEvent::KeyDown { key_code } => {
                self.world.on_key_pressed(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.world.on_key_released(key_code);
            }
            InputEvent::PointerDown { x, y, pointer, button } => {
                let at = self.camera.screen_to_world(x, y);
                self.world.touch_down(at.x, at.y, pointer, button);
            }
        }
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.camera.resize(viewport_width, viewport_height);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// Overlay text, empty while the overlay is hidden.
    pub fn debug_text(&self) -> &str {
        &self.debug_text
    }

    // ---- Pointer accessors for reads from JS ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn additive_start(&self) -> u32 {
        self.render_buffer.additive_start
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.light_buffer.as_ptr()
    }

    pub fn light_count(&self) -> u32 {
        (self.light_buffer.len() / soulshift_engine::PointLight::FLOATS) as u32
    }

    pub fn parallax_ptr(&self) -> *const f32 {
        self.parallax_buffer.as_ptr()
    }

    pub fn parallax_layer_count(&self) -> u32 {
        (self.parallax_buffer.len() / ParallaxBackground::FLOATS_PER_LAYER) as u32
    }
}
