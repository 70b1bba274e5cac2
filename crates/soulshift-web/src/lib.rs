//! wasm-bindgen exports for the browser host.
//!
//! The host calls `world_init` once with the level, the asset manifest and an
//! optional config, then `world_tick` every animation frame. Sprite, light and
//! parallax data are read straight out of wasm memory through the pointer
//! accessors.

pub mod runner;

pub use runner::SceneRunner;

use std::cell::RefCell;

use soulshift_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SceneRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Before `world_init` succeeds every call is a
/// no-op returning the default value.
fn with_runner<R: Default>(f: impl FnOnce(&mut SceneRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("world not initialized, call world_init() first");
            R::default()
        }
    })
}

#[wasm_bindgen]
pub fn world_init(
    map_json: &str,
    manifest_json: &str,
    config_json: &str,
    viewport_width: f32,
    viewport_height: f32,
) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SceneRunner::from_json(map_json, manifest_json, config_json, viewport_width, viewport_height)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("soulshift: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn world_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn world_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn world_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

/// Pointer position in canvas pixels, origin top-left.
#[wasm_bindgen]
pub fn world_pointer_down(x: f32, y: f32, pointer: u32, button: u32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, pointer, button }));
}

#[wasm_bindgen]
pub fn world_resize(viewport_width: f32, viewport_height: f32) {
    with_runner(|r| r.resize(viewport_width, viewport_height));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    RUNNER.with(|cell| cell.borrow().as_ref().map_or(std::ptr::null(), |r| r.instances_ptr()))
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_additive_start() -> u32 {
    with_runner(|r| r.additive_start())
}

#[wasm_bindgen]
pub fn get_lights_ptr() -> *const f32 {
    RUNNER.with(|cell| cell.borrow().as_ref().map_or(std::ptr::null(), |r| r.lights_ptr()))
}

#[wasm_bindgen]
pub fn get_light_count() -> u32 {
    with_runner(|r| r.light_count())
}

#[wasm_bindgen]
pub fn get_parallax_ptr() -> *const f32 {
    RUNNER.with(|cell| cell.borrow().as_ref().map_or(std::ptr::null(), |r| r.parallax_ptr()))
}

#[wasm_bindgen]
pub fn get_parallax_layer_count() -> u32 {
    with_runner(|r| r.parallax_layer_count())
}

#[wasm_bindgen]
pub fn get_camera_x() -> f32 {
    with_runner(|r| r.camera().center.x)
}

#[wasm_bindgen]
pub fn get_camera_y() -> f32 {
    with_runner(|r| r.camera().center.y)
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world().width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world().height())
}

/// Debug overlay lines joined by newlines; empty while the overlay is off.
#[wasm_bindgen]
pub fn get_debug_text() -> String {
    with_runner(|r| r.debug_text().to_string())
}
