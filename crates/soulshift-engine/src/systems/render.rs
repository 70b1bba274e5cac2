use crate::components::entity::Entity;
use crate::components::sprite::BlendMode;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from the visible entities in view, keeping
/// collection order within each blend group. Alpha-blended instances come
/// first, then additive ones from `additive_start`.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &Camera2D,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut additive_instances: Vec<RenderInstance> = Vec::new();

    for entity in entities {
        if !entity.is_visible() || !camera.is_rect_visible(&entity.bounding_rectangle()) {
            continue;
        }

        let visual = &entity.visual;
        let center = visual.center();
        let instance = RenderInstance {
            x: center.x,
            y: center.y,
            width: if visual.flip_x { -visual.size.x } else { visual.size.x },
            height: visual.size.y,
            sprite_col: visual.sprite.col,
            atlas_row: visual.sprite.row,
            atlas: visual.sprite.atlas.0 as f32,
            alpha: visual.sprite.alpha,
        };

        match visual.sprite.blend {
            BlendMode::Alpha => buffer.push(instance),
            BlendMode::Additive => additive_instances.push(instance),
        }
    }

    buffer.set_additive_start(buffer.instance_count());
    for inst in additive_instances {
        buffer.push(inst);
    }
}
