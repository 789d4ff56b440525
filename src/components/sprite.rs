use bevy_ecs::prelude::Component;
use raylib::prelude::Color;

/// Visual extent and paint data for an entity.
///
/// `tex_key` is the asset path used as key into the
/// [`TextureStore`](crate::resources::texturestore::TextureStore); an empty key
/// means the entity is painted as a `tint` coloured rectangle. `loaded` flips
/// from false to true exactly once, when the texture is realized.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub tint: Color,
    pub loaded: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            tint: Color::WHITE,
            loaded: false,
        }
    }

    /// Untextured sprite painted as a solid rectangle.
    pub fn solid(width: f32, height: f32, tint: Color) -> Self {
        Self {
            tex_key: String::new(),
            width,
            height,
            tint,
            loaded: false,
        }
    }

    pub fn has_texture(&self) -> bool {
        !self.tex_key.is_empty()
    }

    /// Mark the texture as realized. Returns true only on the first call.
    pub fn mark_loaded(&mut self) -> bool {
        if self.loaded {
            return false;
        }
        self.loaded = true;
        true
    }
}
