use std::path::Path;

use crate::error::SetupError;
use crate::geom::{Point, Rect};

pub mod backend;

pub use backend::SfmlRenderer;

/// Handle to a loaded texture. Assigned monotonically by the renderer.
pub type TextureId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Rendering capability consumed by the engine. Destination rects are
/// world coordinates; the implementation applies the camera transform.
/// Tests substitute a recording implementation, so nothing above this
/// trait touches the graphics library.
pub trait Renderer {
    fn load_texture(&mut self, path: &Path) -> Result<(TextureId, TextureInfo), SetupError>;

    fn render_texture(
        &mut self,
        texture: TextureId,
        src: Rect,
        dst: Rect,
        flip: Flip,
        angle: f64,
        center: Point,
    );

    fn set_draw_color(&mut self, r: u8, g: u8, b: u8, a: u8);

    fn clear(&mut self);

    /// Fill a world-space rectangle with the current draw color.
    fn fill_rect(&mut self, rect: Rect);

    fn present(&mut self);

    fn set_world_bounds(&mut self, bounds: Rect);

    fn camera_look_at(&mut self, x: i32, y: i32);

    fn screen_width(&self) -> i32;

    fn screen_height(&self) -> i32;

    /// Translate a screen point (e.g. a mouse click) into world space.
    fn to_world(&self, x: i32, y: i32) -> Point;

    /// Inverse of `to_world` for the current camera offset.
    fn to_screen(&self, x: i32, y: i32) -> Point;
}
