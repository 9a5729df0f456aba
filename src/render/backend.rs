use std::path::Path;

use log::debug;
use sfml::cpp::FBox;
use sfml::graphics::{
    Color, IntRect, RectangleShape, RenderTarget, RenderWindow, Shape, Sprite, Texture,
    Transformable,
};
use sfml::window::Style;

use crate::camera::Camera;
use crate::error::SetupError;
use crate::geom::{Point, Rect};

use super::{Flip, Renderer, TextureId, TextureInfo};

/// SFML-backed renderer: owns the window, the loaded textures and the
/// camera. All drawing goes through the `Renderer` trait.
pub struct SfmlRenderer {
    window: FBox<RenderWindow>,
    textures: Vec<FBox<Texture>>,
    camera: Camera,
    draw_color: Color,
}

impl SfmlRenderer {
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self, SetupError> {
        let mut window = RenderWindow::new(
            (width, height),
            title,
            Style::CLOSE,
            &Default::default(),
        )
        .map_err(|e| SetupError::Window(format!("{e:?}")))?;
        window.set_vertical_sync_enabled(true);

        Ok(Self {
            window,
            textures: Vec::new(),
            camera: Camera::new(width as i32, height as i32),
            draw_color: Color::BLACK,
        })
    }

    /// The input pump polls events off the window directly.
    pub fn window_mut(&mut self) -> &mut RenderWindow {
        &mut self.window
    }
}

impl Renderer for SfmlRenderer {
    fn load_texture(&mut self, path: &Path) -> Result<(TextureId, TextureInfo), SetupError> {
        let texture = Texture::from_file(&path.display().to_string()).map_err(|e| {
            SetupError::Texture {
                path: path.display().to_string(),
                reason: format!("{e:?}"),
            }
        })?;
        let size = texture.size();
        let info = TextureInfo {
            width: size.x as i32,
            height: size.y as i32,
        };

        let id = self.textures.len();
        self.textures.push(texture);
        debug!("loaded texture {} as #{}", path.display(), id);
        Ok((id, info))
    }

    fn render_texture(
        &mut self,
        texture: TextureId,
        src: Rect,
        dst: Rect,
        flip: Flip,
        angle: f64,
        center: Point,
    ) {
        // A stale handle skips the draw rather than aborting the frame.
        let Some(texture) = self.textures.get(texture) else {
            debug!("render_texture: unknown texture handle {}", texture);
            return;
        };

        let mut sprite = Sprite::with_texture(texture);
        sprite.set_texture_rect(IntRect::new(src.x, src.y, src.w, src.h));

        let screen = self.camera.to_screen(dst);
        let sx = if src.w != 0 { dst.w as f32 / src.w as f32 } else { 1.0 };
        let sy = if src.h != 0 { dst.h as f32 / src.h as f32 } else { 1.0 };
        match flip {
            Flip::None => {
                sprite.set_scale((sx, sy));
                sprite.set_position((screen.x as f32, screen.y as f32));
            }
            Flip::Horizontal => {
                sprite.set_scale((-sx, sy));
                sprite.set_position(((screen.x + dst.w) as f32, screen.y as f32));
            }
            Flip::Vertical => {
                sprite.set_scale((sx, -sy));
                sprite.set_position((screen.x as f32, (screen.y + dst.h) as f32));
            }
        }
        if angle != 0.0 {
            sprite.set_origin((center.x as f32, center.y as f32));
            sprite.set_rotation(angle as f32);
        }

        self.window.draw(&sprite);
    }

    fn set_draw_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.draw_color = Color::rgba(r, g, b, a);
    }

    fn clear(&mut self) {
        self.window.clear(self.draw_color);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let screen = self.camera.to_screen(rect);
        let mut shape = RectangleShape::new();
        shape.set_size((screen.w as f32, screen.h as f32));
        shape.set_position((screen.x as f32, screen.y as f32));
        shape.set_fill_color(self.draw_color);
        self.window.draw(&shape);
    }

    fn present(&mut self) {
        self.window.display();
    }

    fn set_world_bounds(&mut self, bounds: Rect) {
        self.camera.set_world_bounds(bounds);
    }

    fn camera_look_at(&mut self, x: i32, y: i32) {
        self.camera.look_at(x, y);
    }

    fn screen_width(&self) -> i32 {
        self.window.size().x as i32
    }

    fn screen_height(&self) -> i32 {
        self.window.size().y as i32
    }

    fn to_world(&self, x: i32, y: i32) -> Point {
        self.camera.to_world(Point::new(x, y))
    }

    fn to_screen(&self, x: i32, y: i32) -> Point {
        self.camera.to_screen_point(Point::new(x, y))
    }
}
