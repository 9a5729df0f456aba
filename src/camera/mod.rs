use crate::geom::{Point, Rect};

/// World-to-screen transform. Holds only the current look-at offset
/// and the world bounds, never any entity state.
#[derive(Clone, Debug)]
pub struct Camera {
    screen_width: i32,
    screen_height: i32,
    offset: Point,
    world_bounds: Option<Rect>,
}

impl Camera {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        Self {
            screen_width,
            screen_height,
            offset: Point::default(),
            world_bounds: None,
        }
    }

    pub fn set_world_bounds(&mut self, bounds: Rect) {
        self.world_bounds = Some(bounds);
    }

    /// Center the viewport on a world point, clamped so it never shows
    /// outside the world. A world smaller than the viewport in one
    /// dimension is centered in that dimension instead of clamped.
    pub fn look_at(&mut self, x: i32, y: i32) {
        let mut offset = Point::new(x - self.screen_width / 2, y - self.screen_height / 2);

        if let Some(bounds) = self.world_bounds {
            offset.x = Self::clamp_axis(offset.x, bounds.x, bounds.w, self.screen_width);
            offset.y = Self::clamp_axis(offset.y, bounds.y, bounds.h, self.screen_height);
        }

        self.offset = offset;
    }

    fn clamp_axis(desired: i32, world_min: i32, world_len: i32, screen_len: i32) -> i32 {
        if world_len < screen_len {
            // World fits inside the viewport: center it.
            world_min + (world_len - screen_len) / 2
        } else {
            desired.clamp(world_min, world_min + world_len - screen_len)
        }
    }

    pub fn to_screen(&self, rect: Rect) -> Rect {
        Rect::new(rect.x - self.offset.x, rect.y - self.offset.y, rect.w, rect.h)
    }

    pub fn to_screen_point(&self, p: Point) -> Point {
        Point::new(p.x - self.offset.x, p.y - self.offset.y)
    }

    pub fn to_world(&self, p: Point) -> Point {
        Point::new(p.x + self.offset.x, p.y + self.offset.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_centers_the_target() {
        let mut camera = Camera::new(800, 600);
        camera.set_world_bounds(Rect::new(0, 0, 4000, 4000));
        camera.look_at(1000, 1000);
        assert_eq!(camera.to_screen_point(Point::new(1000, 1000)), Point::new(400, 300));
    }

    #[test]
    fn look_at_clamps_to_world_edges() {
        let mut camera = Camera::new(800, 600);
        camera.set_world_bounds(Rect::new(0, 0, 4000, 4000));

        camera.look_at(10, 10);
        assert_eq!(camera.to_screen_point(Point::new(0, 0)), Point::new(0, 0));

        camera.look_at(3990, 3990);
        assert_eq!(
            camera.to_screen_point(Point::new(4000, 4000)),
            Point::new(800, 600)
        );
    }

    #[test]
    fn small_world_is_centered_not_clamped() {
        let mut camera = Camera::new(800, 600);
        camera.set_world_bounds(Rect::new(0, 0, 400, 4000));
        camera.look_at(0, 2000);
        // 400px world in an 800px viewport: world center maps to screen center.
        assert_eq!(camera.to_screen_point(Point::new(200, 2000)).x, 400);
    }

    #[test]
    fn world_screen_round_trip_is_exact() {
        let mut camera = Camera::new(800, 600);
        camera.set_world_bounds(Rect::new(0, 0, 4000, 4000));
        camera.look_at(1234, 987);

        for p in [Point::new(0, 0), Point::new(-17, 43), Point::new(1234, 987)] {
            assert_eq!(camera.to_world(camera.to_screen_point(p)), p);
            assert_eq!(camera.to_screen_point(camera.to_world(p)), p);
        }
    }
}
