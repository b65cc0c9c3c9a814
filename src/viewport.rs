use crate::config::{EditorConfig, NODE_HEIGHT, NODE_WIDTH};
use crate::hit_test::{NodeGeometry, Rect};
use crate::path::{CubicBezier, Point};
use serde::{Deserialize, Serialize};

/// Size and placement of the canvas container.
///
/// Implemented by whatever owns the real canvas; [`FixedMetrics`] serves
/// headless use and tests.
pub trait ViewportMetrics {
    /// Visible canvas size in screen pixels.
    fn size(&self) -> (f32, f32);

    /// Top-left of the canvas in the coordinate space pointer events use.
    fn origin(&self) -> Point {
        Point::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedMetrics {
    pub width: f32,
    pub height: f32,
    pub origin: Point,
}

impl FixedMetrics {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height, origin: Point::new(0.0, 0.0) }
    }
}

impl ViewportMetrics for FixedMetrics {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn origin(&self) -> Point {
        self.origin
    }
}

/// Pan and zoom: `screen = world * scale + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

impl Viewport {
    /// Canvas-relative screen point to world coordinates.
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        let origin = self.world_to_screen(r.origin());
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }

    /// Map a world-space curve to screen space. The transform is affine, so
    /// mapping the control points maps the whole curve.
    pub fn curve_to_screen(&self, c: &CubicBezier) -> CubicBezier {
        CubicBezier {
            p0: self.world_to_screen(c.p0),
            p1: self.world_to_screen(c.p1),
            p2: self.world_to_screen(c.p2),
            p3: self.world_to_screen(c.p3),
        }
    }

    /// Page-level pointer position to world coordinates, going through the
    /// canvas origin reported by `metrics`.
    pub fn client_to_world(&self, p: Point, metrics: &dyn ViewportMetrics) -> Point {
        self.screen_to_world(p - metrics.origin())
    }

    /// Change the scale by `delta`, keeping the world point under `cursor`
    /// where it is on screen.
    pub fn zoom_at(&mut self, cursor: Point, delta: f32, config: &EditorConfig) {
        let new_scale = (self.scale + delta).clamp(config.min_zoom, config.max_zoom);
        let ratio = new_scale / self.scale;
        self.x = cursor.x - (cursor.x - self.x) * ratio;
        self.y = cursor.y - (cursor.y - self.y) * ratio;
        self.scale = new_scale;
    }

    /// One wheel notch at `cursor`. Scrolling down zooms out.
    pub fn wheel(&mut self, cursor: Point, delta_y: f32, config: &EditorConfig) {
        let delta = if delta_y > 0.0 { -config.zoom_step } else { config.zoom_step };
        self.zoom_at(cursor, delta, config);
    }

    /// Start a pan; the returned anchor goes to every [`pan_to`](Self::pan_to).
    pub fn begin_pan(&self, pointer: Point) -> Point {
        pointer - Point::new(self.x, self.y)
    }

    pub fn pan_to(&mut self, pointer: Point, anchor: Point) {
        let offset = pointer - anchor;
        self.x = offset.x;
        self.y = offset.y;
    }

    pub fn reset_zoom(&mut self) {
        *self = Self::default();
    }

    pub fn zoom_in(&mut self, config: &EditorConfig) {
        self.scale = round2((self.scale + config.zoom_step).min(config.max_zoom));
    }

    pub fn zoom_out(&mut self, config: &EditorConfig) {
        self.scale = round2((self.scale - config.zoom_step).max(config.min_zoom));
    }

    /// Frame every node, never zooming in past 100%. No nodes, no change.
    pub fn fit_to_screen<N, I>(&mut self, nodes: I, metrics: &dyn ViewportMetrics, config: &EditorConfig)
    where
        N: NodeGeometry,
        I: IntoIterator<Item = N>,
    {
        let Some(bounds) = nodes.into_iter().map(|n| n.rect()).reduce(|acc, r| acc.union(&r)) else {
            return;
        };
        let (width, height) = metrics.size();
        let content_w = bounds.width + config.fit_padding * 2.0;
        let content_h = bounds.height + config.fit_padding * 2.0;
        let scale = (width / content_w).min(height / content_h).min(1.0);
        let center = bounds.center();

        self.scale = scale;
        self.x = width / 2.0 - center.x * scale;
        self.y = height / 2.0 - center.y * scale;
    }

    /// Jump to a node at 100%.
    pub fn focus_node(&mut self, node: Point, metrics: &dyn ViewportMetrics) {
        let (width, height) = metrics.size();
        self.scale = 1.0;
        self.x = width / 2.0 - (node.x + NODE_WIDTH / 2.0);
        self.y = height / 2.0 - (node.y + NODE_HEIGHT / 2.0);
    }

    /// Center a group without changing the zoom.
    pub fn focus_group(&mut self, frame: Rect, metrics: &dyn ViewportMetrics) {
        let (width, height) = metrics.size();
        let center = frame.center();
        self.x = width / 2.0 - center.x * self.scale;
        self.y = height / 2.0 - center.y * self.scale;
    }

    /// World point currently in the middle of the canvas.
    pub fn visible_center(&self, metrics: &dyn ViewportMetrics) -> Point {
        let (width, height) = metrics.size();
        self.screen_to_world(Point::new(width / 2.0, height / 2.0))
    }

    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f32 = 0.001;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    struct Footprint(f32, f32);

    impl NodeGeometry for &Footprint {
        fn id(&self) -> &str {
            ""
        }
        fn rect(&self) -> Rect {
            Rect::new(self.0, self.1, NODE_WIDTH, NODE_HEIGHT)
        }
    }

    // ========================================================================
    // Coordinate conversion
    // ========================================================================

    #[test]
    fn test_screen_world_inverse() {
        let v = Viewport { x: 50.0, y: -30.0, scale: 1.5 };
        let world = Point::new(120.0, 80.0);
        let screen = v.world_to_screen(world);
        assert_eq!(screen, Point::new(230.0, 90.0));
        assert!(approx(v.screen_to_world(screen), world));
    }

    #[test]
    fn test_client_to_world_subtracts_origin() {
        let v = Viewport { x: 10.0, y: 10.0, scale: 2.0 };
        let metrics = FixedMetrics { width: 800.0, height: 600.0, origin: Point::new(100.0, 50.0) };
        assert_eq!(v.client_to_world(Point::new(130.0, 80.0), &metrics), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_curve_and_rect_to_screen() {
        let v = Viewport { x: 10.0, y: 20.0, scale: 2.0 };
        let r = v.rect_to_screen(Rect::new(5.0, 5.0, 160.0, 80.0));
        assert_eq!(r, Rect::new(20.0, 30.0, 320.0, 160.0));
        let c = CubicBezier {
            p0: Point::new(0.0, 0.0),
            p1: Point::new(1.0, 0.0),
            p2: Point::new(2.0, 0.0),
            p3: Point::new(3.0, 0.0),
        };
        let s = v.curve_to_screen(&c);
        assert_eq!(s.p0, Point::new(10.0, 20.0));
        assert_eq!(s.p3, Point::new(16.0, 20.0));
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    #[test]
    fn test_zoom_at_clamps() {
        let config = EditorConfig::default();
        let mut v = Viewport::default();
        v.zoom_at(Point::new(0.0, 0.0), 5.0, &config);
        assert_eq!(v.scale, 2.0);
        v.zoom_at(Point::new(0.0, 0.0), -5.0, &config);
        assert_eq!(v.scale, 0.25);
    }

    #[test]
    fn test_wheel_direction() {
        let config = EditorConfig::default();
        let mut v = Viewport::default();
        v.wheel(Point::new(100.0, 100.0), 120.0, &config);
        assert!((v.scale - 0.9).abs() < EPSILON);
        v.wheel(Point::new(100.0, 100.0), -120.0, &config);
        assert!((v.scale - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_in_steps_land_on_tenths() {
        let config = EditorConfig::default();
        let mut v = Viewport::default();
        for _ in 0..5 {
            v.zoom_in(&config);
        }
        assert_eq!(v.scale, 1.5);
        v.zoom_in(&config);
        assert_eq!(v.scale, 1.6);
        for _ in 0..20 {
            v.zoom_in(&config);
        }
        assert_eq!(v.scale, 2.0);
        for _ in 0..30 {
            v.zoom_out(&config);
        }
        assert_eq!(v.scale, 0.25);
    }

    proptest! {
        #[test]
        fn prop_zoom_keeps_cursor_point_fixed(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            scale in 0.5f32..1.5,
            cx in 0.0f32..1600.0,
            cy in 0.0f32..1200.0,
            zoom_in in any::<bool>(),
        ) {
            let config = EditorConfig::default();
            let mut v = Viewport { x, y, scale };
            let cursor = Point::new(cx, cy);
            let before = v.screen_to_world(cursor);
            v.zoom_at(cursor, if zoom_in { 0.1 } else { -0.1 }, &config);
            let after = v.screen_to_world(cursor);
            prop_assert!((before.x - after.x).abs() < 0.05, "{:?} vs {:?}", before, after);
            prop_assert!((before.y - after.y).abs() < 0.05, "{:?} vs {:?}", before, after);
        }
    }

    // ========================================================================
    // Pan
    // ========================================================================

    #[test]
    fn test_pan_has_no_drift() {
        let mut v = Viewport { x: 40.0, y: 20.0, scale: 1.0 };
        let anchor = v.begin_pan(Point::new(100.0, 100.0));
        for step in 1..=50 {
            v.pan_to(Point::new(100.0 + step as f32, 100.0 - step as f32), anchor);
        }
        assert_eq!((v.x, v.y), (90.0, -30.0));
    }

    // ========================================================================
    // Fit / focus
    // ========================================================================

    #[test]
    fn test_fit_to_screen_empty_is_noop() {
        let mut v = Viewport { x: 5.0, y: 5.0, scale: 1.3 };
        let none: Vec<&Footprint> = Vec::new();
        v.fit_to_screen(none, &FixedMetrics::new(800.0, 600.0), &EditorConfig::default());
        assert_eq!(v, Viewport { x: 5.0, y: 5.0, scale: 1.3 });
    }

    #[test]
    fn test_fit_to_screen_never_zooms_past_one() {
        let mut v = Viewport::default();
        let nodes = [Footprint(0.0, 0.0)];
        v.fit_to_screen(&nodes, &FixedMetrics::new(800.0, 600.0), &EditorConfig::default());
        assert_eq!(v.scale, 1.0);
        // bbox center (80, 40) lands on screen center
        assert_eq!((v.x, v.y), (320.0, 260.0));
    }

    #[test]
    fn test_fit_to_screen_shrinks_wide_content() {
        let mut v = Viewport::default();
        let nodes = [Footprint(0.0, 0.0), Footprint(1440.0, 0.0)];
        v.fit_to_screen(&nodes, &FixedMetrics::new(880.0, 600.0), &EditorConfig::default());
        // content width 1600 + 160 padding
        assert!((v.scale - 0.5).abs() < EPSILON);
        let center = v.world_to_screen(Point::new(800.0, 40.0));
        assert!(approx(center, Point::new(440.0, 300.0)));
    }

    #[test]
    fn test_focus_node_and_group() {
        let metrics = FixedMetrics::new(800.0, 600.0);
        let mut v = Viewport { x: 0.0, y: 0.0, scale: 0.5 };
        v.focus_group(Rect::new(100.0, 100.0, 300.0, 200.0), &metrics);
        assert_eq!(v.scale, 0.5);
        assert!(approx(v.visible_center(&metrics), Point::new(250.0, 200.0)));

        v.focus_node(Point::new(100.0, 100.0), &metrics);
        assert_eq!(v.scale, 1.0);
        assert!(approx(v.visible_center(&metrics), Point::new(180.0, 140.0)));
    }

    #[test]
    fn test_zoom_percent() {
        assert_eq!(Viewport { x: 0.0, y: 0.0, scale: 0.75 }.zoom_percent(), 75);
    }
}
