use crate::hit_test::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in world or screen space (the type does not say which).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Attachment side of an edge endpoint.
///
/// Persisted as a lowercase string. Anything unrecognised reads back as
/// [`Anchor::Center`], which has no outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Anchor {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
    Center,
}

impl Anchor {
    /// The four anchors a user can grab, in handle order.
    pub const HANDLES: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    pub fn parse(s: &str) -> Self {
        match s {
            "top" => Anchor::Top,
            "right" => Anchor::Right,
            "bottom" => Anchor::Bottom,
            "left" => Anchor::Left,
            _ => Anchor::Center,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Right => "right",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Center => "center",
        }
    }

    /// Unit vector pointing away from the shape on this side.
    pub fn normal(self) -> Point {
        match self {
            Anchor::Top => Point::new(0.0, -1.0),
            Anchor::Right => Point::new(1.0, 0.0),
            Anchor::Bottom => Point::new(0.0, 1.0),
            Anchor::Left => Point::new(-1.0, 0.0),
            Anchor::Center => Point::new(0.0, 0.0),
        }
    }
}

impl From<String> for Anchor {
    fn from(s: String) -> Self {
        Anchor::parse(&s)
    }
}

impl From<Anchor> for String {
    fn from(anchor: Anchor) -> Self {
        anchor.as_str().to_string()
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchor position on a node's footprint.
///
/// Unrecognised anchors resolve to the centre of the node.
pub fn anchor_position(rect: Rect, anchor: Anchor) -> Point {
    match anchor {
        Anchor::Center => rect.center(),
        side => side_midpoint(rect, side),
    }
}

/// Anchor position on a group's frame.
///
/// Groups fall back to the middle of the bottom edge rather than the centre,
/// so a stray anchor never lands inside the group's member area.
pub fn group_anchor_position(rect: Rect, anchor: Anchor) -> Point {
    match anchor {
        Anchor::Center => side_midpoint(rect, Anchor::Bottom),
        side => side_midpoint(rect, side),
    }
}

fn side_midpoint(rect: Rect, side: Anchor) -> Point {
    let Rect { x, y, width: w, height: h } = rect;
    match side {
        Anchor::Top => Point::new(x + w / 2.0, y),
        Anchor::Right => Point::new(x + w, y + h / 2.0),
        Anchor::Left => Point::new(x, y + h / 2.0),
        Anchor::Bottom | Anchor::Center => Point::new(x + w / 2.0, y + h),
    }
}

/// Cubic bezier curve used for edge routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Build the routing curve between two anchored endpoints.
    ///
    /// Each control point sits `offset` units out from its endpoint along the
    /// anchor's normal, so edges leave and enter shapes perpendicular to the
    /// side they attach to.
    ///
    /// # Arguments
    /// * `start`, `end` - Endpoint positions
    /// * `start_anchor`, `end_anchor` - Sides the endpoints are attached to
    /// * `offset` - Control point distance (default: 80.0)
    pub fn from_anchors(
        start: Point,
        end: Point,
        start_anchor: Anchor,
        end_anchor: Anchor,
        offset: f32,
    ) -> Self {
        let n1 = start_anchor.normal();
        let n2 = end_anchor.normal();
        CubicBezier {
            p0: start,
            p1: Point::new(start.x + n1.x * offset, start.y + n1.y * offset),
            p2: Point::new(end.x + n2.x * offset, end.y + n2.y * offset),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        Point::new(x, y)
    }

    /// SVG path commands for this curve.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Generate SVG path command for an edge between two anchored points
///
/// # Returns
/// SVG path command string (e.g., "M 160 40 C 240 40 220 40 300 40")
pub fn bezier_path(
    start: Point,
    end: Point,
    start_anchor: Anchor,
    end_anchor: Anchor,
    offset: f32,
) -> String {
    CubicBezier::from_anchors(start, end, start_anchor, end_anchor, offset).to_svg()
}

/// Point halfway along the edge curve (t = 0.5), where the label goes.
pub fn bezier_midpoint(
    start: Point,
    end: Point,
    start_anchor: Anchor,
    end_anchor: Anchor,
    offset: f32,
) -> Point {
    CubicBezier::from_anchors(start, end, start_anchor, end_anchor, offset).eval(0.5)
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);

    let dx = point.x - (a.x + t * ab.x);
    let dy = point.y - (a.y + t * ab.y);
    dx * dx + dy * dy
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against the
/// resulting polyline.
///
/// # Arguments
/// * `point` - The point to measure distance from
/// * `bezier` - The bezier curve
/// * `num_samples` - Number of samples for distance calculation (default: 20)
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
