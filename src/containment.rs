//! Keeping member nodes inside their group.
//!
//! A node may sit anywhere in a group's *interior*: below the title bar and
//! inset from the other three borders by the group margin, with the node's
//! whole footprint inside.

use crate::config::{EditorConfig, NODE_HEIGHT, NODE_WIDTH};
use crate::grid::snap_to_spacing;
use crate::hit_test::Rect;
use crate::path::Point;
use std::fmt;

/// Offset from a group's origin where a node dropped in from outside lands.
pub const ENTRY_OFFSET: Point = Point::new(20.0, 70.0);

/// Allowed range for a member node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interior {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Interior {
    /// Interior of `frame`. For frames smaller than one node plus margins
    /// the upper bound collapses onto the lower one.
    pub fn of(frame: Rect, config: &EditorConfig) -> Self {
        let min_x = frame.x + config.group_margin;
        let min_y = frame.y + config.group_header;
        let max_x = frame.right() - NODE_WIDTH - config.group_margin;
        let max_y = frame.bottom() - NODE_HEIGHT - config.group_margin;
        Self {
            min_x,
            max_x: max_x.max(min_x),
            min_y,
            max_y: max_y.max(min_y),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(self.min_x, self.max_x), p.y.clamp(self.min_y, self.max_y))
    }
}

/// Clamp a candidate node position into the group's interior.
pub fn clamp_into(frame: Rect, candidate: Point, config: &EditorConfig) -> Point {
    Interior::of(frame, config).clamp(candidate)
}

/// Where a node joining a group ends up.
///
/// A node already inside the interior stays put; anything else moves to the
/// group's entry point.
pub fn place_inside(frame: Rect, current: Point, config: &EditorConfig) -> Point {
    let interior = Interior::of(frame, config);
    if interior.contains(current) {
        current
    } else {
        interior.clamp(frame.origin() + ENTRY_OFFSET)
    }
}

/// One of the eight grab points on a group frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    /// Parse compass notation (`"n"`, `"se"`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "n" => ResizeHandle::North,
            "ne" => ResizeHandle::NorthEast,
            "e" => ResizeHandle::East,
            "se" => ResizeHandle::SouthEast,
            "s" => ResizeHandle::South,
            "sw" => ResizeHandle::SouthWest,
            "w" => ResizeHandle::West,
            "nw" => ResizeHandle::NorthWest,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::North => "n",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::East => "e",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::South => "s",
            ResizeHandle::SouthWest => "sw",
            ResizeHandle::West => "w",
            ResizeHandle::NorthWest => "nw",
        }
    }

    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Where this handle is drawn on `frame`.
    pub fn position(self, frame: Rect) -> Point {
        let x = if self.moves_west() {
            frame.x
        } else if self.moves_east() {
            frame.right()
        } else {
            frame.x + frame.width / 2.0
        };
        let y = if self.moves_north() {
            frame.y
        } else if self.moves_south() {
            frame.bottom()
        } else {
            frame.y + frame.height / 2.0
        };
        Point::new(x, y)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New frame for a resize drag.
///
/// `start` is the frame when the drag began and `delta` the pointer travel
/// since then, in world units. East and south edges grow freely down to the
/// minimum size; west and north edges move the origin, never past the point
/// where the frame would drop below the minimum. Each of x, y, width and
/// height is then snapped to the grid on its own.
pub fn resize_rect(start: Rect, handle: ResizeHandle, delta: Point, config: &EditorConfig) -> Rect {
    let min_w = config.min_group_width;
    let min_h = config.min_group_height;
    let mut r = start;

    if handle.moves_east() {
        r.width = min_w.max(start.width + delta.x);
    }
    if handle.moves_west() {
        let dx = delta.x.min(start.width - min_w);
        r.x = start.x + dx;
        r.width = start.width - dx;
    }
    if handle.moves_south() {
        r.height = min_h.max(start.height + delta.y);
    }
    if handle.moves_north() {
        let dy = delta.y.min(start.height - min_h);
        r.y = start.y + dy;
        r.height = start.height - dy;
    }

    let grid = config.grid_size;
    Rect::new(
        snap_to_spacing(r.x, grid),
        snap_to_spacing(r.y, grid),
        snap_to_spacing(r.width, grid).max(min_w),
        snap_to_spacing(r.height, grid).max(min_h),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EditorConfig {
        EditorConfig::default()
    }

    // ========================================================================
    // Interior / clamp_into()
    // ========================================================================

    #[test]
    fn test_interior_bounds() {
        let interior = Interior::of(Rect::new(100.0, 100.0, 300.0, 200.0), &cfg());
        assert_eq!(interior.min_x, 110.0);
        assert_eq!(interior.max_x, 230.0);
        assert_eq!(interior.min_y, 160.0);
        assert_eq!(interior.max_y, 210.0);
    }

    #[test]
    fn test_minimum_group_interior_is_a_single_point() {
        let interior = Interior::of(Rect::new(0.0, 0.0, 200.0, 150.0), &cfg());
        assert_eq!(interior.min_y, interior.max_y);
        assert!(interior.min_x < interior.max_x);
    }

    #[test]
    fn test_undersized_group_does_not_panic() {
        let frame = Rect::new(0.0, 0.0, 50.0, 40.0);
        let p = clamp_into(frame, Point::new(500.0, -500.0), &cfg());
        assert_eq!(p, Point::new(10.0, 60.0));
    }

    #[test]
    fn test_clamp_into_each_side() {
        let frame = Rect::new(100.0, 100.0, 300.0, 200.0);
        let c = cfg();
        assert_eq!(clamp_into(frame, Point::new(0.0, 0.0), &c), Point::new(110.0, 160.0));
        assert_eq!(clamp_into(frame, Point::new(900.0, 900.0), &c), Point::new(230.0, 210.0));
        assert_eq!(clamp_into(frame, Point::new(150.0, 180.0), &c), Point::new(150.0, 180.0));
    }

    // ========================================================================
    // place_inside()
    // ========================================================================

    #[test]
    fn test_place_inside_moves_outside_node_to_entry_point() {
        let frame = Rect::new(100.0, 100.0, 300.0, 200.0);
        assert_eq!(place_inside(frame, Point::new(0.0, 0.0), &cfg()), Point::new(120.0, 170.0));
    }

    #[test]
    fn test_place_inside_keeps_node_already_inside() {
        let frame = Rect::new(100.0, 100.0, 300.0, 200.0);
        assert_eq!(place_inside(frame, Point::new(200.0, 200.0), &cfg()), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_place_inside_minimum_group_clamps_entry_point() {
        let frame = Rect::new(0.0, 0.0, 200.0, 150.0);
        assert_eq!(place_inside(frame, Point::new(-400.0, 0.0), &cfg()), Point::new(20.0, 60.0));
    }

    // ========================================================================
    // ResizeHandle
    // ========================================================================

    #[test]
    fn test_handle_parse_roundtrip_names() {
        for handle in ResizeHandle::ALL {
            assert_eq!(ResizeHandle::parse(handle.as_str()), Some(handle));
        }
        assert_eq!(ResizeHandle::parse("x"), None);
    }

    #[test]
    fn test_handle_positions() {
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(ResizeHandle::NorthWest.position(frame), Point::new(0.0, 0.0));
        assert_eq!(ResizeHandle::East.position(frame), Point::new(200.0, 50.0));
        assert_eq!(ResizeHandle::South.position(frame), Point::new(100.0, 100.0));
    }

    // ========================================================================
    // resize_rect()
    // ========================================================================

    #[test]
    fn test_resize_east_grows_width() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let r = resize_rect(start, ResizeHandle::East, Point::new(47.0, 999.0), &cfg());
        assert_eq!(r, Rect::new(100.0, 100.0, 340.0, 200.0));
    }

    #[test]
    fn test_resize_east_floors_at_minimum() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let r = resize_rect(start, ResizeHandle::East, Point::new(-500.0, 0.0), &cfg());
        assert_eq!(r.width, 200.0);
    }

    #[test]
    fn test_resize_west_caps_delta() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let r = resize_rect(start, ResizeHandle::West, Point::new(250.0, 0.0), &cfg());
        assert_eq!(r, Rect::new(200.0, 100.0, 200.0, 200.0));
        let r = resize_rect(start, ResizeHandle::West, Point::new(-60.0, 0.0), &cfg());
        assert_eq!(r, Rect::new(40.0, 100.0, 360.0, 200.0));
    }

    #[test]
    fn test_resize_north_caps_delta() {
        let start = Rect::new(0.0, 0.0, 300.0, 200.0);
        let r = resize_rect(start, ResizeHandle::North, Point::new(0.0, 400.0), &cfg());
        // y and height snap independently: 50 -> 60, 150 -> 160
        assert_eq!(r, Rect::new(0.0, 60.0, 300.0, 160.0));
    }

    #[test]
    fn test_resize_corner_moves_both_axes() {
        let start = Rect::new(0.0, 0.0, 300.0, 200.0);
        let r = resize_rect(start, ResizeHandle::SouthEast, Point::new(20.0, 40.0), &cfg());
        assert_eq!(r, Rect::new(0.0, 0.0, 320.0, 240.0));
        let r = resize_rect(start, ResizeHandle::NorthWest, Point::new(-20.0, -40.0), &cfg());
        assert_eq!(r, Rect::new(-20.0, -40.0, 320.0, 240.0));
    }

    #[test]
    fn test_resize_floor_holds_for_any_delta() {
        let start = Rect::new(37.0, 11.0, 213.0, 151.0);
        for handle in ResizeHandle::ALL {
            for d in [-1000.0, -75.0, -3.0, 0.0, 9.0, 333.0, 5000.0] {
                let r = resize_rect(start, handle, Point::new(d, -d), &cfg());
                assert!(r.width >= 200.0, "{handle} {d}: width {}", r.width);
                assert!(r.height >= 150.0, "{handle} {d}: height {}", r.height);
            }
        }
    }
}
