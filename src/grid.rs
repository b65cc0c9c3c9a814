use crate::viewport::Viewport;
use std::fmt::Write;

/// Round to the nearest multiple of `spacing`; non-positive spacing is a no-op.
pub fn snap_to_spacing(value: f32, spacing: f32) -> f32 {
    if spacing <= 0.0 {
        return value;
    }
    (value / spacing).round() * spacing
}

/// How the background grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    #[default]
    Lines,
    /// A short tick at every grid intersection.
    Dots,
}

/// Generate SVG path commands for the canvas background grid
///
/// The grid follows the viewport: lines are spaced `spacing * scale` screen
/// pixels apart and shifted by the pan offset, wrapped so the pattern looks
/// infinite.
///
/// # Arguments
/// * `width`, `height` - Canvas size in pixels
/// * `viewport` - Current pan and zoom
/// * `spacing` - World grid spacing (normally [`GRID_SIZE`](crate::config::GRID_SIZE))
/// * `style` - Lines or dots
pub fn generate_grid_commands(
    width: f32,
    height: f32,
    viewport: &Viewport,
    spacing: f32,
    style: GridStyle,
) -> String {
    let step = spacing * viewport.scale;

    // Too dense to read; draw nothing
    if step < 4.0 {
        return String::new();
    }

    let offset_x = viewport.x.rem_euclid(step);
    let offset_y = viewport.y.rem_euclid(step);

    let mut xs = Vec::new();
    let mut x = offset_x;
    while x < width + step {
        xs.push(x);
        x += step;
    }
    let mut ys = Vec::new();
    let mut y = offset_y;
    while y < height + step {
        ys.push(y);
        y += step;
    }

    let mut commands = String::with_capacity(16 * (xs.len() + ys.len()));
    match style {
        GridStyle::Lines => {
            for x in &xs {
                push_sep(&mut commands);
                let _ = write!(commands, "M {x} 0 L {x} {height}");
            }
            for y in &ys {
                push_sep(&mut commands);
                let _ = write!(commands, "M 0 {y} L {width} {y}");
            }
        }
        GridStyle::Dots => {
            for y in &ys {
                for x in &xs {
                    push_sep(&mut commands);
                    let _ = write!(commands, "M {x} {y} h 1");
                }
            }
        }
    }
    commands
}

fn push_sep(commands: &mut String) {
    if !commands.is_empty() {
        commands.push(' ');
    }
}
