//! Debug overlay drawing for the classical path.
//!
//! The annotation collaborator may request a draw-over copy of the input
//! frame with lights and matched armors painted in. Only simple line
//! primitives are needed, so this avoids pulling a rasterizer dependency.

use crate::image::Frame;
use crate::types::{Armor, Light, LightColor};
use nalgebra::Point2;

const LIGHT_RED: [u8; 3] = [255, 64, 64];
const LIGHT_BLUE: [u8; 3] = [64, 128, 255];
const ARMOR_GREEN: [u8; 3] = [0, 255, 0];

/// Paint a line segment between two points with Bresenham stepping.
pub fn draw_line(frame: &mut Frame, a: Point2<f32>, b: Point2<f32>, rgb: [u8; 3]) {
    if frame.is_empty() {
        return;
    }
    let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as usize) < frame.w && (y0 as usize) < frame.h {
            frame.set(x0 as usize, y0 as usize, rgb);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Paint a light as a segment from top to bottom endpoint, colored by its
/// channel tag.
pub fn draw_light(frame: &mut Frame, light: &Light) {
    let rgb = match light.color {
        LightColor::Red => LIGHT_RED,
        LightColor::Blue => LIGHT_BLUE,
    };
    draw_line(frame, light.top, light.bottom, rgb);
}

/// Paint an armor as a closed quad over its four corners.
pub fn draw_armor(frame: &mut Frame, armor: &Armor) {
    for i in 0..4 {
        draw_line(frame, armor.corners[i], armor.corners[(i + 1) % 4], ARMOR_GREEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_paints_endpoints() {
        let mut f = Frame::from_gray8(8, 8, vec![0; 64]).unwrap();
        draw_line(
            &mut f,
            Point2::new(1.0, 1.0),
            Point2::new(6.0, 6.0),
            [9, 9, 9],
        );
        assert_eq!(f.get(1, 1), [9, 9, 9]);
        assert_eq!(f.get(6, 6), [9, 9, 9]);
    }

    #[test]
    fn out_of_bounds_lines_are_clipped() {
        let mut f = Frame::from_gray8(4, 4, vec![0; 16]).unwrap();
        draw_line(
            &mut f,
            Point2::new(-5.0, 2.0),
            Point2::new(10.0, 2.0),
            [1, 1, 1],
        );
        assert_eq!(f.get(0, 2), [1, 1, 1]);
        assert_eq!(f.get(3, 2), [1, 1, 1]);
    }
}
