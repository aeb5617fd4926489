use nalgebra::Point2;
use serde::Serialize;

/// Color tag of a light blob, decided by the dominant channel sum over the
/// region's bounding box in the original frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LightColor {
    Red,
    Blue,
}

/// Color class decoded by the neural detector (4-way head).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ArmorColor {
    Blue,
    Red,
    Green,
    Purple,
}

impl ArmorColor {
    /// Short tag as used in exported labels.
    pub fn tag(self) -> &'static str {
        match self {
            ArmorColor::Blue => "B",
            ArmorColor::Red => "R",
            ArmorColor::Green => "G",
            ArmorColor::Purple => "P",
        }
    }
}

/// Size classification outcome of a light pair. `None` rejects the pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ArmorSizeVariant {
    #[default]
    None,
    Small,
    Large,
}

/// A bright elongated blob extracted from the binarized frame.
///
/// Endpoints lie on the principal axis of the connected region; `tilt_deg`
/// is measured from vertical, so an upright light has tilt 0.
#[derive(Clone, Debug, Serialize)]
pub struct Light {
    pub top: Point2<f32>,
    pub bottom: Point2<f32>,
    pub center: Point2<f32>,
    /// Extent along the principal axis, pixels.
    pub length: f32,
    /// Minor extent divided by `length`.
    pub width_ratio: f32,
    /// Tilt from vertical, degrees, always >= 0.
    pub tilt_deg: f32,
    pub color: LightColor,
}

/// A detected armor target.
///
/// Corners are in original-image pixel coordinates, ordered
/// top-left → bottom-left → bottom-right → top-right, and describe a simple
/// (non-self-intersecting) quadrilateral.
#[derive(Clone, Debug, Serialize)]
pub struct Armor {
    /// Pattern/number class. Empty when no classifier assigned one.
    pub label: String,
    /// Color class when the backend provides one.
    pub color: Option<ArmorColor>,
    /// Detection confidence in [0, 1]; `None` for the classical path.
    pub score: Option<f32>,
    pub corners: [Point2<f32>; 4],
}

impl Armor {
    /// Axis-aligned bounding rectangle of the four corners as
    /// `(xmin, ymin, xmax, ymax)`.
    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        let mut xmin = self.corners[0].x;
        let mut xmax = xmin;
        let mut ymin = self.corners[0].y;
        let mut ymax = ymin;
        for p in &self.corners[1..] {
            xmin = xmin.min(p.x);
            xmax = xmax.max(p.x);
            ymin = ymin.min(p.y);
            ymax = ymax.max(p.y);
        }
        (xmin, ymin, xmax, ymax)
    }

    /// Center of mass of the four corners.
    pub fn center(&self) -> Point2<f32> {
        let mut x = 0.0;
        let mut y = 0.0;
        for p in &self.corners {
            x += p.x;
            y += p.y;
        }
        Point2::new(x * 0.25, y * 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_armor() -> Armor {
        Armor {
            label: String::new(),
            color: None,
            score: None,
            corners: [
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 2.0),
                Point2::new(4.0, 2.0),
                Point2::new(4.0, 0.0),
            ],
        }
    }

    #[test]
    fn bounding_rect_spans_corners() {
        let (x0, y0, x1, y1) = unit_armor().bounding_rect();
        assert_eq!((x0, y0, x1, y1), (0.0, 0.0, 4.0, 2.0));
    }

    #[test]
    fn center_is_corner_mean() {
        let c = unit_armor().center();
        assert!((c.x - 2.0).abs() < 1e-6 && (c.y - 1.0).abs() < 1e-6);
    }
}
