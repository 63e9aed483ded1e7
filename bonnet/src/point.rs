/// A point-like memory layout to achieve zero copy.
pub trait Point: Sized {
    /// Create a point.
    fn point(x: f64, y: f64) -> Self;
    /// X coordinate.
    fn x(&self) -> f64;
    /// Y coordinate.
    fn y(&self) -> f64;

    /// Rotate this point around `pivot` by angle `a` (counter-clockwise).
    fn rotate_around(&self, pivot: &Self, a: f64) -> Self {
        let (sin, cos) = a.sin_cos();
        let dx = self.x() - pivot.x();
        let dy = self.y() - pivot.y();
        Self::point(
            dx * cos - dy * sin + pivot.x(),
            dy * cos + dx * sin + pivot.y(),
        )
    }

    /// Planar distance to another point.
    fn dist(&self, rhs: &Self) -> f64 {
        (self.x() - rhs.x()).hypot(self.y() - rhs.y())
    }
}

impl Point for [f64; 2] {
    #[inline(always)]
    fn point(x: f64, y: f64) -> Self {
        [x, y]
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self[1]
    }
}

impl Point for (f64, f64) {
    #[inline(always)]
    fn point(x: f64, y: f64) -> Self {
        (x, y)
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self.0
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self.1
    }
}

/// Distance between two spatial points.
pub(crate) fn dist3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}
