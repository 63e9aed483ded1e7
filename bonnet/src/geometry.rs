//! Drawing outputs: the linkage outline and the view box of the envelope.
use crate::{LookupEntry, LookupTable};
use std::fmt::Write as _;

/// Padding around the envelope, in joint units.
pub const VIEW_BOX_PADDING: f64 = 10.;

/// Closed outline of a pose, in the SVG path syntax.
///
/// Return an empty path if all joints share the same x coordinate.
pub fn path_for(entry: &LookupEntry) -> String {
    let pts = entry.points2d.to_array();
    let first = pts[0][0];
    if pts.iter().all(|[x, _]| *x == first) {
        return String::new();
    }
    let mut path = String::new();
    for (i, [x, y]) in pts.iter().chain(&pts[..1]).enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            path.push(' ');
        }
        // Writing into a string never fails
        let _ = write!(path, "{cmd} {x} {y}");
    }
    path
}

/// Bounding box of every pose in a table, padded.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ViewBox {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl ViewBox {
    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Self { min_x, min_y, width, height } = self;
        write!(f, "{min_x} {min_y} {width} {height}")
    }
}

/// View box covering every pose the mechanism passes through.
pub fn view_box_for(table: &LookupTable) -> ViewBox {
    let mut pts = table.points();
    // A table is never empty
    let [x, y] = pts.next().unwrap_or_default();
    let [x_min, x_max, y_min, y_max] =
        pts.fold([x, x, y, y], |[x_min, x_max, y_min, y_max], [x, y]| {
            [x_min.min(x), x_max.max(x), y_min.min(y), y_max.max(y)]
        });
    ViewBox {
        min_x: x_min - VIEW_BOX_PADDING,
        min_y: y_min - VIEW_BOX_PADDING,
        width: x_max - x_min + 2. * VIEW_BOX_PADDING,
        height: y_max - y_min + 2. * VIEW_BOX_PADDING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Points2d, SweepEnd};

    fn entry(points: [[f64; 2]; 4]) -> LookupEntry {
        let [input, input_coupler, coupler_output, output] = points;
        LookupEntry {
            points2d: Points2d { input, input_coupler, coupler_output, output },
            ..Default::default()
        }
    }

    #[test]
    fn closed_path() {
        let e = entry([[0., 0.], [1., -2.], [3.5, -2.], [4., 0.]]);
        assert_eq!(path_for(&e), "M 0 0 L 1 -2 L 3.5 -2 L 4 0 L 0 0");
    }

    #[test]
    fn collapsed_path_is_empty() {
        assert_eq!(path_for(&LookupEntry::default()), "");
        let e = entry([[2., 0.], [2., 1.], [2., 5.], [2., -3.]]);
        assert_eq!(path_for(&e), "");
    }

    #[test]
    fn view_box_spans_all_entries() {
        let table = LookupTable::from_entries(
            vec![
                entry([[0., 0.], [1., -2.], [3., -2.], [4., 0.]]),
                entry([[0., 0.], [-1., -1.], [3., -5.], [4., 0.]]),
            ],
            SweepEnd::Infeasible,
        )
        .unwrap();
        let vb = view_box_for(&table);
        assert_eq!(vb, ViewBox { min_x: -11., min_y: -15., width: 25., height: 25. });
        assert_eq!(vb.to_string(), "-11 -15 25 25");
        assert_eq!(vb.max_x(), 14.);
        assert_eq!(view_box_for(&LookupTable::degenerate()).to_string(), "-10 -10 20 20");
    }
}
