//! Lookup table of the bonnet motion envelope.
//!
//! The table maps the input crank offset to the bonnet opening angle and the
//! planar pose of the four joints, sampled every hundredth of a degree.
use crate::{point::dist3, trig::*, JointSet, Point};

/// Sweep resolution, steps per degree of input offset.
pub const STEPS_PER_DEGREE: u32 = 100;
/// Hard cap of the sweep.
pub const MAX_STEPS: u32 = 360 * STEPS_PER_DEGREE - 1;
/// Decimal digits kept in the bonnet angle.
pub const ANGLE_DECIMALS: i32 = 4;

/// Planar joint positions of a pose.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Points2d {
    /// Input pivot
    pub input: [f64; 2],
    /// Input-coupler joint
    pub input_coupler: [f64; 2],
    /// Coupler-output joint
    pub coupler_output: [f64; 2],
    /// Output pivot
    pub output: [f64; 2],
}

impl Points2d {
    /// Points in loop order.
    pub const fn to_array(&self) -> [[f64; 2]; 4] {
        [self.input, self.input_coupler, self.coupler_output, self.output]
    }
}

/// A sample of the motion envelope.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LookupEntry {
    /// Input crank offset from the reference pose (degrees)
    pub input_offset: f64,
    /// Bonnet opening angle (degrees)
    pub bonnet_angle: f64,
    /// Planar joint positions
    pub points2d: Points2d,
}

/// How the sweep of a table ended.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SweepEnd {
    /// Some coordinate is missing, only the degenerate entry exists
    Incomplete,
    /// The loop cannot be closed anymore
    Infeasible,
    /// The bonnet started to close again
    Reversed,
    /// The step cap was hit
    Exhausted,
}

impl std::fmt::Display for SweepEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Incomplete => write!(f, "incomplete joints"),
            Self::Infeasible => write!(f, "kinematic limit"),
            Self::Reversed => write!(f, "bonnet angle reversed"),
            Self::Exhausted => write!(f, "step cap reached"),
        }
    }
}

/// Layout of the mechanism along the x axis.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Direction {
    /// Input pivot is not left of the output pivot, sweep as it is
    #[default]
    Natural,
    /// Input pivot is left of the output pivot, mirrored across the input pivot
    Mirrored,
}

impl Direction {
    /// Detect from the x coordinates of the two pivots.
    pub fn detect(input_x: f64, output_x: f64) -> Self {
        if input_x < output_x {
            Self::Mirrored
        } else {
            Self::Natural
        }
    }

    /// Sign of the reported input offset.
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Natural => -1.,
            Self::Mirrored => 1.,
        }
    }
}

/// Link lengths of the mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LinkLengths {
    /// Fixed link, output pivot to input pivot
    pub fixed: f64,
    /// Input crank
    pub input: f64,
    /// Coupler link
    pub coupler: f64,
    /// Output crank
    pub output: f64,
}

impl LinkLengths {
    /// Measure from the spatial joint positions.
    pub fn measure([i, ic, co, o]: &[[f64; 3]; 4]) -> Self {
        Self {
            fixed: dist3(o, i),
            input: dist3(i, ic),
            coupler: dist3(ic, co),
            output: dist3(co, o),
        }
    }
}

/// Angle and offset extrema of a table.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Range {
    /// Minimum bonnet angle, always zero
    pub min_bonnet_angle: f64,
    /// Maximum bonnet angle
    pub max_bonnet_angle: f64,
    /// Minimum input offset
    pub min_offset: f64,
    /// Maximum input offset
    pub max_offset: f64,
}

/// Ordered samples of the motion envelope, in travel order.
///
/// The first entry is always the reference pose with zero offset and zero
/// angle, and the bonnet angle never decreases along the table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableData"))]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
    end: SweepEnd,
    direction: Direction,
    links: LinkLengths,
}

/// Unchecked fields of a deserialized table.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TableData {
    entries: Vec<LookupEntry>,
    end: SweepEnd,
    direction: Direction,
    links: LinkLengths,
}

/// Error of a table without any entry.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct EmptyTable;

impl std::fmt::Display for EmptyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "lookup table has no entry")
    }
}

impl std::error::Error for EmptyTable {}

#[cfg(feature = "serde")]
impl TryFrom<TableData> for LookupTable {
    type Error = EmptyTable;

    fn try_from(data: TableData) -> Result<Self, Self::Error> {
        let TableData { entries, end, direction, links } = data;
        let table = Self::from_entries(entries, end).ok_or(EmptyTable)?;
        Ok(Self { direction, links, ..table })
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl std::ops::Deref for LookupTable {
    type Target = [LookupEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl LookupTable {
    /// The single zero entry used for incomplete joints.
    pub fn degenerate() -> Self {
        Self {
            entries: vec![LookupEntry::default()],
            end: SweepEnd::Incomplete,
            direction: Direction::default(),
            links: LinkLengths::default(),
        }
    }

    /// Create a table from raw entries.
    ///
    /// Return `None` if the entries are empty.
    pub fn from_entries(entries: Vec<LookupEntry>, end: SweepEnd) -> Option<Self> {
        (!entries.is_empty()).then(|| Self {
            entries,
            end,
            direction: Direction::default(),
            links: LinkLengths::default(),
        })
    }

    /// How the sweep ended.
    pub fn end(&self) -> SweepEnd {
        self.end
    }

    /// Layout of the mechanism.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Link lengths of the mechanism.
    pub fn links(&self) -> &LinkLengths {
        &self.links
    }

    /// Return true if the table is the degenerate one.
    pub fn is_degenerate(&self) -> bool {
        self.end == SweepEnd::Incomplete
    }

    /// The last entry, where the travel ends.
    pub fn last_entry(&self) -> &LookupEntry {
        // Never empty by construction
        &self.entries[self.entries.len() - 1]
    }

    /// Angle and offset extrema.
    pub fn range(&self) -> Range {
        let last = self.last_entry();
        Range {
            min_bonnet_angle: 0.,
            max_bonnet_angle: last.bonnet_angle,
            min_offset: last.input_offset.min(0.),
            max_offset: last.input_offset.max(0.),
        }
    }

    /// The entry with the closest bonnet angle, the first one on a tie.
    pub fn nearest_by_bonnet_angle(&self, angle: f64) -> &LookupEntry {
        self.nearest_by(|e| e.bonnet_angle, angle)
    }

    /// The entry with the closest input offset, the first one on a tie.
    pub fn nearest_by_input_offset(&self, offset: f64) -> &LookupEntry {
        self.nearest_by(|e| e.input_offset, offset)
    }

    fn nearest_by(&self, key: impl Fn(&LookupEntry) -> f64, target: f64) -> &LookupEntry {
        let mut best = &self.entries[0];
        let mut best_d = (key(best) - target).abs();
        for e in &self.entries[1..] {
            let d = (key(e) - target).abs();
            if d < best_d {
                best = e;
                best_d = d;
            }
        }
        best
    }

    /// Iterate over all points of all entries.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.entries.iter().flat_map(|e| e.points2d.to_array())
    }

    /// Consume into the entries.
    pub fn into_entries(self) -> Vec<LookupEntry> {
        self.entries
    }
}

/// Round to the kept decimals of the bonnet angle.
fn round_angle(deg: f64) -> f64 {
    let scale = 10f64.powi(ANGLE_DECIMALS);
    (deg * scale).round() / scale
}

/// Reflect `p` across the plane `x = x0`.
fn mirror_x([x, y, z]: [f64; 3], x0: f64) -> [f64; 3] {
    [x - 2. * (x - x0), y, z]
}

/// Project onto the drawing plane, drop y and flip z.
fn project([x, _, z]: [f64; 3]) -> [f64; 2] {
    [x, -z]
}

/// Build the lookup table of a joint set.
///
/// The input crank is swept from the reference pose until the loop can no
/// longer be closed, the bonnet angle turns back, or the step cap is hit.
/// Missing coordinates yield the degenerate table.
pub fn build_table(joints: &JointSet) -> LookupTable {
    sweep(joints, MAX_STEPS)
}

fn sweep(joints: &JointSet, max_steps: u32) -> LookupTable {
    let Some([i, mut ic, mut co, mut o]) = joints.resolve() else {
        tracing::warn!("incomplete joint coordinates, use the degenerate table");
        return LookupTable::degenerate();
    };
    let direction = Direction::detect(i[0], o[0]);
    if direction == Direction::Mirrored {
        ic = mirror_x(ic, i[0]);
        co = mirror_x(co, i[0]);
        o = mirror_x(o, i[0]);
    }
    let links = LinkLengths::measure(&[i, ic, co, o]);
    let LinkLengths { fixed, input, coupler, output } = links;
    // Diagonals of the reference pose
    let o_ic = dist3(&o, &ic);
    let i_co = dist3(&i, &co);
    let input_angle = angle_from_3_sides(fixed, input, o_ic);
    let coupler_angle = angle_from_3_sides(coupler, input, i_co);
    let output_angle = angle_from_3_sides(output, fixed, i_co);
    let base = Points2d {
        input: project(i),
        input_coupler: project(ic),
        coupler_output: project(co),
        output: project(o),
    };
    let mut entries = vec![LookupEntry { input_offset: 0., bonnet_angle: 0., points2d: base }];
    let mut prev_angle = 0.;
    let mut end = SweepEnd::Exhausted;
    for step in 1..=max_steps {
        let step_deg = step as f64 / STEPS_PER_DEGREE as f64;
        // The normalized loop always turns the input crank clockwise
        let turn = -deg_to_rad(step_deg);
        let ans = solve_coupler_and_output_angle(fixed, input, coupler, output, input_angle + turn);
        if !ans.is_feasible() {
            end = SweepEnd::Infeasible;
            break;
        }
        let bonnet_angle = rad_to_deg(ans.input_coupler - coupler_angle + turn);
        if bonnet_angle < prev_angle {
            end = SweepEnd::Reversed;
            break;
        }
        prev_angle = bonnet_angle;
        let output_turn = output_angle - ans.output;
        entries.push(LookupEntry {
            input_offset: direction.sign() * step_deg,
            bonnet_angle: round_angle(bonnet_angle),
            points2d: Points2d {
                input_coupler: base.input_coupler.rotate_around(&base.input, turn),
                coupler_output: base.coupler_output.rotate_around(&base.output, output_turn),
                ..base
            },
        });
    }
    tracing::debug!(
        entries = entries.len(),
        ?direction,
        "sweep ended by {end}, max bonnet angle {prev_angle:.4} deg"
    );
    LookupTable { entries, end, direction, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table_of(angles: &[f64]) -> LookupTable {
        let entries = angles
            .iter()
            .enumerate()
            .map(|(i, &bonnet_angle)| LookupEntry {
                input_offset: -(i as f64),
                bonnet_angle,
                ..Default::default()
            })
            .collect();
        LookupTable::from_entries(entries, SweepEnd::Infeasible).unwrap()
    }

    #[test]
    fn nearest_match() {
        let table = table_of(&[0., 1.5, 3., 4.2]);
        assert_eq!(table.nearest_by_bonnet_angle(3.1).bonnet_angle, 3.);
        assert_eq!(table.nearest_by_bonnet_angle(2.25).bonnet_angle, 1.5);
        assert_eq!(table.nearest_by_bonnet_angle(-7.).bonnet_angle, 0.);
        assert_eq!(table.nearest_by_bonnet_angle(99.).bonnet_angle, 4.2);
        assert_eq!(table.nearest_by_input_offset(-2.4).bonnet_angle, 3.);
        assert_eq!(table.nearest_by_input_offset(-0.5).bonnet_angle, 0.);
    }

    #[test]
    fn range_includes_zero() {
        let range = table_of(&[0., 1.5, 3., 4.2]).range();
        assert_eq!(range.min_bonnet_angle, 0.);
        assert_eq!(range.max_bonnet_angle, 4.2);
        assert_eq!(range.min_offset, -3.);
        assert_eq!(range.max_offset, 0.);
        assert_eq!(LookupTable::degenerate().range(), Range::default());
        assert!(LookupTable::from_entries(Vec::new(), SweepEnd::Infeasible).is_none());
    }

    #[test]
    fn helpers() {
        assert_eq!(round_angle(12.345_678), 12.3457);
        assert_eq!(mirror_x([3., 1., 2.], 1.), [-1., 1., 2.]);
        assert_eq!(project([3., 1., 2.]), [3., -2.]);
        assert_eq!(Direction::detect(1., 2.), Direction::Mirrored);
        assert_eq!(Direction::detect(2., 2.), Direction::Natural);
        let links = LinkLengths::measure(&[[0.; 3], [3., 0., 4.], [3., 12., 4.], [0., 0., 0.]]);
        assert_abs_diff_eq!(links.input, 5.);
        assert_abs_diff_eq!(links.coupler, 12.);
        assert_abs_diff_eq!(links.output, 13.);
        assert_abs_diff_eq!(links.fixed, 0.);
    }

    #[test]
    fn step_cap_ends_sweep() {
        let js = JointSet::example();
        let table = sweep(&js, 100);
        assert_eq!(table.end(), SweepEnd::Exhausted);
        assert_eq!(table.len(), 101);
        assert_abs_diff_eq!(table.last_entry().input_offset, -1.);
        assert_eq!(table[..], build_table(&js)[..101]);
        assert_eq!(sweep(&js, 0).len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_empty_table() {
        let s = "(entries: [], end: Infeasible, direction: Natural, \
                 links: (fixed: 0.0, input: 0.0, coupler: 0.0, output: 0.0))";
        let err = ron::from_str::<LookupTable>(s).unwrap_err();
        assert!(err.to_string().contains("no entry"));
        let table = table_of(&[0., 1.5]);
        let s = ron::to_string(&table).unwrap();
        assert_eq!(ron::from_str::<LookupTable>(&s).unwrap(), table);
    }
}
