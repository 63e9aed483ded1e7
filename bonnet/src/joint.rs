//! Joint positions of the bonnet linkage.
use crate::vector::{Raw, Vector3};

/// Short keys of the twelve coordinates, in joint order.
pub const PARAM_KEYS: [&str; 12] = [
    "ix", "iy", "iz", "icx", "icy", "icz", "cox", "coy", "coz", "ox", "oy", "oz",
];

/// Joints of the linkage.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Joint {
    /// Fixed pivot of the input crank
    Input,
    /// Joint between the input crank and the coupler
    InputCoupler,
    /// Joint between the coupler and the output crank
    CouplerOutput,
    /// Fixed pivot of the output crank
    Output,
}

impl Joint {
    /// All joints in loop order.
    pub const LIST: [Self; 4] = [
        Self::Input,
        Self::InputCoupler,
        Self::CouplerOutput,
        Self::Output,
    ];

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::InputCoupler => "Input-Coupler",
            Self::CouplerOutput => "Coupler-Output",
            Self::Output => "Output",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The four joint positions in space.
///
/// Valid only if all twelve coordinates are present.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct JointSet {
    /// Joint positions in loop order.
    pub joints: [Vector3; 4],
}

impl JointSet {
    /// Create from four joint positions.
    pub const fn new(joints: [Vector3; 4]) -> Self {
        Self { joints }
    }

    /// Create from twelve raw host values, ordered as [`PARAM_KEYS`].
    pub fn from_raw(raw: [Raw; 12]) -> Self {
        let c = |i: usize| Vector3::from_raw([raw[i], raw[i + 1], raw[i + 2]]);
        Self::new([c(0), c(3), c(6), c(9)])
    }

    /// Create from the string-keyed parameters.
    pub fn from_params(params: &JointParams) -> Self {
        Self::from_raw(params.values().map(|v| Raw::from(v.as_deref())))
    }

    /// The documented placeholder mechanism.
    pub fn example() -> Self {
        Self::new([
            Vector3::from([1787., 0., 1916.]),
            Vector3::from([1910., 0., 2006.]),
            Vector3::from([1830., 0., 2006.]),
            Vector3::from([1690., 0., 1953.]),
        ])
    }

    /// Get a joint position.
    pub fn get(&self, joint: Joint) -> &Vector3 {
        &self.joints[joint.index()]
    }

    /// Get a joint position mutably.
    pub fn get_mut(&mut self, joint: Joint) -> &mut Vector3 {
        &mut self.joints[joint.index()]
    }

    /// Return the plain positions if no coordinate is missing.
    pub fn resolve(&self) -> Option<[[f64; 3]; 4]> {
        let [a, b, c, d] = &self.joints;
        Some([a.resolve()?, b.resolve()?, c.resolve()?, d.resolve()?])
    }

    /// Return true if no coordinate is missing.
    pub fn is_valid(&self) -> bool {
        self.joints.iter().all(Vector3::is_complete)
    }
}

/// String-keyed coordinates, as a host form or query string carries them.
///
/// An unset key is null, so the joint set is invalid until every key is set.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct JointParams {
    pub ix: Option<String>,
    pub iy: Option<String>,
    pub iz: Option<String>,
    pub icx: Option<String>,
    pub icy: Option<String>,
    pub icz: Option<String>,
    pub cox: Option<String>,
    pub coy: Option<String>,
    pub coz: Option<String>,
    pub ox: Option<String>,
    pub oy: Option<String>,
    pub oz: Option<String>,
}

impl JointParams {
    /// Values in the order of [`PARAM_KEYS`].
    pub fn values(&self) -> [&Option<String>; 12] {
        [
            &self.ix, &self.iy, &self.iz, &self.icx, &self.icy, &self.icz, &self.cox, &self.coy,
            &self.coz, &self.ox, &self.oy, &self.oz,
        ]
    }

    fn values_mut(&mut self) -> [&mut Option<String>; 12] {
        [
            &mut self.ix,
            &mut self.iy,
            &mut self.iz,
            &mut self.icx,
            &mut self.icy,
            &mut self.icz,
            &mut self.cox,
            &mut self.coy,
            &mut self.coz,
            &mut self.ox,
            &mut self.oy,
            &mut self.oz,
        ]
    }

    /// Look up a value by its short key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let i = PARAM_KEYS.iter().position(|k| *k == key)?;
        self.values()[i].as_deref()
    }

    /// Set a value by its short key, return false if the key is unknown.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match PARAM_KEYS.iter().position(|k| *k == key) {
            Some(i) => {
                *self.values_mut()[i] = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Overwrite the values which are set in `rhs`.
    pub fn merge(&mut self, rhs: Self) {
        let rhs = [
            rhs.ix, rhs.iy, rhs.iz, rhs.icx, rhs.icy, rhs.icz, rhs.cox, rhs.coy, rhs.coz, rhs.ox,
            rhs.oy, rhs.oz,
        ];
        for (v, rhs) in self.values_mut().into_iter().zip(rhs) {
            if rhs.is_some() {
                *v = rhs;
            }
        }
    }

    /// Return true if no value is set.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|v| v.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_in_key_order() {
        let mut params = JointParams::default();
        for (i, key) in PARAM_KEYS.iter().enumerate() {
            assert!(params.set(key, i.to_string()));
        }
        assert!(!params.set("qq", "1"));
        assert_eq!(params.get("coy"), Some("7"));
        let js = JointSet::from_params(&params);
        assert_eq!(js.get(Joint::CouplerOutput).resolve(), Some([6., 7., 8.]));
        assert_eq!(js.get(Joint::Output).resolve(), Some([9., 10., 11.]));
        assert!(js.is_valid());
    }

    #[test]
    fn unset_param_is_missing() {
        let mut params = JointParams::default();
        for key in PARAM_KEYS.iter().skip(1) {
            params.set(key, "1");
        }
        let js = JointSet::from_params(&params);
        assert!(!js.is_valid());
        assert_eq!(js.resolve(), None);
        assert!(js.get(Joint::InputCoupler).is_complete());
    }

    #[test]
    fn merge_keeps_unset() {
        let mut base = JointParams::default();
        base.set("ix", "1");
        base.set("oz", "2");
        let mut rhs = JointParams::default();
        rhs.set("oz", "3");
        base.merge(rhs);
        assert_eq!(base.get("ix"), Some("1"));
        assert_eq!(base.get("oz"), Some("3"));
        assert!(!base.is_empty());
    }
}
