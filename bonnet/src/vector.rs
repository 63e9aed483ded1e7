//! Vectors with missing-value propagation.
//!
//! A coordinate is [`Coord`], where `None` marks a value the host could not
//! supply as a number. Arithmetic on a missing component yields a missing
//! component, so an incomplete joint is detected by [`Vector::resolve`]
//! rather than by checking for NaN.

/// A coordinate which may be missing.
pub type Coord = Option<f64>;

/// A raw value supplied by the host before coercion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Raw<'a> {
    /// No value was given at all.
    Absent,
    /// An explicit null.
    Null,
    /// A number.
    Num(f64),
    /// A text field, usually from a form or a query parameter.
    Text(&'a str),
}

impl From<f64> for Raw<'_> {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl<'a> From<&'a str> for Raw<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for Raw<'a> {
    /// An unset field is null, not absent.
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Self::Null, Self::Text)
    }
}

/// Coerce a raw host value into a coordinate.
///
/// + Absent value is zero.
/// + Null, non-finite or non-numeric value is missing.
/// + Blank text is zero.
pub fn coerce(raw: Raw) -> Coord {
    match raw {
        Raw::Absent => Some(0.),
        Raw::Null => None,
        Raw::Num(v) => v.is_finite().then_some(v),
        Raw::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.)
            } else {
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }
}

/// Fixed-dimension vector of maybe-missing coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector<const N: usize>(
    #[cfg_attr(feature = "serde", serde(with = "coords"))] pub [Coord; N],
);

/// Planar vector.
pub type Vector2 = Vector<2>;
/// Spatial vector.
pub type Vector3 = Vector<3>;

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self([Some(0.); N])
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(v: [f64; N]) -> Self {
        Self(v.map(Some))
    }
}

impl<const N: usize> Vector<N> {
    /// Create a vector from raw host values.
    pub fn from_raw(raw: [Raw; N]) -> Self {
        Self(raw.map(coerce))
    }

    /// Component-wise addition.
    pub fn add(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Component-wise subtraction.
    pub fn subtract(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Euclidean length over all dimensions.
    pub fn length(&self) -> Coord {
        self.0
            .iter()
            .try_fold(0., |sum, c| c.map(|c| sum + c * c))
            .map(f64::sqrt)
    }

    /// Return the plain coordinates if no component is missing.
    pub fn resolve(&self) -> Option<[f64; N]> {
        let mut out = [0.; N];
        for (o, c) in out.iter_mut().zip(self.0) {
            *o = c?;
        }
        Some(out)
    }

    /// Return true if no component is missing.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = [None; N];
        for (o, (a, b)) in out.iter_mut().zip(self.0.iter().zip(rhs.0)) {
            *o = a.zip(b).map(|(a, b)| f(a, b));
        }
        Self(out)
    }
}

impl Vector2 {
    /// Create a planar vector.
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self([x, y])
    }
}

impl Vector3 {
    /// Create a spatial vector.
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self([x, y, z])
    }

    /// Z coordinate.
    pub const fn z(&self) -> Coord {
        self.0[2]
    }
}

macro_rules! impl_axis {
    ($($n:literal),+) => {$(
        impl Vector<$n> {
            /// X coordinate.
            pub const fn x(&self) -> Coord {
                self.0[0]
            }

            /// Y coordinate.
            pub const fn y(&self) -> Coord {
                self.0[1]
            }
        }
    )+};
}

impl_axis!(2, 3);

#[cfg(feature = "serde")]
mod coords {
    use super::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S, const N: usize>(v: &[Coord; N], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        v.as_slice().serialize(s)
    }

    pub(super) fn deserialize<'de, D, const N: usize>(d: D) -> Result<[Coord; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Vec::<Coord>::deserialize(d)?;
        let len = v.len();
        <[Coord; N]>::try_from(v)
            .map_err(|_| serde::de::Error::invalid_length(len, &"a fixed-size coordinate list"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce(Raw::Absent), Some(0.));
        assert_eq!(coerce(Raw::Null), None);
        assert_eq!(coerce(Raw::Num(f64::NAN)), None);
        assert_eq!(coerce(Raw::Num(f64::INFINITY)), None);
        assert_eq!(coerce(Raw::Text(" 1787 ")), Some(1787.));
        assert_eq!(coerce(Raw::Text("-2.5e1")), Some(-25.));
        assert_eq!(coerce(Raw::Text("")), Some(0.));
        assert_eq!(coerce(Raw::Text("bonnet")), None);
        assert_eq!(coerce(Raw::from(None::<&str>)), None);
    }

    #[test]
    fn missing_propagates() {
        let a = Vector3::new(Some(1.), None, Some(3.));
        let b = Vector3::from([1., 2., 3.]);
        let c = a.add(&b);
        assert_eq!(c.x(), Some(2.));
        assert_eq!(c.y(), None);
        assert_eq!(c.z(), Some(6.));
        assert_eq!(c.length(), None);
        assert_eq!(c.resolve(), None);
        assert!(!a.is_complete());
        assert!(b.is_complete());
    }

    #[test]
    fn length_uses_every_dimension() {
        let v = Vector3::from([2., 3., 6.]).subtract(&Vector3::default());
        assert_abs_diff_eq!(v.length().unwrap(), 7.);
        let v = Vector2::from([3., 4.]);
        assert_abs_diff_eq!(v.length().unwrap(), 5.);
        assert_eq!(Vector2::from_raw([Raw::Absent, Raw::Text("4")]).resolve(), Some([0., 4.]));
    }
}
