//! Controller gains
//!
//! A gain is a linear operator on the 2D error vector. In parameter files it
//! is written either as a single number, applied uniformly to both axes, or
//! as a 2x2 array of rows:
//!
//! ```toml
//! kp = 1.0
//! kd = [[10.0, 0.0], [0.0, 5.0]]
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A proportional or derivative gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "GainRepr", into = "GainRepr")]
pub enum Gain {
    /// Uniform scaling of both axes.
    Scalar(f64),

    /// Full 2x2 operator, applied as a matrix-vector product.
    Operator(Matrix2<f64>),
}

/// On-disk form of a gain, operators are stored row by row.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GainRepr {
    Scalar(f64),
    Rows([[f64; 2]; 2]),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Gain {
    /// Build an operator gain from its rows.
    pub fn from_rows(rows: [[f64; 2]; 2]) -> Self {
        Gain::Operator(Matrix2::new(
            rows[0][0], rows[0][1],
            rows[1][0], rows[1][1],
        ))
    }

    /// Apply the gain to a vector.
    pub fn apply(&self, v: &Vector2<f64>) -> Vector2<f64> {
        match self {
            Gain::Scalar(k) => v * *k,
            Gain::Operator(m) => m * v,
        }
    }
}

impl From<f64> for Gain {
    fn from(k: f64) -> Self {
        Gain::Scalar(k)
    }
}

impl From<Matrix2<f64>> for Gain {
    fn from(m: Matrix2<f64>) -> Self {
        Gain::Operator(m)
    }
}

impl From<GainRepr> for Gain {
    fn from(repr: GainRepr) -> Self {
        match repr {
            GainRepr::Scalar(k) => Gain::Scalar(k),
            GainRepr::Rows(rows) => Gain::from_rows(rows),
        }
    }
}

impl From<Gain> for GainRepr {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::Scalar(k) => GainRepr::Scalar(k),
            Gain::Operator(m) => GainRepr::Rows([[m[(0, 0)], m[(0, 1)]], [m[(1, 0)], m[(1, 1)]]]),
        }
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gain::Scalar(k) => write!(f, "{}", k),
            Gain::Operator(m) => write!(
                f,
                "[[{}, {}], [{}, {}]]",
                m[(0, 0)],
                m[(0, 1)],
                m[(1, 0)],
                m[(1, 1)]
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Gains {
        kp: Gain,
        kd: Gain,
    }

    #[test]
    fn test_apply_scalar() {
        let v = Gain::Scalar(2.0).apply(&Vector2::new(1.5, -3.0));

        assert_eq!(v, Vector2::new(3.0, -6.0));
    }

    #[test]
    fn test_apply_operator() {
        let g = Gain::from_rows([[1.0, 2.0], [3.0, 4.0]]);

        assert_eq!(g.apply(&Vector2::new(1.0, -1.0)), Vector2::new(-1.0, -1.0));
    }

    #[test]
    fn test_scalar_matches_scaled_identity() {
        let v = Vector2::new(0.37, -1.25);

        for &k in &[0.0, 1.0, 10.0, -0.5] {
            assert_eq!(
                Gain::Scalar(k).apply(&v),
                Gain::Operator(Matrix2::identity() * k).apply(&v)
            );
        }
    }

    #[test]
    fn test_deserialise_both_forms() {
        let gains: Gains = util::params::load_from_str(
            "kp = 1.0\nkd = [[10.0, 0.5], [0.0, 5.0]]\n",
        )
        .unwrap();

        assert_eq!(gains.kp, Gain::Scalar(1.0));
        assert_eq!(gains.kd, Gain::from_rows([[10.0, 0.5], [0.0, 5.0]]));
    }

    #[test]
    fn test_serialise_operator_as_rows() {
        let json = serde_json::to_string(&Gain::from_rows([[1.0, 2.0], [3.0, 4.0]])).unwrap();

        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
        assert_eq!(serde_json::to_string(&Gain::Scalar(10.0)).unwrap(), "10.0");
    }

    #[test]
    fn test_display() {
        assert_eq!(Gain::Scalar(1.5).to_string(), "1.5");
        assert_eq!(
            Gain::from_rows([[1.0, 0.0], [0.0, 2.0]]).to_string(),
            "[[1, 0], [0, 2]]"
        );
    }
}
