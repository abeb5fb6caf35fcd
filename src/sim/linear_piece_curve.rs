use std::cmp::Ordering;

use crate::error::{ConfigError, ConfigResult};

/// Maximum number of breakpoints a curve can hold
pub const MAX_CURVE_POINTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
struct LinearPiece {
    base_x: f32,
    base_y: f32,
    max_x: f32,
    max_y: f32,
    x_diff: f32,
    y_diff: f32,
}

impl LinearPiece {
    const ZERO: Self = Self {
        base_x: 0.0,
        base_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
        x_diff: 0.0,
        y_diff: 0.0,
    };
}

/// Sorted breakpoint table with linear interpolation in between and
/// constant extrapolation outside the first/last breakpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")
)]
pub struct LinearPieceCurve {
    curve: [LinearPiece; MAX_CURVE_POINTS],
    len: usize,
}

impl LinearPieceCurve {
    /// A mapping of `(x, y)` pairs that make up the continuous linear piecewise function.
    ///
    /// Breakpoints are expected to be sorted by `x`; use [`Self::try_new`] for unchecked data.
    #[must_use]
    pub const fn new(value_mappings: &[(f32, f32)]) -> Self {
        let n = value_mappings.len();
        assert!(n != 0 && n <= MAX_CURVE_POINTS);

        let mut curve = [LinearPiece::ZERO; MAX_CURVE_POINTS];
        curve[0].max_x = value_mappings[0].0;
        curve[0].max_y = value_mappings[0].1;

        let mut i = 1;
        while i < n {
            let prev = &value_mappings[i - 1];
            let this = &value_mappings[i];

            curve[i].base_x = prev.0;
            curve[i].base_y = prev.1;
            curve[i].max_x = this.0;
            curve[i].max_y = this.1;
            curve[i].x_diff = this.0 - prev.0;
            curve[i].y_diff = this.1 - prev.1;

            i += 1;
        }

        Self { curve, len: n }
    }

    pub fn try_new(value_mappings: &[(f32, f32)]) -> ConfigResult<Self> {
        if value_mappings.is_empty() || value_mappings.len() > MAX_CURVE_POINTS {
            return Err(ConfigError::CurveLength {
                count: value_mappings.len(),
                max: MAX_CURVE_POINTS,
            });
        }

        for (index, pair) in value_mappings.windows(2).enumerate() {
            if pair[1].0.partial_cmp(&pair[0].0) != Some(Ordering::Greater) {
                return Err(ConfigError::UnsortedCurve { index: index + 1 });
            }
        }

        Ok(Self::new(value_mappings))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `(x, y)` breakpoints this curve was built from
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.curve[..self.len]
            .iter()
            .map(|piece| (piece.max_x, piece.max_y))
    }

    /// Returns the output of the curve
    ///
    /// # Arguments
    ///
    /// * `input` - The input to the curve
    #[must_use]
    pub fn get_output(&self, input: f32) -> f32 {
        debug_assert!(self.len != 0);

        let pieces = &self.curve[..self.len];
        let first_val_pair = pieces[0];
        if input <= first_val_pair.max_x {
            return first_val_pair.max_y;
        }

        let Some(pair) = pieces.iter().skip(1).find(|pair| pair.max_x > input) else {
            return pieces[self.len - 1].max_y;
        };

        let interp_frac = (input - pair.base_x) / pair.x_diff;
        pair.y_diff * interp_frac + pair.base_y
    }
}

impl TryFrom<Vec<(f32, f32)>> for LinearPieceCurve {
    type Error = ConfigError;

    fn try_from(value_mappings: Vec<(f32, f32)>) -> ConfigResult<Self> {
        Self::try_new(&value_mappings)
    }
}

impl From<LinearPieceCurve> for Vec<(f32, f32)> {
    fn from(curve: LinearPieceCurve) -> Self {
        curve.points().collect()
    }
}
