//! Viridis colour ramp normalised over the mapped ratios.

/// Colour for regions whose ratio is undefined.
pub const MISSING_COLOR: (u8, u8, u8) = (200, 200, 200);

// Viridis sampled at 0, 0.25, 0.5, 0.75, 1
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ColorScale {
    /// Scale spanning the finite values; the unit interval if there are none.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().flatten().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_infinite() {
            return Self::default();
        }
        Self { min, max }
    }

    /// Position of `value` on the ramp, clamped to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: Option<f64>) -> (u8, u8, u8) {
        match value {
            Some(v) if v.is_finite() => Self::ramp(self.normalize(v)),
            _ => MISSING_COLOR,
        }
    }

    /// Colour at position `t` in [0, 1] of the ramp.
    pub fn ramp(t: f64) -> (u8, u8, u8) {
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (VIRIDIS.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
        let frac = scaled - idx as f64;

        let (r0, g0, b0) = VIRIDIS[idx];
        let (r1, g1, b1) = VIRIDIS[idx + 1];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_spans_finite_values() {
        let scale = ColorScale::from_values([Some(0.3), None, Some(f64::NAN), Some(0.6)]);
        assert_eq!(scale, ColorScale { min: 0.3, max: 0.6 });
        assert!((scale.normalize(0.45) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_scale_is_unit_interval() {
        assert_eq!(ColorScale::from_values([None, None]), ColorScale::default());
    }

    #[test]
    fn ramp_endpoints() {
        assert_eq!(ColorScale::ramp(0.0), VIRIDIS[0]);
        assert_eq!(ColorScale::ramp(1.0), VIRIDIS[4]);
        assert_eq!(ColorScale::ramp(0.5), VIRIDIS[2]);
        assert_eq!(ColorScale::ramp(7.0), VIRIDIS[4]);
    }

    #[test]
    fn single_value_maps_to_middle() {
        let scale = ColorScale::from_values([Some(0.4)]);
        assert_eq!(scale.color(Some(0.4)), VIRIDIS[2]);
    }

    #[test]
    fn undefined_ratio_is_grey() {
        let scale = ColorScale::default();
        assert_eq!(scale.color(None), MISSING_COLOR);
        assert_eq!(scale.color(Some(f64::NAN)), MISSING_COLOR);
    }
}
