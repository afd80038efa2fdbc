//! Jet colour map
//! Blue → cyan → yellow → red, matching matplotlib's "jet".

/// Colour for `t` in [0, 1]. Values outside are clamped.
pub fn jet(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let channel = |offset: f64| {
        let v = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Linear mapping of a value range onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        (min <= max).then_some(Self { min, max })
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> [u8; 3] {
        jet(self.normalize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_are_dark_blue_and_dark_red() {
        assert_eq!(jet(0.0), [0, 0, 128]);
        assert_eq!(jet(1.0), [128, 0, 0]);
    }

    #[test]
    fn midpoint_is_greenish() {
        let [r, g, b] = jet(0.5);
        assert_eq!(g, 255);
        assert_eq!(r, b);
    }

    #[test]
    fn scale_clamps_and_handles_flat_ranges() {
        let scale = ColorScale::from_values([100.0, 300.0]).unwrap();
        assert_eq!(scale.normalize(200.0), 0.5);
        assert_eq!(scale.normalize(1000.0), 1.0);

        let flat = ColorScale::from_values([5.0, 5.0]).unwrap();
        assert_eq!(flat.normalize(5.0), 0.5);
        assert!(ColorScale::from_values(Vec::<f64>::new()).is_none());
    }
}
