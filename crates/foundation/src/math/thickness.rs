/// Linear interpolation parameters mapping a direction's thickness value
/// range onto the configured line-weight range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThicknessOptions {
    /// The direction's minimum thickness value.
    pub min_value: f64,
    /// Configured weight units per thickness value unit.
    pub coefficient: f64,
}

impl ThicknessOptions {
    /// Returns `None` unless both configured bounds and both per-direction
    /// bounds are present, finite, and produce a finite coefficient.
    pub fn new(
        direction_min: Option<f64>,
        direction_max: Option<f64>,
        configured_min: Option<f64>,
        configured_max: Option<f64>,
    ) -> Option<Self> {
        let direction_min = direction_min?;
        let direction_max = direction_max?;
        let configured_min = configured_min?;
        let configured_max = configured_max?;
        if !direction_min.is_finite()
            || !direction_max.is_finite()
            || !configured_min.is_finite()
            || !configured_max.is_finite()
        {
            return None;
        }

        let coefficient = (configured_max - configured_min) / (direction_max - direction_min);
        if !coefficient.is_finite() {
            return None;
        }

        Some(Self {
            min_value: direction_min,
            coefficient,
        })
    }

    /// Interpolated weight for an in-range thickness value.
    pub fn thickness_for(&self, value: f64, configured_min: f64) -> f64 {
        configured_min + (value - self.min_value) * self.coefficient
    }
}

#[cfg(test)]
mod tests {
    use super::ThicknessOptions;

    #[test]
    fn missing_bounds_disable_interpolation() {
        assert!(ThicknessOptions::new(None, Some(10.0), Some(2.0), Some(8.0)).is_none());
        assert!(ThicknessOptions::new(Some(0.0), None, Some(2.0), Some(8.0)).is_none());
        assert!(ThicknessOptions::new(Some(0.0), Some(10.0), None, Some(8.0)).is_none());
        assert!(ThicknessOptions::new(Some(0.0), Some(10.0), Some(2.0), None).is_none());
    }

    #[test]
    fn equal_direction_bounds_disable_interpolation() {
        // Zero span makes the coefficient infinite.
        assert!(ThicknessOptions::new(Some(5.0), Some(5.0), Some(2.0), Some(8.0)).is_none());
    }

    #[test]
    fn non_finite_bounds_disable_interpolation() {
        assert!(ThicknessOptions::new(Some(f64::NAN), Some(10.0), Some(2.0), Some(8.0)).is_none());
        assert!(
            ThicknessOptions::new(Some(0.0), Some(f64::INFINITY), Some(2.0), Some(8.0)).is_none()
        );
    }

    #[test]
    fn interpolation_hits_configured_bounds_at_range_ends() {
        let options = ThicknessOptions::new(Some(100.0), Some(500.0), Some(2.0), Some(8.0))
            .expect("all bounds present");
        assert!(options.coefficient.is_finite());
        assert_eq!(options.thickness_for(100.0, 2.0), 2.0);
        assert_eq!(options.thickness_for(500.0, 2.0), 8.0);
        assert_eq!(options.thickness_for(300.0, 2.0), 5.0);
    }
}
