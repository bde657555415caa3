//! Guarded Ratios

/// Divide `numerator` by `denominator`, returning `None` when the result is undefined
///
/// A zero denominator, or any non-finite input or output, is undefined. The
/// caller decides how to surface it (tokbench renders `n/a`).
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Arithmetic mean of the defined values, or `None` if none are defined
pub fn mean_of_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_direction() {
        assert_eq!(ratio(10e-6, 5e-6), Some(2.0));
        let slower = ratio(4.1e-6, 175.4e-6).unwrap();
        assert!(slower < 1.0);
    }

    #[test]
    fn test_ratio_zero_denominator_is_undefined() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(1.0, -0.0), None);
    }

    #[test]
    fn test_ratio_non_finite() {
        assert_eq!(ratio(f64::NAN, 1.0), None);
        assert_eq!(ratio(1.0, f64::INFINITY), None);
        assert_eq!(ratio(f64::MAX, f64::MIN_POSITIVE), None);
    }

    #[test]
    fn test_negative_ratio_is_defined() {
        // Memory deltas can be negative after the allocator returns pages
        assert_eq!(ratio(-1.0, 0.5), Some(-2.0));
    }

    #[test]
    fn test_mean_of_defined_skips_none() {
        assert_eq!(mean_of_defined([Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean_of_defined([None, None]), None);
        assert_eq!(mean_of_defined(Vec::<Option<f64>>::new()), None);
    }
}
