// Value-axis domains for cartesian charts

#[derive(Debug, Clone, Copy, PartialEq)]
struct MinMax {
    min: f64,
    max: f64,
}

impl Default for MinMax {
    fn default() -> Self {
        MinMax {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl MinMax {
    fn include(&mut self, v: f64) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Domain covering every value, padded by 5% on each free side.
///
/// With `include_zero` the domain always contains 0 and the side pinned at
/// 0 is not padded, so bars and areas start exactly on the axis.
pub fn value_domain<I>(values: I, include_zero: bool) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut mm = MinMax::default();
    for v in values {
        if v.is_finite() {
            mm.include(v);
        }
    }

    // Handle empty case
    if mm.is_empty() {
        return (0.0, 1.0);
    }

    if include_zero {
        mm.include(0.0);
    }

    pad_range(mm.min, mm.max, include_zero)
}

fn pad_range(min: f64, max: f64, pin_zero: bool) -> (f64, f64) {
    if min == max {
        return if pin_zero && min == 0.0 {
            (0.0, 1.0)
        } else {
            (min - 1.0, max + 1.0)
        };
    }

    let padding = (max - min) * 0.05;
    let lo = if pin_zero && min == 0.0 { 0.0 } else { min - padding };
    let hi = if pin_zero && max == 0.0 { 0.0 } else { max + padding };
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_with_zero_baseline() {
        let (lo, hi) = value_domain(vec![10.0, 100.0], true);
        assert_eq!(lo, 0.0);
        assert!(hi > 100.0);
    }

    #[test]
    fn test_domain_without_zero() {
        let (lo, hi) = value_domain(vec![62.0, 63.2], false);
        assert!(lo < 62.0 && lo > 61.0);
        assert!(hi > 63.2);
    }

    #[test]
    fn test_domain_negative_values() {
        let (lo, hi) = value_domain(vec![-20.0, -5.0], true);
        assert!(lo < -20.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn test_domain_single_point() {
        assert_eq!(value_domain(vec![5.0], false), (4.0, 6.0));
        assert_eq!(value_domain(vec![0.0], true), (0.0, 1.0));
    }

    #[test]
    fn test_domain_empty() {
        assert_eq!(value_domain(Vec::<f64>::new(), true), (0.0, 1.0));
    }

    #[test]
    fn test_domain_ignores_non_finite() {
        let (lo, hi) = value_domain(vec![f64::NAN, 4.0, f64::INFINITY, 8.0], true);
        assert_eq!(lo, 0.0);
        assert!(hi > 8.0 && hi < 9.0);
    }
}
