// Mean / standard deviation helpers shared by the stability tracker.
// Standard deviation is the population form (divide by N).

/// Mean and population standard deviation of one metric over a window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();
        let mean = mean(values.clone());
        Self {
            mean,
            std_dev: std_dev(values, mean),
        }
    }

    /// `std_dev / mean`, or infinity when the mean is not positive.
    pub fn relative_std_dev(&self) -> f64 {
        if self.mean <= 0.0 {
            return f64::INFINITY;
        }
        self.std_dev / self.mean
    }
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (count, sum) = values
        .into_iter()
        .fold((0usize, 0.0_f64), |(count, sum), v| (count + 1, sum + v));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

pub fn std_dev(values: impl IntoIterator<Item = f64>, mean: f64) -> f64 {
    let (count, squares) = values
        .into_iter()
        .fold((0usize, 0.0_f64), |(count, squares), v| {
            (count + 1, squares + (v - mean).powi(2))
        });
    if count == 0 {
        return 0.0;
    }
    (squares / count as f64).sqrt()
}

/// Mean of `|v[i] - v[i-1]|` over consecutive values; 0 for fewer than two.
pub fn mean_abs_delta(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut values = values.into_iter();
    let Some(mut previous) = values.next() else {
        return 0.0;
    };
    let mut count = 0usize;
    let mut total = 0.0_f64;
    for value in values {
        total += (value - previous).abs();
        previous = value;
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
        assert_eq!(std_dev(Vec::<f64>::new(), 0.0), 0.0);
        assert_eq!(MetricStats::from_values(Vec::<f64>::new()), MetricStats::default());
    }

    #[test]
    fn population_std_dev() {
        let stats = MetricStats::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn relative_std_dev_guards_zero_mean() {
        let stats = MetricStats {
            mean: 0.0,
            std_dev: 0.0,
        };
        assert!(stats.relative_std_dev().is_infinite());
        let stats = MetricStats {
            mean: 200.0,
            std_dev: 10.0,
        };
        assert_eq!(stats.relative_std_dev(), 0.05);
    }

    #[test]
    fn mean_abs_delta_follows_order() {
        assert_eq!(mean_abs_delta([5.0]), 0.0);
        assert_eq!(mean_abs_delta([1.0, 3.0, 2.0, 2.0]), 1.0);
        // An oscillation around a fixed mean still shows up as jitter.
        assert_eq!(mean_abs_delta([10.0, 14.0, 10.0, 14.0, 10.0]), 4.0);
    }
}
