// THEORY:
// Shadows are darker than the surface they fall on, but "darker" depends on the
// room. A fixed cutoff that works under a desk lamp fails in daylight. The
// histogram lets us pick the cutoff per frame with Otsu's method: choose the gray
// level that splits the pixels into two classes with the largest between-class
// variance.
//
// Classes are `gray < t` (background class B, the dark side) and `gray >= t`
// (foreground class F). Candidates where either class is empty are skipped.
// When several candidates tie, the lowest one wins.

pub const BINS: usize = 256;

/// A 256-bin histogram of 8-bit gray levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; BINS],
    total: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            bins: [0; BINS],
            total: 0,
        }
    }

    pub fn from_gray(values: &[u8]) -> Self {
        let mut histogram = Self::new();
        for &value in values {
            histogram.add(value);
        }
        histogram
    }

    pub fn add(&mut self, value: u8) {
        self.bins[value as usize] += 1;
        self.total += 1;
    }

    pub fn bins(&self) -> &[u64; BINS] {
        &self.bins
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// The Otsu threshold `t` maximizing `wB * wF * (meanB - meanF)^2`.
    ///
    /// Returns 0 when no candidate splits the histogram into two non-empty
    /// classes (an empty or single-level histogram).
    pub fn otsu_threshold(&self) -> u8 {
        let weighted_total: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(level, &count)| level as f64 * count as f64)
            .sum();
        let total = self.total as f64;

        let mut weight_background = 0.0_f64;
        let mut sum_background = 0.0_f64;
        let mut best_variance = 0.0_f64;
        let mut best_threshold = 0u8;

        for threshold in 1..BINS {
            let level = threshold - 1;
            weight_background += self.bins[level] as f64;
            sum_background += level as f64 * self.bins[level] as f64;

            let weight_foreground = total - weight_background;
            if weight_background == 0.0 || weight_foreground == 0.0 {
                continue;
            }

            let mean_background = sum_background / weight_background;
            let mean_foreground = (weighted_total - sum_background) / weight_foreground;
            let between = weight_background
                * weight_foreground
                * (mean_background - mean_foreground).powi(2);

            if between > best_variance {
                best_variance = between;
                best_threshold = threshold as u8;
            }
        }

        best_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bimodal_threshold_lands_between_modes() {
        let mut values = vec![20u8; 500];
        values.extend(std::iter::repeat_n(200u8, 500));
        let threshold = Histogram::from_gray(&values).otsu_threshold();
        assert!(threshold > 20 && threshold <= 200, "threshold {threshold}");
    }

    #[test]
    fn uneven_modes_still_split() {
        let mut values = vec![10u8; 900];
        values.extend(std::iter::repeat_n(120u8, 100));
        values.extend(std::iter::repeat_n(130u8, 100));
        let threshold = Histogram::from_gray(&values).otsu_threshold();
        assert!(threshold > 10 && threshold <= 120, "threshold {threshold}");
    }

    #[test]
    fn uniform_histogram_has_no_split() {
        assert_eq!(Histogram::from_gray(&[255; 64]).otsu_threshold(), 0);
        assert_eq!(Histogram::from_gray(&[0; 64]).otsu_threshold(), 0);
        assert_eq!(Histogram::new().otsu_threshold(), 0);
    }

    #[test]
    fn counts_every_sample() {
        let histogram = Histogram::from_gray(&[0, 0, 7, 255]);
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.bins()[0], 2);
        assert_eq!(histogram.bins()[7], 1);
        assert_eq!(histogram.bins()[255], 1);
    }
}
