use serde::Serialize;

/// Normalized value given to every city when all cities tie on a criterion.
pub const DEGENERATE_NORMALIZED: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Cost,
    Logistics,
    Consumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    LowerIsBetter,
    HigherIsBetter,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Criterion::Cost, Criterion::Logistics, Criterion::Consumption];

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Cost => "Cost",
            Criterion::Logistics => "Logistics",
            Criterion::Consumption => "Consumption",
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Criterion::Cost | Criterion::Logistics => Orientation::LowerIsBetter,
            Criterion::Consumption => Orientation::HigherIsBetter,
        }
    }

    /// Turn a raw value into a "larger is better" one.
    /// Lower-is-better values must be strictly positive.
    pub fn orient(&self, raw: f64) -> f64 {
        match self.orientation() {
            Orientation::LowerIsBetter => 1.0 / raw,
            Orientation::HigherIsBetter => raw,
        }
    }
}

/// Min-max scaler fitted on one criterion across every city of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Returns None for an empty slice.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        Some(MinMax { min, max })
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            DEGENERATE_NORMALIZED
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(values: &[f64]) -> Vec<f64> {
        match MinMax::fit(values) {
            Some(scaler) => values.iter().map(|v| scaler.scale(*v)).collect(),
            None => Vec::new(),
        }
    }

    #[test]
    fn test_orient_inverts_lower_is_better() {
        assert_eq!(Criterion::Cost.orient(4.0), 0.25);
        assert_eq!(Criterion::Logistics.orient(2.0), 0.5);
    }

    #[test]
    fn test_orient_keeps_higher_is_better() {
        assert_eq!(Criterion::Consumption.orient(51.6), 51.6);
    }

    #[test]
    fn test_fit_empty() {
        assert!(MinMax::fit(&[]).is_none());
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_normalize_bounds() {
        let normalized = normalize(&[3.0, 1.0, 2.0]);
        assert_eq!(normalized, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_normalize_negative_values() {
        let normalized = normalize(&[-2.0, 2.0]);
        assert_eq!(normalized, vec![0.0, 1.0]);
    }

    #[test]
    fn test_normalize_all_tied_uses_fallback() {
        let normalized = normalize(&[7.5, 7.5, 7.5]);
        assert_eq!(normalized, vec![DEGENERATE_NORMALIZED; 3]);
    }

    #[test]
    fn test_normalize_single_value_uses_fallback() {
        let scaler = MinMax::fit(&[42.0]).unwrap();
        assert!(scaler.is_degenerate());
        assert_eq!(scaler.scale(42.0), 0.0);
    }

    #[test]
    fn test_orientation_table() {
        assert_eq!(Criterion::Cost.orientation(), Orientation::LowerIsBetter);
        assert_eq!(Criterion::Logistics.orientation(), Orientation::LowerIsBetter);
        assert_eq!(Criterion::Consumption.orientation(), Orientation::HigherIsBetter);
    }
}
