use serde::{Deserialize, Serialize};

use super::factors::Criterion;

/// Absolute tolerance when checking that weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weight of each criterion in the final score.
///
/// The final score is a convex combination of the normalized sub-scores, so
/// the three weights must sum to 1.0.
///
/// Example YAML:
/// ```yaml
/// weights:
///   cost: 0.30
///   logistics: 0.40
///   consumption: 0.30
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Real-estate cost (rent per m²)
    pub cost: f64,

    /// Average delivery time to the destinations
    pub logistics: f64,

    /// Economic output of neighboring regions
    pub consumption: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            cost: 0.30,
            logistics: 0.40,
            consumption: 0.30,
        }
    }
}

impl Weights {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Cost => self.cost,
            Criterion::Logistics => self.logistics,
            Criterion::Consumption => self.consumption,
        }
    }

    pub fn sum(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = Weights::default();
        assert_eq!(weights.cost, 0.30);
        assert_eq!(weights.logistics, 0.40);
        assert_eq!(weights.consumption, 0.30);
        assert!((weights.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_get_by_criterion() {
        let weights = Weights {
            cost: 0.2,
            logistics: 0.5,
            consumption: 0.3,
        };
        assert_eq!(weights.get(Criterion::Cost), 0.2);
        assert_eq!(weights.get(Criterion::Logistics), 0.5);
        assert_eq!(weights.get(Criterion::Consumption), 0.3);
    }

    #[test]
    fn test_weights_parse() {
        let yaml = r#"
cost: 0.5
logistics: 0.25
consumption: 0.25
"#;
        let weights: Weights = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(weights.cost, 0.5);
        assert_eq!(weights.sum(), 1.0);
    }

    #[test]
    fn test_weights_reject_unknown_criterion() {
        let yaml = r#"
cost: 0.5
logistics: 0.25
consumption: 0.25
taxes: 0.1
"#;
        assert!(serde_saphyr::from_str::<Weights>(yaml).is_err());
    }
}
