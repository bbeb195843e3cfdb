use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use super::config::Weights;
use super::factors::{Criterion, MinMax};
use super::validation::{validate_dataset, validate_weights};
use crate::config::Dataset;

/// Raw metrics of one candidate city, with distances already lined up with
/// the destination order of the run.
#[derive(Debug, Clone)]
pub struct CityInput {
    pub name: String,
    pub rent_cost_per_area: f64,
    pub distances_km: Vec<f64>,
    pub neighboring_economic_output: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub criterion: Criterion,
    pub raw: f64,        // Value as measured (rent, hours, output %)
    pub oriented: f64,   // Larger-is-better value fed to the scaler
    pub normalized: f64, // In [0, 1] across the cities of the run
    pub weight: f64,
    pub contribution: f64, // weight * normalized
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    pub city: String,
    pub rent_cost_per_area: f64,
    pub average_delivery_time: f64,
    pub neighboring_economic_output: f64,
    pub inverted_cost: f64,
    pub inverted_time: f64,
    pub factors: Vec<FactorContribution>,
    pub final_score: f64,
}

/// Scores of one run. Records keep input order; `ranked()` yields them by
/// final score descending, ties in input order.
#[derive(Debug, Clone)]
pub struct Ranking {
    records: Vec<ScoreRecord>,
    order: Vec<usize>,
}

impl Ranking {
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn ranked(&self) -> impl Iterator<Item = &ScoreRecord> + '_ {
        self.order.iter().map(move |&i| &self.records[i])
    }

    pub fn winner(&self) -> Option<&ScoreRecord> {
        self.order.first().map(|&i| &self.records[i])
    }

    pub fn get(&self, city: &str) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.city == city)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mean travel time in hours over all destinations.
pub fn average_delivery_time(distances_km: &[f64], average_speed_kmh: f64) -> Result<f64> {
    if distances_km.is_empty() {
        bail!("no destinations to average over");
    }
    if average_speed_kmh <= 0.0 || !average_speed_kmh.is_finite() {
        bail!("average speed must be positive (got {})", average_speed_kmh);
    }
    let total: f64 = distances_km.iter().map(|km| km / average_speed_kmh).sum();
    Ok(total / distances_km.len() as f64)
}

/// Sum of the regional output shares of the given regions.
pub fn neighboring_output(
    regions: &[String],
    regional_output: &BTreeMap<String, f64>,
) -> Result<f64> {
    regions
        .iter()
        .map(|code| {
            regional_output
                .get(code)
                .copied()
                .ok_or_else(|| anyhow!("unknown region '{}'", code))
        })
        .sum()
}

/// Score and rank a set of cities.
///
/// Normalization is joint: adding or removing a city changes every other
/// city's normalized sub-scores.
pub fn calculate_scores(
    cities: &[CityInput],
    weights: &Weights,
    average_speed_kmh: f64,
) -> Result<Ranking> {
    if let Err(errors) = validate_weights(weights) {
        bail!("{}", errors.join("; "));
    }
    if cities.is_empty() {
        bail!("no cities to score");
    }

    let mut raw = Vec::with_capacity(cities.len());
    for city in cities {
        let rent = city.rent_cost_per_area;
        if rent <= 0.0 || !rent.is_finite() {
            bail!("{}: rent_cost_per_area must be positive (got {})", city.name, rent);
        }
        let hours = average_delivery_time(&city.distances_km, average_speed_kmh)
            .with_context(|| format!("{}: cannot compute average delivery time", city.name))?;
        if hours <= 0.0 || !hours.is_finite() {
            bail!("{}: average delivery time must be positive (got {})", city.name, hours);
        }
        let output = city.neighboring_economic_output;
        if output < 0.0 || !output.is_finite() {
            bail!(
                "{}: neighboring_economic_output must be finite and non-negative (got {})",
                city.name,
                output
            );
        }
        raw.push([rent, hours, output]);
    }

    // One scaler per criterion, fitted on the oriented values of every city
    let oriented: Vec<[f64; 3]> = raw
        .iter()
        .map(|values| {
            let mut out = [0.0; 3];
            for (i, criterion) in Criterion::ALL.iter().enumerate() {
                out[i] = criterion.orient(values[i]);
            }
            out
        })
        .collect();

    let mut scalers = Vec::with_capacity(Criterion::ALL.len());
    for (i, criterion) in Criterion::ALL.iter().enumerate() {
        let column: Vec<f64> = oriented.iter().map(|row| row[i]).collect();
        let scaler = MinMax::fit(&column)
            .ok_or_else(|| anyhow!("no values for {}", criterion.label()))?;
        if scaler.is_degenerate() {
            tracing::debug!(criterion = criterion.label(), "all cities tie, using fallback score");
        }
        scalers.push(scaler);
    }

    let records: Vec<ScoreRecord> = cities
        .iter()
        .zip(raw.iter().zip(oriented.iter()))
        .map(|(city, (raw, oriented))| {
            let factors: Vec<FactorContribution> = Criterion::ALL
                .iter()
                .enumerate()
                .map(|(i, criterion)| {
                    let normalized = scalers[i].scale(oriented[i]);
                    let weight = weights.get(*criterion);
                    FactorContribution {
                        criterion: *criterion,
                        raw: raw[i],
                        oriented: oriented[i],
                        normalized,
                        weight,
                        contribution: weight * normalized,
                    }
                })
                .collect();
            let final_score: f64 = factors.iter().map(|f| f.contribution).sum();

            tracing::debug!(
                city = %city.name,
                average_delivery_time = raw[1],
                neighboring_output = raw[2],
                final_score,
                "scored city"
            );

            ScoreRecord {
                city: city.name.clone(),
                rent_cost_per_area: raw[0],
                average_delivery_time: raw[1],
                neighboring_economic_output: raw[2],
                inverted_cost: oriented[0],
                inverted_time: oriented[1],
                factors,
                final_score,
            }
        })
        .collect();

    // Stable sort: equal scores keep input order, so the first max wins
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        records[b]
            .final_score
            .partial_cmp(&records[a].final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Ranking { records, order })
}

/// Validate a dataset, derive each city's raw metrics and score them.
pub fn score_dataset(dataset: &Dataset) -> Result<Ranking> {
    if let Err(errors) = validate_dataset(dataset) {
        bail!("invalid dataset:\n  - {}", errors.join("\n  - "));
    }

    let inputs = dataset
        .cities
        .iter()
        .map(|city| city_input(city, dataset))
        .collect::<Result<Vec<_>>>()?;

    calculate_scores(&inputs, &dataset.weights, dataset.average_speed_kmh)
}

fn city_input(city: &crate::config::CityConfig, dataset: &Dataset) -> Result<CityInput> {
    let rent_cost_per_area = city
        .rent_cost_per_area
        .ok_or_else(|| anyhow!("{}: missing rent_cost_per_area", city.name))?;
    let distances = city
        .distances_km
        .as_ref()
        .ok_or_else(|| anyhow!("{}: missing distances_km", city.name))?;
    let distances_km = dataset
        .destinations
        .iter()
        .map(|dest| {
            distances
                .get(&dest.name)
                .copied()
                .ok_or_else(|| anyhow!("{}: missing distance to '{}'", city.name, dest.name))
        })
        .collect::<Result<Vec<_>>>()?;
    let regions = city
        .neighbor_regions
        .as_ref()
        .ok_or_else(|| anyhow!("{}: missing neighbor_regions", city.name))?;
    let neighboring_economic_output = neighboring_output(regions, &dataset.regional_output)
        .with_context(|| format!("{}: cannot sum neighboring output", city.name))?;

    Ok(CityInput {
        name: city.name.clone(),
        rent_cost_per_area,
        distances_km,
        neighboring_economic_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reference_dataset;

    const EPS: f64 = 1e-9;

    fn normalized(record: &ScoreRecord, criterion: Criterion) -> f64 {
        record
            .factors
            .iter()
            .find(|f| f.criterion == criterion)
            .unwrap()
            .normalized
    }

    fn city(name: &str, rent: f64, distances: &[f64], output: f64) -> CityInput {
        CityInput {
            name: name.to_string(),
            rent_cost_per_area: rent,
            distances_km: distances.to_vec(),
            neighboring_economic_output: output,
        }
    }

    #[test]
    fn test_average_delivery_time_two_destinations() {
        // [60, 120] km at 60 km/h -> [1.0, 2.0] h -> 1.5 h
        let hours = average_delivery_time(&[60.0, 120.0], 60.0).unwrap();
        assert!((hours - 1.5).abs() < EPS);
    }

    #[test]
    fn test_average_delivery_time_empty_fails() {
        assert!(average_delivery_time(&[], 60.0).is_err());
    }

    #[test]
    fn test_neighboring_output_sums_regions() {
        let table: BTreeMap<String, f64> =
            [("PE".to_string(), 17.7), ("PB".to_string(), 6.2)].into_iter().collect();
        let total = neighboring_output(&["PE".to_string(), "PB".to_string()], &table).unwrap();
        assert!((total - 23.9).abs() < EPS);
        assert!(neighboring_output(&["SP".to_string()], &table).is_err());
    }

    #[test]
    fn test_reference_scenario() {
        let ranking = score_dataset(&reference_dataset()).unwrap();

        let winner = ranking.winner().unwrap();
        assert_eq!(winner.city, "Recife");
        assert_eq!(format!("{:.2}", winner.final_score), "0.70");

        let recife = ranking.get("Recife").unwrap();
        assert_eq!(format!("{:.2}", recife.average_delivery_time), "11.07");
        assert_eq!(format!("{:.2}", recife.neighboring_economic_output), "51.60");

        let salvador = ranking.get("Salvador").unwrap();
        assert_eq!(format!("{:.2}", salvador.average_delivery_time), "16.33");
        assert_eq!(format!("{:.2}", salvador.neighboring_economic_output), "56.30");
        assert_eq!(format!("{:.2}", salvador.final_score), "0.30");

        let ranked: Vec<_> = ranking.ranked().map(|r| r.city.as_str()).collect();
        assert_eq!(ranked, vec!["Recife", "Salvador"]);
    }

    #[test]
    fn test_reference_scenario_is_deterministic() {
        let first = score_dataset(&reference_dataset()).unwrap();
        let second = score_dataset(&reference_dataset()).unwrap();
        for (a, b) in first.records().iter().zip(second.records()) {
            assert_eq!(a.city, b.city);
            assert_eq!(a.final_score.to_bits(), b.final_score.to_bits());
            assert_eq!(
                a.average_delivery_time.to_bits(),
                b.average_delivery_time.to_bits()
            );
        }
    }

    #[test]
    fn test_inverted_values() {
        let ranking = calculate_scores(
            &[city("A", 4.0, &[120.0], 1.0), city("B", 5.0, &[60.0], 2.0)],
            &Weights::default(),
            60.0,
        )
        .unwrap();
        let a = ranking.get("A").unwrap();
        assert!((a.inverted_cost - 0.25).abs() < EPS);
        assert!((a.inverted_time - 0.5).abs() < EPS);
    }

    #[test]
    fn test_normalization_bounds_per_criterion() {
        let ranking = calculate_scores(
            &[
                city("A", 10.0, &[300.0], 20.0),
                city("B", 20.0, &[100.0], 40.0),
                city("C", 15.0, &[200.0], 10.0),
            ],
            &Weights::default(),
            60.0,
        )
        .unwrap();
        let a = ranking.get("A").unwrap();
        let b = ranking.get("B").unwrap();
        let c = ranking.get("C").unwrap();

        // Cheapest rent -> 1.0, most expensive -> 0.0
        assert_eq!(normalized(a, Criterion::Cost), 1.0);
        assert_eq!(normalized(b, Criterion::Cost), 0.0);
        // Fastest delivery -> 1.0, slowest -> 0.0
        assert_eq!(normalized(b, Criterion::Logistics), 1.0);
        assert_eq!(normalized(a, Criterion::Logistics), 0.0);
        // Highest output -> 1.0, lowest -> 0.0
        assert_eq!(normalized(b, Criterion::Consumption), 1.0);
        assert_eq!(normalized(c, Criterion::Consumption), 0.0);
    }

    #[test]
    fn test_dominating_city_scores_higher() {
        let ranking = calculate_scores(
            &[
                city("Weak", 25.0, &[500.0, 700.0], 30.0),
                city("Strong", 15.0, &[300.0, 400.0], 45.0),
                city("Mid", 20.0, &[200.0, 900.0], 35.0),
            ],
            &Weights::default(),
            60.0,
        )
        .unwrap();
        let strong = ranking.get("Strong").unwrap().final_score;
        let weak = ranking.get("Weak").unwrap().final_score;
        assert!(strong > weak);
    }

    #[test]
    fn test_degenerate_criterion_uses_fallback() {
        // Same rent everywhere: cost contributes nothing
        let ranking = calculate_scores(
            &[city("A", 18.0, &[100.0], 10.0), city("B", 18.0, &[200.0], 20.0)],
            &Weights::default(),
            60.0,
        )
        .unwrap();
        for record in ranking.records() {
            assert_eq!(normalized(record, Criterion::Cost), 0.0);
        }
        let a = ranking.get("A").unwrap();
        assert!((a.final_score - 0.40).abs() < EPS);
    }

    #[test]
    fn test_single_city_scores_zero() {
        let ranking =
            calculate_scores(&[city("Solo", 18.0, &[100.0], 10.0)], &Weights::default(), 60.0)
                .unwrap();
        let winner = ranking.winner().unwrap();
        assert_eq!(winner.city, "Solo");
        assert_eq!(winner.final_score, 0.0);
    }

    #[test]
    fn test_tie_goes_to_first_city() {
        let ranking = calculate_scores(
            &[city("First", 18.0, &[100.0], 10.0), city("Second", 18.0, &[100.0], 10.0)],
            &Weights::default(),
            60.0,
        )
        .unwrap();
        assert_eq!(ranking.winner().unwrap().city, "First");
    }

    #[test]
    fn test_third_worse_city_keeps_order_but_shifts_scores() {
        let mut dataset = reference_dataset();
        let two_city = score_dataset(&dataset).unwrap();

        let mut worse = dataset.cities[0].clone();
        worse.name = "Worse".to_string();
        worse.rent_cost_per_area = Some(30.0);
        for km in worse.distances_km.as_mut().unwrap().values_mut() {
            *km = 2000.0;
        }
        dataset.regional_output.insert("XX".to_string(), 10.0);
        worse.neighbor_regions = Some(vec!["XX".to_string()]);
        dataset.cities.push(worse);

        let three_city = score_dataset(&dataset).unwrap();
        let ranked: Vec<_> = three_city.ranked().map(|r| r.city.as_str()).collect();
        assert_eq!(ranked, vec!["Recife", "Salvador", "Worse"]);

        // Joint normalization moves Salvador's absolute score
        let before = two_city.get("Salvador").unwrap().final_score;
        let after = three_city.get("Salvador").unwrap().final_score;
        assert!((before - after).abs() > 0.1);
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let weights = Weights {
            cost: 0.5,
            logistics: 0.5,
            consumption: 0.5,
        };
        let err = calculate_scores(&[city("A", 1.0, &[1.0], 1.0)], &weights, 60.0).unwrap_err();
        assert!(err.to_string().contains("must sum to 1.0"));
    }

    #[test]
    fn test_rejects_non_positive_rent() {
        let err = calculate_scores(&[city("A", 0.0, &[60.0], 1.0)], &Weights::default(), 60.0)
            .unwrap_err();
        assert!(err.to_string().contains("A: rent_cost_per_area"));
    }

    #[test]
    fn test_rejects_zero_delivery_time() {
        let err =
            calculate_scores(&[city("A", 1.0, &[0.0, 0.0], 1.0)], &Weights::default(), 60.0)
                .unwrap_err();
        assert!(err.to_string().contains("average delivery time must be positive"));
    }

    #[test]
    fn test_rejects_non_finite_output() {
        for output in [f64::NAN, f64::INFINITY, -1.0] {
            let err = calculate_scores(
                &[city("Bad", 18.0, &[100.0], output), city("Good", 18.0, &[100.0], 10.0)],
                &Weights::default(),
                60.0,
            )
            .unwrap_err();
            assert!(err
                .to_string()
                .contains("Bad: neighboring_economic_output must be finite and non-negative"));
        }
    }

    #[test]
    fn test_rejects_empty_destinations() {
        let err =
            calculate_scores(&[city("A", 1.0, &[], 1.0)], &Weights::default(), 60.0).unwrap_err();
        assert!(err.to_string().contains("A: cannot compute average delivery time"));
    }

    #[test]
    fn test_score_dataset_reports_invalid_input() {
        let mut dataset = reference_dataset();
        dataset.cities[0].rent_cost_per_area = None;
        let err = score_dataset(&dataset).unwrap_err();
        assert!(err.to_string().contains("cities[0] (Recife).rent_cost_per_area: missing"));
    }
}
