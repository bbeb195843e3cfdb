//! Built-in reference dataset: Recife vs. Salvador for a Northeast Brazil DC.
//!
//! Rent is the average warehouse rent per m² from listings, distances are road
//! kilometers to the Northeast state capitals, and regional output is each
//! state's share (%) of the Northeast GDP.

use std::collections::BTreeMap;

use super::schema::{
    CityConfig, Coordinates, Dataset, Destination, GeoBounds, MapConfig, DEFAULT_AVERAGE_SPEED_KMH,
};
use crate::scoring::Weights;

const REGIONAL_OUTPUT: [(&str, f64); 9] = [
    ("BA", 29.0),
    ("PE", 17.7),
    ("CE", 15.4),
    ("MA", 10.1),
    ("RN", 6.8),
    ("PB", 6.2),
    ("AL", 5.5),
    ("PI", 5.2),
    ("SE", 4.1),
];

const CAPITALS: [(&str, f64, f64); 7] = [
    ("Aracaju", -10.9167, -37.05),
    ("Maceió", -9.6658, -35.7353),
    ("João Pessoa", -7.1195, -34.8451),
    ("Natal", -5.7833, -35.2),
    ("Fortaleza", -3.7167, -38.5167),
    ("Teresina", -5.0833, -42.8),
    ("São Luís", -2.5333, -44.3),
];

struct CandidateRow {
    name: &'static str,
    rent: f64,
    lat: f64,
    lon: f64,
    // Same order as CAPITALS
    distances: [f64; 7],
    neighbors: &'static [&'static str],
}

const CANDIDATES: [CandidateRow; 2] = [
    CandidateRow {
        name: "Recife",
        rent: 18.50,
        lat: -8.0476,
        lon: -34.8770,
        distances: [503.0, 257.0, 120.0, 290.0, 754.0, 1138.0, 1586.0],
        neighbors: &["PE", "PB", "RN", "CE", "AL"],
    },
    CandidateRow {
        name: "Salvador",
        rent: 21.00,
        lat: -12.9777,
        lon: -38.5016,
        distances: [321.0, 580.0, 933.0, 1101.0, 1200.0, 1145.0, 1577.0],
        neighbors: &["BA", "SE", "AL", "PE"],
    },
];

/// Build the reference dataset.
pub fn reference_dataset() -> Dataset {
    let regional_output = REGIONAL_OUTPUT
        .iter()
        .map(|(code, share)| (code.to_string(), *share))
        .collect();

    let destinations = CAPITALS
        .iter()
        .map(|(name, lat, lon)| Destination {
            name: name.to_string(),
            coordinates: Coordinates { lat: *lat, lon: *lon },
        })
        .collect();

    let cities = CANDIDATES
        .iter()
        .map(|row| {
            let distances_km: BTreeMap<String, f64> = CAPITALS
                .iter()
                .zip(row.distances.iter())
                .map(|((capital, _, _), km)| (capital.to_string(), *km))
                .collect();
            CityConfig {
                name: row.name.to_string(),
                rent_cost_per_area: Some(row.rent),
                coordinates: Some(Coordinates {
                    lat: row.lat,
                    lon: row.lon,
                }),
                distances_km: Some(distances_km),
                neighbor_regions: Some(row.neighbors.iter().map(|r| r.to_string()).collect()),
            }
        })
        .collect();

    Dataset {
        average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        weights: Weights::default(),
        regional_output,
        destinations,
        cities,
        map: MapConfig {
            route_origin: Some("Recife".to_string()),
            bounds: GeoBounds::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_has_two_candidates() {
        let dataset = reference_dataset();
        let names: Vec<_> = dataset.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Recife", "Salvador"]);
    }

    #[test]
    fn test_reference_cities_cover_every_capital() {
        let dataset = reference_dataset();
        for city in &dataset.cities {
            let distances = city.distances_km.as_ref().unwrap();
            assert_eq!(distances.len(), dataset.destinations.len());
            for dest in &dataset.destinations {
                assert!(distances.contains_key(&dest.name), "{} missing {}", city.name, dest.name);
            }
        }
    }

    #[test]
    fn test_reference_keeps_capital_order() {
        let dataset = reference_dataset();
        let first: Vec<_> = dataset.destinations[..2].iter().map(|d| d.name.as_str()).collect();
        assert_eq!(first, vec!["Aracaju", "Maceió"]);
    }

    #[test]
    fn test_reference_route_origin() {
        let dataset = reference_dataset();
        assert_eq!(dataset.map.route_origin.as_deref(), Some("Recife"));
        assert!(dataset.city("Recife").is_some());
    }

    #[test]
    fn test_reference_places_everything_inside_bounds() {
        let dataset = reference_dataset();
        let bounds = dataset.map.bounds;
        for dest in &dataset.destinations {
            assert!(bounds.contains(dest.coordinates), "{} outside bounds", dest.name);
        }
        for city in &dataset.cities {
            assert!(bounds.contains(city.coordinates.unwrap()));
        }
    }
}
