use std::collections::HashSet;

use super::config::{Weights, WEIGHT_SUM_TOLERANCE};
use super::factors::Criterion;
use crate::config::{Coordinates, Dataset};

/// Validate weights before scoring.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(weights: &Weights) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for criterion in Criterion::ALL {
        let w = weights.get(criterion);
        if !w.is_finite() || !(0.0..=1.0).contains(&w) {
            errors.push(format!(
                "weights.{}: must be between 0 and 1 (got {})",
                criterion.label().to_lowercase(),
                w
            ));
        }
    }

    let sum = weights.sum();
    if errors.is_empty() && (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("weights: must sum to 1.0 (got {})", sum));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a whole dataset at startup.
/// Every problem is reported with the path of the offending city or metric.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), Vec<String>> {
    let mut errors = match validate_weights(&dataset.weights) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    let speed = dataset.average_speed_kmh;
    if !speed.is_finite() || speed <= 0.0 {
        errors.push(format!("average_speed_kmh: must be positive (got {})", speed));
    }

    for (code, share) in &dataset.regional_output {
        if !share.is_finite() || *share < 0.0 {
            errors.push(format!(
                "regional_output.{}: must be non-negative (got {})",
                code, share
            ));
        }
    }

    // Destinations
    if dataset.destinations.is_empty() {
        errors.push("destinations: must not be empty".to_string());
    }
    let mut destination_names = HashSet::new();
    for (i, dest) in dataset.destinations.iter().enumerate() {
        if !destination_names.insert(dest.name.as_str()) {
            errors.push(format!("destinations[{}].name: duplicate '{}'", i, dest.name));
        }
        check_coordinates(
            &format!("destinations[{}].coordinates", i),
            dest.coordinates,
            &mut errors,
        );
    }

    // Cities
    if dataset.cities.is_empty() {
        errors.push("cities: must not be empty".to_string());
    }
    let mut city_names = HashSet::new();
    for (i, city) in dataset.cities.iter().enumerate() {
        let at = |field: &str| format!("cities[{}] ({}).{}", i, city.name, field);

        if !city_names.insert(city.name.as_str()) {
            errors.push(format!("cities[{}].name: duplicate '{}'", i, city.name));
        }

        match city.rent_cost_per_area {
            None => errors.push(format!("{}: missing", at("rent_cost_per_area"))),
            Some(rent) if !rent.is_finite() || rent <= 0.0 => errors.push(format!(
                "{}: must be positive (got {})",
                at("rent_cost_per_area"),
                rent
            )),
            Some(_) => {}
        }

        match city.coordinates {
            None => errors.push(format!("{}: missing", at("coordinates"))),
            Some(c) => check_coordinates(&at("coordinates"), c, &mut errors),
        }

        match &city.distances_km {
            None => errors.push(format!("{}: missing", at("distances_km"))),
            Some(distances) => {
                for dest in &dataset.destinations {
                    match distances.get(&dest.name) {
                        None => errors.push(format!(
                            "{}: missing distance to '{}'",
                            at("distances_km"),
                            dest.name
                        )),
                        Some(km) if !km.is_finite() || *km < 0.0 => errors.push(format!(
                            "{}: must be non-negative (got {})",
                            at(&format!("distances_km.{}", dest.name)),
                            km
                        )),
                        Some(_) => {}
                    }
                }
                for name in distances.keys() {
                    if !destination_names.contains(name.as_str()) {
                        errors.push(format!(
                            "{}: unknown destination '{}'",
                            at("distances_km"),
                            name
                        ));
                    }
                }
                let total: f64 = distances.values().filter(|km| km.is_finite()).sum();
                if !dataset.destinations.is_empty() && total <= 0.0 {
                    errors.push(format!(
                        "{}: average delivery time must be positive",
                        at("distances_km")
                    ));
                }
            }
        }

        match &city.neighbor_regions {
            None => errors.push(format!("{}: missing", at("neighbor_regions"))),
            Some(regions) if regions.is_empty() => {
                errors.push(format!("{}: must not be empty", at("neighbor_regions")))
            }
            Some(regions) => {
                let mut seen = HashSet::new();
                for code in regions {
                    if !seen.insert(code.as_str()) {
                        errors.push(format!(
                            "{}: duplicate '{}'",
                            at("neighbor_regions"),
                            code
                        ));
                    } else if !dataset.regional_output.contains_key(code) {
                        errors.push(format!(
                            "{}: unknown region '{}'",
                            at("neighbor_regions"),
                            code
                        ));
                    }
                }
            }
        }
    }

    // Map
    if let Some(ref origin) = dataset.map.route_origin {
        if dataset.city(origin).is_none() {
            errors.push(format!("map.route_origin: unknown city '{}'", origin));
        }
    }
    let bounds = dataset.map.bounds;
    if !(bounds.lat_min < bounds.lat_max) {
        errors.push("map.bounds: lat_min must be below lat_max".to_string());
    }
    if !(bounds.lon_min < bounds.lon_max) {
        errors.push("map.bounds: lon_min must be below lon_max".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_coordinates(path: &str, c: Coordinates, errors: &mut Vec<String>) {
    if !(-90.0..=90.0).contains(&c.lat) {
        errors.push(format!("{}.lat: must be within [-90, 90] (got {})", path, c.lat));
    }
    if !(-180.0..=180.0).contains(&c.lon) {
        errors.push(format!("{}.lon: must be within [-180, 180] (got {})", path, c.lon));
    }
}
