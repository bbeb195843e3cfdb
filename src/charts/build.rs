use anyhow::{anyhow, Result};

use super::{Bar, BarChart, ChartColor, GeoMap, Marker, Segment};
use crate::config::Dataset;
use crate::scoring::Ranking;

const CITY_MARKER_SIZE: u32 = 15;
const DESTINATION_MARKER_SIZE: u32 = 8;
const ROUTE_WIDTH: f64 = 2.0;
const ROUTE_OPACITY: f64 = 0.8;

/// Bar chart of final scores, highest first. Each city keeps the color of
/// its input position so it matches across charts.
pub fn build_score_chart(ranking: &Ranking) -> BarChart {
    let names: Vec<&str> = ranking.records().iter().map(|r| r.city.as_str()).collect();
    let title = if names.len() <= 3 {
        format!("Final score: {}", names.join(" vs. "))
    } else {
        "Final score by city".to_string()
    };

    let bars = ranking
        .ranked()
        .map(|record| {
            let input_index = names.iter().position(|n| *n == record.city).unwrap_or(0);
            Bar {
                label: record.city.clone(),
                value: record.final_score,
                text: format!("{:.2}", record.final_score),
                color: ChartColor::for_index(input_index),
            }
        })
        .collect();

    BarChart { title, bars }
}

/// Map of candidate cities, destinations and straight-line routes from the
/// configured origin (or the winning city when none is configured).
pub fn build_route_map(dataset: &Dataset, ranking: &Ranking) -> Result<GeoMap> {
    let origin_name = match dataset.map.route_origin.as_deref() {
        Some(name) => name,
        None => ranking
            .winner()
            .map(|w| w.city.as_str())
            .ok_or_else(|| anyhow!("no cities to draw routes from"))?,
    };
    let origin = dataset
        .city(origin_name)
        .and_then(|c| c.coordinates)
        .ok_or_else(|| anyhow!("route origin '{}' has no coordinates", origin_name))?;

    let mut markers = Vec::with_capacity(dataset.cities.len() + dataset.destinations.len());
    for city in &dataset.cities {
        let at = city
            .coordinates
            .ok_or_else(|| anyhow!("city '{}' has no coordinates", city.name))?;
        markers.push(Marker {
            at,
            label: format!("{} (DC)", city.name),
            color: ChartColor::Blue,
            size: CITY_MARKER_SIZE,
        });
    }
    for dest in &dataset.destinations {
        markers.push(Marker {
            at: dest.coordinates,
            label: dest.name.clone(),
            color: ChartColor::Gray,
            size: DESTINATION_MARKER_SIZE,
        });
    }

    let segments = dataset
        .destinations
        .iter()
        .map(|dest| Segment {
            from: origin,
            to: dest.coordinates,
            color: ChartColor::Green,
            width: ROUTE_WIDTH,
            opacity: ROUTE_OPACITY,
        })
        .collect();

    Ok(GeoMap {
        title: format!("Road network from {} (green)", origin_name),
        bounds: dataset.map.bounds,
        markers,
        segments,
    })
}
