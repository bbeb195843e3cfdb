use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::Weights;

/// Default truck speed used to turn road distances into delivery hours.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 60.0;

/// Everything one analysis run needs.
///
/// Example YAML:
/// ```yaml
/// average_speed_kmh: 60
/// weights: { cost: 0.30, logistics: 0.40, consumption: 0.30 }
/// regional_output: { PE: 17.7, BA: 29.0 }
/// destinations:
///   - name: Aracaju
///     coordinates: { lat: -10.9167, lon: -37.05 }
/// cities:
///   - name: Recife
///     rent_cost_per_area: 18.50
///     coordinates: { lat: -8.0476, lon: -34.877 }
///     distances_km: { Aracaju: 503 }
///     neighbor_regions: [PE]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Average speed in km/h (default: 60)
    #[serde(default = "default_average_speed")]
    pub average_speed_kmh: f64,

    #[serde(default)]
    pub weights: Weights,

    /// Share of regional GDP (%) keyed by region code
    pub regional_output: BTreeMap<String, f64>,

    /// Delivery destinations, shared by every city. Order is kept.
    pub destinations: Vec<Destination>,

    pub cities: Vec<CityConfig>,

    #[serde(default)]
    pub map: MapConfig,
}

fn default_average_speed() -> f64 {
    DEFAULT_AVERAGE_SPEED_KMH
}

impl Dataset {
    pub fn city(&self, name: &str) -> Option<&CityConfig> {
        self.cities.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    pub name: String,
    pub coordinates: Coordinates,
}

/// A candidate city.
///
/// Metric fields are optional at parse time so validation can name the
/// city and the metric that is missing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CityConfig {
    pub name: String,

    /// Average warehouse rent per square meter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_cost_per_area: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// Road distance in km to each destination, keyed by destination name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances_km: Option<BTreeMap<String, f64>>,

    /// Region codes whose output counts toward this city's consumption potential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor_regions: Option<Vec<String>>,
}

/// Route map settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    /// City the routes are drawn from. Falls back to the winning city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_origin: Option<String>,

    #[serde(default)]
    pub bounds: GeoBounds,
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for GeoBounds {
    // Northeast Brazil
    fn default() -> Self {
        Self {
            lat_min: -18.0,
            lat_max: 0.0,
            lon_min: -50.0,
            lon_max: -32.0,
        }
    }
}

impl GeoBounds {
    pub fn contains(&self, c: Coordinates) -> bool {
        c.lat >= self.lat_min
            && c.lat <= self.lat_max
            && c.lon >= self.lon_min
            && c.lon <= self.lon_max
    }
}
