pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{Criterion, MinMax, Orientation, DEGENERATE_NORMALIZED};
pub use engine::{
    average_delivery_time, calculate_scores, neighboring_output, score_dataset, CityInput,
    FactorContribution, Ranking, ScoreRecord,
};
pub use validation::{validate_dataset, validate_weights};
