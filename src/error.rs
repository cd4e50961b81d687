use thiserror::Error;

use crate::category::Category;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid config `{field}` = {value}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Category {0:?} is not tracked")]
    UntrackedCategory(Category),

    #[error("Detector output shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
