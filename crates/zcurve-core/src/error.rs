//! 几何错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate orientation: direction length {length} is too small to orient a marker")]
    DegenerateOrientation { length: f64 },

    #[error("Cannot map parameter onto {kind}: {reason}")]
    DomainMapping { kind: &'static str, reason: String },

    #[error("Invalid parameter {0}: expected a finite value in [0, 1]")]
    InvalidParameter(f64),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
