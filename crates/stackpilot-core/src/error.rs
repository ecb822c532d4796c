//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown AMI: {0}")]
    UnknownAmi(String),

    #[error("Unknown instance type: {0}")]
    UnknownInstanceType(String),

    #[error("Unknown availability zone: {0}")]
    UnknownAvailabilityZone(String),

    #[error("Region '{given}' is not allowed, only '{allowed}' is supported")]
    RegionNotAllowed { given: String, allowed: String },

    #[error("Invalid load balancer name: {0}")]
    InvalidLoadBalancerName(String),

    #[error("Template render error: {0}")]
    TemplateRender(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
