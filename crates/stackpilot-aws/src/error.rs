//! AWS validation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS credentials validation failed: {0}")]
    Auth(String),

    #[error("AWS API error: {0}")]
    Api(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Load balancer not found: {0}")]
    LoadBalancerNotFound(String),

    #[error("{resource} entered state '{state}' and will not become ready")]
    BadResourceState { resource: String, state: String },

    #[error("{resource} did not become ready after {attempts} attempts")]
    WaitTimeout { resource: String, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, AwsError>;
