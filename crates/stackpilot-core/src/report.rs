//! Validation report
//!
//! The JSON document persisted after a deployment has been confirmed
//! against the AWS API. This is the only durable artifact the tool owns
//! besides the rendered manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub instance_id: String,
    pub instance_state: String,
    pub public_ip: Option<String>,
    pub load_balancer_dns: String,
    pub load_balancer_state: String,
    pub validated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ValidationReport {
        ValidationReport {
            instance_id: "i-0123456789abcdef0".to_string(),
            instance_state: "running".to_string(),
            public_ip: Some("54.210.1.2".to_string()),
            load_balancer_dns: "demo-alb-1234.us-east-1.elb.amazonaws.com".to_string(),
            load_balancer_state: "active".to_string(),
            validated_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let report = sample_report();

        let json = serde_json::to_string_pretty(&report).unwrap();
        let restored: ValidationReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report, restored);
    }

    #[test]
    fn test_file_round_trip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aws_validation.json");

        std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();
        let restored: ValidationReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(report, restored);
    }

    #[test]
    fn test_missing_public_ip_serializes_as_null() {
        let mut report = sample_report();
        report.public_ip = None;

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"public_ip\":null"));
    }
}
