//! Deployment option catalog
//!
//! The closed set of values an operator may choose from. The catalog is
//! built once and passed explicitly into the prompt layer and the
//! orchestrator so tests can substitute alternative option sets.

use serde::{Deserialize, Serialize};

/// Maximum length of an Application Load Balancer name (AWS limit)
pub const MAX_LOAD_BALANCER_NAME_LEN: usize = 32;

/// A selectable machine image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageOption {
    /// Human-readable label shown in the menu
    pub label: String,

    /// AMI id substituted into the manifest
    pub image_id: String,
}

impl ImageOption {
    pub fn new(label: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            image_id: image_id.into(),
        }
    }
}

/// The enumerated deployment options offered to the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionCatalog {
    /// Selectable AMIs, in menu order
    pub images: Vec<ImageOption>,

    /// Selectable EC2 instance types, in menu order
    pub instance_types: Vec<String>,

    /// Selectable availability zones, in menu order
    pub availability_zones: Vec<String>,

    /// The single allowed region
    pub region: String,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            images: vec![
                ImageOption::new("Ubuntu 20.04 LTS", "ami-0c02fb55956c7d316"),
                ImageOption::new("Amazon Linux 2", "ami-0b898040803850657"),
            ],
            instance_types: vec!["t3.small".to_string(), "t3.medium".to_string()],
            availability_zones: vec!["us-east-1a".to_string(), "us-east-1b".to_string()],
            region: "us-east-1".to_string(),
        }
    }
}

impl OptionCatalog {
    /// Check whether an AMI id belongs to the catalog
    pub fn contains_image(&self, image_id: &str) -> bool {
        self.images.iter().any(|i| i.image_id == image_id)
    }

    /// Check whether an instance type belongs to the catalog
    pub fn contains_instance_type(&self, instance_type: &str) -> bool {
        self.instance_types.iter().any(|t| t == instance_type)
    }

    /// Check whether an availability zone belongs to the catalog
    pub fn contains_availability_zone(&self, zone: &str) -> bool {
        self.availability_zones.iter().any(|z| z == zone)
    }

    /// The other catalog zone, used as the second subnet placement.
    ///
    /// An application load balancer requires subnets in two zones, so the
    /// manifest always places the secondary subnet in the first catalog
    /// zone that differs from the operator's choice.
    pub fn secondary_zone(&self, primary: &str) -> &str {
        self.availability_zones
            .iter()
            .find(|z| z.as_str() != primary)
            .map(|z| z.as_str())
            .unwrap_or(primary)
    }
}
