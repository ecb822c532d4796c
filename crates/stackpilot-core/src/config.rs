//! Deployment configuration

use crate::catalog::{MAX_LOAD_BALANCER_NAME_LEN, OptionCatalog};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// The parameters collected for one deployment run.
///
/// Built once from operator answers (or CLI flags), validated against the
/// [`OptionCatalog`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub ami_id: String,
    pub instance_type: String,
    pub region: String,
    pub availability_zone: String,
    pub load_balancer_name: String,
}

impl DeploymentConfig {
    /// Check every field against the catalog.
    ///
    /// Flag-driven invocations go through the same check as the menus, so
    /// an out-of-catalog value can never reach the renderer.
    pub fn validate(&self, catalog: &OptionCatalog) -> Result<()> {
        if !catalog.contains_image(&self.ami_id) {
            return Err(CoreError::UnknownAmi(self.ami_id.clone()));
        }
        if !catalog.contains_instance_type(&self.instance_type) {
            return Err(CoreError::UnknownInstanceType(self.instance_type.clone()));
        }
        if !catalog.contains_availability_zone(&self.availability_zone) {
            return Err(CoreError::UnknownAvailabilityZone(
                self.availability_zone.clone(),
            ));
        }
        if self.region != catalog.region {
            return Err(CoreError::RegionNotAllowed {
                given: self.region.clone(),
                allowed: catalog.region.clone(),
            });
        }
        validate_load_balancer_name(&self.load_balancer_name)?;
        Ok(())
    }
}

/// Validate a load balancer name: non-empty, at most 32 characters.
pub fn validate_load_balancer_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::InvalidLoadBalancerName(
            "name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_LOAD_BALANCER_NAME_LEN {
        return Err(CoreError::InvalidLoadBalancerName(format!(
            "'{}' exceeds {} characters",
            name, MAX_LOAD_BALANCER_NAME_LEN
        )));
    }
    Ok(())
}
