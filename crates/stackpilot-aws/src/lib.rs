//! Read-only AWS resource validation
//!
//! Confirms that the resources terraform reports as created actually
//! exist and are healthy: an STS identity check as the credential gate,
//! an EC2 instance lookup and an ELBv2 load balancer lookup, each with
//! bounded readiness polling. Nothing in this crate mutates cloud state.

pub mod error;
pub mod wait;

pub use error::{AwsError, Result};
pub use wait::WaitConfig;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::types::Filter;
use std::time::Duration;
use tokio::time::sleep;

/// Instance states that will never progress to `running`
const INSTANCE_DEAD_STATES: &[&str] = &["shutting-down", "terminated", "stopping", "stopped"];

/// Identity returned by the credential check
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

/// Details of one EC2 instance
#[derive(Debug, Clone)]
pub struct InstanceDetails {
    pub instance_id: String,
    pub state: String,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub instance_type: Option<String>,
    pub availability_zone: Option<String>,
}

impl InstanceDetails {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Details of one application load balancer
#[derive(Debug, Clone)]
pub struct LoadBalancerDetails {
    pub dns_name: String,
    pub state: String,
    pub lb_type: Option<String>,
    pub scheme: Option<String>,
    pub vpc_id: Option<String>,
    pub arn: Option<String>,
}

impl LoadBalancerDetails {
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Read-only client over the EC2, ELBv2 and STS APIs for one region
pub struct AwsValidator {
    ec2: aws_sdk_ec2::Client,
    elbv2: aws_sdk_elasticloadbalancingv2::Client,
    sts: aws_sdk_sts::Client,
    region: String,
}

impl AwsValidator {
    /// Build clients from the ambient credential chain.
    pub async fn connect(region: impl Into<String>) -> Self {
        let region = region.into();
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        Self {
            ec2: aws_sdk_ec2::Client::new(&config),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(&config),
            sts: aws_sdk_sts::Client::new(&config),
            region,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Credential gate: call the STS identity endpoint.
    ///
    /// Any failure (missing credentials, network, denied) means the
    /// validation stage cannot proceed.
    pub async fn check_credentials(&self) -> Result<CallerIdentity> {
        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| AwsError::Auth(format!("{}", aws_sdk_sts::error::DisplayErrorContext(e))))?;

        Ok(CallerIdentity {
            account: identity.account().map(String::from),
            arn: identity.arn().map(String::from),
            user_id: identity.user_id().map(String::from),
        })
    }

    /// Look up one instance by id.
    ///
    /// `Ok(None)` means the id did not resolve; callers treat that as a
    /// validation failure, not as "absent but fine".
    pub async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDetails>> {
        tracing::debug!("Describing EC2 instance {}", instance_id);

        let response = self
            .ec2
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| AwsError::Api(format!("{}", aws_sdk_ec2::error::DisplayErrorContext(e))))?;

        Ok(response
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .next()
            .map(instance_details))
    }

    /// Look up one instance by tag, e.g. `("Name", "WebServer")`.
    pub async fn find_instance_by_tag(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<InstanceDetails>> {
        let filter = Filter::builder()
            .name(format!("tag:{}", key))
            .values(value)
            .build();

        let response = self
            .ec2
            .describe_instances()
            .filters(filter)
            .send()
            .await
            .map_err(|e| AwsError::Api(format!("{}", aws_sdk_ec2::error::DisplayErrorContext(e))))?;

        Ok(response
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .next()
            .map(instance_details))
    }

    /// Scan all load balancers in the region and match by DNS name.
    ///
    /// There is no direct lookup-by-DNS API, so this lists and filters.
    pub async fn find_load_balancer_by_dns(
        &self,
        dns_name: &str,
    ) -> Result<Option<LoadBalancerDetails>> {
        tracing::debug!("Looking up load balancer by DNS name {}", dns_name);

        let response = self.elbv2.describe_load_balancers().send().await.map_err(|e| {
            AwsError::Api(format!(
                "{}",
                aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext(e)
            ))
        })?;

        Ok(response
            .load_balancers()
            .iter()
            .find(|lb| lb.dns_name() == Some(dns_name))
            .map(load_balancer_details))
    }

    /// Look up one load balancer by its name.
    pub async fn find_load_balancer_by_name(
        &self,
        name: &str,
    ) -> Result<Option<LoadBalancerDetails>> {
        let response = self
            .elbv2
            .describe_load_balancers()
            .names(name)
            .send()
            .await
            .map_err(|e| {
                AwsError::Api(format!(
                    "{}",
                    aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext(e)
                ))
            })?;

        Ok(response.load_balancers().first().map(load_balancer_details))
    }

    /// Poll until the instance reports `running`.
    ///
    /// A dead state (terminated, stopped, ...) aborts immediately instead
    /// of burning the remaining attempts.
    pub async fn wait_for_instance_running(
        &self,
        instance_id: &str,
        config: &WaitConfig,
    ) -> Result<InstanceDetails> {
        let mut seen = false;
        for attempt in 0..config.max_retries {
            if let Some(details) = self.describe_instance(instance_id).await? {
                seen = true;
                if details.is_running() {
                    return Ok(details);
                }
                if INSTANCE_DEAD_STATES.contains(&details.state.as_str()) {
                    return Err(AwsError::BadResourceState {
                        resource: format!("Instance {}", instance_id),
                        state: details.state,
                    });
                }
                tracing::debug!(
                    "Instance {} is '{}', attempt {}/{}",
                    instance_id,
                    details.state,
                    attempt + 1,
                    config.max_retries
                );
            }

            if attempt + 1 < config.max_retries {
                sleep(Duration::from_millis(config.delay_for_attempt(attempt))).await;
            }
        }

        // Distinguish "never resolved" from "seen but never ready"
        if seen {
            Err(AwsError::WaitTimeout {
                resource: format!("Instance {}", instance_id),
                attempts: config.max_retries,
            })
        } else {
            Err(AwsError::InstanceNotFound(instance_id.to_string()))
        }
    }

    /// Poll until the load balancer reports `active`.
    pub async fn wait_for_load_balancer_active(
        &self,
        dns_name: &str,
        config: &WaitConfig,
    ) -> Result<LoadBalancerDetails> {
        let mut seen = false;
        for attempt in 0..config.max_retries {
            if let Some(details) = self.find_load_balancer_by_dns(dns_name).await? {
                seen = true;
                if details.is_active() {
                    return Ok(details);
                }
                if details.state == "failed" {
                    return Err(AwsError::BadResourceState {
                        resource: format!("Load balancer {}", dns_name),
                        state: details.state,
                    });
                }
                tracing::debug!(
                    "Load balancer {} is '{}', attempt {}/{}",
                    dns_name,
                    details.state,
                    attempt + 1,
                    config.max_retries
                );
            }

            if attempt + 1 < config.max_retries {
                sleep(Duration::from_millis(config.delay_for_attempt(attempt))).await;
            }
        }

        if seen {
            Err(AwsError::WaitTimeout {
                resource: format!("Load balancer {}", dns_name),
                attempts: config.max_retries,
            })
        } else {
            Err(AwsError::LoadBalancerNotFound(dns_name.to_string()))
        }
    }
}

fn instance_details(instance: &aws_sdk_ec2::types::Instance) -> InstanceDetails {
    InstanceDetails {
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        public_ip: instance.public_ip_address().map(String::from),
        private_ip: instance.private_ip_address().map(String::from),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        availability_zone: instance
            .placement()
            .and_then(|p| p.availability_zone())
            .map(String::from),
    }
}

fn load_balancer_details(
    lb: &aws_sdk_elasticloadbalancingv2::types::LoadBalancer,
) -> LoadBalancerDetails {
    LoadBalancerDetails {
        dns_name: lb.dns_name().unwrap_or_default().to_string(),
        state: lb
            .state()
            .and_then(|s| s.code())
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        lb_type: lb.r#type().map(|t| t.as_str().to_string()),
        scheme: lb.scheme().map(|s| s.as_str().to_string()),
        vpc_id: lb.vpc_id().map(String::from),
        arn: lb.load_balancer_arn().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_running_check() {
        let details = InstanceDetails {
            instance_id: "i-0123".to_string(),
            state: "running".to_string(),
            public_ip: Some("54.210.1.2".to_string()),
            private_ip: Some("10.0.1.5".to_string()),
            instance_type: Some("t3.small".to_string()),
            availability_zone: Some("us-east-1a".to_string()),
        };
        assert!(details.is_running());

        let pending = InstanceDetails {
            state: "pending".to_string(),
            ..details
        };
        assert!(!pending.is_running());
    }

    #[test]
    fn test_load_balancer_active_check() {
        let details = LoadBalancerDetails {
            dns_name: "demo-alb-1234.us-east-1.elb.amazonaws.com".to_string(),
            state: "active".to_string(),
            lb_type: Some("application".to_string()),
            scheme: Some("internet-facing".to_string()),
            vpc_id: Some("vpc-0abc".to_string()),
            arn: None,
        };
        assert!(details.is_active());

        let provisioning = LoadBalancerDetails {
            state: "provisioning".to_string(),
            ..details
        };
        assert!(!provisioning.is_active());
    }

    #[test]
    fn test_dead_states_do_not_include_transients() {
        assert!(INSTANCE_DEAD_STATES.contains(&"terminated"));
        assert!(!INSTANCE_DEAD_STATES.contains(&"pending"));
        assert!(!INSTANCE_DEAD_STATES.contains(&"running"));
    }

    #[test]
    fn test_instance_details_mapping() {
        use aws_sdk_ec2::types::{
            Instance, InstanceState, InstanceStateName, InstanceType, Placement,
        };

        let instance = Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .state(
                InstanceState::builder()
                    .name(InstanceStateName::Running)
                    .build(),
            )
            .public_ip_address("54.210.1.2")
            .private_ip_address("10.0.1.5")
            .instance_type(InstanceType::T3Small)
            .placement(Placement::builder().availability_zone("us-east-1a").build())
            .build();

        let details = instance_details(&instance);

        assert_eq!(details.instance_id, "i-0123456789abcdef0");
        assert_eq!(details.state, "running");
        assert!(details.is_running());
        assert_eq!(details.public_ip.as_deref(), Some("54.210.1.2"));
        assert_eq!(details.private_ip.as_deref(), Some("10.0.1.5"));
        assert_eq!(details.instance_type.as_deref(), Some("t3.small"));
        assert_eq!(details.availability_zone.as_deref(), Some("us-east-1a"));
    }

    #[test]
    fn test_instance_details_without_state_is_unknown() {
        let instance = aws_sdk_ec2::types::Instance::builder()
            .instance_id("i-0123")
            .build();

        let details = instance_details(&instance);

        assert_eq!(details.state, "unknown");
        assert!(!details.is_running());
        assert_eq!(details.public_ip, None);
    }

    #[test]
    fn test_load_balancer_details_mapping() {
        use aws_sdk_elasticloadbalancingv2::types::{
            LoadBalancer, LoadBalancerSchemeEnum, LoadBalancerState, LoadBalancerStateEnum,
            LoadBalancerTypeEnum,
        };

        let lb = LoadBalancer::builder()
            .dns_name("demo-alb-1234.us-east-1.elb.amazonaws.com")
            .state(
                LoadBalancerState::builder()
                    .code(LoadBalancerStateEnum::Provisioning)
                    .build(),
            )
            .r#type(LoadBalancerTypeEnum::Application)
            .scheme(LoadBalancerSchemeEnum::InternetFacing)
            .vpc_id("vpc-0abc")
            .load_balancer_arn("arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/app/demo-alb/1")
            .build();

        let details = load_balancer_details(&lb);

        assert_eq!(
            details.dns_name,
            "demo-alb-1234.us-east-1.elb.amazonaws.com"
        );
        assert_eq!(details.state, "provisioning");
        assert!(!details.is_active());
        assert_eq!(details.lb_type.as_deref(), Some("application"));
        assert_eq!(details.scheme.as_deref(), Some("internet-facing"));
        assert_eq!(details.vpc_id.as_deref(), Some("vpc-0abc"));
        assert!(details.arn.is_some());
    }

    #[test]
    fn test_not_found_diagnostics() {
        let instance = AwsError::InstanceNotFound("i-0123".to_string());
        assert_eq!(instance.to_string(), "Instance not found: i-0123");

        let lb = AwsError::LoadBalancerNotFound("demo.elb.amazonaws.com".to_string());
        assert_eq!(
            lb.to_string(),
            "Load balancer not found: demo.elb.amazonaws.com"
        );

        let timeout = AwsError::WaitTimeout {
            resource: "Instance i-0123".to_string(),
            attempts: 30,
        };
        assert_eq!(
            timeout.to_string(),
            "Instance i-0123 did not become ready after 30 attempts"
        );
    }
}
