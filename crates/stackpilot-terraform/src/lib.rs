//! Terraform CLI adapter
//!
//! Wraps the external `terraform` binary for the four operations the
//! deployment pipeline needs: init, plan, apply and destroy. Every call
//! is a blocking subprocess invocation attempted exactly once; the
//! lifecycle operations stream their progress to the operator's terminal
//! while `output -json` is captured and parsed.

pub mod error;

pub use error::{Result, TerraformError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// One entry of `terraform output -json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputValue {
    pub value: serde_json::Value,

    #[serde(default)]
    pub sensitive: bool,
}

impl OutputValue {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Output values produced by a successful apply, keyed by output name
pub type ProvisioningOutputs = BTreeMap<String, OutputValue>;

/// Parse the document printed by `terraform output -json`
pub fn parse_outputs(json: &str) -> Result<ProvisioningOutputs> {
    if json.trim().is_empty() || json.trim() == "{}" {
        return Ok(ProvisioningOutputs::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Fetch a required string-typed output value
pub fn require_string(outputs: &ProvisioningOutputs, name: &str) -> Result<String> {
    let entry = outputs
        .get(name)
        .ok_or_else(|| TerraformError::MissingOutput(name.to_string()))?;
    entry
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| TerraformError::NonStringOutput(name.to_string()))
}

/// Terraform CLI wrapper bound to one working directory
pub struct Terraform {
    working_dir: PathBuf,
}

impl Terraform {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Check that the terraform binary is on PATH.
    ///
    /// Returns the version line so the orchestrator can echo it.
    pub async fn check_installed() -> Result<String> {
        let output = Command::new("terraform")
            .arg("version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TerraformError::TerraformNotFound,
                _ => TerraformError::Io(e),
            })?;

        if !output.status.success() {
            return Err(TerraformError::CommandFailed {
                operation: "version".to_string(),
                status: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or("terraform").to_string())
    }

    /// Prepare the working directory. Idempotent if invoked repeatedly.
    pub async fn init(&self) -> Result<()> {
        self.run_streaming("init", &["init"]).await
    }

    /// Compute the change set without applying it.
    pub async fn plan(&self) -> Result<()> {
        self.run_streaming("plan", &["plan", "-no-color"]).await
    }

    /// Execute the change set, then collect the declared output values.
    ///
    /// The only operation with externally visible side effects; callers
    /// must not reach this without a successful init and plan first.
    pub async fn apply(&self) -> Result<ProvisioningOutputs> {
        self.run_streaming("apply", &["apply", "-auto-approve", "-no-color"])
            .await?;
        self.outputs().await
    }

    /// Delete every resource tracked in the working directory.
    ///
    /// Auto-approved at the tool level; the orchestrator has already
    /// asked the operator for confirmation.
    pub async fn destroy(&self) -> Result<()> {
        self.run_streaming("destroy", &["destroy", "-auto-approve", "-no-color"])
            .await
    }

    /// Read the current output values as a structured map.
    pub async fn outputs(&self) -> Result<ProvisioningOutputs> {
        let stdout = self.run_captured("output", &["output", "-json"]).await?;
        parse_outputs(&stdout)
    }

    /// Run a terraform subcommand with stdio inherited so the operator
    /// sees terraform's own progress output.
    async fn run_streaming(&self, operation: &str, args: &[&str]) -> Result<()> {
        tracing::debug!(
            "Running: terraform {} (in {})",
            args.join(" "),
            self.working_dir.display()
        );

        let status = Command::new("terraform")
            .args(args)
            .current_dir(&self.working_dir)
            .status()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TerraformError::TerraformNotFound,
                _ => TerraformError::Io(e),
            })?;

        if !status.success() {
            return Err(TerraformError::CommandFailed {
                operation: operation.to_string(),
                status: status.code(),
            });
        }

        Ok(())
    }

    /// Run a terraform subcommand and capture stdout.
    async fn run_captured(&self, operation: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(
            "Running: terraform {} (in {})",
            args.join(" "),
            self.working_dir.display()
        );

        let output = Command::new("terraform")
            .args(args)
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TerraformError::TerraformNotFound,
                _ => TerraformError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("terraform {} stderr: {}", operation, stderr.trim());
            return Err(TerraformError::CommandFailed {
                operation: operation.to_string(),
                status: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUTS: &str = r#"{
        "instance_id": {
            "sensitive": false,
            "type": "string",
            "value": "i-0123456789abcdef0"
        },
        "instance_public_ip": {
            "sensitive": false,
            "type": "string",
            "value": "54.210.1.2"
        },
        "load_balancer_dns": {
            "sensitive": false,
            "type": "string",
            "value": "demo-alb-1234.us-east-1.elb.amazonaws.com"
        },
        "vpc_id": {
            "sensitive": false,
            "type": "string",
            "value": "vpc-0abc"
        }
    }"#;

    #[test]
    fn test_parse_outputs() {
        let outputs = parse_outputs(SAMPLE_OUTPUTS).unwrap();

        assert_eq!(outputs.len(), 4);
        assert_eq!(
            outputs.get("instance_id").unwrap().as_str(),
            Some("i-0123456789abcdef0")
        );
        assert!(!outputs.get("load_balancer_dns").unwrap().sensitive);
    }

    #[test]
    fn test_parse_empty_outputs() {
        assert!(parse_outputs("").unwrap().is_empty());
        assert!(parse_outputs("{}").unwrap().is_empty());
        assert!(parse_outputs("  {}\n").unwrap().is_empty());
    }

    #[test]
    fn test_require_string_present() {
        let outputs = parse_outputs(SAMPLE_OUTPUTS).unwrap();

        assert_eq!(
            require_string(&outputs, "load_balancer_dns").unwrap(),
            "demo-alb-1234.us-east-1.elb.amazonaws.com"
        );
    }

    #[test]
    fn test_require_string_missing() {
        let outputs = parse_outputs(SAMPLE_OUTPUTS).unwrap();

        assert!(matches!(
            require_string(&outputs, "load_balancer_arn"),
            Err(TerraformError::MissingOutput(name)) if name == "load_balancer_arn"
        ));
    }

    #[test]
    fn test_require_string_rejects_non_string() {
        let outputs = parse_outputs(r#"{"count": {"type": "number", "value": 2}}"#).unwrap();

        assert!(matches!(
            require_string(&outputs, "count"),
            Err(TerraformError::NonStringOutput(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let tf = Terraform::new("./terraform");
        assert_eq!(tf.working_dir(), Path::new("./terraform"));

        let err = TerraformError::CommandFailed {
            operation: "apply".to_string(),
            status: Some(1),
        };
        assert_eq!(err.to_string(), "terraform apply failed with exit code 1");
        assert_eq!(
            TerraformError::TerraformNotFound.to_string(),
            "terraform not found. Please install it and make sure it is on PATH"
        );
    }
}
