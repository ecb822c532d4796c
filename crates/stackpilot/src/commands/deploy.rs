//! The end-to-end deployment pipeline.
//!
//! Six ordered stages, fail-fast, no rollback: collect configuration,
//! render the manifest, provision through terraform, validate against the
//! AWS API, persist the report, then offer cleanup. A failure after apply
//! leaves the cloud resources in place; only the optional destroy at the
//! end removes them.

use crate::prompt;
use crate::ConfigArgs;
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use stackpilot_aws::{AwsValidator, WaitConfig};
use stackpilot_core::{render_manifest, OptionCatalog, ValidationReport};
use stackpilot_terraform::{require_string, Terraform};
use std::path::Path;

pub async fn handle(
    config_args: &ConfigArgs,
    terraform_dir: &Path,
    output_path: &Path,
    destroy: bool,
    keep: bool,
    no_wait: bool,
) -> Result<()> {
    let catalog = OptionCatalog::default();

    println!("{}", "stackpilot deployment".blue().bold());

    // Stage 1: configuration
    let Some(config) = prompt::collect_config(&catalog, config_args)? else {
        println!("Deployment cancelled.");
        std::process::exit(1);
    };

    // Stage 2: manifest
    println!("{}", "[1/5] Rendering Terraform manifest...".blue());
    let manifest = render_manifest(&config, &catalog)?;
    let manifest_path = super::write_manifest(terraform_dir, &manifest)?;
    println!("  ✓ wrote {}", manifest_path.display());

    // Stage 3: provision
    println!();
    println!("{}", "[2/5] Provisioning with Terraform...".blue());
    let version = Terraform::check_installed().await?;
    println!("  using {}", version);

    let terraform = Terraform::new(terraform_dir);
    terraform.init().await?;
    terraform.plan().await?;
    let outputs = terraform.apply().await?;
    println!("  ✓ infrastructure applied");

    // Validation precondition: both ids must be present before any AWS call
    let instance_id = require_string(&outputs, "instance_id")?;
    let lb_dns = require_string(&outputs, "load_balancer_dns")?;

    // Stage 4: validation
    println!();
    println!("{}", "[3/5] Validating deployment...".blue());
    let validator = AwsValidator::connect(&config.region).await;

    let identity = validator.check_credentials().await?;
    if let Some(account) = &identity.account {
        println!("  ✓ credentials valid (account {})", account);
    } else {
        println!("  ✓ credentials valid");
    }

    let wait = if no_wait {
        WaitConfig::single_attempt()
    } else {
        WaitConfig::default()
    };

    let instance = validator
        .wait_for_instance_running(&instance_id, &wait)
        .await?;
    println!("  ✓ instance {} is {}", instance.instance_id, instance.state);

    let load_balancer = validator
        .wait_for_load_balancer_active(&lb_dns, &wait)
        .await?;
    println!(
        "  ✓ load balancer {} is {}",
        load_balancer.dns_name, load_balancer.state
    );

    // Stage 5: persist
    println!();
    println!("{}", "[4/5] Writing validation report...".blue());
    let report = ValidationReport {
        instance_id: instance.instance_id.clone(),
        instance_state: instance.state.clone(),
        public_ip: instance.public_ip.clone(),
        load_balancer_dns: load_balancer.dns_name.clone(),
        load_balancer_state: load_balancer.state.clone(),
        validated_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)
        .with_context(|| format!("writing {}", output_path.display()))?;
    println!("  ✓ wrote {}", output_path.display());

    print_deployment_summary(&report);

    // Stage 6: cleanup offer. Failure here is reported but never changes
    // the exit status; the deployment itself already completed.
    println!("{}", "[5/5] Cleanup".blue());
    if keep {
        println!("  keeping deployed resources (--keep)");
        return Ok(());
    }

    let confirmed = destroy || prompt::confirm_destroy()?;
    if !confirmed {
        println!("  keeping deployed resources");
        return Ok(());
    }

    match terraform.destroy().await {
        Ok(()) => println!("  ✓ resources destroyed"),
        Err(e) => {
            tracing::warn!("terraform destroy failed: {}", e);
            println!("  {} cleanup failed: {}", "warning:".yellow(), e);
            println!("  run `stackpilot destroy` to retry");
        }
    }

    Ok(())
}

fn print_deployment_summary(report: &ValidationReport) {
    println!();
    println!("{}", "Deployment summary".bold());
    println!("  Instance ID:         {}", report.instance_id.cyan());
    println!("  Instance state:      {}", report.instance_state.cyan());
    println!(
        "  Public IP:           {}",
        report.public_ip.as_deref().unwrap_or("-").cyan()
    );
    println!("  Load balancer DNS:   {}", report.load_balancer_dns.cyan());
    println!(
        "  Load balancer state: {}",
        report.load_balancer_state.cyan()
    );
    println!();
}
