//! Preflight check: terraform on PATH, AWS credentials usable.

use anyhow::Result;
use colored::Colorize;
use stackpilot_aws::AwsValidator;
use stackpilot_core::OptionCatalog;
use stackpilot_terraform::Terraform;

pub async fn handle() -> Result<()> {
    let catalog = OptionCatalog::default();

    let version = Terraform::check_installed().await?;
    println!("{} {}", "✓".green(), version);

    let validator = AwsValidator::connect(&catalog.region).await;
    let identity = validator.check_credentials().await?;
    println!(
        "{} AWS credentials valid in {} (account {}, {})",
        "✓".green(),
        validator.region(),
        identity.account.as_deref().unwrap_or("unknown"),
        identity.arn.as_deref().unwrap_or("unknown arn"),
    );

    Ok(())
}
