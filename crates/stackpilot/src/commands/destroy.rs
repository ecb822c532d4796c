//! Destroy every resource tracked in the terraform working directory.

use crate::prompt;
use anyhow::Result;
use colored::Colorize;
use stackpilot_terraform::Terraform;
use std::path::Path;

pub async fn handle(terraform_dir: &Path, yes: bool) -> Result<()> {
    if !terraform_dir.join("main.tf").exists() {
        anyhow::bail!(
            "no manifest found in {} (nothing to destroy)",
            terraform_dir.display()
        );
    }

    if !yes && !prompt::confirm_destroy()? {
        println!("Cleanup cancelled.");
        return Ok(());
    }

    Terraform::check_installed().await?;

    println!("{}", "Destroying resources...".yellow());
    let terraform = Terraform::new(terraform_dir);
    terraform.destroy().await?;

    println!("{}", "Resources destroyed.".green());
    Ok(())
}
