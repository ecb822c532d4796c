//! Render the Terraform manifest without deploying anything.
//!
//! Useful for reviewing what a configuration produces; needs neither the
//! terraform binary nor AWS credentials.

use crate::prompt;
use crate::ConfigArgs;
use anyhow::Result;
use colored::Colorize;
use stackpilot_core::{render_manifest, OptionCatalog};
use std::path::Path;

pub fn handle(config_args: &ConfigArgs, terraform_dir: &Path) -> Result<()> {
    let catalog = OptionCatalog::default();

    let Some(config) = prompt::collect_config(&catalog, config_args)? else {
        println!("Cancelled.");
        std::process::exit(1);
    };

    let manifest = render_manifest(&config, &catalog)?;
    let path = super::write_manifest(terraform_dir, &manifest)?;

    println!("{} {}", "Manifest written to".green(), path.display());
    Ok(())
}
