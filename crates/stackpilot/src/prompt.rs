//! Interactive configuration collection
//!
//! Menus over the injected option catalog. Invalid input always
//! re-prompts; a deliberate interrupt (Ctrl-C) is a clean cancellation,
//! surfaced as `None`. Every prompt has a CLI flag counterpart, and a
//! fully flagged invocation skips the prompts entirely.

use crate::ConfigArgs;
use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use stackpilot_core::config::validate_load_balancer_name;
use stackpilot_core::{DeploymentConfig, OptionCatalog};

fn interrupted(e: &dialoguer::Error) -> bool {
    matches!(e, dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted)
}

/// Turn a dialoguer result into `None` on operator interrupt.
fn prompt_result<T>(result: std::result::Result<T, dialoguer::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if interrupted(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Collect and validate the deployment configuration.
///
/// Returns `Ok(None)` when the operator cancelled. Flag values pass the
/// same catalog validation as menu answers.
pub fn collect_config(
    catalog: &OptionCatalog,
    args: &ConfigArgs,
) -> Result<Option<DeploymentConfig>> {
    let fully_flagged = args.ami.is_some()
        && args.instance_type.is_some()
        && args.availability_zone.is_some()
        && args.lb_name.is_some();

    if !fully_flagged {
        println!();
        println!("{}", "Deployment configuration".bold());
    }

    let ami_id = match &args.ami {
        Some(ami) => ami.clone(),
        None => match select_image(catalog)? {
            Some(id) => id,
            None => return Ok(None),
        },
    };

    let instance_type = match &args.instance_type {
        Some(t) => t.clone(),
        None => match select_from("Select instance type", &catalog.instance_types)? {
            Some(t) => t,
            None => return Ok(None),
        },
    };

    let region = match &args.region {
        Some(r) => r.clone(),
        None if fully_flagged => catalog.region.clone(),
        None => match prompt_region(catalog)? {
            Some(r) => r,
            None => return Ok(None),
        },
    };

    let availability_zone = match &args.availability_zone {
        Some(z) => z.clone(),
        None => match select_from("Select availability zone", &catalog.availability_zones)? {
            Some(z) => z,
            None => return Ok(None),
        },
    };

    let load_balancer_name = match &args.lb_name {
        Some(n) => n.clone(),
        None => match prompt_lb_name()? {
            Some(n) => n,
            None => return Ok(None),
        },
    };

    let config = DeploymentConfig {
        ami_id,
        instance_type,
        region,
        availability_zone,
        load_balancer_name,
    };
    config.validate(catalog)?;

    print_summary(&config);
    Ok(Some(config))
}

fn select_image(catalog: &OptionCatalog) -> Result<Option<String>> {
    let items: Vec<String> = catalog
        .images
        .iter()
        .map(|i| format!("{} ({})", i.label, i.image_id))
        .collect();

    let selection = prompt_result(
        Select::new()
            .with_prompt("Select AMI")
            .items(&items)
            .default(0)
            .interact(),
    )?;

    Ok(selection.map(|i| catalog.images[i].image_id.clone()))
}

fn select_from(prompt: &str, options: &[String]) -> Result<Option<String>> {
    let selection = prompt_result(
        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact(),
    )?;

    Ok(selection.map(|i| options[i].clone()))
}

/// Ask for the region until the allowed one (or empty input for the
/// default) is given. A mismatched region is never silently overridden.
fn prompt_region(catalog: &OptionCatalog) -> Result<Option<String>> {
    loop {
        let answer = match prompt_result(
            Input::<String>::new()
                .with_prompt(format!("AWS region (default {})", catalog.region))
                .allow_empty(true)
                .interact_text(),
        )? {
            Some(a) => a,
            None => return Ok(None),
        };

        let answer = answer.trim();
        if answer.is_empty() || answer == catalog.region {
            return Ok(Some(catalog.region.clone()));
        }

        println!(
            "{}",
            format!(
                "Region '{}' is not allowed, only '{}' is supported.",
                answer, catalog.region
            )
            .yellow()
        );
    }
}

fn prompt_lb_name() -> Result<Option<String>> {
    let name = prompt_result(
        Input::<String>::new()
            .with_prompt("Application load balancer name")
            .validate_with(|input: &String| {
                validate_load_balancer_name(input.trim()).map_err(|e| e.to_string())
            })
            .interact_text(),
    )?;

    Ok(name.map(|n| n.trim().to_string()))
}

/// Final yes/no cleanup confirmation. An interrupt keeps the resources.
pub fn confirm_destroy() -> Result<bool> {
    let answer = prompt_result(
        Confirm::new()
            .with_prompt("Destroy the deployed resources?")
            .default(false)
            .interact(),
    )?;

    Ok(answer.unwrap_or(false))
}

fn print_summary(config: &DeploymentConfig) {
    println!();
    println!("{}", "Configuration summary".bold());
    println!("  AMI:                {}", config.ami_id.cyan());
    println!("  Instance type:      {}", config.instance_type.cyan());
    println!("  Region:             {}", config.region.cyan());
    println!("  Availability zone:  {}", config.availability_zone.cyan());
    println!("  Load balancer:      {}", config.load_balancer_name.cyan());
    println!();
}
