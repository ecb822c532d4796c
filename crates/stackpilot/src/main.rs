mod commands;
mod prompt;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stackpilot")]
#[command(version)]
#[command(about = "Interactive AWS infrastructure deployer built on Terraform", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Deployment parameters; any omitted value is asked for interactively
#[derive(Args, Default)]
struct ConfigArgs {
    /// AMI id (must be one of the catalog options)
    #[arg(long)]
    ami: Option<String>,

    /// EC2 instance type (must be one of the catalog options)
    #[arg(long)]
    instance_type: Option<String>,

    /// Availability zone (must be one of the catalog options)
    #[arg(long)]
    availability_zone: Option<String>,

    /// Application load balancer name (1-32 characters)
    #[arg(long)]
    lb_name: Option<String>,

    /// AWS region (only the catalog region is accepted)
    #[arg(long, env = "STACKPILOT_REGION")]
    region: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the infrastructure end to end and validate it
    Deploy {
        #[command(flatten)]
        config: ConfigArgs,

        /// Terraform working directory
        #[arg(long, default_value = "./terraform")]
        terraform_dir: PathBuf,

        /// Path of the JSON validation report
        #[arg(long, default_value = "aws_validation.json")]
        output: PathBuf,

        /// Destroy the resources at the end without asking
        #[arg(long, conflicts_with = "keep")]
        destroy: bool,

        /// Skip the cleanup offer entirely
        #[arg(long)]
        keep: bool,

        /// Check resource state once instead of waiting for readiness
        #[arg(long)]
        no_wait: bool,
    },
    /// Render the Terraform manifest without touching the cloud
    Render {
        #[command(flatten)]
        config: ConfigArgs,

        /// Terraform working directory
        #[arg(long, default_value = "./terraform")]
        terraform_dir: PathBuf,
    },
    /// Destroy every resource tracked in the working directory
    Destroy {
        /// Terraform working directory
        #[arg(long, default_value = "./terraform")]
        terraform_dir: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Check the terraform installation and AWS credentials
    Check,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Deploy {
            config,
            terraform_dir,
            output,
            destroy,
            keep,
            no_wait,
        } => {
            commands::deploy::handle(&config, &terraform_dir, &output, destroy, keep, no_wait)
                .await
        }
        Commands::Render {
            config,
            terraform_dir,
        } => commands::render::handle(&config, &terraform_dir),
        Commands::Destroy { terraform_dir, yes } => {
            commands::destroy::handle(&terraform_dir, yes).await
        }
        Commands::Check => commands::check::handle().await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
