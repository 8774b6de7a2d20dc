// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use namespace_provisioner::assemble::OutputMode;
use namespace_provisioner::config::Config;
use namespace_provisioner::generator::Generator;
use namespace_provisioner::request::ManifestRequest;

/// Generate the Kubernetes manifests that provision a project namespace
#[derive(Parser, Debug)]
#[command(name = "namespace-provisioner", version, about)]
struct Cli {
    /// Provisioning request as a JSON document
    #[arg(short = 'g', long, value_name = "JSON", required_unless_present = "show_defaults")]
    generate: Option<String>,

    /// Emit one flat array instead of one array per template
    #[arg(long)]
    flat: bool,

    /// Render every template with its built-in defaults
    #[arg(long, conflicts_with = "generate")]
    show_defaults: bool,
}

fn main() -> Result<()> {
    // stdout carries the manifest document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Arguments: {:?}", cli);

    let request = match &cli.generate {
        Some(json) => Some(ManifestRequest::from_json(json.as_bytes())?),
        None => None,
    };

    let mut config = Config::from_env()?;
    if cli.flat {
        config.output = OutputMode::Flat;
    }

    let generator = Generator::from_config(&config)?;
    info!("Loaded {} templates", generator.templates().len());

    let document = match request {
        Some(request) => generator.generate(&request)?,
        None => generator.show_defaults()?,
    };

    println!("{}", document);
    Ok(())
}
