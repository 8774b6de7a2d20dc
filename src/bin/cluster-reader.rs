// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use namespace_provisioner::kubernetes::{create_client, inspect_namespace};

/// Report the role binding subjects and quota limits of a namespace
#[derive(Parser, Debug)]
#[command(name = "cluster-reader", version, about)]
struct Cli {
    /// Path to the kubeconfig file
    #[arg(long)]
    kubeconfig: PathBuf,

    /// Kubeconfig context to connect with
    #[arg(long)]
    context: String,

    /// Namespace to inspect
    #[arg(long)]
    namespace: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = create_client(&cli.kubeconfig, &cli.context).await?;
    info!("Connected to cluster via context '{}'", cli.context);

    let report = inspect_namespace(&client, &cli.namespace).await?;

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
