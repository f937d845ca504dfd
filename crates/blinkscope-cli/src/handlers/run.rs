//! Run command handler: the full bootstrap flow.
//!
//! Sync the companion project, write its default configuration,
//! install dependencies, free a port, launch the dev server, and block
//! until the operator interrupts.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::signal;

use blinkscope_core::events::DevServerEvent;
use blinkscope_core::paths::{ResolvedPaths, ensure_directory};
use blinkscope_core::ports::LaunchConfig;
use blinkscope_core::settings::{
    COMPANION_REPO_URL, DEFAULT_BASE_PORT, DEFAULT_MAX_PORT, DEFAULT_RUNNER,
};
use blinkscope_runtime::{DevServerSupervisor, PortAllocator, SystemPortGuard, run_until_shutdown};

use crate::env_file;
use crate::progress::step_spinner;
use crate::sync;

pub async fn execute(target_url: Option<String>) -> Result<()> {
    println!();
    println!("🔍 BlinkScope - Your friendly local Solana Blinks debugger");
    println!();
    println!("Setting up BlinkScope project...");

    let paths = ResolvedPaths::resolve()?;
    ensure_directory(&paths.data_root)?;

    sync::clone_or_update(&paths.companion_dir, COMPANION_REPO_URL)?;
    env_file::write_defaults(&paths.env_file);
    install_dependencies(&paths.companion_dir).await?;

    let guard = SystemPortGuard::new();
    let allocator = PortAllocator::new(guard, &paths.port_state, DEFAULT_BASE_PORT, DEFAULT_MAX_PORT);
    let port = allocator.allocate().await.with_context(|| {
        format!(
            "Failed to find an available port. Please ensure ports {DEFAULT_BASE_PORT}-{DEFAULT_MAX_PORT} are not in use"
        )
    })?;

    let mut config = LaunchConfig::new(&paths.companion_dir);
    if let Some(url) = target_url {
        config = config.with_target_url(url);
    }

    println!("Starting the development server on port {port}...");
    let supervisor = DevServerSupervisor::new(config);
    let (mut handle, mut events) = supervisor
        .launch(port)
        .context("Failed to start the development server")?;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    run_until_shutdown(&mut handle, &guard, async {
        let _ = signal::ctrl_c().await;
        println!();
        println!("Terminating the development server...");
    })
    .await?;

    Ok(())
}

fn print_event(event: &DevServerEvent) {
    match event {
        DevServerEvent::Ready { url } => {
            println!("✓ Development server started");
            println!();
            println!("Your BlinkScope server is now running!");
            println!("Open your browser and navigate to: {url}");
            println!();
            println!("Press Ctrl+C to stop the server and exit.");
        }
        DevServerEvent::ErrorLine { line } => {
            eprintln!("{line}");
        }
        DevServerEvent::Exited { code } => match code {
            Some(code) => eprintln!("Development server process exited with code {code}"),
            None => eprintln!("Development server process was terminated by a signal"),
        },
    }
}

/// `bun install` inside the companion checkout.
async fn install_dependencies(project_dir: &Path) -> Result<()> {
    let spinner = step_spinner("Installing dependencies...");
    let status = tokio::process::Command::new(DEFAULT_RUNNER)
        .arg("install")
        .current_dir(project_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("Failed to run {DEFAULT_RUNNER} install"))?;
    spinner.finish_and_clear();

    if !status.success() {
        bail!(
            "Dependency installation failed ({DEFAULT_RUNNER} install exited with {:?})",
            status.code()
        );
    }
    println!("✓ Dependencies installed");
    Ok(())
}
