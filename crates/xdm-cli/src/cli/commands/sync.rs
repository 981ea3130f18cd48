//! `xdm sync` – resolve every marker and fetch what it names.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use xdm_core::config::XdmConfig;
use xdm_core::manifest;
use xdm_core::orchestrator::{self, FetchEvent, FetchOptions};
use xdm_core::plan::plan_fetches;
use xdm_core::transport::CurlTransport;

pub async fn run_sync(cfg: &XdmConfig, manifest_path: &Path, jobs: Option<usize>) -> Result<()> {
    let workspaces = manifest::load_workspaces(manifest_path)?;
    let plan = plan_fetches(&workspaces, cfg);
    if plan.marker_count() == 0 {
        println!("No reference markers found.");
        return Ok(());
    }

    for fetch in &plan.pending {
        println!("{}", fetch.source_url);
    }
    for marker in &plan.unresolved {
        println!("skipped: {}", marker.error);
    }
    let unresolved = plan.unresolved.len();

    let mut opts = FetchOptions::from_config(cfg);
    if let Some(n) = jobs {
        opts.max_concurrent = (n > 0).then_some(n);
    }
    let transport = Arc::new(CurlTransport::new(&cfg.transport()));

    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<FetchEvent>(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event.result {
                Ok(bytes) => println!(
                    "downloaded {} -> {} ({} bytes)",
                    event.source_url,
                    event.destination_path.display(),
                    bytes
                ),
                Err(e) => println!("failed {}: {}", event.source_url, e),
            }
        }
    });

    let report = orchestrator::run_fetches(plan.pending, transport, opts, Some(event_tx)).await;
    let _ = printer.await;

    println!(
        "{} of {} fetch(es) succeeded, {} marker(s) unresolved",
        report.succeeded, report.attempted, unresolved
    );
    if !report.is_success() || unresolved > 0 {
        anyhow::bail!(
            "{} of {} fetches failed, {} marker(s) unresolved",
            report.failed(),
            report.attempted,
            unresolved
        );
    }
    Ok(())
}
