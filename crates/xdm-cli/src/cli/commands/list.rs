//! `xdm list` – resolve markers and print the fetch plan.

use anyhow::Result;
use std::path::Path;
use xdm_core::config::XdmConfig;
use xdm_core::manifest;
use xdm_core::plan::plan_fetches;

pub fn run_list(cfg: &XdmConfig, manifest_path: &Path) -> Result<()> {
    let workspaces = manifest::load_workspaces(manifest_path)?;
    let plan = plan_fetches(&workspaces, cfg);
    if plan.marker_count() == 0 {
        println!("No reference markers found.");
        return Ok(());
    }
    for fetch in &plan.pending {
        println!("{}\t{}", fetch.source_url, fetch.destination_path.display());
    }
    for marker in &plan.unresolved {
        println!("unresolved\t{}", marker.error);
    }
    Ok(())
}
