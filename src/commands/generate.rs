//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::{GenerateReport, Generator};
use crate::Site;

/// Pre-render every known article
pub fn run(site: &Site) -> Result<GenerateReport> {
    let start = Instant::now();

    let workflow = site.workflow()?;
    let report = Generator::new(&workflow, &site.public_dir)?.generate()?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(report)
}

/// Watch content and config, regenerating on change. Blocks until the watcher stops.
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if site.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&site.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", site.content_dir);
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.contains(".DS_Store") && !path.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("Change detected, regenerating...");
                // Reload so config edits take effect
                match Site::new(&site.base_dir).and_then(|site| run(&site)) {
                    Ok(report) => tracing::info!(
                        "Regenerated {} articles ({} upcoming)",
                        report.articles,
                        report.upcoming
                    ),
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}
