//! Watch the asset tree and compress on changes
//!
//! Two threads of control: notify delivers raw events on its own
//! thread, where the filter chain runs and posts into the single-slot
//! mailbox; this task drains the mailbox once per tick and performs all
//! archive I/O here. The mailbox is the only synchronization point
//! between the two sides.

use crate::util;
use anyhow::Result;
use mpk_core::bootstrap;
use mpk_watcher::{ChangeWatcher, EventSource, Job, Mailbox, NotifySource};
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub async fn run(tick_override: Option<u64>) -> Result<()> {
    // 1. Open the project and hydrate a fresh checkout before any
    //    watcher event can race the initial extraction
    let organizer = Arc::new(util::open_organizer()?);
    bootstrap::ensure_hydrated(&organizer);

    // 2. Shared runtime state
    let auto_mode = Arc::new(AtomicBool::new(organizer.config().watch.auto_compress));
    let mailbox = Arc::new(Mailbox::new());
    let tick = Duration::from_millis(tick_override.unwrap_or(organizer.config().watch.tick_ms));

    if !auto_mode.load(Ordering::Relaxed) {
        println!(
            "{}",
            "Automatic mode is off; events will be ignored (enable with 'mpk auto on')".yellow()
        );
    }

    // 3. Subscribe the notification source
    let mut source = NotifySource::new();
    let events = source.subscribe(organizer.layout().asset_root())?;

    // 4. Filter chain runs off the notification callback, on its own thread
    let watcher = ChangeWatcher::new(
        organizer.layout().staging_dir().to_path_buf(),
        organizer.layout().archive_path().to_path_buf(),
        auto_mode.clone(),
        organizer.guard().clone(),
        mailbox.clone(),
    );
    let forward = std::thread::spawn(move || watcher.run(&events));

    println!(
        "Watching {} (tick every {} ms)",
        organizer.layout().asset_root().display().to_string().cyan(),
        tick.as_millis()
    );
    println!("{}", "Press Ctrl-C to stop".dimmed());

    // 5. Drain loop: one mailbox take per tick; all archive work stays
    //    on this task
    let mut ticker = tokio::time::interval(tick);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(job) = mailbox.take() {
                    match job {
                        Job::Compress => {
                            debug!("draining scheduled compression");
                            organizer.compress();
                        }
                    }
                }
            }
            _ = &mut shutdown => {
                println!();
                println!("Stopping watcher");
                break;
            }
        }
    }

    // 6. Dropping the source disconnects the forward thread's receiver
    drop(source);
    let _ = forward.join();

    Ok(())
}
