use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::io::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::config::Config;
use crate::notify::{DesktopNotifier, Notifier};
use crate::store::{TimerStore, with_store_lock};
use crate::timer::Timer;

/// Run the selected timers in the foreground until every one of them has
/// ended (final notification fired) or Ctrl-C is pressed, then save the
/// collection. Saving resets each timer, so nothing running is ever
/// persisted.
///
/// The loop wakes at the configured refresh cadence and hands the current
/// wall-clock time to every running timer; the timers themselves decide
/// when to ring.
pub async fn run(config: &Config, store: &TimerStore, titles: &[String], all: bool) -> Result<()> {
    let mut timers = store.load()?;

    let selected = select_timers(&timers, titles, all)?;
    if selected.is_empty() {
        bail!("No timers selected. Name one or more timers, or pass --all.");
    }

    let notifier = DesktopNotifier::new(config.notify.app_name.clone());

    let now = Utc::now();
    for &i in &selected {
        timers[i].start(now);
        debug!(title = timers[i].title(), "timer started");
    }
    println!("Running {} timer(s). Press Ctrl-C to stop.", selected.len());

    let mut ticker = tokio::time::interval(Duration::from_millis(config.refresh.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Status line is redrawn in place; track its width to blank leftovers.
    let mut last_width = 0;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!();
                println!("Interrupted.");
                break;
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                let line = render_tick(&mut timers, &selected, now, &notifier);
                print!("\r{:<width$}", line, width = last_width);
                std::io::stdout().flush().ok();
                last_width = line.chars().count();

                if selected.iter().all(|&i| timers[i].ended()) {
                    println!();
                    println!("All timers finished.");
                    break;
                }
            }
        }
    }

    let session = selected.iter().map(|&i| timers[i].clone()).collect();
    save_session(store, session)?;
    Ok(())
}

/// Resolve the command-line selection to timer indices. Unknown titles are
/// an error. Naming the same timer twice selects it once: a second
/// `start()` on a running timer would toggle it straight back off and the
/// session could never finish.
fn select_timers(timers: &[Timer], titles: &[String], all: bool) -> Result<Vec<usize>> {
    if all {
        return Ok((0..timers.len()).collect());
    }

    let mut indices = Vec::with_capacity(titles.len());
    for title in titles {
        let index = timers
            .iter()
            .position(|t| t.title() == title)
            .with_context(|| format!("No timer named '{}'", title))?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    Ok(indices)
}

/// Persist the session's timers under the store lock, merging into the
/// freshest collection rather than overwriting the file with the session's
/// startup snapshot. Timers added or edited by other commands while the
/// session ran survive; session timers overwrite their stored records by
/// title; timers removed during the session stay removed.
fn save_session(store: &TimerStore, session: Vec<Timer>) -> Result<()> {
    with_store_lock(store, |current| {
        for timer in session {
            if let Some(slot) = current.iter_mut().find(|t| t.title() == timer.title()) {
                *slot = timer;
            }
        }
        Ok(())
    })
}

fn render_tick(
    timers: &mut [Timer],
    selected: &[usize],
    now: chrono::DateTime<Utc>,
    notifier: &dyn Notifier,
) -> String {
    let mut segments = Vec::with_capacity(selected.len());
    for &i in selected {
        let timer = &mut timers[i];
        timer.tick(now, notifier);
        let marker = if timer.ended() {
            "done"
        } else if timer.past_end() {
            "overdue"
        } else {
            "left"
        };
        segments.push(format!(
            "{}: {} {}",
            timer.title(),
            timer.remaining_display(),
            marker
        ));
    }
    segments.join(" | ")
}
