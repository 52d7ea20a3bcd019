use anyhow::{Context, Result, bail};

use crate::OutputFormat;
use crate::store::{StoredTimer, TimerStore, with_store_lock};
use crate::timer::Timer;
use crate::timer::duration::{parse_duration, split_duration};

fn parse_duration_arg(input: &str) -> Result<u32> {
    parse_duration(input).context(format!(
        "Invalid duration '{}', expected seconds or [HH:]MM:SS",
        input
    ))
}

pub fn add(
    store: &TimerStore,
    title: &str,
    duration: &str,
    message: &str,
    rings: u32,
    interval: u32,
) -> Result<()> {
    let duration = parse_duration_arg(duration)?;

    with_store_lock(store, |timers| {
        if timers.iter().any(|t| t.title() == title) {
            bail!("A timer named '{}' already exists", title);
        }

        let timer = Timer::new(title, message, duration, rings, interval)?;
        println!(
            "✓ Added timer '{}' ({}, {} extra rings)",
            timer.title(),
            timer.duration_display(),
            timer.rings()
        );
        timers.push(timer);
        Ok(())
    })
}

#[derive(Debug, Default)]
pub struct EditArgs {
    pub rename: Option<String>,
    pub message: Option<String>,
    pub duration: Option<String>,
    pub rings: Option<u32>,
    pub interval: Option<u32>,
}

pub fn edit(store: &TimerStore, title: &str, args: EditArgs) -> Result<()> {
    let duration = args.duration.as_deref().map(parse_duration_arg).transpose()?;

    with_store_lock(store, |timers| {
        if let Some(new_title) = &args.rename {
            if new_title != title && timers.iter().any(|t| t.title() == new_title) {
                bail!("A timer named '{}' already exists", new_title);
            }
        }

        let timer = timers
            .iter_mut()
            .find(|t| t.title() == title)
            .with_context(|| format!("No timer named '{}'", title))?;

        if let Some(new_title) = args.rename {
            timer.set_title(new_title)?;
        }
        if let Some(message) = args.message {
            timer.set_message(message)?;
        }
        if let Some(duration) = duration {
            timer.set_duration(duration);
        }
        if let Some(rings) = args.rings {
            timer.set_rings(rings);
        }
        if let Some(interval) = args.interval {
            timer.set_interval(interval);
        }

        // Stored timers are always at rest, so the edit takes effect
        // immediately through the reset performed on save.
        println!("✓ Updated timer '{}'", timer.title());
        Ok(())
    })
}

pub fn remove(store: &TimerStore, title: &str) -> Result<()> {
    with_store_lock(store, |timers| {
        let index = timers
            .iter()
            .position(|t| t.title() == title)
            .with_context(|| format!("No timer named '{}'", title))?;
        timers.remove(index);
        println!("✓ Removed timer '{}'", title);
        Ok(())
    })
}

pub fn list(store: &TimerStore, format: OutputFormat) -> Result<()> {
    // Read-only: no lock needed, stale data is acceptable here.
    let timers = store.load()?;

    match format {
        OutputFormat::Json => {
            let records: Vec<StoredTimer> = timers.iter().map(StoredTimer::from).collect();
            let json =
                serde_json::to_string_pretty(&records).context("Failed to serialize timers")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if timers.is_empty() {
                println!("No timers.");
                return Ok(());
            }
            for timer in &timers {
                println!(
                    "{:<18} {:>12}  rings={:<2} interval={}s  {}",
                    timer.title(),
                    timer.duration_display(),
                    timer.rings(),
                    timer.interval_secs(),
                    timer.message()
                );
            }
        }
    }

    Ok(())
}

pub fn show(store: &TimerStore, title: &str) -> Result<()> {
    let timers = store.load()?;
    let timer = timers
        .iter()
        .find(|t| t.title() == title)
        .with_context(|| format!("No timer named '{}'", title))?;

    let (hours, minutes, seconds) = split_duration(timer.duration_secs());

    println!("Timer:");
    println!("  Title: {}", timer.title());
    println!("  Message: {}", timer.message());
    println!(
        "  Duration: {} ({}h {}m {}s)",
        timer.duration_display(),
        hours,
        minutes,
        seconds
    );
    println!("  Extra rings: {}", timer.rings());
    println!("  Ring interval: {}s", timer.interval_secs());

    Ok(())
}
