use chrono::Utc;
use multitimer::store::{TimerStore, with_store_lock};
use multitimer::timer::Timer;
use tempfile::tempdir;

#[test]
fn test_empty_store_yields_example_timers() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    let timers = store.load().unwrap();
    let titles: Vec<&str> = timers.iter().map(|t| t.title()).collect();
    assert_eq!(titles, vec!["Cooking", "Playing time", "Working hours"]);
    assert!(timers.iter().all(|t| !t.running()));
}

#[test]
fn test_roundtrip_restores_configuration() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    let mut timers = vec![
        Timer::new("Tea", "Ready!", 300, 1, 3).unwrap(),
        Timer::new("Laundry", "", 45 * 60, 0, 0).unwrap(),
    ];
    store.save(&mut timers).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);

    let tea = &loaded[0];
    assert_eq!(tea.title(), "Tea");
    assert_eq!(tea.message(), "Ready!");
    assert_eq!(tea.duration_secs(), 300);
    assert_eq!(tea.rings(), 1);
    assert_eq!(tea.interval_secs(), 3);

    let laundry = &loaded[1];
    assert_eq!(laundry.title(), "Laundry");
    assert_eq!(laundry.rings(), 0);
}

#[test]
fn test_save_resets_running_timers() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    let mut timer = Timer::new("Tea", "Ready!", 300, 0, 0).unwrap();
    timer.start(Utc::now());
    assert!(timer.running());

    let mut timers = vec![timer];
    store.save(&mut timers).unwrap();

    // The in-memory timer was forced through reset on save.
    assert!(!timers[0].running());
    assert!(timers[0].end_date().is_none());

    let loaded = store.load().unwrap();
    assert!(!loaded[0].running());
    assert_eq!(loaded[0].remaining(), chrono::TimeDelta::seconds(300));
}

#[test]
fn test_locked_edit_persists() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    // First locked edit materializes the defaults plus the new timer.
    with_store_lock(&store, |timers| {
        timers.push(Timer::new("Extra", "", 10, 0, 0)?);
        Ok(())
    })
    .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 4);
    assert!(loaded.iter().any(|t| t.title() == "Extra"));
}

#[test]
fn test_failed_edit_is_not_saved() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    let result: anyhow::Result<()> = with_store_lock(&store, |timers| {
        timers.clear();
        anyhow::bail!("nope");
    });
    assert!(result.is_err());

    // Nothing was written, so a fresh load still sees the defaults.
    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 3);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let store = TimerStore::open(dir.path());

    std::fs::write(dir.path().join("timers.json"), "{ not json").unwrap();
    assert!(store.load().is_err());
}
