use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use multitimer::notify::Notifier;
use multitimer::timer::Timer;
use std::sync::Mutex;

/// Captures notifications instead of hitting the desktop.
#[derive(Default)]
struct RecordingNotifier {
    fired: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn fired(&self) -> Vec<(String, String)> {
        self.fired.lock().unwrap().clone()
    }

    fn count(&self) -> usize {
        self.fired.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.fired
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn at_ms(ms: i64) -> DateTime<Utc> {
    t0() + TimeDelta::milliseconds(ms)
}

#[test]
fn test_no_rings_fires_exactly_once() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("Pasta", "Drain it", 5, 0, 0).unwrap();

    timer.start(t0());
    assert!(timer.running());

    // Before the end date: just a recompute.
    let remaining = timer.tick(at_ms(2_000), &notifier);
    assert_eq!(remaining, TimeDelta::seconds(3));
    assert_eq!(notifier.count(), 0);
    assert!(!timer.past_end());

    // Exactly at the end date the notification is not yet due; the next
    // notification date must strictly have passed.
    timer.tick(at_ms(5_000), &notifier);
    assert_eq!(notifier.count(), 0);

    // Just past the end date: the sole notification, no elapsed suffix.
    timer.tick(at_ms(5_050), &notifier);
    assert_eq!(notifier.fired(), vec![("Pasta".to_string(), "Drain it".to_string())]);
    assert!(timer.past_end());
    assert!(timer.ended());

    // Once ended, nothing more fires.
    timer.tick(at_ms(6_000), &notifier);
    timer.tick(at_ms(60_000), &notifier);
    assert_eq!(notifier.count(), 1);
}

#[test]
fn test_remaining_goes_negative_once_overdue() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("t", "", 5, 0, 0).unwrap();

    timer.start(t0());
    let remaining = timer.tick(at_ms(7_500), &notifier);
    assert_eq!(remaining, TimeDelta::milliseconds(-2_500));
    assert!(timer.remaining_display().starts_with('-'));
}

#[test]
fn test_empty_message_still_notifies() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("silent", "", 1, 0, 0).unwrap();

    timer.start(t0());
    timer.tick(at_ms(1_100), &notifier);
    assert_eq!(notifier.fired(), vec![("silent".to_string(), String::new())]);
}

#[test]
fn test_three_rings_spaced_from_nominal_end_date() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("Cooking", "Ready", 5, 3, 10).unwrap();

    timer.start(t0());

    // First overdue tick: ring 1, no elapsed suffix (no ring fired yet).
    timer.tick(at_ms(5_500), &notifier);
    assert_eq!(notifier.fired()[0].1, "Ready");
    assert_eq!(timer.rings_left(), 2);
    assert!(timer.past_end());
    assert!(!timer.ended());

    // Next ring is anchored at end + 10s, not at tick time + 10s.
    timer.tick(at_ms(14_000), &notifier);
    assert_eq!(notifier.count(), 1);

    // Ring 2 carries the seconds elapsed since the end date.
    timer.tick(at_ms(15_700), &notifier);
    assert_eq!(notifier.fired()[1].1, "Ready\n - 10s !");
    assert_eq!(timer.rings_left(), 1);

    // Ring 3 at end + 20s, even though the previous tick drifted late.
    timer.tick(at_ms(25_900), &notifier);
    assert_eq!(notifier.fired()[2].1, "Ready\n - 20s !");
    assert_eq!(timer.rings_left(), 0);
    assert!(!timer.ended());

    // Final notification at end + 30s consumes no ring and ends the timer.
    timer.tick(at_ms(35_200), &notifier);
    assert_eq!(notifier.fired()[3].1, "Ready\n - 30s !");
    assert!(timer.ended());

    timer.tick(at_ms(60_000), &notifier);
    assert_eq!(notifier.count(), 4);
}

#[test]
fn test_single_extra_ring_scenario() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("Tea", "Ready!", 5, 1, 3).unwrap();

    timer.start(t0());

    // The one configured ring fires plain: no ring has been consumed yet.
    timer.tick(at_ms(5_100), &notifier);
    assert_eq!(notifier.fired()[0], ("Tea".to_string(), "Ready!".to_string()));
    assert_eq!(timer.rings_left(), 0);

    // Final notification three seconds later, suffixed with the whole
    // seconds elapsed since the end date.
    timer.tick(at_ms(8_200), &notifier);
    assert_eq!(
        notifier.fired()[1],
        ("Tea".to_string(), "Ready!\n - 3s !".to_string())
    );
    assert!(timer.ended());
}

#[test]
fn test_stop_freezes_remaining_and_resume_continues() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("t", "", 60, 0, 0).unwrap();

    timer.start(t0());
    timer.tick(at_ms(20_000), &notifier);
    assert_eq!(timer.remaining(), TimeDelta::seconds(40));

    timer.stop(false);
    assert!(!timer.running());

    // Ticking while stopped returns the frozen value, no recompute.
    let remaining = timer.tick(at_ms(30_000), &notifier);
    assert_eq!(remaining, TimeDelta::seconds(40));

    // Resuming counts down from the frozen remaining time.
    timer.start(at_ms(100_000));
    let remaining = timer.tick(at_ms(110_000), &notifier);
    assert_eq!(remaining, TimeDelta::seconds(30));
    assert_eq!(notifier.count(), 0);
}

#[test]
fn test_double_start_toggles_to_stopped() {
    let mut timer = Timer::new("t", "", 60, 0, 0).unwrap();

    timer.start(t0());
    assert!(timer.running());
    timer.start(at_ms(1_000));
    assert!(!timer.running());
}

#[test]
fn test_start_is_noop_after_ended() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("t", "", 1, 0, 0).unwrap();

    timer.start(t0());
    timer.tick(at_ms(1_100), &notifier);
    assert!(timer.ended());

    timer.stop(false);
    timer.start(at_ms(2_000));
    assert!(!timer.running());
}

#[test]
fn test_reset_restores_base_configuration() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("t", "m", 30, 2, 10).unwrap();

    timer.start(t0());
    timer.tick(at_ms(31_000), &notifier);
    timer.tick(at_ms(41_000), &notifier);
    timer.tick(at_ms(51_000), &notifier);
    assert!(timer.ended());
    assert_eq!(timer.rings_left(), 0);

    timer.reset();
    assert!(!timer.running());
    assert!(!timer.ended());
    assert!(!timer.past_end());
    assert!(timer.end_date().is_none());
    assert_eq!(timer.remaining(), TimeDelta::seconds(30));
    assert_eq!(timer.rings_left(), 2);
}

#[test]
fn test_interval_edit_does_not_disrupt_active_countdown() {
    let notifier = RecordingNotifier::default();
    let mut timer = Timer::new("t", "m", 5, 2, 10).unwrap();

    timer.start(t0());
    timer.tick(at_ms(5_500), &notifier);
    assert_eq!(notifier.count(), 1);

    // Editing the interval mid-countdown leaves the in-use snapshot alone:
    // the next ring still comes 10s after the first.
    timer.set_interval(100);
    timer.tick(at_ms(15_500), &notifier);
    assert_eq!(notifier.count(), 2);

    // After a reset the new interval is picked up.
    timer.reset();
    timer.start(at_ms(20_000));
    timer.tick(at_ms(25_500), &notifier);
    assert_eq!(notifier.count(), 3);
    timer.tick(at_ms(36_000), &notifier);
    assert_eq!(notifier.count(), 3, "next ring now 100s out, not 10s");
}
