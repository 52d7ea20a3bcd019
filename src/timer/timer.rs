use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ValidationError;
use crate::notify::Notifier;
use crate::timer::duration::{format_duration, format_secs};
use crate::timer::{MAX_MESSAGE_CHARS, MAX_NAME_CHARS};

/// A named countdown with optional repeated rings after it elapses.
///
/// The timer never sleeps or schedules anything itself: an external driver
/// calls [`Timer::tick`] periodically with the current wall-clock time, and
/// the timer decides from its absolute `end_date` / `next_notify` timestamps
/// whether a notification is due. Behavior is therefore identical whatever
/// the tick cadence.
#[derive(Debug, Clone)]
pub struct Timer {
    title: String,
    message: String,

    /// Base countdown length in seconds. Source of truth for resets.
    duration: u32,

    /// Remaining time, sub-second precision. Recomputed on every tick while
    /// running; frozen at its last value while stopped.
    remaining: TimeDelta,

    /// Configured number of extra rings after the end date.
    rings: u32,
    /// Rings not yet fired. Re-synced from `rings` on reset.
    rings_left: u32,

    /// Configured seconds between extra rings.
    interval: u32,
    /// Interval snapshot actually used while ringing. Re-synced on reset.
    interval_in_use: u32,

    /// When the countdown nominally elapses. Set on start, cleared on reset.
    end_date: Option<DateTime<Utc>>,
    /// When the next notification is due. Starts at `end_date` and advances
    /// by `interval_in_use` after each extra ring.
    next_notify: Option<DateTime<Utc>>,

    running: bool,
    /// True once a notification date has passed. Stays set until reset.
    past_end: bool,
    /// True once the final notification fired. No further notifications
    /// until reset.
    ended: bool,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(ValidationError::TitleLength {
            len,
            max: MAX_NAME_CHARS,
        });
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    let len = message.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageLength {
            len,
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(())
}

impl Timer {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        duration: u32,
        rings: u32,
        interval: u32,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let message = message.into();
        validate_title(&title)?;
        validate_message(&message)?;

        let mut timer = Self {
            title,
            message,
            duration,
            remaining: TimeDelta::seconds(i64::from(duration)),
            rings,
            rings_left: 0,
            interval,
            interval_in_use: 0,
            end_date: None,
            next_notify: None,
            running: false,
            past_end: false,
            ended: false,
        };
        timer.sync_ring_config();
        Ok(timer)
    }

    //
    // Accessors

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Base countdown length in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration
    }

    pub fn rings(&self) -> u32 {
        self.rings
    }

    pub fn rings_left(&self) -> u32 {
        self.rings_left
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval
    }

    pub fn remaining(&self) -> TimeDelta {
        self.remaining
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn past_end(&self) -> bool {
        self.past_end
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Base duration in display form, e.g. `"10m 00s"`.
    pub fn duration_display(&self) -> String {
        format_secs(i64::from(self.duration))
    }

    /// Remaining time in display form. Negative once overdue.
    pub fn remaining_display(&self) -> String {
        format_duration(self.remaining)
    }

    //
    // Configuration edits

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), ValidationError> {
        let message = message.into();
        validate_message(&message)?;
        self.message = message;
        Ok(())
    }

    /// Update the base duration. The remaining time of an active countdown
    /// is untouched; the new value takes effect on the next [`Timer::reset`].
    pub fn set_duration(&mut self, secs: u32) {
        self.duration = secs;
    }

    /// Update the configured ring count. Takes effect on the next
    /// [`Timer::reset`], never mid-countdown.
    pub fn set_rings(&mut self, rings: u32) {
        self.rings = rings;
    }

    /// Update the configured seconds between rings. Takes effect on the next
    /// [`Timer::reset`], never mid-countdown.
    pub fn set_interval(&mut self, secs: u32) {
        self.interval = secs;
    }

    /// Copy the configured ring count and interval into the working fields
    /// used while ringing. Called from construction and [`Timer::reset`];
    /// deliberately never called mid-countdown so edits cannot disrupt an
    /// active timer.
    pub fn sync_ring_config(&mut self) {
        if self.rings != self.rings_left {
            self.rings_left = self.rings;
        }
        if self.interval != self.interval_in_use {
            self.interval_in_use = self.interval;
        }
    }

    //
    // State transitions

    /// Start counting down from the current remaining time.
    ///
    /// No-op once ended. Calling `start` on an already-running timer stops
    /// it instead: the same control doubles as start and stop.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.ended {
            return;
        }
        if self.running {
            self.stop(false);
            return;
        }

        let end = now + self.remaining;
        self.end_date = Some(end);
        self.next_notify = Some(end);
        self.running = true;
    }

    /// Stop the countdown, freezing the remaining time where it stands.
    /// No-op when not running. With `reset`, additionally restores the
    /// timer to its base configuration.
    pub fn stop(&mut self, reset: bool) {
        if !self.running {
            return;
        }
        self.running = false;
        if reset {
            self.reset();
        }
    }

    /// Recompute the remaining time and fire any notification that has come
    /// due. Returns the remaining time in every case; does nothing but
    /// return it when the timer is not running.
    ///
    /// Once `next_notify` has passed:
    /// - while extra rings remain, one ring fires per tick and `next_notify`
    ///   advances by the interval from its previous value, so ring spacing
    ///   is anchored to the nominal end date rather than to tick timing;
    /// - with no rings left, the final notification fires once and the
    ///   timer is marked ended.
    ///
    /// Ring notifications append the time elapsed since the end date, except
    /// the very first ring of a freshly elapsed timer (`rings_left` still at
    /// its configured value). The final notification carries the suffix only
    /// when extra rings were configured at all.
    pub fn tick(&mut self, now: DateTime<Utc>, notifier: &dyn Notifier) -> TimeDelta {
        if self.running {
            // Running implies both dates were set by start().
            if let (Some(end), Some(next)) = (self.end_date, self.next_notify) {
                self.remaining = end - now;

                let to_next_notify = next - now;
                if to_next_notify < TimeDelta::zero() {
                    self.past_end = true;

                    // Whole seconds elapsed since the nominal end date, for
                    // the notification suffix.
                    let elapsed = format_secs((now - end).num_seconds());

                    if self.rings_left > 0 {
                        let mut message = self.message.clone();
                        if self.rings != self.rings_left {
                            message.push_str(&format!("\n - {elapsed} !"));
                        }
                        notifier.notify(&self.title, &message);

                        self.next_notify =
                            Some(next + TimeDelta::seconds(i64::from(self.interval_in_use)));
                        self.rings_left -= 1;
                        return self.remaining;
                    }

                    if !self.ended {
                        let message = if self.rings > 0 {
                            format!("{}\n - {elapsed} !", self.message)
                        } else {
                            self.message.clone()
                        };
                        notifier.notify(&self.title, &message);
                        self.ended = true;
                    }
                }
            }
        }

        self.remaining
    }

    /// Restore the timer to its configured state: base duration back in
    /// `remaining`, dates and flags cleared, ring configuration re-synced.
    pub fn reset(&mut self) {
        if self.running {
            self.stop(false);
        }
        self.remaining = TimeDelta::seconds(i64::from(self.duration));
        self.end_date = None;
        self.next_notify = None;
        self.past_end = false;
        self.ended = false;
        self.sync_ring_config();
    }
}
