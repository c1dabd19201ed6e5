//! Resend countdown for OTPs
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval};

/// How long the user has to wait before a new OTP can be requested
pub const RESEND_COOLDOWN_SECS: u32 = 120;

const TICK: Duration = Duration::from_secs(1);

/// The countdown itself, without any clock attached.
///
/// Never goes below zero. Once it hits zero, resending becomes possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    seconds_remaining: u32,
    can_resend: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(RESEND_COOLDOWN_SECS)
    }
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds_remaining: seconds,
            can_resend: seconds == 0,
        }
    }

    /// Apply one elapsed second
    pub fn tick(&mut self) {
        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
        }
        if self.seconds_remaining == 0 {
            self.can_resend = true;
        }
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn can_resend(&self) -> bool {
        self.can_resend
    }

    pub fn is_finished(&self) -> bool {
        self.seconds_remaining == 0
    }
}

/// A [`Countdown`] driven by the tokio clock.
///
/// There's no background task: whoever owns the timer polls [`OtpTimer::tick`]
/// from their event loop. Dropping the timer cancels it.
#[derive(Debug)]
pub struct OtpTimer {
    countdown: Countdown,
    interval: Option<Interval>,
}

impl OtpTimer {
    /// A timer counting down from [`RESEND_COOLDOWN_SECS`]
    pub fn start() -> Self {
        Self {
            countdown: Countdown::default(),
            interval: Some(Self::clock()),
        }
    }

    /// Restart at [`RESEND_COOLDOWN_SECS`] with resending disabled again
    pub fn reset(&mut self) {
        tracing::debug!("Resetting OTP resend timer");
        self.countdown = Countdown::default();
        self.interval = Some(Self::clock());
    }

    /// Stop counting. The remaining time is kept as is.
    pub fn cancel(&mut self) {
        self.interval = None;
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next second to pass and apply it.
    ///
    /// Returns `true` for the tick that made resending possible.
    /// Never completes while the timer is cancelled or finished.
    pub async fn tick(&mut self) -> bool {
        let Some(interval) = self.interval.as_mut() else {
            return std::future::pending().await;
        };

        interval.tick().await;
        self.countdown.tick();

        if self.countdown.is_finished() {
            tracing::debug!("OTP resend timer finished");
            self.interval = None;
        }

        self.countdown.can_resend() && self.interval.is_none()
    }

    fn clock() -> Interval {
        // The first tick of a plain `interval` fires immediately
        interval_at(Instant::now() + TICK, TICK)
    }
}

/// Format seconds as `mm:ss`
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
