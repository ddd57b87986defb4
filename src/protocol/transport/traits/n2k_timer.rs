//! Asynchronous delay used for Fast Packet inter-frame spacing and by the
//! telemetry runner to sleep until the next deadline.

pub trait N2kTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}

/// Timer backed by the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimer;

impl N2kTimer for EmbassyTimer {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a {
        embassy_time::Timer::after_millis(millis as u64)
    }
}
