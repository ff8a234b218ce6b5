use core::fmt::{Display, Formatter};
use embassy_time::Instant;

/// Time since boot, printed as `HH:MM:SS`. The node has no wall clock, so
/// diagnostic lines are stamped with uptime.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Uptime(Instant);

impl Uptime {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Instant::from_secs(secs))
    }
}

impl Display for Uptime {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let secs = self.0.as_secs();
        write!(
            f,
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_format() {
        assert_eq!("00:00:00", Uptime::from_secs(0).to_string());
        assert_eq!("01:02:03", Uptime::from_secs(3723).to_string());
        assert_eq!("100:00:59", Uptime::from_secs(360_059).to_string());
    }
}
