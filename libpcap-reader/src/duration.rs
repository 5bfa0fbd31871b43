use std::ops::{Add, Sub};

/// Reimplementation of std::time::Duration, but panic-free
/// and partial, only to match our needs:
///   - keep nanosecond resolution, so nano-precision captures lose nothing
///   - expose fields
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Duration {
    pub secs: u32,
    pub nanos: u32,
}

pub const NANOS_PER_SEC: u32 = 1_000_000_000;

impl Duration {
    /// Build Duration from secs and nanos
    pub fn new(secs: u32, nanos: u32) -> Duration {
        Duration { secs, nanos }
    }
    /// Test if Duration object is null
    #[inline]
    pub fn is_null(self) -> bool {
        self.secs == 0 && self.nanos == 0
    }
}

impl Add for Duration {
    type Output = Duration;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, other: Duration) -> Self::Output {
        let secs = self.secs.wrapping_add(other.secs);
        let nanos = self.nanos.wrapping_add(other.nanos);
        let (secs, nanos) = if nanos >= NANOS_PER_SEC {
            (secs + (nanos / NANOS_PER_SEC), nanos % NANOS_PER_SEC)
        } else {
            (secs, nanos)
        };

        Duration { secs, nanos }
    }
}

impl Sub for Duration {
    type Output = Duration;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, other: Duration) -> Self::Output {
        let secs = self.secs.wrapping_sub(other.secs);
        let (secs, nanos) = if self.nanos >= other.nanos {
            (secs, self.nanos - other.nanos)
        } else {
            let diff = other.nanos.wrapping_sub(self.nanos);
            let secs_less = diff / NANOS_PER_SEC;
            let nanos = NANOS_PER_SEC - diff;
            (secs.wrapping_sub(1 + secs_less), nanos)
        };

        Duration { secs, nanos }
    }
}
