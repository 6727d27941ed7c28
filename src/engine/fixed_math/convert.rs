use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::num::{DECIMALS, SCALE};
use super::{FixedNum, ParseFixedError};

impl FixedNum {
    /// Convert a float, truncating toward zero. Out-of-range values saturate and NaN maps to zero.
    ///
    /// # Warning
    /// Only use at configuration or input boundaries. NEVER inside the tick.
    pub fn from_f64(value: f64) -> Self {
        Self::from_raw((value * SCALE as f64) as i64)
    }

    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// For display and rendering only.
    pub fn to_f64(self) -> f64 {
        self.raw() as f64 / SCALE as f64
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Seconds as fixed-point, truncated to whole microseconds (one raw unit).
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_raw(i64::try_from(duration.as_micros()).unwrap_or(i64::MAX))
    }

    /// The value as a duration in seconds; `None` if negative.
    pub fn to_duration(self) -> Option<Duration> {
        let micros = u64::try_from(self.raw()).ok()?;
        Some(Duration::from_micros(micros))
    }
}

impl From<i32> for FixedNum {
    fn from(value: i32) -> Self {
        Self::from_int(i64::from(value))
    }
}

impl From<u32> for FixedNum {
    fn from(value: u32) -> Self {
        Self::from_int(i64::from(value))
    }
}

impl From<Duration> for FixedNum {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl fmt::Display for FixedNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.raw().unsigned_abs();
        let scale = SCALE as u64;
        write!(
            f,
            "{sign}{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = DECIMALS
        )
    }
}

impl fmt::Debug for FixedNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for FixedNum {
    type Err = ParseFixedError;

    /// Parse `[-+]digits[.digits]` with at most six fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseFixedError::Empty);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(ParseFixedError::InvalidDigit);
        }
        if frac_part.len() > DECIMALS {
            return Err(ParseFixedError::TooManyFractionalDigits);
        }

        let accumulate = |acc: u64, b: u8| -> Result<u64, ParseFixedError> {
            acc.checked_mul(10)
                .and_then(|a| a.checked_add(u64::from(b - b'0')))
                .ok_or(ParseFixedError::OutOfRange)
        };

        let whole = int_part.bytes().try_fold(0u64, accumulate)?;
        let mut fraction = frac_part.bytes().try_fold(0u64, accumulate)?;
        for _ in frac_part.len()..DECIMALS {
            fraction *= 10;
        }

        let magnitude = whole
            .checked_mul(SCALE as u64)
            .and_then(|m| m.checked_add(fraction))
            .ok_or(ParseFixedError::OutOfRange)?;

        let raw = if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        };

        raw.map(FixedNum::from_raw).ok_or(ParseFixedError::OutOfRange)
    }
}
