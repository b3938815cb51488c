//! Printable report rows and the value splitting they carry.
//!
//! Rows are pre-digested for presentation layers: times are scaled to the
//! largest sub-second unit that keeps the value at or above 1.0 and split
//! into integer/fractional parts, percentages likewise. The splitting mirrors
//! what text renderers need to column-align and color digits without
//! re-parsing strings.

use std::fmt;

use crate::clock::ticks_to_seconds;

/// Unit a scaled time value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Milliseconds.
    Millis,
    /// Microseconds.
    Micros,
    /// Nanoseconds.
    Nanos,
}

impl TimeUnit {
    /// Short label for the unit ("s", "ms", "us", "ns").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Millis => "ms",
            Self::Micros => "us",
            Self::Nanos => "ns",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A duration scaled into a display unit and split for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledTime {
    /// Integer part of the scaled value.
    pub int_part: u64,
    /// Fractional part of the scaled value; zero at microseconds and below.
    pub frac_part: f32,
    /// Unit the value is expressed in.
    pub unit: TimeUnit,
}

impl ScaledTime {
    /// Scale a duration in seconds into the largest unit that keeps the
    /// value at or above 1.0, stepping at most down to nanoseconds.
    pub fn from_seconds(seconds: f64) -> Self {
        let mut value = seconds;
        let mut unit_ups = 0;
        while value < 1.0 && unit_ups < 3 {
            value *= 1000.0;
            unit_ups += 1;
        }

        let int_part = value as u64;
        let unit = match unit_ups {
            0 => TimeUnit::Seconds,
            1 => TimeUnit::Millis,
            2 => TimeUnit::Micros,
            _ => TimeUnit::Nanos,
        };
        // Below a microsecond the fraction is clock noise; drop it.
        let frac_part = match unit {
            TimeUnit::Seconds | TimeUnit::Millis => (value - int_part as f64) as f32,
            TimeUnit::Micros | TimeUnit::Nanos => 0.0,
        };
        Self {
            int_part,
            frac_part,
            unit,
        }
    }

    /// Scale a tick span at the given tick rate.
    pub fn from_ticks(ticks: u64, ticks_per_second: u64) -> Self {
        Self::from_seconds(ticks_to_seconds(ticks, ticks_per_second))
    }

    /// The scaled value reassembled as a float.
    pub fn value(&self) -> f64 {
        self.int_part as f64 + self.frac_part as f64
    }
}

impl fmt::Display for ScaledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TimeUnit::Micros | TimeUnit::Nanos => {
                write!(f, "{} {}", self.int_part, self.unit)
            }
            TimeUnit::Seconds | TimeUnit::Millis => {
                write!(f, "{:.2} {}", self.value(), self.unit)
            }
        }
    }
}

/// A percentage split into integer and fractional parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPercent {
    /// Integer part of the percentage.
    pub int_part: u32,
    /// Fractional part of the percentage.
    pub frac_part: f32,
}

impl SplitPercent {
    /// Percentage of `part` within `whole`; a zero `whole` yields 0%.
    pub fn from_ratio(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self {
                int_part: 0,
                frac_part: 0.0,
            };
        }
        let percent = part as f64 / whole as f64 * 100.0;
        let int_part = percent as u32;
        Self {
            int_part,
            frac_part: (percent - int_part as f64) as f32,
        }
    }

    /// The percentage reassembled as a float.
    pub fn value(&self) -> f32 {
        self.int_part as f32 + self.frac_part
    }
}

impl fmt::Display for SplitPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.value())
    }
}

/// One printable row of a flat or nested report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// Nesting depth; always 0 in flat reports.
    pub indent: usize,
    /// Region name.
    pub name: String,
    /// How many calls were merged into this row.
    pub call_count: u32,
    /// Share of the whole frame spent in this row, descendants included.
    pub total_time_percent: SplitPercent,
    /// Total time, descendants included.
    pub total_time: ScaledTime,
    /// Share of the whole frame attributable to this row alone.
    pub self_time_percent: SplitPercent,
    /// Time attributable to this row alone.
    pub self_time: ScaledTime,
}

pub(super) fn make_line(
    name: &str,
    indent: usize,
    call_count: u32,
    total_ticks: u64,
    self_ticks: u64,
    frame_total_ticks: u64,
    ticks_per_second: u64,
) -> ReportLine {
    ReportLine {
        indent,
        name: name.to_owned(),
        call_count,
        total_time_percent: SplitPercent::from_ratio(total_ticks, frame_total_ticks),
        total_time: ScaledTime::from_ticks(total_ticks, ticks_per_second),
        self_time_percent: SplitPercent::from_ratio(self_ticks, frame_total_ticks),
        self_time: ScaledTime::from_ticks(self_ticks, ticks_per_second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_the_first_unit_at_or_above_one() {
        let half_second = ScaledTime::from_seconds(0.5);
        assert_eq!(half_second.unit, TimeUnit::Millis);
        assert_eq!(half_second.int_part, 500);

        let seconds = ScaledTime::from_seconds(1.5);
        assert_eq!(seconds.unit, TimeUnit::Seconds);
        assert_eq!(seconds.int_part, 1);
        assert!((seconds.frac_part - 0.5).abs() < 1e-6);

        let micros = ScaledTime::from_seconds(0.000_25);
        assert_eq!(micros.unit, TimeUnit::Micros);
        assert_eq!(micros.int_part, 250);
        assert_eq!(micros.frac_part, 0.0);

        let nanos = ScaledTime::from_seconds(0.000_000_5);
        assert_eq!(nanos.unit, TimeUnit::Nanos);
        assert_eq!(nanos.int_part, 500);
    }

    #[test]
    fn zero_duration_bottoms_out_at_nanoseconds() {
        let zero = ScaledTime::from_seconds(0.0);
        assert_eq!(zero.unit, TimeUnit::Nanos);
        assert_eq!(zero.int_part, 0);
        assert_eq!(zero.frac_part, 0.0);
    }

    #[test]
    fn from_ticks_uses_the_tick_rate() {
        let time = ScaledTime::from_ticks(15, 1_000);
        assert_eq!(time.unit, TimeUnit::Millis);
        assert_eq!(time.int_part, 15);
    }

    #[test]
    fn percent_splits_integer_and_fraction() {
        let two_thirds = SplitPercent::from_ratio(10, 15);
        assert_eq!(two_thirds.int_part, 66);
        assert!((two_thirds.value() - 66.666_67).abs() < 0.01);

        let all = SplitPercent::from_ratio(15, 15);
        assert_eq!(all.int_part, 100);
        assert_eq!(all.frac_part, 0.0);
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        let percent = SplitPercent::from_ratio(10, 0);
        assert_eq!(percent.int_part, 0);
        assert_eq!(percent.frac_part, 0.0);
    }

    #[test]
    fn display_forms_are_stable() {
        assert_eq!(ScaledTime::from_seconds(0.0155).to_string(), "15.50 ms");
        assert_eq!(ScaledTime::from_seconds(0.000_25).to_string(), "250 us");
        assert_eq!(SplitPercent::from_ratio(1, 3).to_string(), "33.3%");
    }
}
