//! 日期时间类型模块
//!
//! 本模块定义了日期、时间、日期时间和持续时间的线上表示。
//! 服务端返回的 DateTime 和 Time 均为 UTC，读取时按会话的时区偏移转换为本地时间。

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// 简单日期表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateValue {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateValue {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue {
            year: 1970,
            month: 1,
            day: 1,
        }
    }
}

impl std::fmt::Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// 简单时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct TimeValue {
    pub hour: u32,
    pub minute: u32,
    pub sec: u32,
    pub microsec: u32,
}

impl TimeValue {
    pub fn new(hour: u32, minute: u32, sec: u32, microsec: u32) -> Self {
        Self {
            hour,
            minute,
            sec,
            microsec,
        }
    }

    /// 将 UTC 时间按时区偏移（东区为正，单位秒）转换为本地时间，跨天时回绕
    ///
    /// 字段非法时返回 None
    pub fn to_local(&self, offset_secs: i32) -> Option<TimeValue> {
        let time = NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.sec, self.microsec)?;
        let (local, _) = time.overflowing_add_signed(TimeDelta::seconds(offset_secs as i64));
        Some(TimeValue {
            hour: local.hour(),
            minute: local.minute(),
            sec: local.second(),
            microsec: local.nanosecond() / 1000,
        })
    }
}

impl std::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:06}",
            self.hour, self.minute, self.sec, self.microsec
        )
    }
}

/// 简单日期时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateTimeValue {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub sec: u32,
    pub microsec: u32,
}

impl DateTimeValue {
    pub fn new(date: DateValue, time: TimeValue) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            hour: time.hour,
            minute: time.minute,
            sec: time.sec,
            microsec: time.microsec,
        }
    }

    pub fn date(&self) -> DateValue {
        DateValue::new(self.year, self.month, self.day)
    }

    pub fn time(&self) -> TimeValue {
        TimeValue::new(self.hour, self.minute, self.sec, self.microsec)
    }

    fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_micro_opt(self.hour, self.minute, self.sec, self.microsec)
    }

    fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            sec: dt.second(),
            microsec: dt.nanosecond() / 1000,
        }
    }

    /// 将 UTC 日期时间按时区偏移转换为本地日期时间
    ///
    /// 字段非法或结果越界时返回 None
    pub fn to_local(&self, offset_secs: i32) -> Option<DateTimeValue> {
        let utc = self.to_naive()?;
        let local = utc.checked_add_signed(TimeDelta::seconds(offset_secs as i64))?;
        Some(Self::from_naive(local))
    }
}

impl Default for DateTimeValue {
    fn default() -> Self {
        Self::new(DateValue::default(), TimeValue::default())
    }
}

impl std::fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}T{}", self.date(), self.time())
    }
}

/// 简单持续时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct DurationValue {
    pub seconds: i64,
    pub microseconds: i32,
    pub months: i32,
}

impl std::fmt::Display for DurationValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total_micros = self.seconds as i128 * 1_000_000 + self.microseconds as i128;
        let sign = if total_micros < 0 { "-" } else { "" };
        let abs = total_micros.unsigned_abs();
        write!(
            f,
            "P{}MT{}{}.{:06}S",
            self.months,
            sign,
            abs / 1_000_000,
            abs % 1_000_000
        )
    }
}
