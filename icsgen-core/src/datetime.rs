//! Date, time, duration and offset formatting for property values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::property::{Parameters, Property, PropertyValue};

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

const SECONDS_PER_DAY: u64 = 86_400;

/// 格式化UTC时间，例如 `20240426T113000Z`
pub fn format_utc(value: &DateTime<Utc>) -> String {
    value.format(UTC_FORMAT).to_string()
}

/// 格式化不带时区的本地时间，例如 `20240426T113000`
pub fn format_local(value: &NaiveDateTime) -> String {
    value.format(LOCAL_FORMAT).to_string()
}

/// 格式化日期，例如 `20240426`
pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// 格式化时长 (RFC 5545 §3.3.6)，例如 `-PT15M`、`P1DT2H`、`P2W`
pub fn format_duration(value: TimeDelta) -> String {
    let total = value.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    if total == 0 {
        return "PT0S".to_string();
    }

    let days = total / SECONDS_PER_DAY;
    let rest = total % SECONDS_PER_DAY;

    if rest == 0 && days % 7 == 0 {
        return format!("{sign}P{}W", days / 7);
    }

    let mut formatted = format!("{sign}P");
    if days > 0 {
        formatted.push_str(&format!("{days}D"));
    }
    if rest > 0 {
        let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);
        formatted.push('T');
        if hours > 0 {
            formatted.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            formatted.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 {
            formatted.push_str(&format!("{seconds}S"));
        }
    }
    formatted
}

/// 格式化UTC偏移 (RFC 5545 §3.3.14)，例如 `+0800`、`-0330`
pub fn format_utc_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    if seconds == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{seconds:02}")
    }
}

/// 日期时间属性值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeValue {
    /// UTC时间
    Utc(DateTime<Utc>),
    /// 浮动时间，不绑定时区
    Floating(NaiveDateTime),
    /// 指定时区下的本地时间，输出 `TZID` 参数
    Zoned { tzid: String, local: NaiveDateTime },
    /// 全天日期，输出 `VALUE=DATE`
    Date(NaiveDate),
}

impl DateTimeValue {
    /// 带TZID参数的本地时间
    pub fn zoned(tzid: impl Into<String>, local: NaiveDateTime) -> Self {
        Self::Zoned {
            tzid: tzid.into(),
            local,
        }
    }

    /// 值部分
    pub fn value(&self) -> String {
        match self {
            Self::Utc(value) => format_utc(value),
            Self::Floating(value) | Self::Zoned { local: value, .. } => format_local(value),
            Self::Date(value) => format_date(value),
        }
    }

    /// 需要随值一起输出的参数
    pub fn params(&self) -> Parameters {
        match self {
            Self::Utc(_) | Self::Floating(_) => Parameters::new(),
            Self::Zoned { tzid, .. } => Parameters::new().with("TZID", tzid.as_str()),
            Self::Date(_) => Parameters::new().with("VALUE", "DATE"),
        }
    }

    pub(crate) fn to_property(&self, name: &'static str) -> Property {
        Property::known(name, PropertyValue::Raw(self.value()), self.params())
    }
}

impl From<DateTime<Utc>> for DateTimeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Utc(value)
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Floating(value)
    }
}

impl From<NaiveDate> for DateTimeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}
