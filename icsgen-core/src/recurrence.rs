use std::fmt;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::datetime::format_utc;

/// 重复频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    /// 每秒
    Secondly,
    /// 每分钟
    Minutely,
    /// 每小时
    Hourly,
    /// 每天
    Daily,
    /// 每周
    Weekly,
    /// 每月
    Monthly,
    /// 每年
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        };
        f.write_str(name)
    }
}

/// 重复规则 (RRULE)
///
/// 只负责序列化，不做展开计算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// 重复频率
    pub frequency: Frequency,
    /// 重复间隔 (每N个频率单位)
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// 结束时间 (UNTIL)
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    /// 重复次数 (COUNT)
    #[serde(default)]
    pub count: Option<u32>,
    /// 星期几 (BYDAY)
    #[serde(default)]
    pub by_day: Vec<Weekday>,
    /// 每月第几天 (BYMONTHDAY)，负数表示倒数
    #[serde(default)]
    pub by_month_day: Vec<i8>,
    /// 月份 (BYMONTH)
    #[serde(default)]
    pub by_month: Vec<u32>,
    /// 一周的起始日 (WKST)
    #[serde(default)]
    pub week_start: Option<Weekday>,
}

const fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    /// 按频率创建规则，间隔默认为1
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            until: None,
            count: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            week_start: None,
        }
    }

    /// 每周重复
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    /// 重复间隔
    pub fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// 截止时间 (UNTIL)
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// 重复次数 (COUNT)
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// BYDAY
    pub fn by_day(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.by_day = days.into_iter().collect();
        self
    }

    /// BYMONTHDAY
    pub fn by_month_day(mut self, days: impl IntoIterator<Item = i8>) -> Self {
        self.by_month_day = days.into_iter().collect();
        self
    }

    /// BYMONTH
    pub fn by_month(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.by_month = months.into_iter().collect();
        self
    }

    /// 每周起始日 (WKST)
    pub fn week_start(mut self, day: Weekday) -> Self {
        self.week_start = Some(day);
        self
    }

    /// 生成RRULE的值部分，例如 `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE`
    pub fn to_value(&self) -> String {
        let mut rule = format!("FREQ={}", self.frequency);

        if self.interval > 1 {
            rule.push_str(&format!(";INTERVAL={}", self.interval));
        }

        if let Some(until) = self.until {
            rule.push_str(&format!(";UNTIL={}", format_utc(&until)));
        }

        if let Some(count) = self.count {
            rule.push_str(&format!(";COUNT={count}"));
        }

        if !self.by_day.is_empty() {
            let days: Vec<&str> = self.by_day.iter().copied().map(weekday_code).collect();
            rule.push_str(&format!(";BYDAY={}", days.join(",")));
        }

        if !self.by_month_day.is_empty() {
            rule.push_str(&format!(";BYMONTHDAY={}", join_numbers(&self.by_month_day)));
        }

        if !self.by_month.is_empty() {
            rule.push_str(&format!(";BYMONTH={}", join_numbers(&self.by_month)));
        }

        if let Some(day) = self.week_start {
            rule.push_str(&format!(";WKST={}", weekday_code(day)));
        }

        rule
    }
}

/// 星期的两字母代码
pub const fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn join_numbers<T: ToString>(numbers: &[T]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn weekly_with_until_and_days() {
        let until = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let rule = RecurrenceRule::weekly()
            .interval(2)
            .until(until)
            .by_day([Weekday::Mon, Weekday::Wed]);

        assert_eq!(
            rule.to_value(),
            "FREQ=WEEKLY;INTERVAL=2;UNTIL=20240701T000000Z;BYDAY=MO,WE"
        );
    }

    #[test]
    fn interval_of_one_is_omitted() {
        assert_eq!(
            RecurrenceRule::new(Frequency::Daily).count(10).to_value(),
            "FREQ=DAILY;COUNT=10"
        );
    }

    #[test]
    fn monthly_parts() {
        let rule = RecurrenceRule::new(Frequency::Monthly)
            .by_month_day([1, -1])
            .by_month([1, 6])
            .week_start(Weekday::Sun);

        assert_eq!(
            rule.to_value(),
            "FREQ=MONTHLY;BYMONTHDAY=1,-1;BYMONTH=1,6;WKST=SU"
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let rule: RecurrenceRule =
            serde_json::from_str(r#"{"frequency":"YEARLY","count":3}"#).unwrap();

        assert_eq!(rule, RecurrenceRule::new(Frequency::Yearly).count(3));
    }
}
