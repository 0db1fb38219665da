use chrono::{FixedOffset, NaiveDateTime};

use crate::{
    Error, Result,
    component::{Child, Component},
    datetime::{DateTimeValue, format_utc_offset},
    property::{PropertyBag, PropertyValue},
    recurrence::RecurrenceRule,
};

/// 时区组件 (VTIMEZONE)
///
/// 只描述时区标识和调用方提供的规则，不查询时区数据库。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    tzid: String,
    rules: Vec<TimezoneRule>,
}

impl Timezone {
    /// 创建时区组件，`tzid` 为空时返回 [`Error::InvalidArgument`]
    pub fn new(tzid: impl Into<String>) -> Result<Self> {
        let tzid = tzid.into();
        if tzid.is_empty() {
            return Err(Error::InvalidArgument("TZID cannot be empty".to_string()));
        }
        Ok(Self::from_tzid(tzid))
    }

    pub(crate) const fn from_tzid(tzid: String) -> Self {
        Self {
            tzid,
            rules: Vec::new(),
        }
    }

    /// 时区标识
    pub fn tzid(&self) -> &str {
        &self.tzid
    }

    /// 添加标准时间或夏令时规则
    pub fn add_rule(&mut self, rule: TimezoneRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// 已添加的规则
    pub fn rules(&self) -> &[TimezoneRule] {
        &self.rules
    }
}

impl Component for Timezone {
    fn component_type(&self) -> &str {
        "VTIMEZONE"
    }

    fn build_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        properties
            .put("TZID", self.tzid.as_str())
            .put("X-LIC-LOCATION", self.tzid.as_str());
        properties
    }

    fn children(&self) -> Vec<Child<'_>> {
        self.rules
            .iter()
            .map(|rule| Child::Borrowed(rule as &dyn Component))
            .collect()
    }
}

/// 时区规则类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneRuleKind {
    /// 标准时间 (STANDARD)
    Standard,
    /// 夏令时 (DAYLIGHT)
    Daylight,
}

/// 时区规则 (STANDARD / DAYLIGHT)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneRule {
    kind: TimezoneRuleKind,
    start: NaiveDateTime,
    offset_from: FixedOffset,
    offset_to: FixedOffset,
    name: Option<String>,
    recurrence: Option<RecurrenceRule>,
}

impl TimezoneRule {
    /// 创建规则，`start` 为本地时间
    pub const fn new(
        kind: TimezoneRuleKind,
        start: NaiveDateTime,
        offset_from: FixedOffset,
        offset_to: FixedOffset,
    ) -> Self {
        Self {
            kind,
            start,
            offset_from,
            offset_to,
            name: None,
            recurrence: None,
        }
    }

    /// 时区缩写 (TZNAME)
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = super::non_empty(name);
        self
    }

    /// 规则的重复方式
    pub fn set_recurrence(&mut self, recurrence: RecurrenceRule) -> &mut Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// 规则类型
    pub const fn kind(&self) -> TimezoneRuleKind {
        self.kind
    }
}

impl Component for TimezoneRule {
    fn component_type(&self) -> &str {
        match self.kind {
            TimezoneRuleKind::Standard => "STANDARD",
            TimezoneRuleKind::Daylight => "DAYLIGHT",
        }
    }

    fn build_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        properties
            .insert(DateTimeValue::Floating(self.start).to_property("DTSTART"))
            .put(
                "TZOFFSETFROM",
                PropertyValue::Raw(format_utc_offset(self.offset_from)),
            )
            .put(
                "TZOFFSETTO",
                PropertyValue::Raw(format_utc_offset(self.offset_to)),
            );

        if let Some(ref recurrence) = self.recurrence {
            properties.put("RRULE", PropertyValue::Raw(recurrence.to_value()));
        }

        if let Some(ref name) = self.name {
            properties.put("TZNAME", name.as_str());
        }

        properties
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::recurrence::Frequency;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn empty_tzid_is_rejected() {
        assert!(matches!(Timezone::new(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn renders_tzid_and_rules() {
        let start = NaiveDate::from_ymd_opt(1970, 3, 29)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        let mut rule = TimezoneRule::new(TimezoneRuleKind::Daylight, start, offset(1), offset(2));
        rule.set_name("CEST").set_recurrence(
            RecurrenceRule::new(Frequency::Yearly)
                .by_month([3])
                .by_day([Weekday::Sun]),
        );

        let mut timezone = Timezone::new("Europe/Berlin").unwrap();
        timezone.add_rule(rule);

        assert_eq!(
            timezone.render(),
            "BEGIN:VTIMEZONE\r\n\
             TZID:Europe/Berlin\r\n\
             X-LIC-LOCATION:Europe/Berlin\r\n\
             BEGIN:DAYLIGHT\r\n\
             DTSTART:19700329T020000\r\n\
             TZOFFSETFROM:+0100\r\n\
             TZOFFSETTO:+0200\r\n\
             RRULE:FREQ=YEARLY;BYDAY=SU;BYMONTH=3\r\n\
             TZNAME:CEST\r\n\
             END:DAYLIGHT\r\n\
             END:VTIMEZONE\r\n"
        );
    }
}
