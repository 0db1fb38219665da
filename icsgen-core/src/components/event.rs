use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{
    Result,
    component::{Child, Component},
    datetime::{DateTimeValue, format_duration},
    property::{Parameters, Property, PropertyBag, PropertyValue},
    recurrence::RecurrenceRule,
};

use super::{Alarm, non_empty};

/// 事件自身输出的单值属性，不能作为自定义属性添加
const RESERVED_PROPERTIES: &[&str] = &[
    "UID",
    "DTSTAMP",
    "DTSTART",
    "DTEND",
    "DURATION",
    "SUMMARY",
    "DESCRIPTION",
    "LOCATION",
    "GEO",
    "URL",
    "STATUS",
    "TRANSP",
    "CLASS",
    "SEQUENCE",
    "ORGANIZER",
    "RRULE",
    "CREATED",
    "LAST-MODIFIED",
];

/// 组织者 (ORGANIZER)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organizer {
    /// 日历地址，例如 `mailto:someone@example.com`
    pub address: String,
    /// 显示名称 (CN)
    pub name: Option<String>,
}

impl Organizer {
    /// 以日历地址创建组织者
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// 设置显示名称 (CN)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    fn to_property(&self) -> Property {
        let mut params = Parameters::new();
        if let Some(ref name) = self.name {
            params = params.with("CN", name.as_str());
        }
        Property::known("ORGANIZER", PropertyValue::Raw(self.address.clone()), params)
    }
}

/// 参与者 (ATTENDEE)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attendee {
    /// 日历地址，例如 `mailto:someone@example.com`
    pub address: String,
    /// 显示名称 (CN)
    pub name: Option<String>,
    /// 参与角色 (ROLE)，例如 `REQ-PARTICIPANT`
    pub role: Option<String>,
    /// 参与状态 (PARTSTAT)，例如 `NEEDS-ACTION`
    pub participation_status: Option<String>,
    /// 是否需要回复 (RSVP)
    pub rsvp: bool,
}

impl Attendee {
    /// 以日历地址创建参与者
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// 设置显示名称 (CN)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    /// 设置参与角色
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = non_empty(role);
        self
    }

    /// 设置参与状态
    pub fn with_participation_status(mut self, status: impl Into<String>) -> Self {
        self.participation_status = non_empty(status);
        self
    }

    /// 设置是否需要回复
    pub fn with_rsvp(mut self, rsvp: bool) -> Self {
        self.rsvp = rsvp;
        self
    }

    fn to_property(&self) -> Property {
        let mut params = Parameters::new();
        if let Some(ref name) = self.name {
            params = params.with("CN", name.as_str());
        }
        if let Some(ref role) = self.role {
            params = params.with("ROLE", role.as_str());
        }
        if let Some(ref status) = self.participation_status {
            params = params.with("PARTSTAT", status.as_str());
        }
        if self.rsvp {
            params = params.with("RSVP", "TRUE");
        }
        Property::known("ATTENDEE", PropertyValue::Raw(self.address.clone()), params)
    }
}

/// 事件组件 (VEVENT)
///
/// `UID` 和 `DTSTAMP` 在创建时确定，之后多次渲染输出保持一致。
#[derive(Debug, Clone)]
pub struct Event {
    uid: String,
    stamp: DateTime<Utc>,
    start: Option<DateTimeValue>,
    end: Option<DateTimeValue>,
    duration: Option<TimeDelta>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    geo: Option<(f64, f64)>,
    url: Option<String>,
    status: Option<String>,
    transparency: Option<String>,
    classification: Option<String>,
    sequence: Option<u32>,
    organizer: Option<Organizer>,
    attendees: Vec<Attendee>,
    categories: Vec<String>,
    recurrence: Option<RecurrenceRule>,
    exception_dates: Vec<DateTimeValue>,
    created: Option<DateTime<Utc>>,
    last_modified: Option<DateTime<Utc>>,
    custom: Vec<Property>,
    alarms: Vec<Alarm>,
}

impl Event {
    /// 创建事件，生成随机UID并记录当前时间为DTSTAMP
    pub fn new() -> Self {
        Self::with_uid(Uuid::new_v4().to_string())
    }

    /// 使用指定UID创建事件
    pub fn with_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            stamp: Utc::now(),
            start: None,
            end: None,
            duration: None,
            summary: None,
            description: None,
            location: None,
            geo: None,
            url: None,
            status: None,
            transparency: None,
            classification: None,
            sequence: None,
            organizer: None,
            attendees: Vec::new(),
            categories: Vec::new(),
            recurrence: None,
            exception_dates: Vec::new(),
            created: None,
            last_modified: None,
            custom: Vec::new(),
            alarms: Vec::new(),
        }
    }

    /// 事件UID
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// 替换UID
    pub fn set_uid(&mut self, uid: impl Into<String>) -> &mut Self {
        self.uid = uid.into();
        self
    }

    /// 替换DTSTAMP
    pub fn set_stamp(&mut self, stamp: DateTime<Utc>) -> &mut Self {
        self.stamp = stamp;
        self
    }

    /// 设置开始时间
    pub fn set_start(&mut self, start: impl Into<DateTimeValue>) -> &mut Self {
        self.start = Some(start.into());
        self
    }

    /// 设置结束时间，清除已设置的时长
    pub fn set_end(&mut self, end: impl Into<DateTimeValue>) -> &mut Self {
        self.end = Some(end.into());
        self.duration = None;
        self
    }

    /// 设置时长，清除已设置的结束时间
    pub fn set_duration(&mut self, duration: TimeDelta) -> &mut Self {
        self.duration = Some(duration);
        self.end = None;
        self
    }

    /// 设置标题，空字符串表示清除
    pub fn set_summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.summary = non_empty(summary);
        self
    }

    /// 设置描述
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = non_empty(description);
        self
    }

    /// 设置地点
    pub fn set_location(&mut self, location: impl Into<String>) -> &mut Self {
        self.location = non_empty(location);
        self
    }

    /// 地理坐标 (纬度, 经度)
    pub const fn set_geo(&mut self, latitude: f64, longitude: f64) -> &mut Self {
        self.geo = Some((latitude, longitude));
        self
    }

    /// 设置链接
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = non_empty(url);
        self
    }

    /// 状态，例如 `CONFIRMED`、`TENTATIVE`、`CANCELLED`
    pub fn set_status(&mut self, status: impl Into<String>) -> &mut Self {
        self.status = non_empty(status);
        self
    }

    /// 忙闲透明度，`OPAQUE` 或 `TRANSPARENT`
    pub fn set_transparency(&mut self, transparency: impl Into<String>) -> &mut Self {
        self.transparency = non_empty(transparency);
        self
    }

    /// 访问级别，例如 `PUBLIC`、`PRIVATE`
    pub fn set_classification(&mut self, classification: impl Into<String>) -> &mut Self {
        self.classification = non_empty(classification);
        self
    }

    /// 设置修订序号
    pub const fn set_sequence(&mut self, sequence: u32) -> &mut Self {
        self.sequence = Some(sequence);
        self
    }

    /// 设置组织者
    pub fn set_organizer(&mut self, organizer: Organizer) -> &mut Self {
        self.organizer = Some(organizer);
        self
    }

    /// 添加参与者，每人一行 ATTENDEE
    pub fn add_attendee(&mut self, attendee: Attendee) -> &mut Self {
        self.attendees.push(attendee);
        self
    }

    /// 添加分类，所有分类合并为一行 CATEGORIES
    pub fn add_category(&mut self, category: impl Into<String>) -> &mut Self {
        self.categories.push(category.into());
        self
    }

    /// 设置重复规则
    pub fn set_recurrence(&mut self, recurrence: RecurrenceRule) -> &mut Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// 添加例外日期，每个日期一行 EXDATE
    pub fn add_exception_date(&mut self, date: impl Into<DateTimeValue>) -> &mut Self {
        self.exception_dates.push(date.into());
        self
    }

    /// 设置创建时间
    pub fn set_created(&mut self, created: DateTime<Utc>) -> &mut Self {
        self.created = Some(created);
        self
    }

    /// 设置最后修改时间
    pub fn set_last_modified(&mut self, last_modified: DateTime<Utc>) -> &mut Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// 添加自定义属性 (通常是 `X-` 属性)
    ///
    /// 名称非法或与事件自身输出的单值属性同名 (如 `UID`、`DTSTAMP`) 时返回 [`crate::Error::InvalidProperty`]
    pub fn add_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self> {
        self.custom
            .push(Property::custom(name, value, RESERVED_PROPERTIES)?);
        Ok(self)
    }

    /// 添加提醒子组件
    pub fn add_alarm(&mut self, alarm: Alarm) -> &mut Self {
        self.alarms.push(alarm);
        self
    }

    /// 已添加的提醒
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Event {
    fn component_type(&self) -> &str {
        "VEVENT"
    }

    fn build_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        properties
            .put("UID", self.uid.as_str())
            .insert(DateTimeValue::Utc(self.stamp).to_property("DTSTAMP"));

        if let Some(ref start) = self.start {
            properties.insert(start.to_property("DTSTART"));
        }

        if let Some(ref end) = self.end {
            properties.insert(end.to_property("DTEND"));
        } else if let Some(duration) = self.duration {
            properties.put("DURATION", PropertyValue::Raw(format_duration(duration)));
        }

        if let Some(ref summary) = self.summary {
            properties.put("SUMMARY", summary.as_str());
        }

        if let Some(ref description) = self.description {
            properties.put("DESCRIPTION", description.as_str());
        }

        if let Some(ref location) = self.location {
            properties.put("LOCATION", location.as_str());
        }

        if let Some((latitude, longitude)) = self.geo {
            properties.put(
                "GEO",
                PropertyValue::Raw(format!("{latitude:.6};{longitude:.6}")),
            );
        }

        if let Some(ref url) = self.url {
            properties.put("URL", PropertyValue::Raw(url.clone()));
        }

        if let Some(ref status) = self.status {
            properties.put("STATUS", PropertyValue::Raw(status.clone()));
        }

        if let Some(ref transparency) = self.transparency {
            properties.put("TRANSP", PropertyValue::Raw(transparency.clone()));
        }

        if let Some(ref classification) = self.classification {
            properties.put("CLASS", PropertyValue::Raw(classification.clone()));
        }

        if let Some(sequence) = self.sequence {
            properties.put("SEQUENCE", PropertyValue::Raw(sequence.to_string()));
        }

        if let Some(ref organizer) = self.organizer {
            properties.insert(organizer.to_property());
        }

        for attendee in &self.attendees {
            properties.push(attendee.to_property());
        }

        if !self.categories.is_empty() {
            properties.put("CATEGORIES", self.categories.clone());
        }

        if let Some(ref recurrence) = self.recurrence {
            properties.put("RRULE", PropertyValue::Raw(recurrence.to_value()));
        }

        for date in &self.exception_dates {
            properties.append("EXDATE", PropertyValue::Raw(date.value()), date.params());
        }

        if let Some(created) = self.created {
            properties.insert(DateTimeValue::Utc(created).to_property("CREATED"));
        }

        if let Some(last_modified) = self.last_modified {
            properties.insert(DateTimeValue::Utc(last_modified).to_property("LAST-MODIFIED"));
        }

        properties.extend(self.custom.iter().cloned());
        properties
    }

    fn children(&self) -> Vec<Child<'_>> {
        self.alarms
            .iter()
            .map(|alarm| Child::Borrowed(alarm as &dyn Component))
            .collect()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
