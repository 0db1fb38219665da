use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    component::Component,
    datetime::{DateTimeValue, format_duration},
    property::{Parameters, PropertyBag, PropertyValue},
};

/// 提醒动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmAction {
    /// 显示提醒
    Display,
    /// 声音提醒
    Audio,
    /// 邮件提醒
    Email,
}

impl fmt::Display for AlarmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Display => "DISPLAY",
            Self::Audio => "AUDIO",
            Self::Email => "EMAIL",
        })
    }
}

/// 提醒触发时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// 相对于事件开始（或结束）的偏移
    Relative { offset: TimeDelta, related_to_end: bool },
    /// 绝对的UTC时间
    Absolute(DateTime<Utc>),
}

impl Trigger {
    /// 事件开始前 `before` 触发
    pub fn before_start(before: TimeDelta) -> Self {
        Self::Relative {
            offset: -before,
            related_to_end: false,
        }
    }

    /// 事件结束前 `before` 触发
    pub fn before_end(before: TimeDelta) -> Self {
        Self::Relative {
            offset: -before,
            related_to_end: true,
        }
    }
}

/// 提醒组件 (VALARM)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    action: AlarmAction,
    trigger: Trigger,
    description: Option<String>,
    summary: Option<String>,
    repeat: Option<(u32, TimeDelta)>,
}

impl Alarm {
    /// 创建提醒
    pub const fn new(action: AlarmAction, trigger: Trigger) -> Self {
        Self {
            action,
            trigger,
            description: None,
            summary: None,
            repeat: None,
        }
    }

    /// 显示提醒
    pub fn display(trigger: Trigger, description: impl Into<String>) -> Self {
        let mut alarm = Self::new(AlarmAction::Display, trigger);
        alarm.set_description(description);
        alarm
    }

    /// 提醒内容
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = super::non_empty(description);
        self
    }

    /// 提醒标题 (EMAIL提醒使用)
    pub fn set_summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.summary = super::non_empty(summary);
        self
    }

    /// 额外重复 `count` 次，间隔 `interval`
    pub fn set_repeat(&mut self, count: u32, interval: TimeDelta) -> &mut Self {
        self.repeat = Some((count, interval));
        self
    }

    /// 触发时间
    pub const fn trigger(&self) -> &Trigger {
        &self.trigger
    }
}

impl Component for Alarm {
    fn component_type(&self) -> &str {
        "VALARM"
    }

    fn build_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        properties.put("ACTION", PropertyValue::Raw(self.action.to_string()));

        match self.trigger {
            Trigger::Relative {
                offset,
                related_to_end,
            } => {
                let params = if related_to_end {
                    Parameters::new().with("RELATED", "END")
                } else {
                    Parameters::new()
                };
                properties.put_with("TRIGGER", PropertyValue::Raw(format_duration(offset)), params);
            }
            Trigger::Absolute(at) => {
                let value = DateTimeValue::Utc(at);
                properties.put_with(
                    "TRIGGER",
                    PropertyValue::Raw(value.value()),
                    Parameters::new().with("VALUE", "DATE-TIME"),
                );
            }
        }

        if let Some(ref description) = self.description {
            properties.put("DESCRIPTION", description.as_str());
        }

        if let Some(ref summary) = self.summary {
            properties.put("SUMMARY", summary.as_str());
        }

        if let Some((count, interval)) = self.repeat {
            properties
                .put("REPEAT", PropertyValue::Raw(count.to_string()))
                .put("DURATION", PropertyValue::Raw(format_duration(interval)));
        }

        properties
    }
}
