use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceRule;

/// 日历选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarOptions {
    /// 产品标识 (PRODID)
    pub prod_id: String,
    /// 日历名称 (X-WR-CALNAME)
    pub name: Option<String>,
    /// 日历描述 (X-WR-CALDESC)
    pub description: Option<String>,
    /// 时区 (X-WR-TIMEZONE)
    pub timezone: Option<String>,
    /// 方法 (METHOD)
    pub method: Option<String>,
    /// 历法 (CALSCALE)
    pub calendar_scale: Option<String>,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            prod_id: "-//ICSGen//ICSGen Calendar//EN".to_string(),
            name: None,
            description: None,
            timezone: None,
            method: Some("PUBLISH".to_string()),
            calendar_scale: Some("GREGORIAN".to_string()),
        }
    }
}

/// 提醒选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmOptions {
    /// 提前提醒的分钟数
    pub minutes_before: u32,
    /// 提醒内容
    #[serde(default)]
    pub description: Option<String>,
}

/// 事件选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOptions {
    /// 唯一标识，缺省时自动生成
    #[serde(default)]
    pub uid: Option<String>,
    /// 标题
    pub summary: String,
    /// 开始时间
    pub start: DateTime<Utc>,
    /// 结束时间
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// 是否为全天事件，只取开始和结束时间的日期部分
    #[serde(default)]
    pub all_day: bool,
    /// 描述
    #[serde(default)]
    pub description: Option<String>,
    /// 地点
    #[serde(default)]
    pub location: Option<String>,
    /// 地理坐标 (纬度, 经度)
    #[serde(default)]
    pub geo: Option<(f64, f64)>,
    /// 链接
    #[serde(default)]
    pub url: Option<String>,
    /// 分类
    #[serde(default)]
    pub categories: Vec<String>,
    /// 重复规则
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    /// 例外日期 (EXDATE)
    #[serde(default)]
    pub exception_dates: Vec<DateTime<Utc>>,
    /// 提醒
    #[serde(default)]
    pub alarms: Vec<AlarmOptions>,
}

/// 日历文档：日历选项加事件列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDocument {
    /// 日历选项
    #[serde(default)]
    pub calendar: CalendarOptions,
    /// 事件列表，按顺序成为日历的子组件
    #[serde(default)]
    pub events: Vec<EventOptions>,
}
