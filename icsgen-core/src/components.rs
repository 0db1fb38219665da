//! Concrete calendar components.

mod alarm;
mod calendar;
mod event;
mod timezone;

pub use alarm::{Alarm, AlarmAction, Trigger};
pub use calendar::Calendar;
pub use event::{Attendee, Event, Organizer};
pub use timezone::{Timezone, TimezoneRule, TimezoneRuleKind};

/// 空字符串视为未设置
fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}
