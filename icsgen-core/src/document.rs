use chrono::TimeDelta;

use crate::{
    CalendarDocument, CalendarOptions, EventOptions, Result,
    components::{Alarm, Calendar, Event, Trigger},
};

const DEFAULT_ALARM_DESCRIPTION: &str = "Reminder";

impl CalendarDocument {
    /// 从JSON加载日历文档
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 构建日历组件树
    pub fn build(&self) -> Result<Calendar> {
        let mut calendar = self.calendar.build()?;

        for options in &self.events {
            calendar.add_event(options.build());
        }

        tracing::debug!(
            prod_id = calendar.prod_id(),
            events = self.events.len(),
            "built calendar from document"
        );

        Ok(calendar)
    }
}

impl CalendarOptions {
    /// 构建不含子组件的日历，`prod_id` 为空时失败
    pub fn build(&self) -> Result<Calendar> {
        let mut calendar = Calendar::new(self.prod_id.as_str())?;

        if let Some(ref method) = self.method {
            calendar.set_method(method.as_str());
        }
        if let Some(ref calendar_scale) = self.calendar_scale {
            calendar.set_calendar_scale(calendar_scale.as_str());
        }
        if let Some(ref name) = self.name {
            calendar.set_name(name.as_str());
        }
        if let Some(ref description) = self.description {
            calendar.set_description(description.as_str());
        }
        if let Some(ref timezone) = self.timezone {
            calendar.set_timezone(timezone.as_str());
        }

        Ok(calendar)
    }
}

impl EventOptions {
    /// 构建事件组件
    pub fn build(&self) -> Event {
        let mut event = match self.uid {
            Some(ref uid) => Event::with_uid(uid.as_str()),
            None => Event::new(),
        };

        event.set_summary(self.summary.as_str());

        if self.all_day {
            event.set_start(self.start.date_naive());
            if let Some(end) = self.end {
                event.set_end(end.date_naive());
            }
        } else {
            event.set_start(self.start);
            if let Some(end) = self.end {
                event.set_end(end);
            }
        }

        if let Some(ref description) = self.description {
            event.set_description(description.as_str());
        }
        if let Some(ref location) = self.location {
            event.set_location(location.as_str());
        }
        if let Some((latitude, longitude)) = self.geo {
            event.set_geo(latitude, longitude);
        }
        if let Some(ref url) = self.url {
            event.set_url(url.as_str());
        }
        for category in &self.categories {
            event.add_category(category.as_str());
        }
        if let Some(ref recurrence) = self.recurrence {
            event.set_recurrence(recurrence.clone());
        }
        for date in &self.exception_dates {
            event.add_exception_date(*date);
        }

        for alarm in &self.alarms {
            let trigger = Trigger::before_start(TimeDelta::minutes(i64::from(alarm.minutes_before)));
            let description = alarm
                .description
                .as_deref()
                .unwrap_or(DEFAULT_ALARM_DESCRIPTION);
            event.add_alarm(Alarm::display(trigger, description));
        }

        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, component::Component};

    const DOCUMENT: &str = r#"{
        "calendar": {
            "prod_id": "-//CQUPT ICS//CQUPT Course Calendar//CN",
            "name": "课程表",
            "timezone": "Asia/Shanghai"
        },
        "events": [
            {
                "uid": "course-1@example.com",
                "summary": "高等数学 - 4307",
                "start": "2024-03-04T00:00:00Z",
                "end": "2024-03-04T01:40:00Z",
                "location": "重庆邮电大学第四教学楼",
                "geo": [29.536107, 106.608759],
                "recurrence": {"frequency": "WEEKLY", "count": 16, "by_day": ["Mon"]},
                "exception_dates": ["2024-04-01T00:00:00Z"],
                "alarms": [{"minutes_before": 15, "description": "课程提醒"}]
            },
            {
                "summary": "劳动节",
                "start": "2024-05-01T00:00:00Z",
                "end": "2024-05-06T00:00:00Z",
                "all_day": true
            }
        ]
    }"#;

    #[test]
    fn builds_calendar_from_json() {
        let document = CalendarDocument::from_json(DOCUMENT).unwrap();
        let calendar = document.build().unwrap();
        let output = calendar.render();

        assert!(output.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(output.contains("PRODID:-//CQUPT ICS//CQUPT Course Calendar//CN\r\n"));
        assert!(output.contains("METHOD:PUBLISH\r\n"));
        assert!(output.contains("CALSCALE:GREGORIAN\r\n"));
        assert!(output.contains("X-WR-CALNAME:课程表\r\n"));
        assert!(output.contains("TZID:Asia/Shanghai\r\n"));
        assert!(output.contains("UID:course-1@example.com\r\n"));
        assert!(output.contains("GEO:29.536107;106.608759\r\n"));
        assert!(output.contains("RRULE:FREQ=WEEKLY;COUNT=16;BYDAY=MO\r\n"));
        assert!(output.contains("EXDATE:20240401T000000Z\r\n"));
        assert!(output.contains("TRIGGER:-PT15M\r\nDESCRIPTION:课程提醒\r\n"));
        assert!(output.contains("DTSTART;VALUE=DATE:20240501\r\n"));
        assert!(output.contains("DTEND;VALUE=DATE:20240506\r\n"));
        assert_eq!(calendar.components().len(), 2);
    }

    #[test]
    fn defaults_apply_to_missing_sections() {
        let document = CalendarDocument::from_json("{}").unwrap();
        let calendar = document.build().unwrap();

        assert_eq!(calendar.prod_id(), CalendarOptions::default().prod_id);
        assert!(calendar.components().is_empty());
    }

    #[test]
    fn empty_prod_id_fails_at_build() {
        let document =
            CalendarDocument::from_json(r#"{"calendar": {"prod_id": ""}}"#).unwrap();
        assert!(matches!(document.build(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            CalendarDocument::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }
}
