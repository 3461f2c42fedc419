use chrono::{DateTime, TimeZone, Utc};

use crate::models::{CalendarEvent, Document, Email, Priority, Task};
use crate::views;

/// Snapshot of the caller's collections used to personalize replies.
#[derive(Debug, Clone)]
pub struct AssistantContext<'a> {
    pub tasks: &'a [Task],
    pub today_events: Vec<&'a CalendarEvent>,
    pub unread_emails: Vec<&'a Email>,
    pub documents: &'a [Document],
    pub now: DateTime<Utc>,
}

impl<'a> AssistantContext<'a> {
    /// Build a context; "today" is the calendar day of `now` in `tz`.
    pub fn new<Tz: TimeZone>(
        tasks: &'a [Task],
        events: &'a [CalendarEvent],
        emails: &'a [Email],
        documents: &'a [Document],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        Self {
            tasks,
            today_events: views::today_events(events, now, tz),
            unread_emails: views::unread_emails(emails),
            documents,
            now,
        }
    }

    pub fn active_tasks(&self) -> Vec<&'a Task> {
        views::active_tasks(self.tasks)
    }

    pub fn completed_tasks(&self) -> Vec<&'a Task> {
        views::completed_tasks(self.tasks)
    }

    pub fn overdue_tasks(&self) -> Vec<&'a Task> {
        views::overdue_tasks(self.tasks, self.now)
    }

    pub fn high_priority_active(&self) -> Vec<&'a Task> {
        self.active_tasks()
            .into_iter()
            .filter(|task| task.priority == Priority::High)
            .collect()
    }
}
