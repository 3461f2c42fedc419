//! Read-only projections over the in-memory collections.
//!
//! Nothing here is cached; callers recompute on every use. Calendar-day
//! boundaries are evaluated in the time zone the caller passes in.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::models::{CalendarEvent, Document, Email, Task};

pub fn active_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| !task.completed).collect()
}

pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.completed).collect()
}

pub fn overdue_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_overdue(now)).collect()
}

/// Calendar day on which an event starts, in `tz`.
pub fn event_day<Tz: TimeZone>(event: &CalendarEvent, tz: &Tz) -> NaiveDate {
    event.start_date.with_timezone(tz).date_naive()
}

/// Events sorted by start time, earliest first. Ties keep insertion order.
pub fn events_chronological(events: &[CalendarEvent]) -> Vec<&CalendarEvent> {
    let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.start_date);
    sorted
}

/// Group events by the day they start, days ascending and events ascending
/// by start time within each day.
pub fn events_by_day<'a, Tz: TimeZone>(
    events: &'a [CalendarEvent],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<&'a CalendarEvent>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in events_chronological(events) {
        groups.entry(event_day(event, tz)).or_default().push(event);
    }
    groups.into_iter().collect()
}

pub fn events_on<'a, Tz: TimeZone>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    events_chronological(events)
        .into_iter()
        .filter(|event| event_day(event, tz) == day)
        .collect()
}

pub fn today_events<'a, Tz: TimeZone>(
    events: &'a [CalendarEvent],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    events_on(events, now.with_timezone(tz).date_naive(), tz)
}

/// Events that have not started yet, earliest first.
pub fn upcoming_events(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<&CalendarEvent> {
    events_chronological(events)
        .into_iter()
        .filter(|event| event.start_date >= now)
        .collect()
}

pub fn unread_emails(emails: &[Email]) -> Vec<&Email> {
    emails.iter().filter(|email| !email.is_read).collect()
}

pub fn read_emails(emails: &[Email]) -> Vec<&Email> {
    emails.iter().filter(|email| email.is_read).collect()
}

pub fn starred_emails(emails: &[Email]) -> Vec<&Email> {
    emails.iter().filter(|email| email.is_starred).collect()
}

pub fn emails_newest_first(emails: &[Email]) -> Vec<&Email> {
    let mut sorted: Vec<&Email> = emails.iter().collect();
    sorted.sort_by(|a, b| b.received_at.cmp(&a.received_at));
    sorted
}

pub fn documents_newest_first(documents: &[Document]) -> Vec<&Document> {
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    sorted
}

/// Home screen counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dashboard {
    pub active_tasks: usize,
    pub today_events: usize,
    pub unread_emails: usize,
}

impl Dashboard {
    pub fn compute<Tz: TimeZone>(
        tasks: &[Task],
        events: &[CalendarEvent],
        emails: &[Email],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        Self {
            active_tasks: active_tasks(tasks).len(),
            today_events: today_events(events, now, tz).len(),
            unread_emails: unread_emails(emails).len(),
        }
    }
}

/// Profile counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub completed_tasks: usize,
    pub today_events: usize,
    pub documents: usize,
}

impl Statistics {
    pub fn compute<Tz: TimeZone>(
        tasks: &[Task],
        events: &[CalendarEvent],
        documents: &[Document],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        Self {
            completed_tasks: completed_tasks(tasks).len(),
            today_events: today_events(events, now, tz).len(),
            documents: documents.len(),
        }
    }
}

/// Human-readable byte size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_size_uses_binary_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
    }
}
