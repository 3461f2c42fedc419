//! CRUD behavior of the task, calendar, inbox and document stores.

use chrono::{Duration, TimeZone, Utc};
use pocket::models::{
    DocumentPatch, DocumentType, EventPatch, NewEmail, NewEvent, NewTask, Priority, TaskPatch,
};
use pocket::storage::{self, KeyValueStore, MemoryStore, keys};
use pocket::store::{
    DocumentStore, EmailStore, EventStore, StoreError, TaskStore, ValidationError,
};
use pocket::views;
use std::collections::HashSet;
use std::sync::Arc;

fn memory() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

#[test]
fn buy_milk_create_toggle_twice_then_delete() {
    let kv = memory();
    let mut tasks = TaskStore::load(kv.clone());

    let mut new_task = NewTask::new("Buy milk");
    new_task.priority = Priority::Low;
    let task = tasks.create(new_task).unwrap();

    assert_eq!(tasks.list().len(), 1);
    assert!(!task.completed);
    assert!(!task.id.is_empty());
    assert_eq!(views::active_tasks(tasks.list()).len(), 1);

    assert!(tasks.toggle_completion(&task.id).unwrap());
    assert!(tasks.get(&task.id).unwrap().completed);
    assert!(views::active_tasks(tasks.list()).is_empty());
    assert_eq!(views::completed_tasks(tasks.list()).len(), 1);

    // What was persisted matches what is in memory
    let stored: Vec<pocket::Task> = storage::try_load_records(kv.as_ref(), keys::TASKS).unwrap();
    assert_eq!(stored, tasks.list());

    // A second toggle restores the original task
    assert!(tasks.toggle_completion(&task.id).unwrap());
    assert!(!tasks.get(&task.id).unwrap().completed);
    assert_eq!(tasks.get(&task.id).unwrap(), &task);

    assert!(tasks.delete(&task.id).unwrap());
    assert!(tasks.list().is_empty());
    let stored: Vec<pocket::Task> = storage::try_load_records(kv.as_ref(), keys::TASKS).unwrap();
    assert!(stored.is_empty());
}

#[test]
fn rapid_creates_get_distinct_ids() {
    let mut tasks = TaskStore::load(memory());
    let ids: HashSet<String> = (0..50)
        .map(|i| tasks.create(NewTask::new(format!("task {i}"))).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn unknown_ids_leave_tasks_untouched() {
    let mut tasks = TaskStore::load(memory());
    tasks.create(NewTask::new("Keep me")).unwrap();
    let before = tasks.list().to_vec();

    let patch = TaskPatch {
        title: Some("Changed".to_string()),
        ..TaskPatch::default()
    };
    assert!(!tasks.update("missing", patch).unwrap());
    assert!(!tasks.delete("missing").unwrap());
    assert!(!tasks.toggle_completion("missing").unwrap());

    assert_eq!(tasks.list(), before.as_slice());
}

#[test]
fn blank_title_is_rejected_before_mutation() {
    let mut tasks = TaskStore::load(memory());
    let err = tasks.create(NewTask::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyField("title"))
    ));
    assert!(tasks.list().is_empty());

    let task = tasks.create(NewTask::new("Real")).unwrap();
    let blank = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    assert!(tasks.update(&task.id, blank).is_err());
    assert_eq!(tasks.get(&task.id).unwrap().title, "Real");
}

#[test]
fn task_patch_keeps_id_and_created_at() {
    let mut tasks = TaskStore::load(memory());
    let task = tasks.create(NewTask::new("Write report")).unwrap();
    let due = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();

    tasks
        .update(
            &task.id,
            TaskPatch {
                priority: Some(Priority::High),
                due_date: Some(Some(due)),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    let updated = tasks.get(&task.id).unwrap();
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.due_date, Some(due));
}

#[test]
fn events_on_the_same_day_are_grouped_in_start_order() {
    let mut events = EventStore::load(memory());
    let at = |h: u32| Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).unwrap();

    events.create(NewEvent::new("A", at(10), at(11))).unwrap();
    events.create(NewEvent::new("B", at(9), at(10))).unwrap();
    events
        .create(NewEvent::new(
            "Next day",
            at(9) + Duration::days(1),
            at(10) + Duration::days(1),
        ))
        .unwrap();

    let groups = views::events_by_day(events.list(), &Utc);
    assert_eq!(groups.len(), 2);

    let (day, first_day) = &groups[0];
    assert_eq!(day.to_string(), "2025-03-01");
    let titles: Vec<&str> = first_day.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["B", "A"]);
}

#[test]
fn quick_add_event_starts_in_an_hour() {
    let mut events = EventStore::load(memory());
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

    let event = events.quick_add("Standup", now).unwrap();
    assert_eq!(event.start_date, now + Duration::hours(1));
    assert_eq!(event.end_date, now + Duration::hours(2));

    assert!(events
        .update(
            &event.id,
            EventPatch {
                location: Some(Some("Room 4".to_string())),
                ..EventPatch::default()
            },
        )
        .unwrap());
    assert_eq!(events.get(&event.id).unwrap().location.as_deref(), Some("Room 4"));

    assert_eq!(views::upcoming_events(events.list(), now).len(), 1);
    assert!(views::upcoming_events(events.list(), now + Duration::hours(3)).is_empty());

    assert!(events.delete(&event.id).unwrap());
    assert!(events.list().is_empty());
}

#[test]
fn unread_count_tracks_read_flags() {
    let mut emails = EmailStore::load(memory());
    let a = emails
        .add(NewEmail::new("a@x.ru", "me@x.ru", "First", "body"))
        .unwrap();
    emails
        .add(NewEmail::new("b@x.ru", "me@x.ru", "Second", "body"))
        .unwrap();

    // Newest message goes first
    assert_eq!(emails.list()[0].subject, "Second");
    assert_eq!(emails.unread_count(), 2);

    emails.mark_as_read(&a.id).unwrap();
    assert_eq!(emails.unread_count(), 1);
    assert_eq!(
        emails.unread_count(),
        emails.list().iter().filter(|e| !e.is_read).count()
    );

    // Marking twice changes nothing
    emails.mark_as_read(&a.id).unwrap();
    assert_eq!(emails.unread_count(), 1);

    let read: Vec<&str> = views::read_emails(emails.list())
        .into_iter()
        .map(|e| e.subject.as_str())
        .collect();
    let unread: Vec<&str> = views::unread_emails(emails.list())
        .into_iter()
        .map(|e| e.subject.as_str())
        .collect();
    assert_eq!(read, ["First"]);
    assert_eq!(unread, ["Second"]);
}

#[test]
fn star_toggles_back_and_forth() {
    let mut emails = EmailStore::load(memory());
    let email = emails
        .add(NewEmail::new("a@x.ru", "me@x.ru", "Hello", ""))
        .unwrap();

    emails.toggle_star(&email.id).unwrap();
    assert!(emails.get(&email.id).unwrap().is_starred);
    emails.toggle_star(&email.id).unwrap();
    assert!(!emails.get(&email.id).unwrap().is_starred);
    assert!(views::starred_emails(emails.list()).is_empty());
}

#[test]
fn empty_inbox_is_seeded_once() {
    let kv = memory();
    let now = Utc::now();

    let mut emails = EmailStore::load_or_seed(kv.clone(), now);
    assert_eq!(emails.list().len(), 3);
    assert_eq!(emails.unread_count(), 2);

    let first = emails.list()[0].id.clone();
    emails.delete(&first).unwrap();

    // A non-empty inbox is left alone on the next load
    let reloaded = EmailStore::load_or_seed(kv, now);
    assert_eq!(reloaded.list().len(), 2);
}

#[test]
fn upload_derives_type_and_summary_attaches() {
    let mut documents = DocumentStore::load(memory());

    let pdf = documents.add_upload("Contract.PDF", 48_000).unwrap();
    let other = documents.add_upload("photo.png", 10).unwrap();
    assert_eq!(pdf.kind, DocumentType::Pdf);
    assert_eq!(other.kind, DocumentType::Txt);
    assert!(pdf.summary.is_none());

    assert!(documents
        .attach_summary(&pdf.id, "Short summary".to_string())
        .unwrap());
    assert_eq!(
        documents.get(&pdf.id).unwrap().summary.as_deref(),
        Some("Short summary")
    );

    documents
        .update(
            &other.id,
            DocumentPatch {
                name: Some("photo.txt".to_string()),
                ..DocumentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(documents.get(&other.id).unwrap().name, "photo.txt");

    assert!(documents.delete(&other.id).unwrap());
    assert!(!documents.delete(&other.id).unwrap());
    assert_eq!(documents.list().len(), 1);
}
