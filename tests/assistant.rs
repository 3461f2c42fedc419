//! Assistant replies against realistic workspace contents.

use chrono::{Duration, TimeZone, Utc};
use pocket::assistant::templates::{self, fill};
use pocket::assistant::{
    AssistantContext, CommandHistory, Intent, Responder, ResponderDelays, Tone,
};
use pocket::models::{
    CalendarEvent, Document, Email, NewDocument, NewEmail, NewEvent, NewTask, Priority, Task,
};
use pocket::storage::{KeyValueStore, MemoryStore, keys};
use std::sync::Arc;

fn responder(seed: u64) -> Responder {
    Responder::seeded(seed, ResponderDelays::none())
}

struct Fixture {
    tasks: Vec<Task>,
    events: Vec<CalendarEvent>,
    emails: Vec<Email>,
    documents: Vec<Document>,
}

impl Fixture {
    fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            events: Vec::new(),
            emails: Vec::new(),
            documents: Vec::new(),
        }
    }

    fn context(&self) -> AssistantContext<'_> {
        AssistantContext::new(
            &self.tasks,
            &self.events,
            &self.emails,
            &self.documents,
            now(),
            &Utc,
        )
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn task(id: &str, title: &str, priority: Priority) -> Task {
    let mut new_task = NewTask::new(title);
    new_task.priority = priority;
    new_task.into_task(id.to_string(), now() - Duration::days(3))
}

#[test]
fn greeting_without_context_never_shows_placeholders() {
    for seed in 0..20 {
        let reply = responder(seed).reply_to("Привет", None);
        assert_eq!(reply.intent, Intent::Greeting);
        assert!(!reply.text.contains('{'), "raw token in {:?}", reply.text);
        assert!(templates::GREETING.contains(&reply.text.as_str()));
    }
}

#[test]
fn greeting_with_context_fills_counts() {
    let mut fixture = Fixture::empty();
    fixture.tasks.push(task("t1", "One", Priority::Low));
    fixture.tasks.push(task("t2", "Two", Priority::Low));

    // Two active tasks, no events today
    let expected: Vec<String> = templates::GREETING
        .iter()
        .map(|t| {
            fill(
                t,
                &[("taskCount", "2".to_string()), ("eventCount", "0".to_string())],
            )
        })
        .collect();

    for seed in 0..20 {
        let reply = responder(seed).reply_to("hello", Some(&fixture.context()));
        assert_eq!(reply.intent, Intent::Greeting);
        assert!(!reply.text.contains('{'));
        assert!(expected.contains(&reply.text), "unexpected greeting {:?}", reply.text);
    }
}

#[test]
fn unknown_text_falls_back() {
    for seed in 0..20 {
        let reply = responder(seed).reply_to("xyz", None);
        assert_eq!(reply.intent, Intent::Fallback);
        assert!(templates::FALLBACK.contains(&reply.text.as_str()));
    }
}

#[test]
fn balanced_schedule_reports_counts() {
    let mut fixture = Fixture::empty();
    for i in 0..2 {
        fixture.tasks.push(task(&format!("t{i}"), "Task", Priority::Medium));
    }
    let start = now() + Duration::hours(1);
    fixture
        .events
        .push(NewEvent::new("Sync", start, start + Duration::hours(1)).into_event("e1".to_string()));

    let reply = responder(3).reply_to("Покажи расписание", Some(&fixture.context()));
    assert_eq!(reply.intent, Intent::Schedule);
    assert!(reply.text.contains("1 событий сегодня"));
    assert!(reply.text.contains("2 активных задач"));
}

#[test]
fn overloaded_schedule_names_a_focus_task() {
    let mut fixture = Fixture::empty();
    for i in 0..11 {
        fixture.tasks.push(task(&format!("t{i}"), &format!("Task {i}"), Priority::Low));
    }
    fixture.tasks.push(task("hp", "Ship release", Priority::High));

    let reply = responder(3).reply_to("какой план?", Some(&fixture.context()));
    assert_eq!(reply.intent, Intent::Schedule);
    assert!(reply.text.contains("12 активных задач"));
    assert!(reply.text.contains("\"Ship release\""));
}

#[test]
fn productivity_flags_overdue_tasks() {
    let mut fixture = Fixture::empty();
    let mut late = task("late", "Pay rent", Priority::High);
    late.due_date = Some(now() - Duration::days(1));
    let mut done = task("done", "Call mom", Priority::Low);
    done.completed = true;
    fixture.tasks.extend([late, done]);
    fixture.emails.push(
        NewEmail::new("a@x.ru", "me@x.ru", "Hi", "").into_email("m1".to_string(), now()),
    );

    let reply = responder(5).reply_to("моя статистика", Some(&fixture.context()));
    assert_eq!(reply.intent, Intent::Productivity);
    assert!(reply.text.contains("Выполнено задач: 1"));
    assert!(reply.text.contains("Просрочено: 1"));
    assert!(reply.text.contains("Непрочитанных писем: 1"));
    assert!(reply.text.contains("пересмотреть дедлайны"));
}

#[test]
fn email_intent_lists_unread_highlights() {
    let mut fixture = Fixture::empty();
    for (i, subject) in ["Invoice", "Meeting", "Digest"].iter().enumerate() {
        fixture.emails.push(
            NewEmail::new(format!("s{i}@x.ru"), "me@x.ru", *subject, "")
                .into_email(format!("m{i}"), now()),
        );
    }

    let reply = responder(2).reply_to("покажи email", Some(&fixture.context()));
    assert_eq!(reply.intent, Intent::Email);
    assert!(reply.text.contains("3 непрочитанных"));
    assert!(reply.text.contains("Invoice"));
    assert!(reply.text.contains("Meeting"));
    assert!(!reply.text.contains("Digest"));
}

#[test]
fn document_analysis_mentions_the_file() {
    let document = NewDocument::from_upload("Contract.pdf", 12_000)
        .into_document("d1".to_string(), now());
    let summary = responder(9).analyze_document(&document);
    assert!(summary.contains("Contract.pdf"));
    assert!(summary.contains("Рекомендации"));
    assert!(!summary.contains('{'));
}

#[test]
fn draft_uses_tone_phrases() {
    let draft = responder(0).draft_email("поставки", Tone::Friendly);
    assert!(draft.contains("Привет"));
    assert!(draft.contains("поставки"));
    assert!(draft.contains("дружелюбный"));
}

#[test]
fn optimization_puts_overdue_first() {
    let mut fixture = Fixture::empty();
    let mut late = task("late", "File taxes", Priority::High);
    late.due_date = Some(now() - Duration::hours(2));
    fixture.tasks.push(late);
    fixture.tasks.push(task("hp", "Prepare slides", Priority::High));

    let text = responder(4).schedule_optimization(&fixture.context());
    let overdue_at = text.find("File taxes").unwrap();
    let footer_at = text.find("Рекомендации").unwrap();
    assert!(text.contains("1 просроченных"));
    assert!(text.contains("Приоритетные задачи (2)"));
    assert!(overdue_at < footer_at);
}

#[test]
fn history_is_newest_first_and_capped() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut history = CommandHistory::load(kv.clone(), 10);

    for i in 0..12 {
        history.record(format!("command {i}"), "ok").unwrap();
    }

    let entries = history.list();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].command, "command 11");
    assert_eq!(entries[9].command, "command 2");

    // The cap holds across reloads too
    let reloaded = CommandHistory::load(kv, 10);
    assert_eq!(reloaded.list().len(), 10);
    assert_eq!(reloaded.list()[0].command, "command 11");
    assert_eq!(reloaded.limit(), 10);
}

#[test]
fn clearing_history_removes_the_stored_key() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut history = CommandHistory::load(kv.clone(), 3);
    history.record("привет", "Здравствуйте!").unwrap();
    assert!(kv.get(keys::AI_COMMANDS).unwrap().is_some());

    history.clear().unwrap();
    assert!(history.list().is_empty());
    assert_eq!(kv.get(keys::AI_COMMANDS).unwrap(), None);
    assert!(CommandHistory::load(kv, 3).list().is_empty());
}
