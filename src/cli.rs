use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::assistant::{Responder, TRY_AGAIN, Tone};
use crate::models::{
    CalendarEvent, Document, Email, NewEmail, NewEvent, NewTask, Priority, Task, TaskPatch,
};
use crate::storage::StorageError;
use crate::store::StoreError;
use crate::utils::{format_local, parse_date, parse_datetime};
use crate::views::{self, Dashboard, Statistics};
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(name = "pocket")]
#[command(about = "Tasks, calendar, inbox, documents and a scripted assistant")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Keep all data in memory for this run only
    #[arg(long)]
    pub ephemeral: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage calendar events
    #[command(subcommand)]
    Event(EventCommand),
    /// Browse the inbox
    #[command(subcommand)]
    Mail(MailCommand),
    /// Manage documents
    #[command(subcommand)]
    Doc(DocCommand),
    /// Ask the assistant something
    Ask {
        /// Free-text command
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show recent assistant exchanges
    History {
        /// Forget all recorded exchanges
        #[arg(long)]
        clear: bool,
    },
    /// Draft an email about a topic
    Draft {
        topic: String,
        /// formal, friendly or brief
        #[arg(long, default_value_t = Tone::Formal)]
        tone: Tone,
    },
    /// Suggest how to arrange today
    Optimize,
    /// Show active tasks, today's events and unread mail
    Dashboard,
    /// Show or edit the user profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Erase all stored data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Create a task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date (YYYY-MM-DD [HH:MM])
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks (active only unless --all or --completed)
    List {
        #[arg(long)]
        all: bool,
        #[arg(long, conflicts_with = "all")]
        completed: bool,
    },
    /// Edit a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Toggle completion
    Done { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Create an event (defaults to one hour, starting an hour from now)
    Add {
        title: String,
        /// Start (YYYY-MM-DD [HH:MM])
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// End (YYYY-MM-DD [HH:MM])
        #[arg(long, requires = "start")]
        end: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
    },
    /// List events grouped by day
    List {
        /// Only this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
    },
    /// Delete an event
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum MailCommand {
    /// List messages, newest first
    List {
        #[arg(long)]
        unread: bool,
        #[arg(long, conflicts_with = "unread")]
        read: bool,
        #[arg(long)]
        starred: bool,
    },
    /// Show a message and mark it read
    Show { id: String },
    /// Put a message into the inbox
    Add {
        subject: String,
        #[arg(long, default_value = "me@example.com")]
        from: String,
        #[arg(long, default_value = "user@example.com")]
        to: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Toggle the star flag
    Star { id: String },
    /// Delete a message
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum DocCommand {
    /// Register a document by name and size
    Add {
        name: String,
        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
    },
    /// List documents, newest first
    List,
    /// Analyze a document and store the summary
    Analyze { id: String },
    /// Delete a document
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Print the profile and statistics
    Show,
    /// Update profile fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        auto_sync: Option<bool>,
        /// Let the assistant personalize replies with your data
        #[arg(long)]
        ai_responses: Option<bool>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    StoreError(#[from] StoreError),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Refusing to reset without --yes")]
    ResetNotConfirmed,
}

/// Resolve a user-typed id: an exact match wins, otherwise a unique prefix.
fn resolve_id<'a>(ids: impl Iterator<Item = &'a str>, input: &str) -> String {
    let mut prefixed = None;
    let mut ambiguous = false;
    for id in ids {
        if id == input {
            return id.to_string();
        }
        if id.starts_with(input) {
            ambiguous = prefixed.is_some();
            prefixed = Some(id);
        }
    }
    match prefixed {
        Some(id) if !ambiguous => id.to_string(),
        _ => input.to_string(),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn parse_moment(input: &str) -> Result<chrono::DateTime<Utc>, CliError> {
    parse_datetime(input).map_err(CliError::DateParseError)
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|due| format!(" (due {})", format_local(&due)))
        .unwrap_or_default();
    let overdue = if task.is_overdue(Utc::now()) { " OVERDUE" } else { "" };
    println!(
        "[{}] {}  {:<6} {}{}{}",
        mark,
        short_id(&task.id),
        task.priority.as_str(),
        task.title,
        due,
        overdue
    );
}

fn print_event(event: &CalendarEvent) {
    let location = event
        .location
        .as_deref()
        .map(|l| format!(" @ {l}"))
        .unwrap_or_default();
    println!(
        "  {}  {} - {}  {}{}",
        short_id(&event.id),
        event.start_date.with_timezone(&Local).format("%H:%M"),
        event.end_date.with_timezone(&Local).format("%H:%M"),
        event.title,
        location
    );
}

fn print_email(email: &Email) {
    let unread = if email.is_read { " " } else { "*" };
    let star = if email.is_starred { "★" } else { " " };
    println!(
        "{}{} {}  {}  {}  {}",
        unread,
        star,
        short_id(&email.id),
        format_local(&email.received_at),
        email.from,
        email.subject
    );
}

fn print_document(document: &Document) {
    let analyzed = if document.summary.is_some() { "analyzed" } else { "" };
    println!(
        "{}  {:<4} {:>10}  {}  {}  {}",
        short_id(&document.id),
        document.kind.as_str(),
        views::format_file_size(document.size),
        format_local(&document.uploaded_at),
        document.name,
        analyzed
    );
}

/// Handle `task` subcommands
pub fn handle_task(command: TaskCommand, ws: &mut Workspace) -> Result<(), CliError> {
    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
            due,
        } => {
            let mut new_task = NewTask::new(title);
            new_task.description = description;
            new_task.priority = priority;
            new_task.due_date = due.as_deref().map(parse_moment).transpose()?;

            let task = ws.tasks.create(new_task)?;
            println!("Task created successfully (ID: {})", task.id);
        }
        TaskCommand::List { all, completed } => {
            let tasks = ws.tasks.list();
            let shown: Vec<&Task> = if all {
                tasks.iter().collect()
            } else if completed {
                views::completed_tasks(tasks)
            } else {
                views::active_tasks(tasks)
            };
            if shown.is_empty() {
                println!("No tasks.");
            }
            for task in shown {
                print_task(task);
            }
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let id = resolve_id(ws.tasks.list().iter().map(|t| t.id.as_str()), &id);
            let due_date = if clear_due {
                Some(None)
            } else {
                due.as_deref().map(parse_moment).transpose()?.map(Some)
            };
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                priority,
                completed: None,
                due_date,
            };
            if ws.tasks.update(&id, patch)? {
                println!("Task updated");
            } else {
                println!("No task with ID {}", id);
            }
        }
        TaskCommand::Done { id } => {
            let id = resolve_id(ws.tasks.list().iter().map(|t| t.id.as_str()), &id);
            if ws.tasks.toggle_completion(&id)? {
                if let Some(task) = ws.tasks.get(&id) {
                    print_task(task);
                }
            } else {
                println!("No task with ID {}", id);
            }
        }
        TaskCommand::Delete { id } => {
            let id = resolve_id(ws.tasks.list().iter().map(|t| t.id.as_str()), &id);
            if ws.tasks.delete(&id)? {
                println!("Task deleted");
            } else {
                println!("No task with ID {}", id);
            }
        }
    }
    Ok(())
}

/// Handle `event` subcommands
pub fn handle_event(command: EventCommand, ws: &mut Workspace) -> Result<(), CliError> {
    match command {
        EventCommand::Add {
            title,
            start,
            end,
            location,
            description,
            reminder,
        } => {
            // Without explicit times the event takes the next hour
            let mut new_event = match (start, end) {
                (Some(start), Some(end)) => {
                    NewEvent::new(title, parse_moment(&start)?, parse_moment(&end)?)
                }
                _ => NewEvent::in_an_hour(title, Utc::now()),
            };
            new_event.location = location;
            new_event.description = description;
            new_event.reminder = reminder.as_deref().map(parse_moment).transpose()?;

            let event = ws.events.create(new_event)?;
            if event.end_date < event.start_date {
                warn!(id = %event.id, "event ends before it starts");
            }
            println!("Event created successfully (ID: {})", event.id);
            print_event(&event);
        }
        EventCommand::List { day } => {
            let events = ws.events.list();
            match day {
                Some(day) => {
                    let day = parse_date(&day)
                        .map_err(|e| CliError::DateParseError(format!("Invalid day '{}': {}", day, e)))?;
                    println!("{}", day.format("%A, %d %B %Y"));
                    for event in views::events_on(events, day, &Local) {
                        print_event(event);
                    }
                }
                None => {
                    let groups = views::events_by_day(events, &Local);
                    if groups.is_empty() {
                        println!("No events.");
                    }
                    for (day, day_events) in groups {
                        println!("{}", day.format("%A, %d %B %Y"));
                        for event in day_events {
                            print_event(event);
                        }
                    }
                }
            }
        }
        EventCommand::Delete { id } => {
            let id = resolve_id(ws.events.list().iter().map(|e| e.id.as_str()), &id);
            if ws.events.delete(&id)? {
                println!("Event deleted");
            } else {
                println!("No event with ID {}", id);
            }
        }
    }
    Ok(())
}

/// Handle `mail` subcommands
pub fn handle_mail(command: MailCommand, ws: &mut Workspace) -> Result<(), CliError> {
    match command {
        MailCommand::List {
            unread,
            read,
            starred,
        } => {
            println!("{} unread", ws.emails.unread_count());
            let emails = ws.emails.list();
            let mut shown = if unread {
                views::unread_emails(emails)
            } else if read {
                views::read_emails(emails)
            } else {
                views::emails_newest_first(emails)
            };
            if starred {
                shown.retain(|email| email.is_starred);
            }
            shown.sort_by(|a, b| b.received_at.cmp(&a.received_at));
            for email in shown {
                print_email(email);
            }
        }
        MailCommand::Show { id } => {
            let id = resolve_id(ws.emails.list().iter().map(|e| e.id.as_str()), &id);
            let Some(email) = ws.emails.get(&id).cloned() else {
                println!("No message with ID {}", id);
                return Ok(());
            };
            if !email.is_read {
                ws.emails.mark_as_read(&id)?;
            }
            println!("From:    {}", email.from);
            println!("To:      {}", email.to);
            println!("Date:    {}", format_local(&email.received_at));
            println!("Subject: {}", email.subject);
            println!();
            println!("{}", email.body);
        }
        MailCommand::Add {
            subject,
            from,
            to,
            body,
        } => {
            let email = ws.emails.add(NewEmail::new(from, to, subject, body))?;
            println!("Message added (ID: {})", email.id);
        }
        MailCommand::Star { id } => {
            let id = resolve_id(ws.emails.list().iter().map(|e| e.id.as_str()), &id);
            if ws.emails.toggle_star(&id)? {
                if let Some(email) = ws.emails.get(&id) {
                    print_email(email);
                }
            } else {
                println!("No message with ID {}", id);
            }
        }
        MailCommand::Delete { id } => {
            let id = resolve_id(ws.emails.list().iter().map(|e| e.id.as_str()), &id);
            if ws.emails.delete(&id)? {
                println!("Message deleted");
            } else {
                println!("No message with ID {}", id);
            }
        }
    }
    Ok(())
}

/// Handle `doc` subcommands
pub fn handle_doc<R: Rng>(
    command: DocCommand,
    ws: &mut Workspace,
    responder: &mut Responder<R>,
) -> Result<(), CliError> {
    match command {
        DocCommand::Add { name, size } => {
            let document = ws.documents.add_upload(name, size)?;
            println!("Document \"{}\" uploaded (ID: {})", document.name, document.id);
        }
        DocCommand::List => {
            let documents = views::documents_newest_first(ws.documents.list());
            if documents.is_empty() {
                println!("No documents.");
            }
            for document in documents {
                print_document(document);
            }
        }
        DocCommand::Analyze { id } => {
            let id = resolve_id(ws.documents.list().iter().map(|d| d.id.as_str()), &id);
            let Some(document) = ws.documents.get(&id).cloned() else {
                println!("No document with ID {}", id);
                return Ok(());
            };
            let summary = responder.analyze_document(&document);
            match ws.documents.attach_summary(&id, summary.clone()) {
                Ok(_) => println!("{}", summary),
                Err(e) => {
                    warn!(error = %e, "failed to store document summary");
                    eprintln!("{}", TRY_AGAIN);
                }
            }
        }
        DocCommand::Delete { id } => {
            let id = resolve_id(ws.documents.list().iter().map(|d| d.id.as_str()), &id);
            if ws.documents.delete(&id)? {
                println!("Document deleted");
            } else {
                println!("No document with ID {}", id);
            }
        }
    }
    Ok(())
}

/// Handle the `ask` command
pub fn handle_ask<R: Rng>(
    text: &str,
    ws: &mut Workspace,
    responder: &mut Responder<R>,
) -> Result<(), CliError> {
    let personalize = ws.profile.current().ai_responses;
    let reply = if personalize {
        let context = ws.assistant_context(Utc::now(), &Local);
        responder.respond(text, Some(&context))
    } else {
        responder.respond(text, None)
    };

    println!("{}", reply.text);
    if let Err(e) = ws.history.record(text, reply.text) {
        warn!(error = %e, "failed to record assistant history");
        eprintln!("{}", TRY_AGAIN);
    }
    Ok(())
}

/// Handle the `history` command
pub fn handle_history(clear: bool, ws: &mut Workspace) -> Result<(), CliError> {
    if clear {
        ws.history.clear()?;
        println!("Assistant history cleared");
        return Ok(());
    }

    let entries = ws.history.list();
    if entries.is_empty() {
        println!("No assistant history.");
        return Ok(());
    }
    println!("Last {} of up to {} exchanges", entries.len(), ws.history.limit());
    println!();
    for entry in entries {
        println!("[{}] > {}", format_local(&entry.timestamp), entry.command);
        println!("{}", entry.response);
        println!();
    }
    Ok(())
}

/// Handle the `draft` command
pub fn handle_draft<R: Rng>(topic: &str, tone: Tone, responder: &mut Responder<R>) {
    println!("{}", responder.draft_email(topic, tone));
}

/// Handle the `optimize` command
pub fn handle_optimize<R: Rng>(ws: &Workspace, responder: &mut Responder<R>) {
    let context = ws.assistant_context(Utc::now(), &Local);
    println!("{}", responder.schedule_optimization(&context));
}

/// Handle the `dashboard` command
pub fn handle_dashboard(ws: &Workspace) {
    let now = Utc::now();
    let dashboard = Dashboard::compute(
        ws.tasks.list(),
        ws.events.list(),
        ws.emails.list(),
        now,
        &Local,
    );
    println!("Active tasks:  {}", dashboard.active_tasks);
    println!("Events today:  {}", dashboard.today_events);
    println!("Unread emails: {}", dashboard.unread_emails);

    let today = views::today_events(ws.events.list(), now, &Local);
    if !today.is_empty() {
        println!();
        println!("Today");
        for event in today {
            print_event(event);
        }
    } else if let Some(next) = views::upcoming_events(ws.events.list(), now).first() {
        println!();
        println!("Next: {}", format_local(&next.start_date));
        print_event(next);
    }
}

/// Handle `profile` subcommands
pub fn handle_profile(command: ProfileCommand, ws: &mut Workspace) -> Result<(), CliError> {
    match command {
        ProfileCommand::Show => {
            let profile = ws.profile.current();
            let stats = Statistics::compute(
                ws.tasks.list(),
                ws.events.list(),
                ws.documents.list(),
                Utc::now(),
                &Local,
            );
            println!("Name:          {}", profile.name);
            println!("Email:         {}", profile.email);
            if let Some(avatar) = &profile.avatar {
                println!("Avatar:        {}", avatar);
            }
            println!("Notifications: {}", profile.notifications);
            println!("Auto sync:     {}", profile.auto_sync);
            println!("AI responses:  {}", profile.ai_responses);
            println!();
            println!("Tasks completed: {}", stats.completed_tasks);
            println!("Events today:    {}", stats.today_events);
            println!("Documents:       {}", stats.documents);
        }
        ProfileCommand::Set {
            name,
            email,
            avatar,
            notifications,
            auto_sync,
            ai_responses,
        } => {
            let mut profile = ws.profile.current();
            if let Some(name) = name {
                profile.name = name;
            }
            if let Some(email) = email {
                profile.email = email;
            }
            if avatar.is_some() {
                profile.avatar = avatar;
            }
            if let Some(value) = notifications {
                profile.notifications = value;
            }
            if let Some(value) = auto_sync {
                profile.auto_sync = value;
            }
            if let Some(value) = ai_responses {
                profile.ai_responses = value;
            }
            ws.profile.save(profile)?;
            println!("Profile saved");
        }
    }
    Ok(())
}

/// Handle the `reset` command
pub fn handle_reset(yes: bool, ws: &mut Workspace) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::ResetNotConfirmed);
    }
    ws.reset()?;
    println!("All data erased");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_id_prefers_exact_then_unique_prefix() {
        let ids = ["abc123", "abd456", "zz"];
        assert_eq!(resolve_id(ids.iter().copied(), "zz"), "zz");
        assert_eq!(resolve_id(ids.iter().copied(), "abc"), "abc123");
        // "ab" is ambiguous, so it is used verbatim
        assert_eq!(resolve_id(ids.iter().copied(), "ab"), "ab");
        assert_eq!(resolve_id(ids.iter().copied(), "q"), "q");
    }

    #[test]
    fn cli_parses_nested_task_add() {
        let cli = Cli::try_parse_from([
            "pocket", "task", "add", "Buy milk", "--priority", "low", "--due", "2025-03-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Task(TaskCommand::Add { title, priority, due, .. }) => {
                assert_eq!(title, "Buy milk");
                assert_eq!(priority, Priority::Low);
                assert_eq!(due.as_deref(), Some("2025-03-01"));
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn cli_parses_read_and_clear_flags() {
        let cli = Cli::try_parse_from(["pocket", "mail", "list", "--read"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Mail(MailCommand::List { read: true, unread: false, .. })
        ));
        assert!(Cli::try_parse_from(["pocket", "mail", "list", "--read", "--unread"]).is_err());

        let cli = Cli::try_parse_from(["pocket", "history", "--clear"]).unwrap();
        assert!(matches!(cli.command, Commands::History { clear: true }));
    }

    #[test]
    fn cli_parses_draft_tone() {
        let cli = Cli::try_parse_from(["pocket", "draft", "поставки", "--tone", "brief"]).unwrap();
        assert!(matches!(cli.command, Commands::Draft { tone: Tone::Brief, .. }));
    }
}
