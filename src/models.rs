use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generate a fresh record identifier.
///
/// Random v4 UUIDs keep ids unique even when several records are created
/// within the same clock tick.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority `{other}`; expected low|medium|high")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| now > due)
    }
}

/// Caller-supplied fields for a new task. The store assigns id and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            completed: false,
            due_date: None,
        }
    }

    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            completed: self.completed,
            created_at,
            due_date: self.due_date,
        }
    }
}

/// Partial update for a task. `None` leaves a field untouched; for optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub reminder: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_date,
            end_date,
            reminder: None,
            location: None,
        }
    }

    /// A one-hour event starting an hour after `now`.
    pub fn in_an_hour(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        let start = now + Duration::hours(1);
        Self::new(title, start, start + Duration::hours(1))
    }

    pub fn into_event(self, id: String) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            reminder: self.reminder,
            location: self.location,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
}

impl EventPatch {
    pub fn apply(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start_date) = self.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            event.end_date = end_date;
        }
        if let Some(reminder) = self.reminder {
            event.reminder = reminder;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_read: bool,
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub is_starred: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub is_starred: bool,
}

impl NewEmail {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            is_read: false,
            is_starred: false,
        }
    }

    pub fn into_email(self, id: String, received_at: DateTime<Utc>) -> Email {
        Email {
            id,
            from: self.from,
            to: self.to,
            subject: self.subject,
            body: self.body,
            is_read: self.is_read,
            received_at,
            is_starred: self.is_starred,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
    Txt,
}

impl DocumentType {
    /// Derive the type from a file name's extension. Unknown or missing
    /// extensions are treated as plain text.
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => DocumentType::Pdf,
            "docx" => DocumentType::Docx,
            _ => DocumentType::Txt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
            DocumentType::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentType,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub kind: DocumentType,
    pub size: u64,
    pub content: Option<String>,
}

impl NewDocument {
    /// Build a document from a picked file's name and size.
    pub fn from_upload(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        Self {
            kind: DocumentType::from_file_name(&name),
            name,
            size,
            content: None,
        }
    }

    pub fn into_document(self, id: String, uploaded_at: DateTime<Utc>) -> Document {
        Document {
            id,
            name: self.name,
            kind: self.kind,
            size: self.size,
            uploaded_at,
            summary: None,
            content: self.content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub summary: Option<Option<String>>,
    pub content: Option<Option<String>>,
}

impl DocumentPatch {
    pub fn apply(self, document: &mut Document) {
        if let Some(name) = self.name {
            document.name = name;
        }
        if let Some(summary) = self.summary {
            document.summary = summary;
        }
        if let Some(content) = self.content {
            document.content = content;
        }
    }
}

/// One exchange with the assistant, kept for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCommand {
    pub id: String,
    pub command: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_true")]
    pub auto_sync: bool,
    #[serde(default = "default_true")]
    pub ai_responses: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: new_id(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            avatar: None,
            notifications: true,
            auto_sync: true,
            ai_responses: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn document_type_follows_extension() {
        assert_eq!(DocumentType::from_file_name("report.PDF"), DocumentType::Pdf);
        assert_eq!(DocumentType::from_file_name("notes.final.docx"), DocumentType::Docx);
        assert_eq!(DocumentType::from_file_name("README"), DocumentType::Txt);
        assert_eq!(DocumentType::from_file_name("image.png"), DocumentType::Txt);
    }

    #[test]
    fn task_serializes_with_camel_case_keys() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let task = NewTask::new("Buy milk").into_task("t1".to_string(), created);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["createdAt"], "2025-03-01T09:30:00Z");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn document_kind_is_stored_under_type() {
        let uploaded = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let doc = NewDocument::from_upload("plan.pdf", 2048).into_document("d1".to_string(), uploaded);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "pdf");
    }

    #[test]
    fn patch_clears_optional_fields() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let mut new_task = NewTask::new("Write report");
        new_task.description = Some("draft".to_string());
        let mut task = new_task.into_task("t1".to_string(), created);

        TaskPatch {
            description: Some(None),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        }
        .apply(&mut task);

        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.title, "Write report");
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap();
        let mut new_task = NewTask::new("Pay rent");
        new_task.due_date = Some(Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap());
        let mut task = new_task.into_task("t1".to_string(), created);

        assert!(task.is_overdue(now));
        task.completed = true;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn in_an_hour_spans_the_following_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        let event = NewEvent::in_an_hour("Call", now);

        assert_eq!(event.start_date, Utc.with_ymd_and_hms(2025, 3, 2, 0, 30, 0).unwrap());
        assert_eq!(event.end_date, Utc.with_ymd_and_hms(2025, 3, 2, 1, 30, 0).unwrap());
        assert!(event.location.is_none());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
