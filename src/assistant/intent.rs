//! Keyword classification of free-text commands.

/// Category a command falls into. Checked in declaration order; the first
/// match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Schedule question answered from context.
    Schedule,
    /// Productivity question answered from context.
    Productivity,
    Greeting,
    Task,
    Calendar,
    Email,
    Document,
    /// Nothing matched.
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Schedule => "schedule",
            Intent::Productivity => "productivity",
            Intent::Greeting => "greeting",
            Intent::Task => "task",
            Intent::Calendar => "calendar",
            Intent::Email => "email",
            Intent::Document => "document",
            Intent::Fallback => "fallback",
        }
    }
}

pub const SCHEDULE_KEYWORDS: &[&str] = &["расписание", "план", "свободное время", "когда", "schedule"];
pub const PRODUCTIVITY_KEYWORDS: &[&str] = &["продуктивность", "эффективность", "статистика", "прогресс"];
pub const GREETING_KEYWORDS: &[&str] = &["привет", "здравствуй", "добро пожаловать", "hello", "hi", "помощь"];
pub const TASK_KEYWORDS: &[&str] = &["создай задачу", "добавь задачу", "новая задача", "task", "задание", "дело"];
pub const CALENDAR_KEYWORDS: &[&str] = &[
    "создай встречу",
    "добавь событие",
    "запланируй",
    "календарь",
    "напоминание",
    "встреча",
];
pub const EMAIL_KEYWORDS: &[&str] = &["напиши письмо", "email", "почта", "ответ", "черновик"];
pub const DOCUMENT_KEYWORDS: &[&str] = &["анализ", "резюме", "документ", "прочитай", "summarize", "файл"];

/// Keyword sets that only apply when the caller supplied context.
const CONTEXT_RULES: &[(Intent, &[&str])] = &[
    (Intent::Schedule, SCHEDULE_KEYWORDS),
    (Intent::Productivity, PRODUCTIVITY_KEYWORDS),
];

const RULES: &[(Intent, &[&str])] = &[
    (Intent::Greeting, GREETING_KEYWORDS),
    (Intent::Task, TASK_KEYWORDS),
    (Intent::Calendar, CALENDAR_KEYWORDS),
    (Intent::Email, EMAIL_KEYWORDS),
    (Intent::Document, DOCUMENT_KEYWORDS),
];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Classify `command` by substring search over the lower-cased text.
pub fn classify(command: &str, with_context: bool) -> Intent {
    let lowered = command.to_lowercase();

    if with_context {
        if let Some((intent, _)) = CONTEXT_RULES
            .iter()
            .find(|(_, keywords)| contains_any(&lowered, keywords))
        {
            return *intent;
        }
    }

    RULES
        .iter()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_case_insensitive() {
        assert_eq!(classify("ПРИВЕТ!", false), Intent::Greeting);
    }

    #[test]
    fn greeting_outranks_task() {
        assert_eq!(classify("привет, создай задачу", false), Intent::Greeting);
    }

    #[test]
    fn schedule_needs_context() {
        assert_eq!(classify("покажи расписание", true), Intent::Schedule);
        assert_eq!(classify("покажи расписание", false), Intent::Fallback);
    }

    #[test]
    fn substring_match_is_literal() {
        // "plan" is not a keyword, but "план" inside "запланируй" is.
        assert_eq!(classify("запланируй обед", false), Intent::Calendar);
        assert_eq!(classify("запланируй обед", true), Intent::Schedule);
    }

    #[test]
    fn unmatched_text_falls_back() {
        assert_eq!(classify("42", true), Intent::Fallback);
    }
}
