use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::context::AssistantContext;
use super::intent::{Intent, classify};
use super::templates::{self, fill, has_placeholders};
use crate::models::{Document, DocumentType};

static TASK_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:создай|добавь) задачу[:\s]+["']?([^"']+)["']?"#)
        .expect("task title pattern is valid")
});

static EVENT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:создай встречу|запланируй)[:\s]+["']?([^"']+)["']?"#)
        .expect("event title pattern is valid")
});

/// Simulated processing time for each responder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderDelays {
    pub response: Duration,
    pub analysis: Duration,
    pub draft: Duration,
    pub optimization: Duration,
}

impl Default for ResponderDelays {
    fn default() -> Self {
        Self {
            response: Duration::from_millis(1200),
            analysis: Duration::from_millis(2500),
            draft: Duration::from_millis(1800),
            optimization: Duration::from_millis(1500),
        }
    }
}

impl ResponderDelays {
    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            response: Duration::ZERO,
            analysis: Duration::ZERO,
            draft: Duration::ZERO,
            optimization: Duration::ZERO,
        }
    }
}

/// Tone of a generated email draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
    Friendly,
    Brief,
}

impl Tone {
    fn phrases(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        // (label, greeting, opening, closing)
        match self {
            Tone::Formal => ("деловой", "Уважаемый(-ая)", "Обращаюсь к Вам по вопросу", "С уважением"),
            Tone::Friendly => ("дружелюбный", "Привет", "Хотел(а) обсудить с тобой", "До встречи"),
            Tone::Brief => ("краткий", "Здравствуйте", "Кратко по теме:", "Спасибо"),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Formal => "formal",
            Tone::Friendly => "friendly",
            Tone::Brief => "brief",
        };
        f.write_str(name)
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            "friendly" => Ok(Tone::Friendly),
            "brief" => Ok(Tone::Brief),
            other => Err(format!("unknown tone `{other}`; expected formal|friendly|brief")),
        }
    }
}

/// A generated reply together with the category that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Rule-based responder. Stateless apart from its random source.
pub struct Responder<R: Rng = StdRng> {
    rng: R,
    delays: ResponderDelays,
}

impl Responder<StdRng> {
    pub fn from_entropy(delays: ResponderDelays) -> Self {
        Self::new(StdRng::from_entropy(), delays)
    }

    pub fn seeded(seed: u64, delays: ResponderDelays) -> Self {
        Self::new(StdRng::seed_from_u64(seed), delays)
    }
}

impl<R: Rng> Responder<R> {
    pub fn new(rng: R, delays: ResponderDelays) -> Self {
        Self { rng, delays }
    }

    /// Wait the configured delay, then answer `command`.
    pub fn respond(&mut self, command: &str, context: Option<&AssistantContext<'_>>) -> Reply {
        pause(self.delays.response);
        self.reply_to(command, context)
    }

    /// Answer `command` immediately.
    pub fn reply_to(&mut self, command: &str, context: Option<&AssistantContext<'_>>) -> Reply {
        let intent = classify(command, context.is_some());
        debug!(intent = intent.as_str(), "classified command");

        let lowered = command.to_lowercase();
        let text = match (intent, context) {
            (Intent::Schedule, Some(ctx)) => schedule_advice(ctx),
            (Intent::Productivity, Some(ctx)) => productivity_report(ctx),
            (Intent::Greeting, ctx) => self.greeting(ctx),
            (Intent::Task, _) => task_reply(command),
            (Intent::Calendar, _) => calendar_reply(command),
            (Intent::Email, ctx) => email_reply(&lowered, ctx),
            (Intent::Document, _) => document_reply(&lowered),
            _ => self.pick(templates::FALLBACK).to_string(),
        };

        Reply { intent, text }
    }

    /// Produce a summary for an uploaded document.
    pub fn analyze_document(&mut self, document: &Document) -> String {
        pause(self.delays.analysis);

        let content_kind = match document.kind {
            DocumentType::Pdf => "Официальный документ",
            _ => "Текстовый файл",
        };
        let template = self.pick(templates::DOCUMENT_INSIGHTS);
        let insight = fill(
            template,
            &[
                ("docName", document.name.clone()),
                ("sectionCount", self.rng.gen_range(3..=7).to_string()),
                ("keyPointCount", self.rng.gen_range(5..=14).to_string()),
                ("dateCount", self.rng.gen_range(1..=3).to_string()),
                ("contentKind", content_kind.to_string()),
                ("readingMinutes", (document.size / 1000 + 2).to_string()),
            ],
        );

        format!("{insight}{}", templates::DOCUMENT_RECOMMENDATIONS)
    }

    /// Compose an email draft about `topic` in the given tone.
    pub fn draft_email(&mut self, topic: &str, tone: Tone) -> String {
        pause(self.delays.draft);

        let (label, greeting, opening, closing) = tone.phrases();
        fill(
            templates::EMAIL_DRAFT,
            &[
                ("toneLabel", label.to_string()),
                ("greeting", greeting.to_string()),
                ("opening", opening.to_string()),
                ("topic", topic.to_string()),
                ("closing", closing.to_string()),
            ],
        )
    }

    /// Day-planning advice built from tasks and today's events.
    pub fn schedule_optimization(&mut self, context: &AssistantContext<'_>) -> String {
        pause(self.delays.optimization);

        let active = context.active_tasks();
        let overdue = context.overdue_tasks();
        let high_priority = context.high_priority_active();
        let mut text = templates::OPTIMIZATION_HEADER.to_string();

        if let Some(first) = overdue.first() {
            text.push_str(&fill(
                templates::OPTIMIZATION_OVERDUE,
                &[
                    ("overdueCount", overdue.len().to_string()),
                    ("firstOverdue", first.title.clone()),
                ],
            ));
        }

        if context.today_events.len() > 4 {
            text.push_str(&fill(
                templates::OPTIMIZATION_BUSY,
                &[("eventCount", context.today_events.len().to_string())],
            ));
        }

        if !high_priority.is_empty() {
            let task_list = high_priority
                .iter()
                .take(3)
                .map(|task| format!("• {}", task.title))
                .collect::<Vec<_>>()
                .join("\n");
            text.push_str(&fill(
                templates::OPTIMIZATION_PRIORITY,
                &[
                    ("highPriorityCount", high_priority.len().to_string()),
                    ("taskList", task_list),
                ],
            ));
        }

        debug!(active = active.len(), overdue = overdue.len(), "built schedule optimization");
        text.push_str(templates::OPTIMIZATION_FOOTER);
        text
    }

    fn greeting(&mut self, context: Option<&AssistantContext<'_>>) -> String {
        match context {
            Some(ctx) => {
                let template = self.pick(templates::GREETING);
                fill(
                    template,
                    &[
                        ("taskCount", ctx.active_tasks().len().to_string()),
                        ("eventCount", ctx.today_events.len().to_string()),
                    ],
                )
            }
            None => {
                // Without context the counting template would show raw tokens.
                let plain: Vec<&'static str> = templates::GREETING
                    .iter()
                    .copied()
                    .filter(|t| !has_placeholders(t))
                    .collect();
                self.pick(&plain).to_string()
            }
        }
    }

    fn pick(&mut self, choices: &[&'static str]) -> &'static str {
        choices.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

fn captured_title(pattern: &Regex, command: &str) -> Option<String> {
    pattern
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn task_reply(command: &str) -> String {
    match captured_title(&TASK_TITLE, command) {
        Some(title) => fill(templates::TASK_CREATED, &[("title", title)]),
        None => templates::TASK_PROMPT.to_string(),
    }
}

fn calendar_reply(command: &str) -> String {
    match captured_title(&EVENT_TITLE, command) {
        Some(title) => fill(templates::EVENT_PLANNED, &[("title", title)]),
        None => templates::EVENT_PROMPT.to_string(),
    }
}

fn email_reply(lowered: &str, context: Option<&AssistantContext<'_>>) -> String {
    if lowered.contains("напиши письмо") || lowered.contains("черновик") {
        return templates::EMAIL_DRAFT_PROMPT.to_string();
    }

    if let Some(ctx) = context.filter(|ctx| !ctx.unread_emails.is_empty()) {
        let highlights = ctx
            .unread_emails
            .iter()
            .take(2)
            .map(|email| format!("• От {}: {}", email.from, email.subject))
            .collect::<Vec<_>>()
            .join("\n");
        return fill(
            templates::EMAIL_UNREAD,
            &[
                ("unreadCount", ctx.unread_emails.len().to_string()),
                ("highlights", highlights),
            ],
        );
    }

    templates::EMAIL_PROMPT.to_string()
}

fn document_reply(lowered: &str) -> String {
    if lowered.contains("анализ") || lowered.contains("резюме") {
        templates::DOCUMENT_ANALYSIS.to_string()
    } else {
        templates::DOCUMENT_PROMPT.to_string()
    }
}

fn schedule_advice(context: &AssistantContext<'_>) -> String {
    let active = context.active_tasks();
    let event_count = context.today_events.len();

    if event_count > 5 {
        return fill(templates::SCHEDULE_BUSY, &[("eventCount", event_count.to_string())]);
    }

    if active.len() > 10 {
        let high_priority = context.high_priority_active();
        let focus = high_priority
            .first()
            .or_else(|| active.first())
            .map(|task| task.title.clone())
            .unwrap_or_default();
        return fill(
            templates::SCHEDULE_OVERLOADED,
            &[
                ("taskCount", active.len().to_string()),
                ("highPriorityCount", high_priority.len().to_string()),
                ("focusTask", focus),
            ],
        );
    }

    fill(
        templates::SCHEDULE_BALANCED,
        &[
            ("eventCount", event_count.to_string()),
            ("taskCount", active.len().to_string()),
        ],
    )
}

fn productivity_report(context: &AssistantContext<'_>) -> String {
    let overdue = context.overdue_tasks().len();
    let verdict = if overdue > 0 {
        templates::PRODUCTIVITY_OVERDUE
    } else {
        templates::PRODUCTIVITY_ON_TRACK
    };

    fill(
        templates::PRODUCTIVITY,
        &[
            ("completedCount", context.completed_tasks().len().to_string()),
            ("overdueCount", overdue.to_string()),
            ("unreadCount", context.unread_emails.len().to_string()),
            ("documentCount", context.documents.len().to_string()),
            ("verdict", verdict.to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> Responder {
        Responder::seeded(7, ResponderDelays::none())
    }

    #[test]
    fn extracts_quoted_task_title() {
        let reply = responder().reply_to("Создай задачу: \"Купить молоко\"", None);
        assert_eq!(reply.intent, Intent::Task);
        assert!(reply.text.contains("\"Купить молоко\""));
    }

    #[test]
    fn task_keyword_without_title_prompts() {
        let reply = responder().reply_to("новая задача", None);
        assert_eq!(reply.text, templates::TASK_PROMPT);
    }

    #[test]
    fn extracts_event_title() {
        let reply = responder().reply_to("создай встречу с командой", None);
        assert_eq!(reply.intent, Intent::Calendar);
        assert!(reply.text.contains("\"с командой\""));
    }

    #[test]
    fn draft_request_wins_over_inbox_summary() {
        let reply = responder().reply_to("напиши письмо партнеру", None);
        assert_eq!(reply.text, templates::EMAIL_DRAFT_PROMPT);
    }

    #[test]
    fn draft_uses_tone_phrases() {
        let draft = responder().draft_email("поставки", Tone::Friendly);
        assert!(draft.contains("дружелюбный"));
        assert!(draft.contains("Хотел(а) обсудить с тобой поставки."));
        assert!(draft.contains("До встречи,"));
    }

    #[test]
    fn tone_parses_from_cli_names() {
        assert_eq!("Brief".parse::<Tone>().unwrap(), Tone::Brief);
        assert!("angry".parse::<Tone>().is_err());
    }
}
