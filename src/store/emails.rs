use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::{Collection, StoreResult, require_text};
use crate::models::{Email, NewEmail, new_id};
use crate::storage::KeyValueStore;

/// Simulated inbox. New mail is kept at the front of the list.
pub struct EmailStore {
    emails: Collection<Email>,
}

impl EmailStore {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            emails: Collection::load(kv),
        }
    }

    /// Load the inbox, filling an empty one with the demo messages.
    ///
    /// A failed seed write is logged and leaves the inbox empty.
    pub fn load_or_seed(kv: Arc<dyn KeyValueStore>, now: DateTime<Utc>) -> Self {
        let mut store = Self::load(kv);
        if store.emails.is_empty() {
            match store.emails.replace(demo_inbox(now)) {
                Ok(()) => info!(count = store.emails.len(), "seeded demo inbox"),
                Err(e) => warn!(error = %e, "failed to seed demo inbox"),
            }
        }
        store
    }

    pub fn list(&self) -> &[Email] {
        self.emails.list()
    }

    pub fn get(&self, id: &str) -> Option<&Email> {
        self.emails.get(id)
    }

    pub fn unread_count(&self) -> usize {
        self.emails.list().iter().filter(|email| !email.is_read).count()
    }

    /// Add a message at the top of the inbox, stamped with the current time.
    pub fn add(&mut self, new_email: NewEmail) -> StoreResult<Email> {
        require_text("subject", &new_email.subject)?;

        let email = new_email.into_email(new_id(), Utc::now());
        self.emails.push_front(email.clone())?;
        info!(id = %email.id, "email added");
        Ok(email)
    }

    pub fn mark_as_read(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.emails.update(id, |email| email.is_read = true)?)
    }

    pub fn toggle_star(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.emails.update(id, |email| email.is_starred = !email.is_starred)?)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.emails.remove(id)?)
    }
}

fn demo_inbox(now: DateTime<Utc>) -> Vec<Email> {
    let to = "user@example.com";
    vec![
        Email {
            id: new_id(),
            from: "partner@company.ru".to_string(),
            to: to.to_string(),
            subject: "Предложение о сотрудничестве".to_string(),
            body: "Добрый день! Рассматриваем возможность партнерства с вашей компанией...".to_string(),
            is_read: false,
            received_at: now - Duration::hours(2),
            is_starred: true,
        },
        Email {
            id: new_id(),
            from: "support@service.ru".to_string(),
            to: to.to_string(),
            subject: "Подтверждение заказа №12345".to_string(),
            body: "Ваш заказ успешно оформлен и находится в обработке...".to_string(),
            is_read: true,
            received_at: now - Duration::hours(5),
            is_starred: false,
        },
        Email {
            id: new_id(),
            from: "newsletter@tech.ru".to_string(),
            to: to.to_string(),
            subject: "Еженедельный дайджест технологий".to_string(),
            body: "Главные новости технологической сферы за прошедшую неделю...".to_string(),
            is_read: false,
            received_at: now - Duration::hours(24),
            is_starred: false,
        },
    ]
}
