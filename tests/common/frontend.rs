use std::sync::Mutex;

use async_trait::async_trait;
use worklog::manager::{Frontend, Notification, NotificationLevel};

/// Frontend that records notifications and answers confirmations with a fixed value
pub struct RecordingFrontend {
    answer: bool,
    notifications: Mutex<Vec<Notification>>,
    questions: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingFrontend {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            notifications: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last_level(&self) -> Option<NotificationLevel> {
        self.notifications.lock().unwrap().last().map(|n| n.level)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Frontend for RecordingFrontend {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer
    }
}
