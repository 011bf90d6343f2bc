use serde::{Deserialize, Serialize};

use crate::message::Message;

/// One row of `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SessionSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            timestamp: None,
        }
    }
}

/// Body of `GET /api/session/{id}`. Owner and creation fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(default)]
    pub messages: Vec<Message>,
}
