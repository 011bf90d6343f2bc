use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    /// Anything the backend does not call `user` is rendered as an assistant turn.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Bot
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            time: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Wall-clock `HH:MM` in the local timezone.
    pub fn clock(&self) -> String {
        self.time.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Parses RFC 3339 or a naive ISO-8601 stamp; naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn naive_server_timestamp_is_utc() {
        let parsed = parse_timestamp("2024-05-01T10:15:30.123456").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.minute(), 15);
        assert_eq!(parsed.day(), 1);
    }

    #[test]
    fn offset_timestamp_is_normalized() {
        let parsed = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn stored_message_decodes() {
        let msg: Message = serde_json::from_str(
            r#"{"role":"user","text":"ما هي حقوق المستأجر؟","time":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text, "ما هي حقوق المستأجر؟");
        assert_eq!(msg.time.hour(), 10);
    }

    #[test]
    fn unknown_role_is_bot() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","text":"x","time":null}"#).unwrap();
        assert_eq!(msg.role, Role::Bot);
    }

    #[test]
    fn chat_request_wire_shape() {
        let body = serde_json::to_value(ChatRequest {
            message: "سؤال".to_string(),
            mode: Mode::RealEstate,
        })
        .unwrap();
        assert_eq!(body["message"], "سؤال");
        assert_eq!(body["mode"], "real_estate");
    }
}
