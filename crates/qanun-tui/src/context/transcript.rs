use qanun_types::{Message, Role};

use crate::branding::BOT_BADGE;
use crate::ui::escape_markup;

/// Fixed id of the pending-reply placeholder.
pub const TYPING_ID: &str = "typing-msg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Message(Message),
    Typing,
}

/// The visible conversation. Holds at most one typing placeholder and tracks
/// whether the view follows the newest entry.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    /// Lines scrolled back from the bottom; zero means the view follows the tail.
    scroll_back: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(message) => Some(message),
            TranscriptEntry::Typing => None,
        })
    }

    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(TranscriptEntry::Message(message));
        self.touched();
    }

    /// Replaces every entry, placeholder included.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.entries = messages.into_iter().map(TranscriptEntry::Message).collect();
        self.touched();
    }

    pub fn reset_to(&mut self, message: Message) {
        self.replace(vec![message]);
    }

    pub fn has_typing(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, TranscriptEntry::Typing))
    }

    /// Returns `false` when the placeholder was already shown.
    pub fn show_typing(&mut self) -> bool {
        if self.has_typing() {
            return false;
        }
        self.entries.push(TranscriptEntry::Typing);
        self.touched();
        true
    }

    /// Returns `false` when there was nothing to remove.
    pub fn remove_typing(&mut self) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing));
        self.entries.len() != before
    }

    pub fn is_following_tail(&self) -> bool {
        self.scroll_back == 0
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_back = 0;
    }

    /// Keeps the scroll position within what the view can actually show.
    pub fn clamp_scroll(&mut self, max_back: usize) {
        self.scroll_back = self.scroll_back.min(max_back);
    }

    fn touched(&mut self) {
        self.scroll_back = 0;
    }

    /// Renders the transcript as an HTML fragment; all free text is escaped.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                TranscriptEntry::Message(message) => push_message_markup(&mut out, message),
                TranscriptEntry::Typing => {
                    out.push_str(&format!(
                        "<div class=\"message bot-message\" id=\"{}\">\
                         <div class=\"ai-badge\">{}</div>\
                         <div class=\"typing-indicator\"><span></span><span></span><span></span></div>\
                         </div>\n",
                        TYPING_ID,
                        escape_markup(BOT_BADGE)
                    ));
                }
            }
        }
        out
    }
}

fn push_message_markup(out: &mut String, message: &Message) {
    let time = escape_markup(&message.clock());
    let text = escape_markup(&message.text);
    match message.role {
        Role::Bot => out.push_str(&format!(
            "<div class=\"message bot-message\">\
             <div class=\"ai-badge\">{}</div>\
             <div class=\"msg-content\">{}</div>\
             <div class=\"message-time\">{}</div>\
             </div>\n",
            escape_markup(BOT_BADGE),
            text,
            time
        )),
        Role::User => out.push_str(&format!(
            "<div class=\"message user-message\">{}<div class=\"message-time\">{}</div></div>\n",
            text, time
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_is_a_singleton() {
        let mut transcript = Transcript::new();
        assert!(transcript.show_typing());
        assert!(!transcript.show_typing());
        assert_eq!(transcript.entries().len(), 1);
        assert!(transcript.remove_typing());
        assert!(!transcript.remove_typing());
        assert!(transcript.entries().is_empty());
    }

    #[test]
    fn messages_skip_placeholder() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("q"));
        transcript.show_typing();
        assert_eq!(transcript.message_count(), 1);
        assert_eq!(transcript.entries().len(), 2);
    }

    #[test]
    fn replace_drops_placeholder() {
        let mut transcript = Transcript::new();
        transcript.show_typing();
        transcript.replace(vec![Message::user("a"), Message::bot("b")]);
        assert!(!transcript.has_typing());
        assert_eq!(transcript.message_count(), 2);
    }

    #[test]
    fn append_returns_view_to_tail() {
        let mut transcript = Transcript::new();
        transcript.scroll_up(5);
        assert!(!transcript.is_following_tail());
        transcript.append(Message::bot("x"));
        assert!(transcript.is_following_tail());
    }

    #[test]
    fn scroll_is_clamped() {
        let mut transcript = Transcript::new();
        transcript.scroll_up(50);
        transcript.clamp_scroll(10);
        assert_eq!(transcript.scroll_back(), 10);
        transcript.scroll_down(100);
        assert!(transcript.is_following_tail());
    }

    #[test]
    fn markup_escapes_message_text() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("<b>hi</b> & \"bye\""));
        transcript.append(Message::bot("<script>x()</script>"));
        transcript.show_typing();
        let markup = transcript.to_markup();
        assert!(markup.contains("&lt;b&gt;hi&lt;/b&gt; &amp; &quot;bye&quot;"));
        assert!(markup.contains("&lt;script&gt;x()&lt;/script&gt;"));
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("class=\"ai-badge\""));
        assert!(markup.contains("id=\"typing-msg\""));
        assert_eq!(markup.matches("msg-content").count(), 1);
    }
}
