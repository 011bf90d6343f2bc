pub mod dictation;
mod field;
pub mod keyboard;
mod mode;

pub use dictation::{
    CommandRecognizer, Dictation, DictationError, DictationEvent, DictationOutcome,
    SpeechRecognizer,
};
pub use field::InputField;
pub use keyboard::{ArabicKeyboard, KeyAction, KeyCap};
pub use mode::ModeSelector;
