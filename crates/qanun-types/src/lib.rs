pub mod message;
pub mod mode;
pub mod session;

pub use message::{ChatRequest, ChatResponse, Message, Role};
pub use mode::Mode;
pub use session::{SessionDetail, SessionSummary};
