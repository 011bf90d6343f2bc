pub mod logging;
pub mod util;

pub use logging::{init_tracing, LogGuard};
pub use util::{abort, color, format};
