// Reliability primitives shared by every generation operation
pub mod fanout;
pub mod retry;
pub mod router;

pub use fanout::fan_out;
pub use retry::{DoublingBackoff, Retrier};
pub use router::{FallbackTrigger, ModelRouter, Route, Tier};
