//! Connection handles and the per-socket reader/writer driver.

pub mod driver;
pub mod handle;

pub use driver::{Frame, run_connection};
pub use handle::{Delivery, Payload, Subscriber};
