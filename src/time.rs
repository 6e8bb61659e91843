pub use core::time::Duration;

// `std::time::{Instant, SystemTime}` can panic on `wasm32-unknown-unknown`
// depending on how the runtime is configured. `web-time` provides browser-backed
// clocks via `performance.now()` and `Date.now()`.
#[cfg(target_arch = "wasm32")]
pub use web_time::{Instant, SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Instant, SystemTime, UNIX_EPOCH};
