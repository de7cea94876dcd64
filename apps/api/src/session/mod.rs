// Campaign session: state machine, async driver, HTTP handlers.

pub mod handle;
pub mod handlers;
pub mod state;
