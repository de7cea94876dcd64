// Campaign asset generation.
// All backend calls go through llm_client — no direct HTTP calls here.

pub mod client;
pub mod prompts;
pub mod schema;
pub mod tone;
