// Daily health-tips generation.
// All completion calls go through llm_client — generation only sees the transport trait.

pub mod extract;
pub mod generator;
pub mod prompts;
pub mod record;
