//! Rendering backend implementations
//!
//! Only the headless backend ships with the engine. It records every call
//! instead of talking to a GPU, which makes it the context used by tests and
//! by the demo binary.

pub mod headless;
