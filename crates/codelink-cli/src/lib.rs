//! CLI library components for the codelink mapper.

pub mod logging;
