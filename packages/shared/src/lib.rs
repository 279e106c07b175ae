//! Utilities shared by the chatfeed packages.

pub mod logger;
pub mod time;
