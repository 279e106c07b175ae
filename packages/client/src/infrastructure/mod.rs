//! Infrastructure layer: HTTP, server-sent events, persistence and
//! environment probes behind the domain ports.

pub mod color_scheme;
pub mod http;
pub mod id_generator;
pub mod sse;
pub mod store;

pub use color_scheme::{FixedColorScheme, TerminalColorScheme};
pub use http::HttpFeedClient;
pub use id_generator::{CompositeGenerator, UuidGenerator};
pub use sse::{EventStreamSubscription, SseEvent, SseParser};
pub use store::{FileStore, InMemoryStore};
