pub mod chat;
pub mod http_client;
pub mod scrub;

pub use chat::{ChatClient, ChatMessage, ChatRequest};
pub use http_client::build_client;
pub use scrub::{redact_secrets, sanitize_error_body};
