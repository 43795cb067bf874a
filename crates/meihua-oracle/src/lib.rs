//! Natural-language interpretation of readings through an OpenAI-compatible
//! chat-completions endpoint.
//!
//! The casting engine never depends on this crate; it only consumes a finished
//! [`meihua_core::Reading`].

mod client;
mod error;
mod prompt;
mod resolver;
mod stream;

pub use client::Oracle;
pub use error::{OracleError, OracleResult};
pub use prompt::{ChatMessage, Consultation, PromptTemplate};
pub use resolver::{
    LlmResolver, API_KEY_ENV, BASE_URL_ENV, DEFAULT_API_URL, DEFAULT_MODEL, MODEL_ENV,
};
pub use stream::{parse_sse_line, Delta, LineDecoder, SseEvent};
