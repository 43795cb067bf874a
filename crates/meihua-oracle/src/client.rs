use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use meihua_core::Reading;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{OracleError, OracleResult};
use crate::prompt::{ChatMessage, Consultation, PromptTemplate};
use crate::resolver::LlmResolver;
use crate::stream::{parse_sse_line, Delta, LineDecoder, SseEvent};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Streams interpretations of readings from a chat-completions endpoint.
pub struct Oracle {
    resolver: LlmResolver,
    client: Client,
    prompt: PromptTemplate,
}

impl Oracle {
    /// Build a client for `resolver`. An API key is required.
    pub fn new(resolver: LlmResolver) -> OracleResult<Self> {
        if !resolver.has_key() {
            return Err(OracleError::MissingApiKey);
        }

        // Only the connect phase is bounded; the stream stays open until the answer ends.
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        Ok(Self {
            resolver,
            client,
            prompt: PromptTemplate::default(),
        })
    }

    /// Override the system prompt.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn resolver(&self) -> &LlmResolver {
        &self.resolver
    }

    /// Ask for an interpretation of `reading`, forwarding each delta to `on_delta`
    /// as it arrives. Returns the full answer text (reasoning excluded).
    ///
    /// `on_delta` returning [`ControlFlow::Break`] closes the stream early; the
    /// text received so far is returned. Chunks that fail to parse are logged
    /// and skipped.
    pub async fn stream<F>(
        &self,
        reading: &Reading,
        consultation: &Consultation,
        mut on_delta: F,
    ) -> OracleResult<String>
    where
        F: FnMut(&Delta) -> ControlFlow<()>,
    {
        let messages = self.prompt.messages(reading, consultation)?;
        let body = ChatRequest {
            model: &self.resolver.model_name,
            messages: &messages,
            stream: true,
        };

        let started = Instant::now();
        debug!(
            target: "oracle::client",
            model = %self.resolver.model_name,
            url = %self.resolver.completions_url(),
            "interpretation_request_start"
        );

        let response = self
            .client
            .post(self.resolver.completions_url())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut answer = String::new();
        let mut decoder = LineDecoder::new();
        let mut bytes = response.bytes_stream();
        let mut flow = ControlFlow::Continue(());

        'read: while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for line in decoder.push(&chunk) {
                flow = Self::handle_line(&line, &mut answer, &mut on_delta);
                if flow.is_break() {
                    break 'read;
                }
            }
        }
        if flow.is_continue() {
            if let Some(line) = decoder.finish() {
                Self::handle_line(&line, &mut answer, &mut on_delta);
            }
        }

        debug!(
            target: "oracle::client",
            duration_ms = started.elapsed().as_millis() as u64,
            chars = answer.chars().count(),
            "interpretation_request_complete"
        );
        Ok(answer)
    }

    /// Breaks on the terminator or when `on_delta` asks to stop.
    fn handle_line<F>(line: &str, answer: &mut String, on_delta: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&Delta) -> ControlFlow<()>,
    {
        match parse_sse_line(line) {
            Ok(Some(SseEvent::Done)) => ControlFlow::Break(()),
            Ok(Some(SseEvent::Chunk(deltas))) => {
                for delta in &deltas {
                    if let Delta::Content(text) = delta {
                        answer.push_str(text);
                    }
                    if on_delta(delta).is_break() {
                        debug!(target: "oracle::client", "interpretation_stream_stopped");
                        return ControlFlow::Break(());
                    }
                }
                ControlFlow::Continue(())
            }
            Ok(None) => ControlFlow::Continue(()),
            Err(err) => {
                warn!(target: "oracle::client", "skipping unparseable stream chunk: {err}");
                ControlFlow::Continue(())
            }
        }
    }

    fn headers(&self) -> OracleResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.resolver.api_key.trim()))
            .map_err(|_| OracleError::Config("api key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}
