//! Record Generator — turns extracted resume text into a [`ResumeRecord`].
//!
//! Flow: build prompt → single bounded LLM call → permissive JSON recovery →
//!       map onto the record. Any failure along the way degrades to the
//!       heuristic extractor, so `generate` never fails.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{EXTRACTION_TEMPERATURE, JSON_ONLY_INSTRUCTION};
use crate::llm_client::recovery::{recover_json_object, RecoveryError};
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::parsing::heuristics::heuristic_record;
use crate::parsing::models::{RecordSource, ResumeRecord};
use crate::parsing::prompts::{RESUME_PARSE_MAX_TOKENS, RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};

/// Why the LLM path was abandoned. Logged, never returned to the caller.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not recover JSON from LLM output: {0}")]
    Recovery(#[from] RecoveryError),
}

/// A record plus the path that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedRecord {
    pub record: ResumeRecord,
    pub source: RecordSource,
}

pub struct RecordGenerator {
    llm: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl RecordGenerator {
    pub fn new(llm: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Always yields a record: LLM-derived when possible, heuristic otherwise.
    pub async fn generate(&self, text: &str) -> GeneratedRecord {
        match self.generate_with_llm(text).await {
            Ok(record) => {
                info!(
                    "Resume parsed by LLM: {} of 10 fields filled",
                    record.filled_fields()
                );
                GeneratedRecord {
                    record,
                    source: RecordSource::Llm,
                }
            }
            Err(e) => {
                warn!("Falling back to heuristic extraction: {e}");
                let record = heuristic_record(text);
                info!(
                    "Resume parsed heuristically: {} of 10 fields filled",
                    record.filled_fields()
                );
                GeneratedRecord {
                    record,
                    source: RecordSource::Heuristic,
                }
            }
        }
    }

    async fn generate_with_llm(&self, text: &str) -> Result<ResumeRecord, GenerationFailure> {
        let system = build_system_prompt();
        let user = RESUME_PARSE_PROMPT.replace("{resume_text}", text);
        let request = CompletionRequest {
            system: &system,
            user: &user,
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: RESUME_PARSE_MAX_TOKENS,
        };

        let raw = tokio::time::timeout(self.timeout, self.llm.complete(&request))
            .await
            .map_err(|_| GenerationFailure::Timeout(self.timeout))??;

        let map = recover_json_object(&raw)?;
        Ok(ResumeRecord::from_json_map(&map))
    }
}

fn build_system_prompt() -> String {
    format!("{RESUME_PARSE_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned provider: replies with a fixed outcome and records what it was asked.
    pub(crate) struct FakeProvider {
        reply: Result<String, u16>,
        delay: Option<Duration>,
        pub(crate) seen_user: Mutex<Option<String>>,
    }

    impl FakeProvider {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: None,
                seen_user: Mutex::new(None),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                delay: None,
                seen_user: Mutex::new(None),
            }
        }

        fn stalled(delay: Duration) -> Self {
            Self {
                reply: Ok("{\"name\": \"Too Late\"}".to_string()),
                delay: Some(delay),
                seen_user: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
            *self.seen_user.lock().unwrap() = Some(request.user.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(|status| LlmError::Api {
                status,
                message: "fake provider failure".to_string(),
            })
        }
    }

    const RESUME_TEXT: &str = "Jane Doe\njane@example.com\nNew York, NY\nSoftware Engineer at Acme";

    fn generator(provider: FakeProvider) -> RecordGenerator {
        RecordGenerator::new(Arc::new(provider), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_llm_output_with_fences_and_prose() {
        let raw = "Sure! ```json\n{\"name\":\"Ada Lovelace\",\"email\":\"ada@example.com\"}\n``` Hope that helps!";
        let generated = generator(FakeProvider::replying(raw))
            .generate(RESUME_TEXT)
            .await;

        assert_eq!(generated.source, RecordSource::Llm);
        assert_eq!(
            generated.record,
            ResumeRecord {
                name: Some("Ada Lovelace".to_string()),
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_prose_output_falls_back_to_heuristics() {
        let generated = generator(FakeProvider::replying(
            "I'm sorry, I can't help with that resume.",
        ))
        .generate(RESUME_TEXT)
        .await;

        assert_eq!(generated.source, RecordSource::Heuristic);
        assert_eq!(generated.record.name.as_deref(), Some("Jane Doe"));
        let json = serde_json::to_value(&generated.record).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_to_heuristics() {
        let generated = generator(FakeProvider::failing(503))
            .generate(RESUME_TEXT)
            .await;
        assert_eq!(generated.source, RecordSource::Heuristic);
        assert_eq!(generated.record.email.as_deref(), Some("jane@example.com"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_heuristics() {
        let generator = RecordGenerator::new(
            Arc::new(FakeProvider::stalled(Duration::from_secs(120))),
            Duration::from_secs(5),
        );
        let generated = generator.generate(RESUME_TEXT).await;
        assert_eq!(generated.source, RecordSource::Heuristic);
        assert_eq!(generated.record.name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_prompt_carries_resume_text() {
        let provider = Arc::new(FakeProvider::replying("{}"));
        let generator = RecordGenerator::new(provider.clone(), Duration::from_secs(30));
        let generated = generator.generate(RESUME_TEXT).await;

        assert_eq!(generated.source, RecordSource::Llm);
        assert_eq!(generated.record, ResumeRecord::default());
        let seen = provider.seen_user.lock().unwrap().clone().unwrap();
        assert!(seen.starts_with("Parse this resume text:\n\n"));
        assert!(seen.ends_with(RESUME_TEXT));
    }

    #[test]
    fn test_system_prompt_lists_every_field_and_json_rule() {
        let system = build_system_prompt();
        for field in crate::parsing::models::RESUME_FIELDS {
            assert!(system.contains(&format!("- {field}:")), "missing {field}");
        }
        assert!(system.contains("ONLY a single JSON object"));
    }
}
