// Analysis service - Natural-language trend summary from a text generation service
use crate::domain::dashboard::AnalysisState;
use crate::domain::election::{Constituency, PartySummary, ResultStatus};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Shown when no API key is configured.
pub const MISSING_KEY_PLACEHOLDER: &str =
    "নির্বাচনী ফলাফল বিশ্লেষণ লোড করা যাচ্ছে না (API Key missing)।";

/// Shown when the text generation service fails or times out.
pub const ANALYSIS_FALLBACK: &str =
    "রিয়েল-টাইম বিশ্লেষণ এই মুহূর্তে পাওয়া যাচ্ছে না। অনুগ্রহ করে নিচের চার্টগুলো দেখুন।";

/// Shown when the service answers with blank text.
pub const EMPTY_ANALYSIS: &str = "Analysis currently unavailable.";

pub const DEFAULT_SAMPLE_SIZE: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credential for the text generation service. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for a blank key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis API key is not configured")]
    MissingCredential,

    #[error("failed to build analysis prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("request to text generation service failed: {0}")]
    Transport(String),

    #[error("text generation service returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("text generation service returned no text")]
    EmptyResponse,

    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Port to the external text generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, api_key: &ApiKey, prompt: &str) -> Result<String, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub api_key: Option<ApiKey>,
    pub sample_size: usize,
    pub timeout: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct PartyStanding<'a> {
    name: &'a str,
    won: u32,
    leading: u32,
}

#[derive(Serialize)]
struct ConstituencyExample<'a> {
    name: &'a str,
    status: ResultStatus,
}

/// Prompt embedding every party's standing and the first `sample_size`
/// constituencies as JSON. Output is requested in Bengali.
pub fn build_prompt(
    parties: &[PartySummary],
    constituencies: &[Constituency],
    sample_size: usize,
) -> Result<String, serde_json::Error> {
    let standings: Vec<PartyStanding> = parties
        .iter()
        .map(|p| PartyStanding {
            name: p.name(),
            won: p.seats_won(),
            leading: p.seats_leading(),
        })
        .collect();

    let examples: Vec<ConstituencyExample> = constituencies
        .iter()
        .take(sample_size)
        .map(|c| ConstituencyExample {
            name: c.name(),
            status: c.status(),
        })
        .collect();

    Ok(format!(
        "Analyze the following election data from Bangladesh and provide a 3-sentence \
         summary of the current trends in Bengali language.\n\
         Parties Data: {}\n\
         Constituency Examples: {}\n\n\
         Mention the leading party and any significant patterns. \
         Keep it objective and professional.",
        serde_json::to_string(&standings)?,
        serde_json::to_string(&examples)?,
    ))
}

#[derive(Clone)]
pub struct AnalysisService {
    settings: AnalysisSettings,
    generator: Arc<dyn TextGenerator>,
}

impl AnalysisService {
    pub fn new(settings: AnalysisSettings, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            settings,
            generator,
        }
    }

    /// Generated summary verbatim, or a fixed placeholder/fallback string.
    /// Never fails.
    pub async fn request_trend_summary(
        &self,
        parties: &[PartySummary],
        constituencies: &[Constituency],
    ) -> String {
        match self.summarize(parties, constituencies).await {
            Ok(text) => text,
            Err(err) => Self::degrade(&err).to_string(),
        }
    }

    /// Same request, reporting whether the text came from the service.
    pub async fn analyze(
        &self,
        parties: &[PartySummary],
        constituencies: &[Constituency],
    ) -> AnalysisState {
        match self.summarize(parties, constituencies).await {
            Ok(text) => AnalysisState::Success(text),
            Err(err) => AnalysisState::Fallback(Self::degrade(&err).to_string()),
        }
    }

    async fn summarize(
        &self,
        parties: &[PartySummary],
        constituencies: &[Constituency],
    ) -> Result<String, AnalysisError> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or(AnalysisError::MissingCredential)?;

        let prompt = build_prompt(parties, constituencies, self.settings.sample_size)?;
        tracing::debug!(
            "Requesting trend summary for {} parties ({} prompt bytes)",
            parties.len(),
            prompt.len()
        );

        let text = tokio::time::timeout(
            self.settings.timeout,
            self.generator.generate(api_key, &prompt),
        )
        .await
        .map_err(|_| AnalysisError::Timeout(self.settings.timeout))??;

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        Ok(text)
    }

    fn degrade(err: &AnalysisError) -> &'static str {
        match err {
            AnalysisError::MissingCredential => {
                tracing::warn!("Analysis API key is missing. Skipping analysis.");
                MISSING_KEY_PLACEHOLDER
            }
            AnalysisError::EmptyResponse => {
                tracing::warn!("Trend analysis returned no text");
                EMPTY_ANALYSIS
            }
            _ => {
                tracing::error!("Trend analysis failed: {}", err);
                ANALYSIS_FALLBACK
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::dataset_loader::mock_dataset;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Reply(String),
        Fail,
        Hang,
    }

    struct FakeGenerator {
        behavior: Behavior,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, api_key: &ApiKey, prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(api_key.expose(), "test-key");
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.behavior {
                Behavior::Reply(text) => Ok(text.clone()),
                Behavior::Fail => Err(AnalysisError::Provider {
                    status: 503,
                    body: "overloaded".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn service(generator: Arc<FakeGenerator>, api_key: Option<&str>) -> AnalysisService {
        let settings = AnalysisSettings {
            api_key: api_key.and_then(ApiKey::new),
            timeout: Duration::from_millis(50),
            ..AnalysisSettings::default()
        };
        AnalysisService::new(settings, generator)
    }

    #[tokio::test]
    async fn test_missing_key_returns_placeholder_without_calling() {
        let generator = FakeGenerator::new(Behavior::Reply("unused".to_string()));
        let dataset = mock_dataset().unwrap();

        let summary = service(generator.clone(), None)
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;

        assert_eq!(summary, MISSING_KEY_PLACEHOLDER);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let generator = FakeGenerator::new(Behavior::Reply("unused".to_string()));
        let dataset = mock_dataset().unwrap();

        let state = service(generator.clone(), Some("   "))
            .analyze(dataset.parties(), dataset.constituencies())
            .await;

        assert_eq!(state, AnalysisState::Fallback(MISSING_KEY_PLACEHOLDER.to_string()));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_returns_text_verbatim() {
        let reply = "  আওয়ামী লীগ এগিয়ে আছে।\n".to_string();
        let generator = FakeGenerator::new(Behavior::Reply(reply.clone()));
        let dataset = mock_dataset().unwrap();

        let summary = service(generator.clone(), Some("test-key"))
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;

        assert_eq!(summary, reply);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_fallback() {
        let generator = FakeGenerator::new(Behavior::Fail);
        let dataset = mock_dataset().unwrap();
        let service = service(generator.clone(), Some("test-key"));

        let summary = service
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;
        assert_eq!(summary, ANALYSIS_FALLBACK);

        let state = service.analyze(dataset.parties(), dataset.constituencies()).await;
        assert_eq!(state, AnalysisState::Fallback(ANALYSIS_FALLBACK.to_string()));

        // One call per invocation, no retries
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_returns_unavailable_notice() {
        let generator = FakeGenerator::new(Behavior::Reply(" \n".to_string()));
        let dataset = mock_dataset().unwrap();

        let summary = service(generator, Some("test-key"))
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;

        assert_eq!(summary, EMPTY_ANALYSIS);
    }

    #[tokio::test]
    async fn test_timeout_returns_fallback() {
        let generator = FakeGenerator::new(Behavior::Hang);
        let dataset = mock_dataset().unwrap();

        let summary = service(generator.clone(), Some("test-key"))
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;

        assert_eq!(summary, ANALYSIS_FALLBACK);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_sent_to_generator() {
        let generator = FakeGenerator::new(Behavior::Reply("ok".to_string()));
        let dataset = mock_dataset().unwrap();

        service(generator.clone(), Some("test-key"))
            .request_trend_summary(dataset.parties(), dataset.constituencies())
            .await;

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("in Bengali language"));
        assert!(!prompts[0].contains("test-key"));
    }

    #[test]
    fn test_prompt_embeds_parties_and_sample() {
        let dataset = mock_dataset().unwrap();
        let prompt = build_prompt(dataset.parties(), dataset.constituencies(), 3).unwrap();

        assert!(prompt.contains(r#"{"name":"Bangladesh Awami League","won":124,"leading":42}"#));
        assert!(prompt.contains(r#"{"name":"Others","won":5,"leading":2}"#));
        assert!(prompt.contains(concat!(
            r#"Constituency Examples: [{"name":"Dhaka-1","status":"WON"},"#,
            r#"{"name":"Gopalganj-3","status":"WON"},"#,
            r#"{"name":"Chittagong-9","status":"LEADING"}]"#,
        )));
        assert!(!prompt.contains("Sylhet-1"));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("secret-value").unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(<redacted>)");
        assert!(ApiKey::new("").is_none());

        let settings = AnalysisSettings {
            api_key: Some(key),
            ..AnalysisSettings::default()
        };
        assert!(!format!("{:?}", settings).contains("secret-value"));
    }
}
