use desk_core::domain::{Category, ClassificationSuggestion, Priority};
use desk_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::client::LlmClient;

mod prompts;

/// Classification advisor seam. Controllers depend on this trait; tests
/// substitute a mock.
pub trait Classifier {
    /// Suggest a category/priority for a draft description. Failures are
    /// advisory: callers recover locally and never surface them to the user.
    fn classify(&self, description: &str) -> Result<ClassificationSuggestion, AppError>;
}

/// Advisor backed by the local LLM endpoint. Stateless: every call is a
/// fresh round trip, no cache, no retry.
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    client: LlmClient,
    model: String,
}

impl LlmClassifier {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Classifier for LlmClassifier {
    fn classify(&self, description: &str) -> Result<ClassificationSuggestion, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::new(
                "AI_CLASSIFY_EMPTY_INPUT",
                "Cannot classify an empty description",
            ));
        }

        let url = format!("{}/api/generate", self.client.base_url());
        let prompt = prompts::classification_prompt(description);
        let req = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };

        let resp = ureq::post(&url)
            .timeout(std::time::Duration::from_secs(30))
            .send_json(serde_json::to_value(req).map_err(|e| {
                AppError::new("AI_CLASSIFY_FAILED", "Failed to encode classify request")
                    .with_details(e.to_string())
            })?);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new("AI_CLASSIFY_FAILED", "Failed to decode classify response")
                        .with_details(e.to_string())
                })?;
                parse_classification(&v.response)
            }
            Ok(r) => Err(
                AppError::new("AI_CLASSIFY_FAILED", "Classify request failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(e) => Err(
                AppError::new("AI_CLASSIFY_FAILED", "Failed to call classify endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawClassification {
    category: Option<String>,
    priority: Option<String>,
}

/// Parse the model's reply into a suggestion.
///
/// The model is instructed to answer with bare JSON, but a markdown code
/// fence is stripped when present. A missing field or a value outside the
/// closed enumerations falls back to the default for that field; only an
/// unparseable reply fails the round trip.
pub fn parse_classification(text: &str) -> Result<ClassificationSuggestion, AppError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(AppError::new(
            "AI_CLASSIFY_BAD_REPLY",
            "Classifier reply was empty",
        ));
    }

    let raw: RawClassification = serde_json::from_str(body).map_err(|e| {
        AppError::new("AI_CLASSIFY_BAD_REPLY", "Classifier reply was not valid JSON")
            .with_details(format!("reply={body}; err={e}"))
    })?;

    let suggested_category = match raw.category.as_deref().map(Category::parse) {
        Some(Ok(category)) => category,
        _ => {
            log::warn!(
                "classifier returned an unusable category ({:?}), falling back to {}",
                raw.category,
                Category::default().as_str()
            );
            Category::default()
        }
    };

    let suggested_priority = match raw.priority.as_deref().map(Priority::parse) {
        Some(Ok(priority)) => priority,
        _ => {
            log::warn!(
                "classifier returned an unusable priority ({:?}), falling back to {}",
                raw.priority,
                Priority::default().as_str()
            );
            Priority::default()
        }
    };

    Ok(ClassificationSuggestion {
        suggested_category,
        suggested_priority,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. ```json) up to the first newline.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => return text,
    };
    match rest.rfind("```") {
        Some(i) => rest[..i].trim(),
        None => rest.trim(),
    }
}
