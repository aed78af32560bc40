use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// generateContent wire format

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(rename = "topK")]
    pub top_k: u32,
    #[serde(rename = "topP")]
    pub top_p: f64,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

impl GenerateContentResponse {
    /// Pulls the first candidate text out of the response, if any.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()
            .map(|p| p.text.clone())
    }
}

fn get_api_key() -> Result<String, String> {
    std::env::var("GEMINI_API_KEY").map_err(|_| "GEMINI_API_KEY not configured".to_string())
}

fn get_model() -> String {
    std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

fn get_timeout() -> Duration {
    let secs = std::env::var("GEMINI_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

async fn call_generate_content(request: &GenerateContentRequest) -> Result<String, String> {
    let api_key = get_api_key()?;
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        GEMINI_API_BASE,
        get_model(),
        api_key
    );

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .timeout(get_timeout())
        .json(request)
        .send()
        .await
        .map_err(|e| format!("Failed to reach generation API: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Generation API error {}: {}", status, body));
    }

    let data: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse generation response: {}", e))?;

    data.first_text()
        .ok_or_else(|| "No response generated.".to_string())
}

/// Search-augmented lookup call. Used to gather current factual context
/// (fees, transport, hours) before the final generation call.
pub async fn lookup_current_info(search_query: &str) -> Result<String, String> {
    log::info!("🔍 Lookup call: {}", search_query);

    let request = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: format!(
                    "Search for current information about: {}. Provide recent, accurate details \
                     about entry fees, transportation options, operating hours, and current \
                     conditions. Focus on official and reliable sources.",
                    search_query
                ),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1500,
        },
        tools: Some(vec![json!({
            "googleSearchRetrieval": {
                "searchQualities": ["HIGH_QUALITY"]
            }
        })]),
    };

    call_generate_content(&request).await
}

/// Final structured generation call for the guide document.
pub async fn generate_guide(prompt: &str) -> Result<String, String> {
    log::info!("📝 Generation call ({} chars of prompt)", prompt.len());

    let request = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 3000,
        },
        tools: None,
    };

    call_generate_content(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 3000,
            },
            tools: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 3000);
        assert_eq!(value["generationConfig"]["topK"], 40);
        // tools must be absent entirely when not set
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_response_first_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"guide body"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text().unwrap(), "guide body");
    }

    #[test]
    fn test_response_without_candidates() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.first_text().is_none());
    }
}
