//! Wire types for the Gemini `generateContent` API.
//!
//! Only the fields the proxy actually uses are modeled; unknown fields
//! in responses are ignored.

use serde::{Deserialize, Serialize};

/// Request body for `streamGenerateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// One turn of the conversation, in Gemini's role vocabulary
/// ("user" or "model").
#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

/// One SSE data payload from `streamGenerateContent?alt=sse`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentChunk {
    /// Concatenate the text parts of the first candidate.
    ///
    /// Returns `None` when the chunk carries no text (e.g. a
    /// safety-rating-only or finish-reason-only chunk).
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_role_and_parts() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: "Hello".to_string(),
                }],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_chunk_text_concatenates_parts() {
        let chunk: GenerateContentChunk = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi"},{"text":" there"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.text().as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_chunk_without_text_yields_none() {
        let chunk: GenerateContentChunk = serde_json::from_str(
            r#"{"candidates":[{"finishReason":"STOP","index":0}]}"#,
        )
        .unwrap();
        assert!(chunk.text().is_none());
    }

    #[test]
    fn test_chunk_without_candidates_yields_none() {
        let chunk: GenerateContentChunk = serde_json::from_str("{}").unwrap();
        assert!(chunk.text().is_none());
    }

    #[test]
    fn test_error_envelope_parses() {
        let err: ErrorResponse = serde_json::from_str(
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.message, "Quota exceeded");
    }
}
