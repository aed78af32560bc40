use crate::models::GuideDocument;
use serde_json::Value;

/// Outcome of normalizing the raw generation output.
#[derive(Debug)]
pub enum NormalizedResponse {
    /// A guide document was recovered (directly or from an embedded block).
    Parsed(GuideDocument),
    /// The model declined the topic and returned a scoped error message.
    Refused(String),
    /// No JSON object could be recovered; the original text is preserved.
    Malformed(String),
}

/// Two-stage parse of the raw generation text: strict JSON first, then the
/// substring between the first '{' and the last '}' to salvage documents
/// wrapped in conversational prose or markdown fences.
pub fn normalize_response(raw: &str) -> NormalizedResponse {
    if let Some(value) = parse_stage(raw) {
        return classify(value, raw);
    }

    if let Some(block) = extract_json_block(raw) {
        if let Some(value) = parse_stage(block) {
            return classify(value, raw);
        }
    }

    NormalizedResponse::Malformed(raw.to_string())
}

fn parse_stage(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

fn extract_json_block(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last > first {
        Some(&text[first..=last])
    } else {
        None
    }
}

fn classify(value: Value, raw: &str) -> NormalizedResponse {
    // An "error" key means the model refused the topic; every other field
    // is ignored on that path.
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return NormalizedResponse::Refused(error.to_string());
    }

    match serde_json::from_value::<GuideDocument>(value) {
        Ok(document) => NormalizedResponse::Parsed(document),
        Err(_) => NormalizedResponse::Malformed(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_parses_directly() {
        let raw = r#"{"destination":"Pokhara","overview":"Lakeside city"}"#;
        match normalize_response(raw) {
            NormalizedResponse::Parsed(doc) => {
                assert_eq!(doc.destination.as_deref(), Some("Pokhara"));
                assert_eq!(doc.overview.as_deref(), Some("Lakeside city"));
                assert!(doc.estimated_budget.is_none());
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_embedded_json_is_salvaged() {
        let raw = "Here:\n{\"destination\":\"Pokhara\"}\nThanks";
        match normalize_response(raw) {
            NormalizedResponse::Parsed(doc) => {
                assert_eq!(doc.destination.as_deref(), Some("Pokhara"));
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_markdown_fenced_json_is_salvaged() {
        let raw = "```json\n{\"destination\":\"Lumbini\",\"best_visiting_time\":\"Oct-Mar\"}\n```";
        match normalize_response(raw) {
            NormalizedResponse::Parsed(doc) => {
                assert_eq!(doc.destination.as_deref(), Some("Lumbini"));
                assert_eq!(doc.best_visiting_time.as_deref(), Some("Oct-Mar"));
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_no_braces_preserves_raw_text() {
        let raw = "Sorry, I cannot help with that.";
        match normalize_response(raw) {
            NormalizedResponse::Malformed(text) => assert_eq!(text, raw),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_braces_preserve_raw_text() {
        let raw = "prefix { \"destination\": \"Pokh suffix";
        match normalize_response(raw) {
            NormalizedResponse::Malformed(text) => assert_eq!(text, raw),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_error_key_takes_precedence() {
        let raw = r#"{"error":"This service only provides information about Nepal tourism destinations and travel","destination":"Paris"}"#;
        match normalize_response(raw) {
            NormalizedResponse::Refused(message) => {
                assert!(message.contains("Nepal tourism"));
            }
            other => panic!("expected Refused, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_document_fields() {
        let raw = r#"{
            "destination": "Everest Base Camp",
            "location": {"distance_from_kathmandu": "~300 km", "transportation": ["flight to Lukla", "trek"]},
            "estimated_budget": {"entry_fee": "INR 2,500", "total_estimate": "INR 150,000-200,000"},
            "key_experiences": [{"activity": "Kala Patthar sunrise", "timing": "early morning", "description": "Panoramic view of Everest"}],
            "interest_alignment": {"applicable": true, "matching_activities": ["trekking"]}
        }"#;
        match normalize_response(raw) {
            NormalizedResponse::Parsed(doc) => {
                let location = doc.location.unwrap();
                assert_eq!(location.transportation.unwrap().len(), 2);
                let budget = doc.estimated_budget.unwrap();
                assert_eq!(budget.entry_fee.as_deref(), Some("INR 2,500"));
                assert!(budget.guide_optional.is_none());
                let alignment = doc.interest_alignment.unwrap();
                assert_eq!(alignment.applicable, Some(true));
                assert_eq!(doc.key_experiences.unwrap().len(), 1);
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }
}
