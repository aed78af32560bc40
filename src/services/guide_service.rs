use crate::{
    database::MongoDB,
    models::{GuideRequest, Preference, User},
    services::{currency_service, gemini_service},
};
use futures::future::join_all;
use mongodb::bson::doc;
use serde::Deserialize;

/// Instruction template for the final generation call. The JSON structure it
/// demands is what `models::GuideDocument` deserializes.
const SYSTEM_PROMPT: &str = r#"
SYSTEM INSTRUCTIONS:
You are a professional Nepal tourism content generator. Your responses must be accurate, well-researched, and formatted as clean JSON without any conversational elements.

STRICT CONTENT RESTRICTIONS:
- ONLY respond to queries about Nepal tourism (places, attractions, travel information, cultural sites, activities)
- For any non-Nepal tourism topics, respond with: {"error": "This service only provides information about Nepal tourism destinations and travel"}
- Do not include emojis, casual language, or conversational phrases
- Do not start responses with phrases like "Here's your guide" or "I hope this helps"

RESPONSE FORMAT REQUIREMENTS:
- All responses must be valid JSON format
- Use professional, informative tone
- Include accurate, current information
- Verify all details before including them
- Structure content with clear sections

CURRENCY AND LOCALIZATION REQUIREMENTS:
- Convert budget estimates to the user's home country currency
- For unrecognized countries, use USD and include "currency_note"
- Never use CAD unless the user is specifically from Canada
- Use "estimated_budget" as the key (never "estimated_budget_cad")
- Include practical advice relevant to user's nationality

TRANSPORTATION ACCURACY:
- Only mention ride-sharing/transport apps actually available in Nepal (e.g., Pathao)
- Do NOT mention Uber, Lyft, or other unavailable services
- Include accurate local transportation options (local buses, micro-buses, taxis, private vehicles)

JSON STRUCTURE TEMPLATE:
{
  "destination": "destination_name",
  "personalized_greeting": "Welcome [USER_NAME], tailored introduction based on user background and interests",
  "overview": "brief_description",
  "location": {
    "distance_from_kathmandu": "distance_info",
    "transportation": ["accurate_local_transport_options"]
  },
  "entry_information": {
    "foreign_national_fee": "fee_in_npr_and_user_currency",
    "access_restrictions": "any_restrictions",
    "visiting_hours": "operating_hours"
  },
  "key_experiences": [
    {
      "activity": "activity_name",
      "timing": "best_time_to_visit",
      "description": "detailed_description"
    }
  ],
  "cultural_significance": "cultural_and_historical_context",
  "visitor_guidelines": [
    "guideline_1",
    "guideline_2",
    "guideline_3"
  ],
  "estimated_budget": {
    "entry_fee": "amount_in_user_currency",
    "transportation": "amount_range_in_user_currency",
    "guide_optional": "amount_range_in_user_currency",
    "total_estimate": "total_range_in_user_currency"
  },
  "currency_note": "Note: Amounts shown in USD as country-specific currency conversion unavailable" (only include if using USD for unrecognized country),
  "best_visiting_time": "recommended_time_period",
  "special_notes": "additional_important_information",
  "interest_alignment": {
    "applicable": true/false,
    "matching_activities": ["activity_1", "activity_2"] or null,
    "why_it_matches": "explanation_of_connection_mentioning_specific_interest" or null,
    "personalized_recommendation": "tailored advice based on user's specific background and interests" or null
  },
  "personal_connection": "explanation of why this destination will resonate with the user's background, interests, or travel style"
}

PERSONALIZATION REQUIREMENTS:
- Address user by name in personalized_greeting
- Reference user's country of origin, interests, and background where relevant
- Tailor recommendations based on user's specific profile
- Make connections between user's interests and destination features
- Use inclusive language that makes the user feel the content was created specifically for them
- Include practical advice relevant to user's background and nationality

INTEREST-BASED CONTENT RULES:
- Only include "interest_alignment" section if the destination genuinely offers activities/experiences that match the specified visitor interests
- Set "applicable": false if no meaningful connection exists
- Be honest about limitations - not every place suits every interest
- When interest alignment is applicable, specifically mention the user's interest in the explanation
- Only claim interest alignment if specific, verifiable activities exist at the destination
- Include personalized_recommendation only when interest alignment is applicable

VERIFICATION REQUIREMENTS:
- Verify all prices, timings, and access information
- Confirm transportation options are current and available in Nepal
- Validate cultural and historical information
- Check entry fees and restrictions
- Ensure budget estimates reflect current rates
- Only mention transportation services that actually operate in Nepal
"#;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GenerateGuideRequest {
    pub current_location: String,
    pub destination: String,
    #[serde(default = "default_use_search")]
    pub use_search: bool,
}

fn default_use_search() -> bool {
    true
}

/// Raw orchestrator output; parsing into a GuideDocument is deferred to the
/// normalizer at the display boundary.
#[derive(Debug)]
pub struct GuideGenerationResult {
    pub raw_text: String,
    pub currency: String,
    pub currency_fallback: bool,
}

/// Runs one guide submission end to end: load profile, resolve currency,
/// optionally gather search context, then issue the single generation call.
/// Each submission is independent best-effort; nothing here retries.
pub async fn generate_guide_for_user(
    db: &MongoDB,
    user_id: &str,
    request: &GenerateGuideRequest,
) -> Result<GuideGenerationResult, String> {
    if request.destination.trim().is_empty() {
        return Err("Destination is required".to_string());
    }
    if request.current_location.trim().is_empty() {
        return Err("Current location is required".to_string());
    }

    let users = db.collection::<User>("users");
    let user = users
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found".to_string())?;

    // A missing preference document is not an error; the prompt falls back
    // to "general tourism".
    let preferences = db.collection::<Preference>("preferences");
    let interests: Vec<String> = preferences
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .map(|p| p.interest.iter().map(|i| i.label().to_string()).collect())
        .unwrap_or_default();

    let resolved = currency_service::resolve_currency(&user.country);

    let guide_request = GuideRequest {
        user_name: user.name,
        user_country: user.country,
        user_currency: resolved.code.clone(),
        currency_fallback: resolved.fallback,
        interests,
        current_location: request.current_location.clone(),
        destination: request.destination.clone(),
    };

    let search_context = if request.use_search {
        gather_search_context(&guide_request.destination).await
    } else {
        String::new()
    };

    let prompt = build_prompt(&guide_request, &search_context);

    let raw_text = gemini_service::generate_guide(&prompt).await?;

    log::info!(
        "✅ Guide generated for '{}' ({} chars)",
        guide_request.destination,
        raw_text.len()
    );

    Ok(GuideGenerationResult {
        raw_text,
        currency: resolved.code,
        currency_fallback: resolved.fallback,
    })
}

fn search_queries(destination: &str) -> [String; 4] {
    [
        format!("{} Nepal entry fee 2024 2025 current prices", destination),
        format!("{} Nepal transportation how to reach 2024", destination),
        format!("{} Nepal visiting hours opening times current", destination),
        format!("{} Nepal travel guide recent information", destination),
    ]
}

/// Fan-out over the fixed lookup queries. All four are dispatched together
/// and awaited jointly; an individual failure is dropped, never fatal.
async fn gather_search_context(destination: &str) -> String {
    let queries = search_queries(destination);

    log::info!("🔍 Issuing {} lookup calls for '{}'", queries.len(), destination);

    let lookups = queries
        .iter()
        .map(|query| gemini_service::lookup_current_info(query));
    let results = join_all(lookups).await;

    let context = join_lookup_results(results);

    if context.is_empty() {
        log::warn!("⚠️ All lookup calls failed for '{}'", destination);
    }

    context
}

/// Collects lookup outcomes, keeping successes in dispatch order and
/// discarding failures.
fn join_lookup_results(results: Vec<Result<String, String>>) -> String {
    results
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("⚠️ Lookup call failed: {}", e);
                crate::api::metrics::increment_lookup_failure_count();
                None
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn interests_string(interests: &[String]) -> String {
    if interests.is_empty() {
        "general tourism".to_string()
    } else {
        interests.join(", ")
    }
}

/// Builds the single enriched prompt: instruction template, optional search
/// context, request context, and the restated hard requirements.
fn build_prompt(request: &GuideRequest, search_context: &str) -> String {
    let interests = interests_string(&request.interests);
    let has_search = !search_context.is_empty();

    let search_block = if has_search {
        format!(
            "CURRENT SEARCH RESULTS FOR REFERENCE:\n{}\n\nUse this current information to verify \
             and update details like entry fees, transportation options, and operating hours. \
             Ensure all information is as current as possible.\n\n",
            search_context
        )
    } else {
        String::new()
    };

    let search_requirement = if has_search {
        "\n7. Prioritize the current search results for up-to-date information on prices, hours, and access details"
    } else {
        ""
    };

    format!(
        "{system_prompt}\n\n{search_block}CURRENT REQUEST CONTEXT:\n\
         - User Name: {name}\n\
         - User Country: {country}\n\
         - User Currency: {currency}\n\
         - User Interests: {interests}\n\
         - Current Location: {location}\n\
         - Desired Destination: {destination}\n\n\
         Based on the above instructions{search_ref} and format, provide detailed tourism \
         information for {name} from {country} who is currently in {location} and wants to visit \
         {destination} in Nepal. Their interests include: {interests}.\n\n\
         CRITICAL REQUIREMENTS:\n\
         1. Convert all budget estimates to {currency} ({country}'s currency)\n\
         2. Only mention transportation apps/services that actually operate in Nepal (e.g., Pathao for ride-sharing, NOT Uber)\n\
         3. Only include interest_alignment section if {destination} genuinely offers activities related to: {interests}\n\
         4. If interest alignment is applicable, specifically mention the user's interests in the explanation\n\
         5. Use \"estimated_budget\" as the key (never \"estimated_budget_cad\")\n\
         6. Include accurate, verified information formatted as clean JSON without any conversational elements{search_requirement}\n\n\
         Provide personalized content that makes {name} feel this guide was created specifically \
         for them as a {country} traveler interested in {interests}.",
        system_prompt = SYSTEM_PROMPT,
        search_block = search_block,
        name = request.user_name,
        country = request.user_country,
        currency = request.user_currency,
        interests = interests,
        location = request.current_location,
        destination = request.destination,
        search_ref = if has_search {
            ", current search results,"
        } else {
            ""
        },
        search_requirement = search_requirement,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request(interests: Vec<&str>) -> GuideRequest {
        GuideRequest {
            user_name: "Maya".to_string(),
            user_country: "United Kingdom".to_string(),
            user_currency: "GBP".to_string(),
            currency_fallback: false,
            interests: interests.into_iter().map(String::from).collect(),
            current_location: "Kathmandu".to_string(),
            destination: "Pokhara".to_string(),
        }
    }

    #[test]
    fn test_partial_lookup_failures_are_dropped() {
        let results = vec![
            Ok("entry fee info".to_string()),
            Err("timeout".to_string()),
            Err("503".to_string()),
            Ok("bus schedules".to_string()),
        ];
        let joined = join_lookup_results(results);
        assert_eq!(joined, "entry fee info\n\nbus schedules");
    }

    #[test]
    fn test_all_lookups_failed_yields_empty_context() {
        let results = vec![Err("a".to_string()), Err("b".to_string())];
        assert!(join_lookup_results(results).is_empty());
    }

    #[test]
    fn test_search_queries_cover_fixed_topics() {
        let queries = search_queries("Lumbini");
        assert_eq!(queries.len(), 4);
        assert!(queries[0].contains("entry fee"));
        assert!(queries[1].contains("transportation"));
        assert!(queries[2].contains("visiting hours"));
        assert!(queries.iter().all(|q| q.contains("Lumbini Nepal")));
    }

    #[test]
    fn test_prompt_contains_request_context() {
        let prompt = build_prompt(&sample_request(vec!["Nature & Mountains"]), "");
        assert!(prompt.contains("- User Name: Maya"));
        assert!(prompt.contains("- User Currency: GBP"));
        assert!(prompt.contains("- Desired Destination: Pokhara"));
        assert!(prompt.contains("Convert all budget estimates to GBP"));
        assert!(prompt.contains("Nature & Mountains"));
        assert!(!prompt.contains("CURRENT SEARCH RESULTS"));
        assert!(!prompt.contains("Prioritize the current search results"));
    }

    #[test]
    fn test_prompt_includes_search_context_when_present() {
        let prompt = build_prompt(&sample_request(vec![]), "Entry fee is NPR 200.");
        assert!(prompt.contains("CURRENT SEARCH RESULTS FOR REFERENCE:\nEntry fee is NPR 200."));
        assert!(prompt.contains(", current search results,"));
        assert!(prompt.contains("7. Prioritize the current search results"));
    }

    #[test]
    fn test_empty_interests_default_to_general_tourism() {
        let prompt = build_prompt(&sample_request(vec![]), "");
        assert!(prompt.contains("- User Interests: general tourism"));
    }

    #[test]
    fn test_use_search_defaults_to_true() {
        let request: GenerateGuideRequest = serde_json::from_str(
            r#"{"current_location":"Kathmandu","destination":"Pokhara"}"#,
        )
        .unwrap();
        assert!(request.use_search);
    }
}
