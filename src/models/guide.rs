use serde::{Deserialize, Serialize};

/// Ephemeral request context assembled per submission. Built from the stored
/// profile plus the form inputs, discarded after the guide is rendered.
#[derive(Debug, Clone)]
pub struct GuideRequest {
    pub user_name: String,
    pub user_country: String,
    pub user_currency: String,
    pub currency_fallback: bool,
    pub interests: Vec<String>,
    pub current_location: String,
    pub destination: String,
}

/// Structured travel guide parsed from the generation response. The external
/// model is not guaranteed to emit every field, so everything is optional and
/// missing fields deserialize to None instead of failing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct GuideDocument {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub personalized_greeting: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub location: Option<GuideLocation>,
    #[serde(default)]
    pub entry_information: Option<EntryInformation>,
    #[serde(default)]
    pub key_experiences: Option<Vec<KeyExperience>>,
    #[serde(default)]
    pub cultural_significance: Option<String>,
    #[serde(default)]
    pub visitor_guidelines: Option<Vec<String>>,
    #[serde(default)]
    pub estimated_budget: Option<EstimatedBudget>,
    #[serde(default)]
    pub currency_note: Option<String>,
    #[serde(default)]
    pub best_visiting_time: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
    #[serde(default)]
    pub interest_alignment: Option<InterestAlignment>,
    #[serde(default)]
    pub personal_connection: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct GuideLocation {
    #[serde(default)]
    pub distance_from_kathmandu: Option<String>,
    #[serde(default)]
    pub transportation: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct EntryInformation {
    #[serde(default)]
    pub foreign_national_fee: Option<String>,
    #[serde(default)]
    pub access_restrictions: Option<String>,
    #[serde(default)]
    pub visiting_hours: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct KeyExperience {
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct EstimatedBudget {
    #[serde(default)]
    pub entry_fee: Option<String>,
    #[serde(default)]
    pub transportation: Option<String>,
    #[serde(default)]
    pub guide_optional: Option<String>,
    #[serde(default)]
    pub total_estimate: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct InterestAlignment {
    #[serde(default)]
    pub applicable: Option<bool>,
    #[serde(default)]
    pub matching_activities: Option<Vec<String>>,
    #[serde(default)]
    pub why_it_matches: Option<String>,
    #[serde(default)]
    pub personalized_recommendation: Option<String>,
}
