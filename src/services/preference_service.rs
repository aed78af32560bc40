use crate::{
    database::MongoDB,
    models::{Interest, Preference},
};
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SavePreferenceRequest {
    // Deserializing into the closed Interest enum rejects unknown labels
    // before anything touches the database.
    pub interest: Vec<Interest>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PreferenceResponse {
    pub success: bool,
    pub user_id: String,
    pub interest: Vec<Interest>,
}

/// Saves the user's interest selection. One preference document per user:
/// a resubmission replaces the previous selection (upsert).
pub async fn save_preference(
    db: &MongoDB,
    user_id: &str,
    request: SavePreferenceRequest,
) -> Result<PreferenceResponse, String> {
    let collection = db.collection::<Preference>("preferences");

    let interest_bson =
        to_bson(&request.interest).map_err(|e| format!("Failed to encode interests: {}", e))?;

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! {
                "$set": {
                    "interest": interest_bson,
                    "updated_at": BsonDateTime::now(),
                },
                "$setOnInsert": {
                    "created_at": BsonDateTime::now(),
                }
            },
        )
        .upsert(true)
        .await
        .map_err(|e| format!("Failed to save preference: {}", e))?;

    log::info!(
        "✅ Preferences saved for user {}: {} interests",
        user_id,
        request.interest.len()
    );

    Ok(PreferenceResponse {
        success: true,
        user_id: user_id.to_string(),
        interest: request.interest,
    })
}

/// Fetches the stored preference for a user. A user without a saved
/// preference yields an empty interest list rather than an error.
pub async fn get_preference(db: &MongoDB, user_id: &str) -> Result<PreferenceResponse, String> {
    let collection = db.collection::<Preference>("preferences");

    let preference = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(PreferenceResponse {
        success: true,
        user_id: user_id.to_string(),
        interest: preference.map(|p| p.interest).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_unknown_interest_label() {
        let result: Result<SavePreferenceRequest, _> =
            serde_json::from_str(r#"{"interest":["Nature & Mountains","Shopping"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_accepts_valid_labels() {
        let request: SavePreferenceRequest = serde_json::from_str(
            r#"{"interest":["Wildlife & Ecology","Festivals & Events"]}"#,
        )
        .unwrap();
        assert_eq!(request.interest.len(), 2);
        assert_eq!(request.interest[0], Interest::WildlifeEcology);
    }
}
