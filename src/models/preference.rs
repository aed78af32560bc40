use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of travel interest categories. Deserialization rejects any
/// label outside this set, so validation happens at the store boundary.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
pub enum Interest {
    #[serde(rename = "Nature & Mountains")]
    NatureMountains,
    #[serde(rename = "Culture & Heritage")]
    CultureHeritage,
    #[serde(rename = "Spirituality & Wellness")]
    SpiritualityWellness,
    #[serde(rename = "Adventure & Outdoor Activities")]
    AdventureOutdoor,
    #[serde(rename = "Local Food & Culinary Experiences")]
    LocalFoodCulinary,
    #[serde(rename = "Arts, Music & Handicrafts")]
    ArtsMusicHandicrafts,
    #[serde(rename = "Wildlife & Ecology")]
    WildlifeEcology,
    #[serde(rename = "City Life & Urban Exploration")]
    CityLifeUrban,
    #[serde(rename = "Community & Rural Life")]
    CommunityRuralLife,
    #[serde(rename = "Festivals & Events")]
    FestivalsEvents,
}

impl Interest {
    pub const ALL: [Interest; 10] = [
        Interest::NatureMountains,
        Interest::CultureHeritage,
        Interest::SpiritualityWellness,
        Interest::AdventureOutdoor,
        Interest::LocalFoodCulinary,
        Interest::ArtsMusicHandicrafts,
        Interest::WildlifeEcology,
        Interest::CityLifeUrban,
        Interest::CommunityRuralLife,
        Interest::FestivalsEvents,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Interest::NatureMountains => "Nature & Mountains",
            Interest::CultureHeritage => "Culture & Heritage",
            Interest::SpiritualityWellness => "Spirituality & Wellness",
            Interest::AdventureOutdoor => "Adventure & Outdoor Activities",
            Interest::LocalFoodCulinary => "Local Food & Culinary Experiences",
            Interest::ArtsMusicHandicrafts => "Arts, Music & Handicrafts",
            Interest::WildlifeEcology => "Wildlife & Ecology",
            Interest::CityLifeUrban => "City Life & Urban Exploration",
            Interest::CommunityRuralLife => "Community & Rural Life",
            Interest::FestivalsEvents => "Festivals & Events",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Interest {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Interest::ALL
            .iter()
            .find(|i| i.label() == value)
            .copied()
            .ok_or_else(|| format!("Unknown interest: '{}'", value))
    }
}

// Preference model - one document per user in the "preferences" collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Preference {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    pub interest: Vec<Interest>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_round_trip() {
        for interest in Interest::ALL {
            let parsed = Interest::try_from(interest.label()).unwrap();
            assert_eq!(parsed, interest);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(Interest::try_from("Skydiving").is_err());
        assert!(Interest::try_from("nature & mountains").is_err()); // exact match only
    }

    #[test]
    fn test_serde_rejects_unknown_interest() {
        let result: Result<Vec<Interest>, _> =
            serde_json::from_str(r#"["Nature & Mountains", "Base Jumping"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_accepts_full_set() {
        let json = serde_json::to_string(&Interest::ALL.to_vec()).unwrap();
        let parsed: Vec<Interest> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 10);
    }
}
