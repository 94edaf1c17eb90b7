//! Entity payloads cached from the remote catalog.
//!
//! Each cacheable kind gets a thin display-data struct; the paging engine
//! itself is generic over [`CatalogEntity`] so mediators, sources, and the
//! cache store are implemented once and parameterized per kind.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// One of the favoritable entity categories of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Character,
    Concept,
    Issue,
    Location,
    Movie,
    Object,
    Person,
    StoryArc,
    Team,
    Volume,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Character => "character",
            EntityType::Concept => "concept",
            EntityType::Issue => "issue",
            EntityType::Location => "location",
            EntityType::Movie => "movie",
            EntityType::Object => "object",
            EntityType::Person => "person",
            EntityType::StoryArc => "story_arc",
            EntityType::Team => "team",
            EntityType::Volume => "volume",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload the paging engine can cache and page over.
pub trait CatalogEntity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    /// Entity category, used for favorites lookups and as part of the
    /// cache feed discriminator.
    const ENTITY_TYPE: EntityType;

    /// Remote-assigned identifier, unique within the entity kind.
    fn id(&self) -> i64;
}

/// Image URL variants the catalog provides for an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub icon_url: Option<String>,
    pub small_url: Option<String>,
    pub medium_url: Option<String>,
    pub original_url: Option<String>,
}

/// Reference to a related entity carried inline in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub id: i64,
    pub name: String,
    pub gender: Option<i32>,
    pub image: ImageInfo,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for CharacterInfo {
    const ENTITY_TYPE: EntityType = EntityType::Character;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub id: i64,
    pub name: String,
    pub start_year: Option<String>,
    pub publisher: Option<NameRef>,
    pub count_of_issues: Option<u32>,
    pub image: ImageInfo,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for VolumeInfo {
    const ENTITY_TYPE: EntityType = EntityType::Volume;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueInfo {
    pub id: i64,
    pub name: Option<String>,
    pub issue_number: Option<String>,
    pub volume: Option<NameRef>,
    pub image: ImageInfo,
    pub cover_date: Option<DateTime<Utc>>,
    pub store_date: Option<DateTime<Utc>>,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for IssueInfo {
    const ENTITY_TYPE: EntityType = EntityType::Issue;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryArcInfo {
    pub id: i64,
    pub name: String,
    pub image: ImageInfo,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for StoryArcInfo {
    const ENTITY_TYPE: EntityType = EntityType::StoryArc;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptInfo {
    pub id: i64,
    pub name: String,
    pub count_of_issue_appearances: Option<u32>,
    pub image: ImageInfo,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for ConceptInfo {
    const ENTITY_TYPE: EntityType = EntityType::Concept;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub id: i64,
    pub name: String,
    pub runtime: Option<String>,
    pub image: ImageInfo,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
}

impl CatalogEntity for MovieInfo {
    const ENTITY_TYPE: EntityType = EntityType::Movie;

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn character(id: i64) -> CharacterInfo {
        CharacterInfo {
            id,
            name: format!("character-{id}"),
            gender: None,
            image: ImageInfo::default(),
            date_added: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            date_last_updated: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_entity_trait_exposes_id_and_type() {
        let info = character(7);
        assert_eq!(info.id(), 7);
        assert_eq!(CharacterInfo::ENTITY_TYPE, EntityType::Character);
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let info = character(42);
        let json = serde_json::to_string(&info).unwrap();
        let back: CharacterInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_entity_type_as_str() {
        assert_eq!(EntityType::StoryArc.as_str(), "story_arc");
        assert_eq!(EntityType::Volume.to_string(), "volume");
    }
}
