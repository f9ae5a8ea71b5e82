//! Test fixtures for integration tests.

use cofound::engine::{EngineConfig, RecommendationEngine};
use cofound::model::{Profile, SwipeDecision, SwipeEvent};
use cofound::{FileStore, HashEmbedder};
use serde_json::{Map, Value, json};
use std::path::Path;

pub const TEST_DIM: usize = 128;

pub const DEFAULT_USER_ID: &str = "user-u";

pub type FileEngine = RecommendationEngine<HashEmbedder, FileStore>;

#[derive(Default)]
pub struct ProfileBuilder {
    fields: Map<String, Value>,
}

impl ProfileBuilder {
    pub fn new(id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        fields.insert("name".to_string(), json!(format!("Founder {id}")));
        Self { fields }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.fields.insert("name".to_string(), json!(name));
        self
    }

    pub fn skills(mut self, skills: &[&str]) -> Self {
        self.fields.insert("skills".to_string(), json!(skills));
        self
    }

    pub fn startup_idea(mut self, idea: &str) -> Self {
        self.fields.insert("startupIdea".to_string(), json!(idea));
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.fields.insert("role".to_string(), json!(role));
        self
    }

    pub fn looking_for(mut self, text: &str) -> Self {
        self.fields.insert("looking_for".to_string(), json!(text));
        self
    }

    pub fn build(self) -> Profile {
        Profile::from_value(Value::Object(self.fields))
    }
}

pub fn caller_profile() -> Profile {
    ProfileBuilder::new(DEFAULT_USER_ID)
        .name("Uma")
        .role("CEO")
        .looking_for("rust backend distributed systems")
        .build()
}

pub fn create_candidates(ids: &[&str]) -> Vec<Profile> {
    ids.iter()
        .map(|id| ProfileBuilder::new(id).skills(&["generalist"]).build())
        .collect()
}

pub fn liked(profile: Profile) -> SwipeEvent {
    SwipeEvent::new(profile, SwipeDecision::Like)
}

pub fn disliked(profile: Profile) -> SwipeEvent {
    SwipeEvent::new(profile, SwipeDecision::Dislike)
}

pub fn open_file_engine(root: &Path) -> FileEngine {
    let store = FileStore::open(root).expect("store should open");
    let provider = HashEmbedder::new(TEST_DIM).expect("non-zero dimension");
    RecommendationEngine::open(provider, store, EngineConfig::default())
}

pub fn ids_of(ranked: &[cofound::Recommendation]) -> Vec<String> {
    ranked
        .iter()
        .map(|r| r.profile.id().map(ToString::to_string).unwrap_or_default())
        .collect()
}
