// 3rd party crates
use serde::{Deserialize, Serialize};

/// A reference collection on the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub reference_count: Option<u64>,
}

/// A category inside a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

/// Bibliographic metadata submitted for saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReference {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
}

/// A reference as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReference {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
}

/// Response of the unauthenticated version endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub minimum_client: Option<String>,
}

/// Generic acknowledgement envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
