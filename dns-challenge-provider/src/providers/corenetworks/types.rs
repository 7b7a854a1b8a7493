//! Core Networks API types

use serde::{Deserialize, Serialize};

/// `POST /auth/token` request body
#[derive(Serialize)]
pub struct LoginBody<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

/// `POST /auth/token` response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires: u64,
}

/// Zone object from `GET /dnszones/{zone}`
#[derive(Debug, Deserialize)]
pub struct CoreNetworksZone {
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default)]
    pub active: bool,
}

/// Record entry from `GET /dnszones/{zone}/records/`
#[derive(Debug, Deserialize)]
pub struct CoreNetworksRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    #[serde(default)]
    pub ttl: u32,
}

/// Body of record create and delete requests.
///
/// Create sends every field; delete sends only the match criteria.
#[derive(Debug, Serialize)]
pub struct RecordBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// `POST /dnszones/{zone}/records/commit` request body
#[derive(Serialize)]
pub struct CommitBody {
    pub force: bool,
}

/// Error body the API returns alongside non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct CoreNetworksErrorBody {
    #[serde(alias = "message", alias = "error")]
    pub msg: Option<String>,
}
