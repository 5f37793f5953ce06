use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::manager::SetManager;

// ── Constants ──────────────────────────────────────────────────────────

/// Sentinel tally for a forfeited team. Lower than any legitimate score
/// so forfeits always sort last in standings.
pub const FORFEIT_SCORE: i32 = -1;

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedSetManager = Arc<Mutex<SetManager>>;

// ── Set lifecycle ──────────────────────────────────────────────────────

/// Derived lifecycle phase of a set. Never stored; recomputed from the
/// matches, goal and forfeits on every read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetState {
    NotStarted,
    InProgress,
    Completed,
}

// ── Persisted records ──────────────────────────────────────────────────

/// Persisted form of a match. `scores` may be omitted for a match that
/// has not been played; every listed team then starts at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub scores: HashMap<String, u32>,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub finished: Option<bool>,
}

/// Persisted form of a set: identity, goal, participants, seed order,
/// forfeits and the ordered match records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub id: String,
    pub goal: u32,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default)]
    pub forfeits: Vec<String>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

// ── Outbound snapshots ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub id: String,
    pub teams: Vec<String>,
    pub scores: HashMap<String, u32>,
    pub started: bool,
    pub finished: bool,
    pub leader: Option<String>,
}

/// Everything an API layer serializes out for a set: the persisted
/// fields plus the derived scores, standings, state and winner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSnapshot {
    pub id: String,
    pub goal: u32,
    pub teams: Vec<String>,
    pub seeds: Vec<String>,
    pub forfeits: Vec<String>,
    pub matches: Vec<MatchSnapshot>,
    pub scores: HashMap<String, i32>,
    pub standings: Vec<String>,
    pub state: SetState,
    pub winner: Option<String>,
}
