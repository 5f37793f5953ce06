use std::collections::{HashMap, HashSet};

use crate::error::SetError;
use crate::matches::Match;
use crate::types::{SetRecord, SetSnapshot, SetState, FORFEIT_SCORE};

/// A best-of-N sequence of matches between two or more teams, tracked
/// toward a win-count goal. Scores, standings and state are derived from
/// the matches and forfeits on every read; nothing derived is stored, so
/// there is no status field to drift out of sync with the results.
#[derive(Debug, Clone)]
pub struct Set {
    id: String,
    goal: u32,
    teams: Vec<String>,
    matches: Vec<Match>,
    match_index: HashMap<String, usize>,
    seeds: Vec<String>,
    forfeits: HashSet<String>,
}

impl Set {
    /// A fresh set with no matches played yet.
    pub fn new(id: &str, goal: u32, teams: &[String], seeds: &[String]) -> Result<Set, SetError> {
        if goal < 1 {
            return Err(SetError::InvalidGoal);
        }
        Ok(Set {
            id: id.to_string(),
            goal,
            teams: unique_teams(teams)?,
            matches: Vec::new(),
            match_index: HashMap::new(),
            seeds: seeds.to_vec(),
            forfeits: HashSet::new(),
        })
    }

    /// A set rebuilt around existing matches. The team list is the union
    /// of the match teams, in first-seen order.
    pub fn from_matches(
        id: &str,
        goal: u32,
        matches: Vec<Match>,
        seeds: &[String],
    ) -> Result<Set, SetError> {
        let mut teams: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for m in &matches {
            for team in m.teams() {
                if seen.insert(team.clone()) {
                    teams.push(team.clone());
                }
            }
        }

        let mut set = Set::new(id, goal, &teams, seeds)?;
        for m in matches {
            set.add_match(m)?;
        }
        Ok(set)
    }

    /// Rebuild a set from its persisted record. Nothing partially built
    /// escapes: any bad record field fails the whole construction.
    pub fn from_record(record: &SetRecord) -> Result<Set, SetError> {
        let mut matches = Vec::with_capacity(record.matches.len());
        for match_record in &record.matches {
            matches.push(Match::from_record(match_record, &record.seeds)?);
        }

        let mut set = if record.teams.is_empty() {
            Set::from_matches(&record.id, record.goal, matches, &record.seeds)?
        } else {
            let mut set = Set::new(&record.id, record.goal, &record.teams, &record.seeds)?;
            for m in matches {
                set.add_match(m)?;
            }
            set
        };
        for team in &record.forfeits {
            set.forfeit(team)?;
        }
        Ok(set)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    pub fn forfeits(&self) -> &HashSet<String> {
        &self.forfeits
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get_match(&self, match_id: &str) -> Option<&Match> {
        self.match_index.get(match_id).map(|&index| &self.matches[index])
    }

    // ── Mutators ───────────────────────────────────────────────────────

    /// Append an already-built match. The match must be new to this set
    /// and may only involve teams that are part of it.
    pub fn add_match(&mut self, m: Match) -> Result<(), SetError> {
        if self.match_index.contains_key(m.id()) {
            return Err(SetError::DuplicateMatch { match_id: m.id().to_string() });
        }
        let known: HashSet<&str> = self.teams.iter().map(|team| team.as_str()).collect();
        for team in m.teams() {
            if !known.contains(team.as_str()) {
                return Err(SetError::TeamNotInSet {
                    match_id: m.id().to_string(),
                    team: team.clone(),
                });
            }
        }
        self.match_index.insert(m.id().to_string(), self.matches.len());
        self.matches.push(m);
        Ok(())
    }

    /// Record one team's score in one of the owned matches.
    pub fn record_score(&mut self, match_id: &str, team: &str, value: u32) -> Result<(), SetError> {
        let index = self
            .match_index
            .get(match_id)
            .copied()
            .ok_or_else(|| SetError::UnknownMatch { match_id: match_id.to_string() })?;
        self.matches[index].record_score(team, value)
    }

    /// Mark one of the owned matches finished.
    pub fn finish_match(&mut self, match_id: &str) -> Result<(), SetError> {
        let index = self
            .match_index
            .get(match_id)
            .copied()
            .ok_or_else(|| SetError::UnknownMatch { match_id: match_id.to_string() })?;
        self.matches[index].finish();
        Ok(())
    }

    /// Forfeit a team. Idempotent; the next read of scores, standings or
    /// state already reflects it.
    pub fn forfeit(&mut self, team: &str) -> Result<(), SetError> {
        if !self.teams.iter().any(|known| known == team) {
            return Err(SetError::UnknownTeam { team: team.to_string() });
        }
        self.forfeits.insert(team.to_string());
        Ok(())
    }

    /// Replace the win-count goal. Changing the goal can retroactively
    /// flip the derived state on the next evaluation.
    pub fn set_goal(&mut self, goal: u32) -> Result<(), SetError> {
        if goal < 1 {
            return Err(SetError::InvalidGoal);
        }
        self.goal = goal;
        Ok(())
    }

    // ── Derivations ────────────────────────────────────────────────────

    /// Match wins per team so far, with forfeited teams overridden to
    /// the forfeit sentinel. A started match awards its current leader
    /// one win; tied and not-yet-started matches award nothing.
    pub fn scores(&self) -> HashMap<String, i32> {
        let mut tally: HashMap<String, i32> =
            self.teams.iter().map(|team| (team.clone(), 0)).collect();
        for (team, wins) in win_tally(&self.matches) {
            if let Some(entry) = tally.get_mut(team) {
                *entry = wins as i32;
            }
        }
        for team in &self.forfeits {
            tally.insert(team.clone(), FORFEIT_SCORE);
        }
        tally
    }

    /// All teams ranked best to worst: win tally descending, then seed
    /// position ascending. Unseeded teams rank after every seeded team
    /// on ties; the team-list order keeps the result a total order.
    pub fn standings(&self) -> Vec<String> {
        let tally = self.scores();
        let seed_rank: HashMap<&str, usize> = self
            .seeds
            .iter()
            .enumerate()
            .map(|(rank, team)| (team.as_str(), rank))
            .collect();
        let mut order = self.teams.clone();
        order.sort_by(|a, b| {
            let wins_a = tally.get(a).copied().unwrap_or(0);
            let wins_b = tally.get(b).copied().unwrap_or(0);
            let rank_a = seed_rank.get(a.as_str()).copied().unwrap_or(usize::MAX);
            let rank_b = seed_rank.get(b.as_str()).copied().unwrap_or(usize::MAX);
            wins_b.cmp(&wins_a).then(rank_a.cmp(&rank_b))
        });
        order
    }

    /// Current lifecycle phase, recomputed from scratch on every call.
    pub fn state(&self) -> SetState {
        derive_state(&self.matches, self.goal, &self.forfeits)
    }

    /// The best-ranked team whose tally reached the goal, if any. A set
    /// completed purely by forfeit has no winner by this rule.
    pub fn winner(&self) -> Option<String> {
        let tally = self.scores();
        self.standings()
            .into_iter()
            .find(|team| tally.get(team).copied().unwrap_or(0) >= self.goal as i32)
    }

    pub fn record(&self) -> SetRecord {
        let mut forfeits: Vec<String> = self.forfeits.iter().cloned().collect();
        forfeits.sort();
        SetRecord {
            id: self.id.clone(),
            goal: self.goal,
            teams: self.teams.clone(),
            seeds: self.seeds.clone(),
            forfeits,
            matches: self.matches.iter().map(|m| m.record()).collect(),
        }
    }

    pub fn snapshot(&self) -> SetSnapshot {
        let record = self.record();
        SetSnapshot {
            id: record.id,
            goal: record.goal,
            teams: record.teams,
            seeds: record.seeds,
            forfeits: record.forfeits,
            matches: self.matches.iter().map(|m| m.snapshot()).collect(),
            scores: self.scores(),
            standings: self.standings(),
            state: self.state(),
            winner: self.winner(),
        }
    }
}

/// Derive a set's lifecycle phase from its inputs alone. Kept as a free
/// function so the state can never desynchronize from the matches, goal
/// and forfeits that define it.
pub fn derive_state(matches: &[Match], goal: u32, forfeits: &HashSet<String>) -> SetState {
    if !forfeits.is_empty() {
        return SetState::Completed;
    }
    if win_tally(matches).values().any(|&wins| wins >= goal) {
        return SetState::Completed;
    }
    if matches.iter().any(|m| m.is_started()) {
        return SetState::InProgress;
    }
    SetState::NotStarted
}

/// Reject duplicate team ids up front so a bad list never produces a
/// partially constructed set.
fn unique_teams(teams: &[String]) -> Result<Vec<String>, SetError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for team in teams {
        if !seen.insert(team.as_str()) {
            return Err(SetError::DuplicateTeam { team: team.clone() });
        }
    }
    Ok(teams.to_vec())
}

/// Count match wins per team. Only started matches with a strict leader
/// contribute; an in-progress match counts toward its current leader.
fn win_tally(matches: &[Match]) -> HashMap<&str, u32> {
    let mut tally: HashMap<&str, u32> = HashMap::new();
    for m in matches {
        if !m.is_started() {
            continue;
        }
        if let Some(leader) = m.leader() {
            *tally.entry(leader).or_insert(0) += 1;
        }
    }
    tally
}
