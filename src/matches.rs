use std::collections::HashMap;

use crate::error::SetError;
use crate::types::{MatchRecord, MatchSnapshot};

/// One contest inside a set: a fixed list of teams, their current
/// scores, and the started/finished flags. All the ranking logic lives
/// in the owning `Set`; a match only reports its own numbers.
#[derive(Debug, Clone)]
pub struct Match {
    id: String,
    teams: Vec<String>,
    scores: HashMap<String, u32>,
    seeds: Vec<String>,
    started: bool,
    finished: bool,
}

impl Match {
    /// A match that has not been played: every team starts at 0.
    pub fn new(id: &str, teams: &[String], seeds: &[String]) -> Result<Match, SetError> {
        if teams.len() < 2 {
            return Err(SetError::TooFewTeams { match_id: id.to_string() });
        }
        let mut scores = HashMap::new();
        for team in teams {
            if scores.insert(team.clone(), 0).is_some() {
                return Err(SetError::DuplicateTeam { team: team.clone() });
            }
        }
        Ok(Match {
            id: id.to_string(),
            teams: teams.to_vec(),
            scores,
            seeds: seeds.to_vec(),
            started: false,
            finished: false,
        })
    }

    /// A match reconstructed from recorded scores. Having scores means
    /// it has started.
    pub fn with_scores(
        id: &str,
        scores: HashMap<String, u32>,
        seeds: &[String],
    ) -> Result<Match, SetError> {
        Match::with_flags(id, scores, seeds, true, false)
    }

    /// Full reconstruction with explicit flags, for matches loaded from
    /// persisted state. A finished match is always considered started.
    pub fn with_flags(
        id: &str,
        scores: HashMap<String, u32>,
        seeds: &[String],
        started: bool,
        finished: bool,
    ) -> Result<Match, SetError> {
        if scores.len() < 2 {
            return Err(SetError::TooFewTeams { match_id: id.to_string() });
        }
        let teams = teams_in_seed_order(&scores, seeds);
        Ok(Match {
            id: id.to_string(),
            teams,
            scores,
            seeds: seeds.to_vec(),
            started: started || finished,
            finished,
        })
    }

    /// Rebuild a match from its persisted record. Match records carry no
    /// seed order of their own; the owning set passes its seeds through.
    pub fn from_record(record: &MatchRecord, seeds: &[String]) -> Result<Match, SetError> {
        let teams = if record.teams.is_empty() {
            teams_in_seed_order(&record.scores, seeds)
        } else {
            record.teams.clone()
        };
        if teams.len() < 2 {
            return Err(SetError::TooFewTeams { match_id: record.id.clone() });
        }

        let mut scores = HashMap::new();
        for team in &teams {
            let score = record.scores.get(team).copied().unwrap_or(0);
            if scores.insert(team.clone(), score).is_some() {
                return Err(SetError::DuplicateTeam { team: team.clone() });
            }
        }
        for team in record.scores.keys() {
            if !scores.contains_key(team) {
                return Err(SetError::TeamNotInMatch {
                    match_id: record.id.clone(),
                    team: team.clone(),
                });
            }
        }

        let started = record.started.unwrap_or(!record.scores.is_empty());
        let finished = record.finished.unwrap_or(false);
        Ok(Match {
            id: record.id.clone(),
            teams,
            scores,
            seeds: seeds.to_vec(),
            started: started || finished,
            finished,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Read-only view of the current score map.
    pub fn scores(&self) -> &HashMap<String, u32> {
        &self.scores
    }

    pub fn score(&self, team: &str) -> Option<u32> {
        self.scores.get(team).copied()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Record a team's score. Scores are frozen once the match is
    /// finished; recording any score marks the match as started.
    pub fn record_score(&mut self, team: &str, value: u32) -> Result<(), SetError> {
        if self.finished {
            return Err(SetError::MatchFinished { match_id: self.id.clone() });
        }
        let Some(entry) = self.scores.get_mut(team) else {
            return Err(SetError::TeamNotInMatch {
                match_id: self.id.clone(),
                team: team.to_string(),
            });
        };
        *entry = value;
        self.started = true;
        Ok(())
    }

    /// Mark the match finished. Idempotent; a 0-0 finished match is a
    /// valid walkover record.
    pub fn finish(&mut self) {
        self.finished = true;
        self.started = true;
    }

    /// The team with the strictly highest score, or `None` on a tie.
    pub fn leader(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        let mut tied = false;
        for team in &self.teams {
            let score = self.scores.get(team).copied().unwrap_or(0);
            match best {
                None => best = Some((team, score)),
                Some((_, top)) if score > top => {
                    best = Some((team, score));
                    tied = false;
                }
                Some((_, top)) if score == top => tied = true,
                Some(_) => {}
            }
        }
        if tied {
            return None;
        }
        best.map(|(team, _)| team)
    }

    pub fn record(&self) -> MatchRecord {
        MatchRecord {
            id: self.id.clone(),
            teams: self.teams.clone(),
            scores: self.scores.clone(),
            started: Some(self.started),
            finished: Some(self.finished),
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            id: self.id.clone(),
            teams: self.teams.clone(),
            scores: self.scores.clone(),
            started: self.started,
            finished: self.finished,
            leader: self.leader().map(|team| team.to_string()),
        }
    }
}

/// Order a score map's teams by seed rank, then name, so matches built
/// from maps keep a deterministic team order.
fn teams_in_seed_order(scores: &HashMap<String, u32>, seeds: &[String]) -> Vec<String> {
    let seed_rank: HashMap<&str, usize> = seeds
        .iter()
        .enumerate()
        .map(|(rank, team)| (team.as_str(), rank))
        .collect();
    let mut teams: Vec<String> = scores.keys().cloned().collect();
    teams.sort_by(|a, b| {
        let rank_a = seed_rank.get(a.as_str()).copied().unwrap_or(usize::MAX);
        let rank_b = seed_rank.get(b.as_str()).copied().unwrap_or(usize::MAX);
        rank_a.cmp(&rank_b).then_with(|| a.cmp(b))
    });
    teams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_teams() -> Vec<String> {
        vec!["team1".to_string(), "team2".to_string()]
    }

    fn scores(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(team, score)| (team.to_string(), *score)).collect()
    }

    #[test]
    fn test_new_match_is_not_started() {
        let m = Match::new("match1", &two_teams(), &two_teams()).unwrap();
        assert!(!m.is_started());
        assert!(!m.is_finished());
        assert_eq!(m.score("team1"), Some(0));
        assert_eq!(m.score("team2"), Some(0));
    }

    #[test]
    fn test_match_with_scores_is_started() {
        let m = Match::with_scores("match1", scores(&[("team1", 1), ("team2", 2)]), &two_teams())
            .unwrap();
        assert!(m.is_started());
        assert!(!m.is_finished());
    }

    #[test]
    fn test_needs_two_teams() {
        let err = Match::new("match1", &["team1".to_string()], &[]).unwrap_err();
        assert_eq!(err, SetError::TooFewTeams { match_id: "match1".to_string() });
    }

    #[test]
    fn test_record_score_marks_started() {
        let mut m = Match::new("match1", &two_teams(), &two_teams()).unwrap();
        m.record_score("team2", 3).unwrap();
        assert!(m.is_started());
        assert_eq!(m.score("team2"), Some(3));
    }

    #[test]
    fn test_record_score_unknown_team() {
        let mut m = Match::new("match1", &two_teams(), &two_teams()).unwrap();
        let err = m.record_score("team9", 1).unwrap_err();
        assert_eq!(
            err,
            SetError::TeamNotInMatch {
                match_id: "match1".to_string(),
                team: "team9".to_string(),
            }
        );
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut m = Match::new("match1", &two_teams(), &two_teams()).unwrap();
        m.finish();
        m.finish();
        assert!(m.is_finished());
        // A 0-0 finished match is a valid walkover and counts as started.
        assert!(m.is_started());
    }

    #[test]
    fn test_scores_frozen_after_finish() {
        let mut m = Match::with_scores("match1", scores(&[("team1", 2), ("team2", 1)]), &two_teams())
            .unwrap();
        m.finish();
        let err = m.record_score("team2", 5).unwrap_err();
        assert_eq!(err, SetError::MatchFinished { match_id: "match1".to_string() });
        assert_eq!(m.score("team2"), Some(1));
    }

    #[test]
    fn test_leader_strictly_highest() {
        let m = Match::with_scores("match1", scores(&[("team1", 1), ("team2", 2)]), &two_teams())
            .unwrap();
        assert_eq!(m.leader(), Some("team2"));
    }

    #[test]
    fn test_leader_none_on_tie() {
        let m = Match::with_scores("match1", scores(&[("team1", 2), ("team2", 2)]), &two_teams())
            .unwrap();
        assert_eq!(m.leader(), None);

        let fresh = Match::new("match1", &two_teams(), &two_teams()).unwrap();
        assert_eq!(fresh.leader(), None);
    }

    #[test]
    fn test_teams_follow_seed_order() {
        let seeds = vec!["team2".to_string(), "team1".to_string()];
        let m = Match::with_scores("match1", scores(&[("team1", 1), ("team2", 2)]), &seeds).unwrap();
        assert_eq!(m.teams(), &["team2".to_string(), "team1".to_string()]);
    }

    #[test]
    fn test_from_record_fills_missing_scores() {
        let record = MatchRecord {
            id: "match1".to_string(),
            teams: two_teams(),
            scores: scores(&[("team1", 2)]),
            started: None,
            finished: None,
        };
        let m = Match::from_record(&record, &two_teams()).unwrap();
        assert_eq!(m.score("team2"), Some(0));
        assert!(m.is_started());
    }

    #[test]
    fn test_from_record_rejects_outside_score() {
        let record = MatchRecord {
            id: "match1".to_string(),
            teams: two_teams(),
            scores: scores(&[("team9", 2)]),
            started: None,
            finished: None,
        };
        let err = Match::from_record(&record, &two_teams()).unwrap_err();
        assert_eq!(
            err,
            SetError::TeamNotInMatch {
                match_id: "match1".to_string(),
                team: "team9".to_string(),
            }
        );
    }

    #[test]
    fn test_record_round_trip() {
        let mut m = Match::with_scores("match1", scores(&[("team1", 3), ("team2", 0)]), &two_teams())
            .unwrap();
        m.finish();
        let rebuilt = Match::from_record(&m.record(), &two_teams()).unwrap();
        assert_eq!(rebuilt.id(), "match1");
        assert!(rebuilt.is_started());
        assert!(rebuilt.is_finished());
        assert_eq!(rebuilt.score("team1"), Some(3));
    }
}
