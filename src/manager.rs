use std::collections::HashMap;

use tracing::info;

use crate::error::SetError;
use crate::matches::Match;
use crate::sets::Set;
use crate::types::SetSnapshot;

/// SetManager owns every live set and funnels all reads and writes
/// through one place. Callers that share it across threads wrap it in
/// the `SharedSetManager` alias; one lock then covers both mutation and
/// the derived reads, which recompute from the underlying matches.
#[derive(Default)]
pub struct SetManager {
    sets: HashMap<String, Set>,
}

impl SetManager {
    pub fn new() -> Self {
        SetManager::default()
    }

    /// Register a set. Set ids are unique within a manager.
    pub fn insert(&mut self, set: Set) -> Result<(), SetError> {
        if self.sets.contains_key(set.id()) {
            return Err(SetError::DuplicateSet { set_id: set.id().to_string() });
        }
        self.sets.insert(set.id().to_string(), set);
        Ok(())
    }

    pub fn get(&self, set_id: &str) -> Option<&Set> {
        self.sets.get(set_id)
    }

    pub fn remove(&mut self, set_id: &str) -> Option<Set> {
        self.sets.remove(set_id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Clear all sets (used when switching tournaments).
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn add_match(&mut self, set_id: &str, m: Match) -> Result<(), SetError> {
        self.get_mut(set_id)?.add_match(m)
    }

    pub fn record_score(
        &mut self,
        set_id: &str,
        match_id: &str,
        team: &str,
        value: u32,
    ) -> Result<(), SetError> {
        self.get_mut(set_id)?.record_score(match_id, team, value)
    }

    pub fn finish_match(&mut self, set_id: &str, match_id: &str) -> Result<(), SetError> {
        self.get_mut(set_id)?.finish_match(match_id)?;
        info!("Finished match {match_id} in set {set_id}");
        Ok(())
    }

    pub fn forfeit(&mut self, set_id: &str, team: &str) -> Result<(), SetError> {
        self.get_mut(set_id)?.forfeit(team)?;
        info!("Team {team} forfeited set {set_id}");
        Ok(())
    }

    pub fn set_goal(&mut self, set_id: &str, goal: u32) -> Result<(), SetError> {
        self.get_mut(set_id)?.set_goal(goal)
    }

    /// Snapshots of every set, sorted by set id for stable output.
    pub fn snapshots(&self) -> Vec<SetSnapshot> {
        let mut snapshots: Vec<SetSnapshot> =
            self.sets.values().map(|set| set.snapshot()).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    fn get_mut(&mut self, set_id: &str) -> Result<&mut Set, SetError> {
        self.sets
            .get_mut(set_id)
            .ok_or_else(|| SetError::SetNotFound { set_id: set_id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SetState;

    fn teams(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn make_manager() -> SetManager {
        let seeds = teams(&["team1", "team2"]);
        let mut manager = SetManager::new();
        let mut set = Set::new("set1", 2, &teams(&["team1", "team2"]), &seeds).unwrap();
        set.add_match(Match::new("match1", &teams(&["team1", "team2"]), &seeds).unwrap())
            .unwrap();
        manager.insert(set).unwrap();
        manager
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let seeds = teams(&["team1", "team2"]);
        let mut manager = make_manager();
        let dup = Set::new("set1", 3, &teams(&["team1", "team2"]), &seeds).unwrap();

        let err = manager.insert(dup).unwrap_err();
        assert_eq!(err, SetError::DuplicateSet { set_id: "set1".to_string() });
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_mutations_flow_through_to_derivations() {
        let mut manager = make_manager();

        manager.record_score("set1", "match1", "team2", 3).unwrap();
        assert_eq!(manager.get("set1").unwrap().state(), SetState::InProgress);

        manager.finish_match("set1", "match1").unwrap();
        manager.set_goal("set1", 1).unwrap();
        assert_eq!(manager.get("set1").unwrap().state(), SetState::Completed);
    }

    #[test]
    fn test_unknown_set_is_an_error() {
        let mut manager = make_manager();

        let err = manager.forfeit("set9", "team1").unwrap_err();
        assert_eq!(err, SetError::SetNotFound { set_id: "set9".to_string() });
    }

    #[test]
    fn test_forfeit_leaves_no_trace_on_error() {
        let mut manager = make_manager();

        let err = manager.forfeit("set1", "team9").unwrap_err();
        assert_eq!(err, SetError::UnknownTeam { team: "team9".to_string() });
        assert!(manager.get("set1").unwrap().forfeits().is_empty());
    }

    #[test]
    fn test_snapshots_sorted_by_id() {
        let seeds = teams(&["team1", "team2"]);
        let mut manager = make_manager();
        manager
            .insert(Set::new("set0", 3, &teams(&["team1", "team2"]), &seeds).unwrap())
            .unwrap();

        let snapshots = manager.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id, "set0");
        assert_eq!(snapshots[1].id, "set1");
    }
}
