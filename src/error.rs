use thiserror::Error;

/// Errors surfaced by set and match construction or mutation. All of
/// these are caller mistakes; nothing here is retried or recovered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetError {
    #[error("Goal must be at least 1.")]
    InvalidGoal,

    #[error("A match needs at least two teams.")]
    TooFewTeams { match_id: String },

    #[error("Duplicate team '{team}'.")]
    DuplicateTeam { team: String },

    #[error("Team '{team}' is not in this set.")]
    UnknownTeam { team: String },

    #[error("Match '{match_id}' references team '{team}' outside the set.")]
    TeamNotInSet { match_id: String, team: String },

    #[error("Match '{match_id}' already exists in the set.")]
    DuplicateMatch { match_id: String },

    #[error("Match '{match_id}' not found.")]
    UnknownMatch { match_id: String },

    #[error("Team '{team}' is not playing in match '{match_id}'.")]
    TeamNotInMatch { match_id: String, team: String },

    #[error("Match '{match_id}' is already finished.")]
    MatchFinished { match_id: String },

    #[error("Set '{set_id}' not found.")]
    SetNotFound { set_id: String },

    #[error("Set '{set_id}' already exists.")]
    DuplicateSet { set_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SetError::UnknownTeam { team: "team9".to_string() };
        assert_eq!(err.to_string(), "Team 'team9' is not in this set.");

        let err = SetError::TeamNotInSet {
            match_id: "match1".to_string(),
            team: "team9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Match 'match1' references team 'team9' outside the set."
        );
    }
}
