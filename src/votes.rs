use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;

// What kind of thing is being voted or reacted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    Poll,
    Battle,
    Comment,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubjectKind::Poll => "poll",
            SubjectKind::Battle => "battle",
            SubjectKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectId {
    pub kind: SubjectKind,
    pub id: String,
}

impl SubjectId {
    pub fn new(kind: SubjectKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

// One recorded vote or reaction. voter_id is the 32-hex pseudonymous id from
// the identity module, never a raw address.
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub subject: SubjectId,
    pub voter_id: String,
    pub choice: String,
}

// Persistence seam. The real site keeps votes in its relational store; the
// in-memory store below stands in for it here and in tests.
pub trait VoteStore: Send + Sync {
    fn find_vote(&self, subject: &SubjectId, voter_id: &str) -> Option<VoteRecord>;
    fn record_vote(&self, record: VoteRecord);
    fn tally(&self, subject: &SubjectId) -> HashMap<String, u64>;
}

// Keyed by (subject, voter), so at most one record per pair holds by
// construction
pub struct MemoryVoteStore {
    votes: DashMap<(SubjectId, String), VoteRecord>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self {
            votes: DashMap::new(),
        }
    }
}

impl VoteStore for MemoryVoteStore {
    fn find_vote(&self, subject: &SubjectId, voter_id: &str) -> Option<VoteRecord> {
        self.votes
            .get(&(subject.clone(), voter_id.to_string()))
            .map(|record| record.clone())
    }

    fn record_vote(&self, record: VoteRecord) {
        let key = (record.subject.clone(), record.voter_id.clone());
        self.votes.insert(key, record);
    }

    fn tally(&self, subject: &SubjectId) -> HashMap<String, u64> {
        let mut counts = HashMap::new();
        for entry in self.votes.iter() {
            if &entry.subject == subject {
                *counts.entry(entry.choice.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

// At-most-one-vote rule: true when no prior record exists for this
// (subject, voter) pair
pub fn enforce_one_vote(store: &dyn VoteStore, subject: &SubjectId, voter_id: &str) -> bool {
    store.find_vote(subject, voter_id).is_none()
}

#[derive(Debug, Clone, Copy)]
pub struct DuplicateVote {
    pub kind: SubjectKind,
}

impl DuplicateVote {
    pub fn message(&self) -> String {
        format!("You have already voted on this {}", self.kind)
    }
}

// Record a vote unless the voter already has one on this subject, then return
// the updated tally. The choice made on a repeat attempt is irrelevant - the
// pair is what counts.
pub fn submit_vote(
    store: &dyn VoteStore,
    subject: SubjectId,
    voter_id: &str,
    choice: String,
) -> Result<HashMap<String, u64>, DuplicateVote> {
    if !enforce_one_vote(store, &subject, voter_id) {
        return Err(DuplicateVote { kind: subject.kind });
    }

    store.record_vote(VoteRecord {
        subject: subject.clone(),
        voter_id: voter_id.to_string(),
        choice,
    });

    Ok(store.tally(&subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::derive_voter_id;

    fn battle(id: &str) -> SubjectId {
        SubjectId::new(SubjectKind::Battle, id)
    }

    #[test]
    fn second_vote_from_same_client_is_rejected() {
        let store = MemoryVoteStore::new();
        let voter = derive_voter_id("10.0.0.5", "UA-X");

        let first = submit_vote(&store, battle("B1"), &voter, "movie-1".to_string());
        assert!(first.is_ok());

        // different movie, same client - still a duplicate
        let second = submit_vote(&store, battle("B1"), &voter, "movie-2".to_string());
        let err = second.unwrap_err();
        assert_eq!(err.message(), "You have already voted on this battle");
    }

    #[test]
    fn different_agents_behind_one_proxy_each_get_a_vote() {
        let store = MemoryVoteStore::new();
        let voter_x = derive_voter_id("10.0.0.5", "UA-X");
        let voter_y = derive_voter_id("10.0.0.5", "UA-Y");

        assert!(submit_vote(&store, battle("B1"), &voter_x, "movie-1".to_string()).is_ok());
        assert!(submit_vote(&store, battle("B1"), &voter_y, "movie-2".to_string()).is_ok());

        let tally = store.tally(&battle("B1"));
        assert_eq!(tally.get("movie-1"), Some(&1));
        assert_eq!(tally.get("movie-2"), Some(&1));
    }

    #[test]
    fn votes_are_scoped_to_their_subject() {
        let store = MemoryVoteStore::new();
        let voter = derive_voter_id("10.0.0.5", "UA-X");

        assert!(submit_vote(&store, battle("B1"), &voter, "movie-1".to_string()).is_ok());
        // same voter, different battle
        assert!(submit_vote(&store, battle("B2"), &voter, "movie-1".to_string()).is_ok());
        // same voter, same id but a poll - distinct subject kind
        let poll = SubjectId::new(SubjectKind::Poll, "B1");
        assert!(submit_vote(&store, poll, &voter, "option-a".to_string()).is_ok());
    }

    #[test]
    fn tally_counts_choices_per_subject() {
        let store = MemoryVoteStore::new();
        for n in 0..3 {
            let voter = derive_voter_id(&format!("10.0.0.{}", n), "UA-X");
            submit_vote(&store, battle("B1"), &voter, "movie-1".to_string()).unwrap();
        }
        let voter = derive_voter_id("10.0.1.1", "UA-X");
        submit_vote(&store, battle("B1"), &voter, "movie-2".to_string()).unwrap();

        let tally = store.tally(&battle("B1"));
        assert_eq!(tally.get("movie-1"), Some(&3));
        assert_eq!(tally.get("movie-2"), Some(&1));
    }

    #[test]
    fn enforce_one_vote_reports_prior_records() {
        let store = MemoryVoteStore::new();
        let subject = battle("B9");

        assert!(enforce_one_vote(&store, &subject, "abc123"));
        store.record_vote(VoteRecord {
            subject: subject.clone(),
            voter_id: "abc123".to_string(),
            choice: "movie-1".to_string(),
        });
        assert!(!enforce_one_vote(&store, &subject, "abc123"));
        assert!(enforce_one_vote(&store, &subject, "def456"));
    }
}
