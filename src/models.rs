use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Vote for a poll option
#[derive(Deserialize, Serialize, Clone)]
pub struct PollVoteRequest {
    pub option: String,
}

// Pick a side in a movie battle
#[derive(Deserialize, Serialize, Clone)]
pub struct BattleVoteRequest {
    pub movie_id: String,
}

// React to a comment (like, heart, ...)
#[derive(Deserialize, Serialize, Clone)]
pub struct ReactionRequest {
    pub reaction: String,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct CommentRequest {
    pub text: String,
}

// Accepted vote -> updated tally for the subject
#[derive(Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub tally: HashMap<String, u64>,
}

// 429 body, paired with a Retry-After header
#[derive(Serialize)]
pub struct RateLimitedResponse {
    pub success: bool,
    pub error: String,
    #[serde(rename = "retryAfter")]
    pub retry_after: u64,
}

// 400 body for duplicate votes and bad input
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct CommentAccepted {
    pub success: bool,
}
