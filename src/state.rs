use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::votes::VoteStore;

// app's shared state
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub votes: Arc<dyn VoteStore>,
}
