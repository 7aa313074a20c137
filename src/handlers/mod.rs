mod health;
mod metrics;
mod votes;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use votes::{battle_vote_handler, comment_post_handler, comment_react_handler, poll_vote_handler};
