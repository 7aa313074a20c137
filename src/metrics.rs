use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, register_counter, register_gauge};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("cinevote_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "cinevote_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref VOTES_RECORDED: Counter = register_counter!(
        "cinevote_votes_recorded_total",
        "Votes and reactions recorded"
    )
    .unwrap();
    pub static ref DUPLICATE_VOTES: Counter = register_counter!(
        "cinevote_duplicate_votes_total",
        "Votes rejected as duplicates"
    )
    .unwrap();
    pub static ref LIMITER_KEYS: Gauge = register_gauge!(
        "cinevote_rate_limit_keys",
        "Live keys in the rate limit store"
    )
    .unwrap();
}
