use clap::Parser;
use std::time::Duration;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "cinevote")]
#[command(about = "Voting and rate limiting service for a movies & TV site")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Expired rate-limit entries are swept on this cadence (seconds)
    #[arg(long, default_value_t = 60)]
    pub sweep_interval: u64,
}

// A named rate-limit bucket. The limiter itself is bucket-agnostic: callers
// compose "bucket:identity" keys and apply their configured limit/window at
// the call site.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    pub name: &'static str,
    pub limit: u32,
    pub window: Duration,
}

impl Bucket {
    // Composite counter key, e.g. "votes:1.2.3.4"
    pub fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.name, identity)
    }
}

pub const LOGIN: Bucket = Bucket {
    name: "login",
    limit: 5,
    window: Duration::from_secs(15 * 60),
};
pub const REGISTER: Bucket = Bucket {
    name: "register",
    limit: 3,
    window: Duration::from_secs(60 * 60),
};
pub const API: Bucket = Bucket {
    name: "api",
    limit: 100,
    window: Duration::from_secs(60),
};
pub const FETCH: Bucket = Bucket {
    name: "fetch",
    limit: 10,
    window: Duration::from_secs(60 * 60),
};
pub const COMMENTS: Bucket = Bucket {
    name: "comments",
    limit: 10,
    window: Duration::from_secs(60),
};
pub const VOTES: Bucket = Bucket {
    name: "votes",
    limit: 30,
    window: Duration::from_secs(60),
};

// Full bucket table. Login/register/fetch belong to endpoints the auth and
// metadata layers own; they share this one limiter through the same table.
pub const BUCKETS: [Bucket; 6] = [LOGIN, REGISTER, API, FETCH, COMMENTS, VOTES];
