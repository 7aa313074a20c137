mod clock;
mod config;
mod handlers;
mod identity;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod votes;

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::SystemClock;
use crate::config::Args;
use crate::rate_limit::{RateLimiter, start_sweeper};
use crate::state::AppState;
use crate::votes::MemoryVoteStore;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();

    // creating shared state; the limiter is built here and injected
    // everywhere, never a module-level global
    let limiter = Arc::new(RateLimiter::new(Arc::new(SystemClock)));
    let sweeper = start_sweeper(
        Arc::clone(&limiter),
        Duration::from_secs(args.sweep_interval),
    );

    let state = Arc::new(AppState {
        limiter,
        votes: Arc::new(MemoryVoteStore::new()),
    });

    // creating the router with routes
    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/polls/{poll_id}/vote", post(handlers::poll_vote_handler))
        .route(
            "/api/battles/{battle_id}/vote",
            post(handlers::battle_vote_handler),
        )
        .route(
            "/api/comments/{comment_id}/react",
            post(handlers::comment_react_handler),
        )
        .route("/api/comments", post(handlers::comment_post_handler))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    println!("cinevote running on http://localhost:{}", args.port);
    println!("Rate limit buckets:");
    for bucket in config::BUCKETS {
        println!(
            ".  {} -> {} requests per {:?}",
            bucket.name, bucket.limit, bucket.window
        );
    }

    // ConnectInfo gives handlers the peer address for limiter keys
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
    .unwrap();

    sweeper.stop();
}
