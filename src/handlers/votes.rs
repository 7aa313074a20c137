use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, http::HeaderMap};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Bucket;
use crate::identity::{client_address, client_agent, derive_voter_id};
use crate::metrics::{DUPLICATE_VOTES, RATE_LIMITED_TOTAL, REQUEST_TOTAL, VOTES_RECORDED};
use crate::models::{
    BattleVoteRequest, CommentAccepted, CommentRequest, ErrorResponse, PollVoteRequest,
    RateLimitedResponse, ReactionRequest, VoteResponse,
};
use crate::state::AppState;
use crate::config;
use crate::votes::{SubjectId, SubjectKind, submit_vote};

// 429 with a Retry-After header, never a server error
fn rate_limited_response(retry_after: u64) -> Response {
    let body = RateLimitedResponse {
        success: false,
        error: "Too many requests. Try again later.".to_string(),
        retry_after,
    };
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

// Shared admission check: count the request, throttle on the given bucket.
// Returns the client address the limiter keyed on, or the finished 429.
fn admit(
    state: &AppState,
    bucket: Bucket,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Result<String, Response> {
    REQUEST_TOTAL.inc();

    let addr = client_address(headers, Some(peer));
    let decision = state
        .limiter
        .check(&bucket.key(&addr), bucket.limit, bucket.window);

    if !decision.allowed {
        RATE_LIMITED_TOTAL.inc();
        let retry_after = decision.retry_after_secs(state.limiter.now());
        return Err(rate_limited_response(retry_after));
    }

    Ok(addr)
}

fn record_vote(
    state: &AppState,
    subject: SubjectId,
    addr: &str,
    headers: &HeaderMap,
    choice: String,
) -> Response {
    let voter_id = derive_voter_id(addr, &client_agent(headers));

    match submit_vote(state.votes.as_ref(), subject, &voter_id, choice) {
        Ok(tally) => {
            VOTES_RECORDED.inc();
            Json(VoteResponse {
                success: true,
                tally,
            })
            .into_response()
        }
        Err(duplicate) => {
            DUPLICATE_VOTES.inc();
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: duplicate.message(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn poll_vote_handler(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<PollVoteRequest>,
) -> Response {
    let addr = match admit(&state, config::VOTES, &headers, peer) {
        Ok(addr) => addr,
        Err(rejection) => return rejection,
    };

    let subject = SubjectId::new(SubjectKind::Poll, poll_id);
    record_vote(&state, subject, &addr, &headers, payload.option)
}

pub async fn battle_vote_handler(
    State(state): State<Arc<AppState>>,
    Path(battle_id): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<BattleVoteRequest>,
) -> Response {
    let addr = match admit(&state, config::VOTES, &headers, peer) {
        Ok(addr) => addr,
        Err(rejection) => return rejection,
    };

    let subject = SubjectId::new(SubjectKind::Battle, battle_id);
    record_vote(&state, subject, &addr, &headers, payload.movie_id)
}

pub async fn comment_react_handler(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ReactionRequest>,
) -> Response {
    let addr = match admit(&state, config::VOTES, &headers, peer) {
        Ok(addr) => addr,
        Err(rejection) => return rejection,
    };

    let subject = SubjectId::new(SubjectKind::Comment, comment_id);
    record_vote(&state, subject, &addr, &headers, payload.reaction)
}

// Comment bodies go to the CMS layer; this endpoint only owns the throttle
// and the input check.
pub async fn comment_post_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<CommentRequest>,
) -> Response {
    if let Err(rejection) = admit(&state, config::COMMENTS, &headers, peer) {
        return rejection;
    }

    if payload.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Comment text is required".to_string(),
            }),
        )
            .into_response();
    }

    Json(CommentAccepted { success: true }).into_response()
}
