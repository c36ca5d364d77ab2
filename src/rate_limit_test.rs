use super::*;

fn limiter() -> RateLimiter {
    RateLimiter::with_config(RateLimitConfig::default())
}

#[test]
fn per_session_allows_up_to_limit() {
    let rl = limiter();
    let session = Uuid::new_v4();
    let now = Instant::now();

    for i in 0..DEFAULT_PER_SESSION_LIMIT {
        assert!(rl.check_and_record_at(session, now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at(session, now),
        Err(RateLimitError::PerSessionExceeded { limit: DEFAULT_PER_SESSION_LIMIT, .. })
    ));
}

#[test]
fn global_allows_up_to_limit() {
    let rl = limiter();
    let now = Instant::now();

    // Use distinct conversations to avoid hitting the per-session limit first.
    for i in 0..DEFAULT_GLOBAL_LIMIT {
        assert!(rl.check_and_record_at(Uuid::new_v4(), now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at(Uuid::new_v4(), now),
        Err(RateLimitError::GlobalExceeded { .. })
    ));
}

#[test]
fn token_budget_exceeded() {
    let rl = limiter();
    let session = Uuid::new_v4();
    let now = Instant::now();

    rl.record_tokens_at(session, DEFAULT_TOKEN_BUDGET, now);

    assert!(matches!(
        rl.check_and_record_at(session, now),
        Err(RateLimitError::TokenBudgetExceeded { .. })
    ));
}

#[test]
fn token_budget_recovers_after_window() {
    let rl = limiter();
    let session = Uuid::new_v4();
    let start = Instant::now();

    rl.record_tokens_at(session, DEFAULT_TOKEN_BUDGET, start);
    let after = start + Duration::from_secs(DEFAULT_TOKEN_WINDOW_SECS) + Duration::from_millis(1);
    assert!(rl.check_and_record_at(session, after).is_ok());
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = limiter();
    let session = Uuid::new_v4();
    let start = Instant::now();

    for _ in 0..DEFAULT_PER_SESSION_LIMIT {
        rl.check_and_record_at(session, start).unwrap();
    }
    assert!(rl.check_and_record_at(session, start).is_err());

    let after_window = start + Duration::from_secs(DEFAULT_PER_SESSION_WINDOW_SECS) + Duration::from_millis(1);
    assert!(rl.check_and_record_at(session, after_window).is_ok());
}

#[test]
fn distinct_sessions_do_not_interfere() {
    let rl = limiter();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let now = Instant::now();

    for _ in 0..DEFAULT_PER_SESSION_LIMIT {
        rl.check_and_record_at(a, now).unwrap();
    }
    assert!(rl.check_and_record_at(a, now).is_err());
    assert!(rl.check_and_record_at(b, now).is_ok());
}

#[test]
fn rejected_request_is_not_recorded() {
    let rl = RateLimiter::with_config(RateLimitConfig { per_session_limit: 1, ..RateLimitConfig::default() });
    let session = Uuid::new_v4();
    let other = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session, now).unwrap();
    for _ in 0..5 {
        assert!(rl.check_and_record_at(session, now).is_err());
    }
    // Only one global slot was consumed by `session`.
    let remaining = DEFAULT_GLOBAL_LIMIT - 1;
    for _ in 0..remaining {
        assert!(rl.check_and_record_at(Uuid::new_v4(), now).is_ok());
    }
    assert!(rl.check_and_record_at(other, now).is_err());
}

#[test]
fn forget_clears_session_history() {
    let rl = RateLimiter::with_config(RateLimitConfig { per_session_limit: 1, ..RateLimitConfig::default() });
    let session = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session, now).unwrap();
    assert!(rl.check_and_record_at(session, now).is_err());
    rl.forget(session);
    assert!(rl.check_and_record_at(session, now).is_ok());
}
