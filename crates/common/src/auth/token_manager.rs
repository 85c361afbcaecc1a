//! Token manager with single-flight renewal
//!
//! Manages the access token of one client:
//! - Freshness checks against a configurable margin (default 5 min)
//! - Renewal serialized behind one lock, so concurrent callers that find a
//!   stale token trigger exactly one exchange and share its result
//! - Wholesale replacement on explicit authentication
//! - Clearing after a successful revocation

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use skydropx_domain::constants::TOKEN_REFRESH_MARGIN_SECS;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::types::TokenSet;
use crate::time::{Clock, SystemClock};

/// Stored token state
///
/// The access token and its expiry are set and cleared together, so there is
/// no representation for "token without expiry".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenState {
    /// No token held (initial state, or after revocation)
    #[default]
    Absent,
    /// A token was obtained; it may since have gone stale
    Valid(TokenSet),
}

impl TokenState {
    #[must_use]
    pub fn tokens(&self) -> Option<&TokenSet> {
        match self {
            Self::Absent => None,
            Self::Valid(tokens) => Some(tokens),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens().map(|t| t.access_token.as_str())
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.tokens().map(|t| t.expires_at)
    }
}

/// Observable lifecycle phase of the managed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPhase {
    /// No token held
    Absent,
    /// Token held and fresh
    Valid,
    /// Token held but inside the renewal margin (or expired)
    Expiring,
    /// An exchange with the token endpoint is in flight
    Refreshing,
}

/// Token manager guarding one client's `TokenState`
///
/// All mutation happens while holding the state lock; the lock is held across
/// the token exchange itself, which is what makes renewal single-flight.
pub struct TokenManager<C: Clock = SystemClock> {
    state: Mutex<TokenState>,
    refreshing: AtomicBool,
    clock: C,
    refresh_margin: Duration,
}

impl TokenManager<SystemClock> {
    /// Create a token manager backed by the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TokenManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TokenManager<C> {
    /// Create a token manager reading time from `clock`
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Mutex::new(TokenState::Absent),
            refreshing: AtomicBool::new(false),
            clock,
            refresh_margin: Duration::seconds(TOKEN_REFRESH_MARGIN_SECS),
        }
    }

    #[must_use]
    pub fn refresh_margin(&self) -> Duration {
        self.refresh_margin
    }

    /// Current time according to the manager's clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// True if no token is held or the held token is inside the margin
    pub async fn should_renew(&self) -> bool {
        let state = self.state.lock().await;
        self.is_stale(&state)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> TokenState {
        self.state.lock().await.clone()
    }

    /// Held access token, fresh or not
    pub async fn access_token(&self) -> Option<String> {
        self.state.lock().await.access_token().map(str::to_owned)
    }

    /// Current lifecycle phase
    pub async fn phase(&self) -> TokenPhase {
        if self.refreshing.load(Ordering::Acquire) {
            return TokenPhase::Refreshing;
        }

        let state = self.state.lock().await;
        match &*state {
            TokenState::Absent => TokenPhase::Absent,
            TokenState::Valid(_) if !self.is_stale(&state) => TokenPhase::Valid,
            TokenState::Valid(_) => TokenPhase::Expiring,
        }
    }

    /// Return a fresh access token, running `refresh` first if needed
    ///
    /// Callers arriving while another caller is refreshing wait on the lock
    /// and then observe the new token, so `refresh` runs once per stale
    /// period no matter how many callers race.
    ///
    /// # Errors
    /// Propagates the error of `refresh`; the previous state is kept.
    pub async fn fresh_access_token<F, Fut, E>(&self, refresh: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenSet, E>>,
    {
        let mut state = self.state.lock().await;

        if !self.is_stale(&state) {
            if let Some(token) = state.access_token() {
                return Ok(token.to_owned());
            }
        }

        debug!("Access token absent or expiring, refreshing");
        let tokens = {
            let _refreshing = RefreshGuard::enter(&self.refreshing);
            refresh().await?
        };

        let access_token = tokens.access_token.clone();
        info!(expires_at = %tokens.expires_at, "Access token renewed");
        *state = TokenState::Valid(tokens);

        Ok(access_token)
    }

    /// Unconditionally run `exchange` and replace the state with its token
    ///
    /// The exchange also returns a caller-defined value (typically the raw
    /// token response), which is passed through.
    ///
    /// # Errors
    /// Propagates the error of `exchange`; the previous state is kept.
    pub async fn replace_with<F, Fut, T, E>(&self, exchange: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(TokenSet, T), E>>,
    {
        let mut state = self.state.lock().await;

        let (tokens, output) = {
            let _refreshing = RefreshGuard::enter(&self.refreshing);
            exchange().await?
        };

        info!(expires_at = %tokens.expires_at, "Access token stored");
        *state = TokenState::Valid(tokens);

        Ok(output)
    }

    /// Run `revoke` with the held token and clear the state if it succeeds
    ///
    /// # Errors
    /// Propagates the error of `revoke`; the state is left untouched.
    pub async fn clear_after<F, Fut, T, E>(&self, revoke: F) -> Result<T, E>
    where
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut state = self.state.lock().await;
        let token = state.access_token().map(str::to_owned);

        let output = revoke(token).await?;

        *state = TokenState::Absent;
        info!("Access token cleared");

        Ok(output)
    }

    /// Store a token obtained elsewhere
    pub async fn store(&self, tokens: TokenSet) {
        *self.state.lock().await = TokenState::Valid(tokens);
    }

    fn is_stale(&self, state: &TokenState) -> bool {
        match state {
            TokenState::Absent => true,
            TokenState::Valid(tokens) => !tokens.is_fresh_at(self.clock.now(), self.refresh_margin),
        }
    }
}

/// Marks a refresh as in flight for the lifetime of the guard
struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RefreshGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;
    use crate::time::MockClock;

    fn create_test_manager() -> (TokenManager<MockClock>, MockClock) {
        let clock = MockClock::at_unix(1_700_000_000);
        (TokenManager::with_clock(clock.clone()), clock)
    }

    fn token(clock: &MockClock, value: &str, expires_in: i64) -> TokenSet {
        TokenSet::issued_at(value, expires_in, None, clock.now()).unwrap()
    }

    #[tokio::test]
    async fn test_new_manager_is_absent() {
        let (manager, _) = create_test_manager();
        assert!(manager.should_renew().await);
        assert_eq!(manager.phase().await, TokenPhase::Absent);
        assert_eq!(manager.access_token().await, None);
    }

    #[tokio::test]
    async fn test_should_renew_tracks_margin() {
        let (manager, clock) = create_test_manager();
        manager.store(token(&clock, "tok", 3600)).await;

        assert!(!manager.should_renew().await);
        assert_eq!(manager.phase().await, TokenPhase::Valid);

        // 6 minutes before expiry: still fresh
        clock.advance_secs(3600 - 360);
        assert!(!manager.should_renew().await);

        // 4 minutes before expiry: inside the margin
        clock.advance_secs(120);
        assert!(manager.should_renew().await);
        assert_eq!(manager.phase().await, TokenPhase::Expiring);

        // Past expiry
        clock.advance_secs(600);
        assert!(manager.should_renew().await);
    }

    #[tokio::test]
    async fn test_fresh_token_skips_refresh() {
        let (manager, clock) = create_test_manager();
        manager.store(token(&clock, "cached", 3600)).await;

        let result: Result<String, String> = manager
            .fresh_access_token(|| async { Err("refresh must not run".to_string()) })
            .await;

        assert_eq!(result.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_stale_token_refreshes_once() {
        let (manager, clock) = create_test_manager();
        manager.store(token(&clock, "old", 60)).await;

        let calls = AtomicUsize::new(0);
        let new_token = token(&clock, "new", 3600);
        let result: Result<String, String> = manager
            .fresh_access_token(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(new_token)
            })
            .await;

        assert_eq!(result.unwrap(), "new");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!manager.should_renew().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_state() {
        let (manager, clock) = create_test_manager();
        let stale = token(&clock, "old", 60);
        manager.store(stale.clone()).await;

        let result: Result<String, String> =
            manager.fresh_access_token(|| async { Err("boom".to_string()) }).await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(manager.snapshot().await, TokenState::Valid(stale));
        assert_ne!(manager.phase().await, TokenPhase::Refreshing);
    }

    #[tokio::test]
    async fn test_replace_with_overwrites_wholesale() {
        let (manager, clock) = create_test_manager();
        let first = TokenSet::issued_at("first", 3600, Some("read".into()), clock.now()).unwrap();
        manager.store(first).await;

        let second = TokenSet::issued_at("second", 120, None, clock.now()).unwrap();
        let output: Result<&str, String> =
            manager.replace_with(|| async { Ok((second.clone(), "raw")) }).await;

        assert_eq!(output.unwrap(), "raw");
        let state = manager.snapshot().await;
        let tokens = state.tokens().unwrap();
        assert_eq!(tokens.access_token, "second");
        assert_eq!(tokens.scope, None);
        assert_eq!(tokens.expires_in, 120);
    }

    #[tokio::test]
    async fn test_clear_after_success_clears_state() {
        let (manager, clock) = create_test_manager();
        manager.store(token(&clock, "tok", 3600)).await;

        let seen: Result<Option<String>, String> =
            manager.clear_after(|token| async move { Ok(token) }).await;

        assert_eq!(seen.unwrap().as_deref(), Some("tok"));
        assert_eq!(manager.snapshot().await, TokenState::Absent);
        assert!(manager.should_renew().await);
    }

    #[tokio::test]
    async fn test_clear_after_failure_keeps_state() {
        let (manager, clock) = create_test_manager();
        manager.store(token(&clock, "tok", 3600)).await;

        let result: Result<(), String> =
            manager.clear_after(|_| async { Err("revoke failed".to_string()) }).await;

        assert!(result.is_err());
        assert_eq!(manager.access_token().await.as_deref(), Some("tok"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_refresh() {
        let (manager, clock) = create_test_manager();
        let manager = Arc::new(manager);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            let calls = calls.clone();
            let fresh = token(&clock, "shared", 3600);
            handles.push(tokio::spawn(async move {
                manager
                    .fresh_access_token(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        Ok::<_, String>(fresh)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_phase_reports_refreshing() {
        let (manager, clock) = create_test_manager();
        let manager = Arc::new(manager);
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let worker = {
            let manager = manager.clone();
            let fresh = token(&clock, "tok", 3600);
            tokio::spawn(async move {
                manager
                    .fresh_access_token(|| async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, String>(fresh)
                    })
                    .await
            })
        };

        started_rx.await.unwrap();
        assert_eq!(manager.phase().await, TokenPhase::Refreshing);

        release_tx.send(()).unwrap();
        worker.await.unwrap().unwrap();
        assert_eq!(manager.phase().await, TokenPhase::Valid);
    }
}
