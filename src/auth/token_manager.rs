//! OAuth2 token lifecycle with single-flight refresh.
//!
//! [`OAuth2TokenManager`] is registered on an
//! [`HttpClient`](crate::clients::HttpClient) as a [`Middleware`]. It injects
//! the current access token into every request and reacts to `401`
//! responses:
//!
//! 1. A request whose token was already replaced is retried at once.
//! 2. Otherwise the request is queued. The first queued request starts a
//!    single refresh; later ones only join the queue.
//! 3. When the refresh finishes every queued request is resumed with the
//!    same outcome: retried on success, failed with
//!    [`AuthError::RefreshFailed`] otherwise.
//! 4. A request that fails with `401` again after its retry is failed with
//!    [`AuthError::TokenRejected`].
//!
//! Queued requests may be cancelled by dropping their future; the queue
//! entry is removed and the refresh carries on for the others.
//!
//! At most one refresh call is on the wire at any time. When
//! [`OAuth2TokenManager::authenticate`] or [`OAuth2TokenManager::revoke`]
//! detaches the running cycle, its call still completes; a cycle opened in
//! the meantime waits for it and starts its own call afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::auth::{InMemoryCredentialStore, OAuth2TokenManager};
//! use std::sync::Arc;
//!
//! let manager = OAuth2TokenManager::new(settings, Arc::new(InMemoryCredentialStore::new()));
//! manager.authenticate("alice", "hunter2").await?;
//! let node = Node::new(config, routes).with_token_manager(manager.clone());
//! ```

use crate::auth::constants::{bearer, AUTHORIZATION_HEADER};
use crate::auth::credentials::{CredentialStore, OAuth2Credentials};
use crate::auth::error::{AuthError, OAuthError};
use crate::auth::grants;
use crate::auth::settings::OAuth2Settings;
use crate::clients::{HttpError, HttpMethod, HttpRequest, Middleware, RetryDecision};
use async_trait::async_trait;
use chrono::Utc;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

const UNAUTHORIZED: u16 = 401;

/// Observable state of the token manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// No credentials are held.
    Unauthenticated,
    /// Credentials are held and no refresh is running.
    Authenticated,
    /// A refresh is running.
    Refreshing {
        /// Number of requests waiting for the refresh.
        pending: usize,
    },
}

/// A request suspended until the running refresh completes.
struct PendingRequest {
    id: u64,
    method: HttpMethod,
    url: String,
    resume: oneshot::Sender<Result<(), AuthError>>,
}

struct RefreshCycle {
    generation: u64,
    pending: Vec<PendingRequest>,
}

#[derive(Default)]
struct State {
    credentials: Option<OAuth2Credentials>,
    refresh: Option<RefreshCycle>,
    /// Generation of the refresh call currently on the wire.
    in_flight: Option<u64>,
    next_waiter_id: u64,
    next_generation: u64,
}

struct Shared {
    settings: OAuth2Settings,
    store: Arc<dyn CredentialStore>,
    client: reqwest::Client,
    state: Mutex<State>,
}

enum Enqueued {
    PassThrough,
    RetryNow,
    Wait {
        id: u64,
        resume: oneshot::Receiver<Result<(), AuthError>>,
        refresh_generation: Option<u64>,
    },
}

/// Owns the OAuth2 credentials and refreshes them on demand.
///
/// Cloning yields another handle to the same credentials and queue.
#[derive(Clone)]
pub struct OAuth2TokenManager {
    shared: Arc<Shared>,
}

impl OAuth2TokenManager {
    /// Creates a manager, loading any persisted credentials from `store`.
    #[must_use]
    pub fn new(settings: OAuth2Settings, store: Arc<dyn CredentialStore>) -> Self {
        let credentials = store.load();
        Self {
            shared: Arc::new(Shared {
                settings,
                store,
                client: reqwest::Client::new(),
                state: Mutex::new(State {
                    credentials,
                    ..State::default()
                }),
            }),
        }
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub fn settings(&self) -> &OAuth2Settings {
        &self.shared.settings
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        let state = self.lock();
        match (&state.refresh, &state.credentials) {
            (Some(cycle), _) => AuthState::Refreshing {
                pending: cycle.pending.len(),
            },
            (None, Some(_)) => AuthState::Authenticated,
            (None, None) => AuthState::Unauthenticated,
        }
    }

    /// Returns `true` if credentials are held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().credentials.is_some()
    }

    /// Returns a copy of the current credentials.
    #[must_use]
    pub fn credentials(&self) -> Option<OAuth2Credentials> {
        self.lock().credentials.clone()
    }

    /// Returns the current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock()
            .credentials
            .as_ref()
            .map(|credentials| credentials.access_token.clone())
    }

    /// Obtains credentials with the password grant and stores them.
    ///
    /// Requests waiting on a running refresh are resumed and retried with
    /// the new token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenRequestFailed`] if the grant fails. Held
    /// credentials are left untouched in that case.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<OAuth2Credentials, OAuthError> {
        let response = grants::request_password_grant(
            &self.shared.client,
            &self.shared.settings,
            username,
            password,
        )
        .await?;
        let credentials = OAuth2Credentials::from_token_response(response, Utc::now(), None);

        let cycle = {
            let mut state = self.lock();
            self.shared.store.store(&credentials);
            state.credentials = Some(credentials.clone());
            state.refresh.take()
        };
        tracing::debug!("authenticated with password grant");

        if let Some(cycle) = cycle {
            resume_all(cycle, &Ok(()));
        }
        Ok(credentials)
    }

    /// Revokes the access token and clears the credentials.
    ///
    /// Credentials are cleared locally before the revocation request is
    /// sent, and stay cleared when it fails. Requests waiting on a running
    /// refresh fail with [`AuthError::MissingCredentials`]. Without
    /// credentials this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenRevokeFailed`] if the server refuses the
    /// revocation or cannot be reached.
    pub async fn revoke(&self) -> Result<(), OAuthError> {
        let (credentials, cycle) = {
            let mut state = self.lock();
            let credentials = state.credentials.take();
            if credentials.is_some() {
                self.shared.store.clear();
            }
            (credentials, state.refresh.take())
        };

        if let Some(cycle) = cycle {
            resume_all(cycle, &Err(AuthError::MissingCredentials));
        }

        let Some(credentials) = credentials else {
            return Ok(());
        };

        tracing::debug!("revoking access token");
        grants::request_revocation(
            &self.shared.client,
            &self.shared.settings,
            &credentials.access_token,
        )
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "token revocation failed, credentials cleared locally");
            e
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides synchronously how a `401` is handled.
    fn enqueue(&self, request: &HttpRequest) -> Enqueued {
        let mut state = self.lock();

        let Some(current) = state.credentials.as_ref() else {
            return Enqueued::PassThrough;
        };
        if request.bearer_token() != Some(current.access_token.as_str()) {
            return Enqueued::RetryNow;
        }
        if current.refresh_token.is_none() {
            return Enqueued::PassThrough;
        }

        let id = state.next_waiter_id;
        state.next_waiter_id += 1;

        let refresh_generation = if state.refresh.is_none() {
            let generation = state.next_generation;
            state.next_generation += 1;
            state.refresh = Some(RefreshCycle {
                generation,
                pending: Vec::new(),
            });
            if state.in_flight.is_none() {
                state.in_flight = Some(generation);
                Some(generation)
            } else {
                tracing::debug!(generation, "refresh deferred until the running call completes");
                None
            }
        } else {
            None
        };

        let (sender, receiver) = oneshot::channel();
        if let Some(cycle) = state.refresh.as_mut() {
            cycle.pending.push(PendingRequest {
                id,
                method: request.http_method,
                url: request.url.clone(),
                resume: sender,
            });
        }

        Enqueued::Wait {
            id,
            resume: receiver,
            refresh_generation,
        }
    }

    /// Runs the refresh for `generation` on its own task, so cancelling the
    /// request that started it does not abort the call.
    fn spawn_refresh(&self, generation: u64) {
        tokio::spawn(self.clone().run_refresh(generation));
    }

    async fn run_refresh(self, generation: u64) {
        let refresh_token = self
            .lock()
            .credentials
            .as_ref()
            .and_then(|credentials| credentials.refresh_token.clone());

        let result = match refresh_token.as_deref() {
            Some(token) => {
                tracing::debug!(generation, "refreshing access token");
                grants::request_refresh_grant(&self.shared.client, &self.shared.settings, token)
                    .await
                    .map_err(|e| e.to_string())
            }
            None => Err("no refresh token available".to_string()),
        };

        let (cycle, outcome) = {
            let mut state = self.lock();
            state.in_flight = None;

            let current = state.refresh.as_ref().map(|cycle| cycle.generation);
            if current != Some(generation) {
                tracing::debug!(generation, "discarding result of superseded refresh");
                if let Some(next) = current {
                    state.in_flight = Some(next);
                    self.spawn_refresh(next);
                }
                return;
            }
            let Some(cycle) = state.refresh.take() else {
                return;
            };

            let outcome = match result {
                Ok(response) => {
                    let credentials =
                        OAuth2Credentials::from_token_response(response, Utc::now(), refresh_token);
                    self.shared.store.store(&credentials);
                    state.credentials = Some(credentials);
                    Ok(())
                }
                Err(message) => {
                    tracing::warn!(error = %message, "token refresh failed, clearing credentials");
                    self.shared.store.clear();
                    state.credentials = None;
                    Err(AuthError::RefreshFailed { message })
                }
            };
            (cycle, outcome)
        };

        resume_all(cycle, &outcome);
    }
}

fn resume_all(cycle: RefreshCycle, outcome: &Result<(), AuthError>) {
    tracing::debug!(
        pending = cycle.pending.len(),
        success = outcome.is_ok(),
        "resuming requests queued on refresh"
    );
    for request in cycle.pending {
        tracing::trace!(id = request.id, method = %request.method, url = %request.url, "resuming");
        // A dropped receiver means the caller was cancelled.
        let _ = request.resume.send(outcome.clone());
    }
}

/// Removes a queue entry when its waiter is dropped before resumption.
struct PendingGuard<'a> {
    manager: &'a OAuth2TokenManager,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.manager.lock();
        if let Some(cycle) = state.refresh.as_mut() {
            cycle.pending.retain(|request| request.id != self.id);
        }
    }
}

#[async_trait]
impl Middleware for OAuth2TokenManager {
    fn adapt(&self, request: &mut HttpRequest) -> Result<(), HttpError> {
        if let Some(token) = self.access_token() {
            request.set_header(AUTHORIZATION_HEADER, bearer(&token));
        }
        Ok(())
    }

    async fn retry(
        &self,
        request: &HttpRequest,
        error: &HttpError,
        retry_count: u32,
    ) -> RetryDecision {
        if error.status() != Some(UNAUTHORIZED) {
            return RetryDecision::DoNotRetry;
        }
        if retry_count > 0 {
            tracing::warn!(url = %request.url, "access token rejected after retry");
            return RetryDecision::Fail(AuthError::TokenRejected.into());
        }

        let (id, resume, refresh_generation) = match self.enqueue(request) {
            Enqueued::PassThrough => return RetryDecision::DoNotRetry,
            Enqueued::RetryNow => return RetryDecision::Retry,
            Enqueued::Wait {
                id,
                resume,
                refresh_generation,
            } => (id, resume, refresh_generation),
        };

        if let Some(generation) = refresh_generation {
            self.spawn_refresh(generation);
        }

        let _guard = PendingGuard { manager: self, id };
        match resume.await {
            Ok(Ok(())) => RetryDecision::Retry,
            Ok(Err(error)) => RetryDecision::Fail(error.into()),
            Err(_) => RetryDecision::Fail(AuthError::RefreshAborted.into()),
        }
    }
}

impl fmt::Debug for OAuth2TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2TokenManager")
            .field("settings", &self.shared.settings)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// Verify the manager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuth2TokenManager>();
};
