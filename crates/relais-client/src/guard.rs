//! The session guard.
//!
//! Wraps the HTTP transport so that every outgoing request carries a valid
//! access credential when one exists, and transparently recovers from a
//! single class of failure (expired access token) without duplicating
//! renewal work or losing requests.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_util::FutureExt;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use relais_core::error::AuthError;
use relais_core::{
    AccessToken, ApiUrl, Credentials, Error, ProfileUpdate, RefreshToken, RegisterForm, Result,
    SessionState, SessionStore, User, persisted_view,
};

use crate::coordinator::RenewalCoordinator;
use crate::endpoints::{
    AUTH_FROM_PASSWORD, LOGOUT, LoginRequest, LoginResponse, ME, MessageResponse, REFRESH_TOKEN,
    REGISTER, RefreshRequest, RefreshResponse, RegisterResponse, UPDATE_PROFILE,
    UpdateProfileResponse,
};
use crate::http::HttpClient;
use crate::jar::{ACCESS_COOKIE, REFRESH_COOKIE, TokenJar};
use crate::store::MemoryStore;

/// Message surfaced when the refresh credential itself is rejected.
const SESSION_EXPIRED: &str = "session expired, please log in again";

/// Message surfaced for connectivity failures during login.
const CONNECTION_FAILED: &str = "connection to the server failed";

/// Session guard over the relais API.
///
/// Guards are cheap to clone (they use an internal `Arc`) and safe to share
/// across tasks. The credential pair and the session state are owned by the
/// guard exclusively: collaborators read them through [`SessionGuard::session`],
/// [`SessionGuard::access_token`] and [`SessionGuard::refresh_token`], and all
/// writes go through the guard's operations.
///
/// # Example
///
/// ```no_run
/// use relais_client::SessionGuard;
/// use relais_core::{ApiUrl, Credentials};
///
/// # async fn example() -> Result<(), relais_core::Error> {
/// let api = ApiUrl::new("https://api.relais.example")?;
/// let guard = SessionGuard::new(api);
///
/// let user = guard
///     .login(&Credentials::new("alice@example.com", "app-password"))
///     .await?;
/// println!("Logged in as: {}", user.username);
///
/// // Domain requests go through the guard and survive token expiry.
/// let feed: serde_json::Value = guard.get("/resources").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

struct GuardInner {
    http: HttpClient,
    jar: TokenJar,
    coordinator: Arc<RenewalCoordinator>,
    state: RwLock<SessionState>,
    store: Arc<dyn SessionStore>,
}

/// Builder for [`SessionGuard`].
pub struct GuardBuilder {
    base: ApiUrl,
    access_token: Option<String>,
    refresh_token: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    linger: Duration,
}

impl GuardBuilder {
    /// Seed the jar with a persisted access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Seed the jar with a persisted refresh token.
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Inject a durable session store. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the renewal coordinator's post-settlement linger.
    pub fn renewal_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Build the guard.
    pub fn build(self) -> SessionGuard {
        let jar = TokenJar::new();
        if let Some(token) = self.access_token {
            jar.set(ACCESS_COOKIE, token);
        }
        if let Some(token) = self.refresh_token {
            jar.set(REFRESH_COOKIE, token);
        }

        SessionGuard {
            inner: Arc::new(GuardInner {
                http: HttpClient::new(self.base),
                jar,
                coordinator: Arc::new(RenewalCoordinator::new(self.linger)),
                state: RwLock::new(SessionState::default()),
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            }),
        }
    }
}

impl SessionGuard {
    /// Start building a guard for the given API base URL.
    pub fn builder(base: ApiUrl) -> GuardBuilder {
        GuardBuilder {
            base,
            access_token: None,
            refresh_token: None,
            store: None,
            linger: RenewalCoordinator::DEFAULT_LINGER,
        }
    }

    /// Create a guard with default configuration.
    pub fn new(base: ApiUrl) -> Self {
        Self::builder(base).build()
    }

    /// Returns the API base URL this guard talks to.
    pub fn base(&self) -> &ApiUrl {
        self.inner.http.base()
    }

    /// Snapshot of the current session state.
    pub fn session(&self) -> SessionState {
        self.inner.state.read().unwrap().clone()
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().unwrap().is_authenticated
    }

    /// Read-only view of the current access token, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner.jar.access_token()
    }

    /// Read-only view of the current refresh token, if any.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.jar.refresh_token()
    }

    /// Clear the last error message.
    pub fn clear_error(&self) {
        self.inner.state.write().unwrap().error = None;
    }

    /// Restore the persisted session snapshot, typically at startup.
    pub async fn restore(&self) -> Result<()> {
        if let Some(snapshot) = self.inner.store.load().await? {
            let mut state = self.inner.state.write().unwrap();
            state.user = snapshot.user;
            state.is_authenticated = snapshot.is_authenticated;
        }
        Ok(())
    }

    // ========================================================================
    // Authentication operations
    // ========================================================================

    /// Authenticate with the backend and establish a session.
    ///
    /// On success the credential cookies from the response are stored in the
    /// jar and the session state becomes authenticated. On failure the state
    /// carries the backend's error message.
    #[instrument(skip(self, credentials), fields(mail = %credentials.mail()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        info!("Logging in");
        self.set_loading(true);

        let request = LoginRequest {
            mail: credentials.mail(),
            password: credentials.password(),
        };

        let response = match self
            .inner
            .http
            .dispatch(Method::POST, AUTH_FROM_PASSWORD, Some(&request), None)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.fail_auth(&err);
                return Err(err);
            }
        };

        // The credential pair arrives as Set-Cookie headers on success.
        if response.status().is_success() {
            self.inner.jar.store_cookies(response.headers());
        }

        match HttpClient::handle_response::<LoginResponse>(response).await {
            Ok(body) => {
                let user = body.into_user();
                debug!(user_id = %user.id, "Session created");
                self.set_authenticated(user.clone()).await;
                Ok(user)
            }
            Err(err) => {
                self.fail_auth(&err);
                Err(err)
            }
        }
    }

    /// Create an account, then log in with the submitted credentials.
    ///
    /// The register endpoint issues no credentials of its own, so a
    /// successful registration is chained into a normal login.
    #[instrument(skip(self, form), fields(mail = %form.mail))]
    pub async fn register(&self, form: &RegisterForm) -> Result<User> {
        info!("Registering account");
        self.set_loading(true);

        let result: Result<RegisterResponse> = self
            .inner
            .http
            .send(Method::POST, REGISTER, Some(form), None)
            .await;

        if let Err(err) = result {
            self.fail_auth(&err);
            return Err(err);
        }

        let credentials = Credentials::new(&form.mail, &form.password);
        self.login(&credentials).await
    }

    /// Tear down the session.
    ///
    /// Local credentials and state are cleared even when no session exists
    /// or the server call fails, so logging out is idempotent.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Some(token) = self.inner.jar.get(ACCESS_COOKIE) {
            let result: Result<MessageResponse> = self
                .inner
                .http
                .send(Method::POST, LOGOUT, None::<&()>, Some(&token))
                .await;
            if let Err(err) = result {
                warn!(error = %err, "Logout request failed, clearing local session anyway");
            }
        }

        self.reset_session(None).await;
        info!("Logged out");
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Concurrent callers share a single exchange: at most one renewal is in
    /// flight process-wide, and every caller inside the settlement window
    /// observes the same outcome. Returns true when new credentials were
    /// persisted to the jar; on failure the jar is cleared.
    pub async fn renew_credential(&self) -> bool {
        let inner = Arc::clone(&self.inner);
        self.inner
            .coordinator
            .run(move || async move { inner.renew_once().await }.boxed())
            .await
    }

    /// Establish the session state on demand, e.g. at application startup.
    ///
    /// If no access credential is present, one renewal is attempted before
    /// querying the identity endpoint (which itself recovers from a stale
    /// token via the usual renewal-and-replay cycle). Failures degrade to
    /// the unauthenticated state instead of surfacing an error.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> SessionState {
        self.set_loading(true);

        if self.inner.jar.get(ACCESS_COOKIE).is_none() && !self.renew_credential().await {
            debug!("No usable credentials");
            self.reset_session(None).await;
            return self.session();
        }

        match self.get::<User>(ME).await {
            Ok(user) => self.set_authenticated(user).await,
            Err(err) => {
                if !err.is_auth_failure() {
                    warn!(error = %err, "Auth check failed");
                }
                self.reset_session(None).await;
            }
        }

        self.session()
    }

    /// Update the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no credentials are held
    /// at all; an expired access token is recovered like any other request.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        if self.inner.jar.get(ACCESS_COOKIE).is_none()
            && self.inner.jar.get(REFRESH_COOKIE).is_none()
        {
            return Err(AuthError::NotAuthenticated.into());
        }

        debug!("Updating profile");
        let response: UpdateProfileResponse = self.put(UPDATE_PROFILE, update).await?;
        self.set_authenticated(response.user.clone()).await;
        Ok(response.user)
    }

    // ========================================================================
    // Guarded request passthrough
    // ========================================================================

    /// GET an endpoint through the guard.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    /// POST a JSON body to an endpoint through the guard.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body to an endpoint through the guard.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// DELETE an endpoint through the guard.
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.execute(Method::DELETE, path, None::<&()>).await
    }

    /// Issue a request with credential attachment and one-shot recovery
    /// from an authorization failure.
    ///
    /// Non-authorization failures propagate untouched. On a 401 the renewal
    /// runs through the coordinator; on renewal success the request is
    /// resubmitted exactly once with the refreshed token and its outcome is
    /// returned as-is (a second 401 propagates). On renewal failure the
    /// original error propagates and an authenticated session is reset.
    async fn execute<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let token = self.inner.jar.get(ACCESS_COOKIE);
        let err = match self
            .inner
            .http
            .send(method.clone(), path, body, token.as_deref())
            .await
        {
            Ok(value) => return Ok(value),
            Err(err) if err.is_auth_failure() => err,
            Err(err) => return Err(err),
        };

        debug!(path, "Authorization failure, attempting credential renewal");
        if !self.renew_credential().await {
            self.invalidate_session().await;
            return Err(err);
        }

        // Renewed: re-read the token and replay the original request once.
        let token = self.inner.jar.get(ACCESS_COOKIE);
        self.inner
            .http
            .send(method, path, body, token.as_deref())
            .await
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    fn set_loading(&self, loading: bool) {
        self.inner.state.write().unwrap().loading = loading;
    }

    async fn set_authenticated(&self, user: User) {
        let snapshot = {
            let mut state = self.inner.state.write().unwrap();
            state.user = Some(user);
            state.is_authenticated = true;
            state.loading = false;
            state.error = None;
            persisted_view(&state)
        };
        if let Err(err) = self.inner.store.save(&snapshot).await {
            warn!(error = %err, "Failed to persist session snapshot");
        }
    }

    /// Record a failed authentication attempt without touching credentials.
    fn fail_auth(&self, err: &Error) {
        let mut state = self.inner.state.write().unwrap();
        state.is_authenticated = false;
        state.loading = false;
        state.error = Some(error_message(err));
    }

    /// Reset to the unauthenticated state, clearing credentials and the
    /// persisted snapshot.
    async fn reset_session(&self, error: Option<String>) {
        self.inner.jar.clear();
        {
            let mut state = self.inner.state.write().unwrap();
            state.user = None;
            state.is_authenticated = false;
            state.loading = false;
            state.error = error;
        }
        if let Err(err) = self.inner.store.clear().await {
            warn!(error = %err, "Failed to clear persisted session");
        }
    }

    /// Handle a terminal renewal failure: a previously authenticated
    /// session degrades to logged-out with a "session expired" error.
    async fn invalidate_session(&self) {
        let was_authenticated = self.inner.state.read().unwrap().is_authenticated;
        if was_authenticated {
            info!("Renewal failed, invalidating session");
            self.reset_session(Some(SESSION_EXPIRED.to_string())).await;
        }
    }
}

impl GuardInner {
    /// The renewal primitive: one exchange against the refresh endpoint.
    ///
    /// Success persists the new credential pair in the jar; failure clears
    /// the jar so stale credentials are never retried.
    async fn renew_once(&self) -> bool {
        let Some(refresh_token) = self.jar.get(REFRESH_COOKIE) else {
            debug!("No refresh token, renewal impossible");
            self.jar.clear();
            return false;
        };

        let request = RefreshRequest {
            refresh_token: &refresh_token,
        };

        match self
            .http
            .send::<_, RefreshResponse>(Method::POST, REFRESH_TOKEN, Some(&request), None)
            .await
        {
            Ok(body) => {
                self.jar.set(ACCESS_COOKIE, body.access_token);
                self.jar.set(REFRESH_COOKIE, body.refresh_token);
                debug!("Credentials renewed");
                true
            }
            Err(err) => {
                warn!(error = %err, "Credential renewal failed");
                self.jar.clear();
                false
            }
        }
    }
}

/// User-visible message for a failed operation.
///
/// Domain errors carry the backend's own message; transport failures map to
/// a generic connectivity message.
fn error_message(err: &Error) -> String {
    match err {
        Error::Api(api) => api
            .error
            .clone()
            .or_else(|| api.message.clone())
            .unwrap_or_else(|| api.to_string()),
        Error::Transport(_) => CONNECTION_FAILED.to_string(),
        other => other.to_string(),
    }
}

// Custom Debug impl that hides sensitive data
impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("base", self.inner.http.base())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
