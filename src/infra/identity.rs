//! Sign-in, sign-up and session restore behind one trait, with a hosted and a
//! local demo implementation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{Role, User};
use crate::infra::backend::{AuthSession, BackendClient, BackendError, ProfileRow};
use crate::infra::session_store::{SessionStore, StoredSession};

const MIN_PASSWORD_LEN: usize = 6;
const DEMO_ACCOUNTS_FILENAME: &str = "demo_accounts.json";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("{0}")]
    Invalid(String),
    #[error("no profile found for this account")]
    MissingProfile,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.full_name.trim().is_empty() {
            return Err(AuthError::Invalid("full name is required".into()));
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AuthError::Invalid(format!("{email:?} is not an email address"))),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityMode {
    Demo,
    Hosted,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn mode(&self) -> IdentityMode;

    /// Resolves the account from the stored session, if any is still valid.
    async fn restore(&self) -> Result<Option<User>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// New accounts always get [`Role::User`].
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

fn remember(store: &SessionStore, session: StoredSession) {
    if let Err(err) = store.save(&session) {
        tracing::warn!(path = %store.path().display(), "failed to store session: {err}");
    }
}

fn forget(store: &SessionStore) {
    if let Err(err) = store.clear() {
        tracing::warn!(path = %store.path().display(), "failed to clear session: {err}");
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct DemoAccount {
    user: User,
    password: String,
}

/// Local accounts used when no backend is configured.
///
/// The three seeded accounts are built in; accounts created through sign-up
/// are kept in `demo_accounts.json` next to the session file.
pub struct DemoIdentity {
    accounts: Mutex<Vec<DemoAccount>>,
    seeded: usize,
    accounts_path: PathBuf,
    store: SessionStore,
}

pub const DEMO_PASSWORD: &str = "demo123";

impl DemoIdentity {
    pub fn new(store: SessionStore) -> Self {
        let seed = |id: &str, email: &str, full_name: &str, role: Role| DemoAccount {
            user: User {
                id: id.to_string(),
                email: email.to_string(),
                full_name: full_name.to_string(),
                role,
            },
            password: DEMO_PASSWORD.to_string(),
        };
        let mut accounts = vec![
            seed("demo-user", "user@techtrader.demo", "Demo User", Role::User),
            seed("demo-admin", "admin@techtrader.demo", "Demo Admin", Role::Admin),
            seed(
                "demo-warehouse",
                "warehouse@techtrader.demo",
                "Demo Warehouse",
                Role::Warehouse,
            ),
        ];
        let seeded = accounts.len();
        let accounts_path = store.path().with_file_name(DEMO_ACCOUNTS_FILENAME);
        for account in load_registered(&accounts_path) {
            if accounts.iter().all(|known| known.user.email != account.user.email) {
                accounts.push(account);
            }
        }
        Self {
            accounts: Mutex::new(accounts),
            seeded,
            accounts_path,
            store,
        }
    }

    /// Emails of the seeded accounts, for the sign-in hint.
    pub fn demo_emails() -> [&'static str; 3] {
        [
            "user@techtrader.demo",
            "admin@techtrader.demo",
            "warehouse@techtrader.demo",
        ]
    }

    fn save_registered(&self, accounts: &[DemoAccount]) -> Result<(), io::Error> {
        if let Some(parent) = self.accounts_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&accounts[self.seeded..])?;
        fs::write(&self.accounts_path, content)
    }
}

fn load_registered(path: &Path) -> Vec<DemoAccount> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read demo accounts: {err}");
            return Vec::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), "failed to parse demo accounts: {err}");
        Vec::new()
    })
}

#[async_trait]
impl IdentityProvider for DemoIdentity {
    fn mode(&self) -> IdentityMode {
        IdentityMode::Demo
    }

    async fn restore(&self) -> Result<Option<User>, AuthError> {
        let Some(stored) = self.store.load() else {
            return Ok(None);
        };
        let accounts = self.accounts.lock().await;
        let user = accounts
            .iter()
            .find(|account| account.user.id == stored.user_id)
            .map(|account| account.user.clone());
        if user.is_none() {
            forget(&self.store);
        }
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let accounts = self.accounts.lock().await;
        let account = accounts
            .iter()
            .find(|account| account.user.email == email && account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        remember(
            &self.store,
            StoredSession::new(account.user.id.clone(), account.user.email.clone()),
        );
        tracing::info!(email = %account.user.email, role = account.user.role.label(), "signed in");
        Ok(account.user.clone())
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<User, AuthError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|account| account.user.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: format!("demo-{}", uuid::Uuid::new_v4()),
            email,
            full_name: request.full_name.trim().to_string(),
            role: Role::User,
        };
        accounts.push(DemoAccount {
            user: user.clone(),
            password: request.password,
        });
        if let Err(err) = self.save_registered(&accounts) {
            tracing::warn!(path = %self.accounts_path.display(), "failed to store demo account: {err}");
        }
        remember(
            &self.store,
            StoredSession::new(user.id.clone(), user.email.clone()),
        );
        tracing::info!(email = %user.email, "registered demo account");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        forget(&self.store);
        Ok(())
    }
}

/// Accounts managed by the hosted backend.
pub struct BackendIdentity {
    client: BackendClient,
    store: SessionStore,
}

impl BackendIdentity {
    pub fn new(client: BackendClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    async fn load_profile(&self, session: &AuthSession) -> Result<User, AuthError> {
        let row = self
            .client
            .profile(&session.access_token, &session.user.id)
            .await?
            .ok_or(AuthError::MissingProfile)?;
        Ok(User::from(row))
    }

    fn remember_session(&self, session: &AuthSession, user: &User) {
        remember(
            &self.store,
            StoredSession::new(user.id.clone(), user.email.clone())
                .with_tokens(session.access_token.clone(), session.refresh_token.clone()),
        );
    }
}

#[async_trait]
impl IdentityProvider for BackendIdentity {
    fn mode(&self) -> IdentityMode {
        IdentityMode::Hosted
    }

    async fn restore(&self) -> Result<Option<User>, AuthError> {
        let Some(stored) = self.store.load() else {
            return Ok(None);
        };
        let Some(access_token) = stored.access_token.clone() else {
            forget(&self.store);
            return Ok(None);
        };

        let auth_user = match self.client.current_user(&access_token).await {
            Ok(user) => user,
            Err(err) if matches!(err.status(), Some(401 | 403)) => {
                tracing::info!(email = %stored.email, "stored session no longer accepted");
                forget(&self.store);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let session = AuthSession {
            access_token,
            refresh_token: stored.refresh_token,
            user: auth_user,
        };
        self.load_profile(&session).await.map(Some)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let session = match self.client.sign_in(&email, password).await {
            Ok(session) => session,
            Err(err) if err.status() == Some(400) => return Err(AuthError::InvalidCredentials),
            Err(err) => return Err(err.into()),
        };
        let user = self.load_profile(&session).await?;
        self.remember_session(&session, &user);
        tracing::info!(email = %user.email, role = user.role.label(), "signed in");
        Ok(user)
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<User, AuthError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let full_name = request.full_name.trim().to_string();

        let session = match self
            .client
            .sign_up(&email, &request.password, &full_name)
            .await
        {
            Ok(session) => session,
            Err(err) if err.status() == Some(422) => return Err(AuthError::EmailTaken),
            Err(err) => return Err(err.into()),
        };

        let row = ProfileRow {
            id: session.user.id.clone(),
            email: email.clone(),
            full_name: Some(full_name),
            role: Some(Role::User.label().to_string()),
        };
        self.client
            .insert_profile(&session.access_token, &row)
            .await?;

        let user = User::from(row);
        self.remember_session(&session, &user);
        tracing::info!(email = %user.email, "registered account");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let stored = self.store.load();
        forget(&self.store);
        if let Some(token) = stored.and_then(|session| session.access_token) {
            self.client.sign_out(&token).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn demo_accounts_cover_every_role() {
        let dir = tempfile::tempdir().unwrap();
        let identity = DemoIdentity::new(store(&dir));

        let mut roles = Vec::new();
        for email in DemoIdentity::demo_emails() {
            roles.push(identity.sign_in(email, DEMO_PASSWORD).await.unwrap().role);
        }

        assert_eq!(roles, vec![Role::User, Role::Admin, Role::Warehouse]);
    }

    #[tokio::test]
    async fn demo_sign_in_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        DemoIdentity::new(store(&dir))
            .sign_in(" Admin@TechTrader.demo ", DEMO_PASSWORD)
            .await
            .unwrap();

        let restored = DemoIdentity::new(store(&dir)).restore().await.unwrap();

        assert_eq!(restored.map(|user| user.role), Some(Role::Admin));
    }

    #[tokio::test]
    async fn demo_wrong_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let identity = DemoIdentity::new(store(&dir));

        let err = identity
            .sign_in("user@techtrader.demo", "nope")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(identity.restore().await.unwrap(), None);
    }

    #[tokio::test]
    async fn demo_sign_up_creates_user_role_and_refuses_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let identity = DemoIdentity::new(store(&dir));
        let request = SignUpRequest {
            full_name: "Casey Park".into(),
            email: "casey@example.com".into(),
            password: "hunter22".into(),
        };

        let user = identity.sign_up(request.clone()).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.full_name, "Casey Park");

        let err = identity.sign_up(request).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn signed_up_account_restores_and_signs_in_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let user = DemoIdentity::new(store(&dir))
            .sign_up(SignUpRequest {
                full_name: "Casey Park".into(),
                email: "casey@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();

        let restarted = DemoIdentity::new(store(&dir));
        let restored = restarted.restore().await.unwrap();
        assert_eq!(restored.as_ref().map(|u| u.id.as_str()), Some(user.id.as_str()));
        assert_eq!(restored.map(|u| u.full_name), Some("Casey Park".to_string()));

        let again = restarted.sign_in("casey@example.com", "hunter22").await.unwrap();
        assert_eq!(again.id, user.id);
        assert!(matches!(
            restarted
                .sign_up(SignUpRequest {
                    full_name: "Other".into(),
                    email: "CASEY@example.com".into(),
                    password: "hunter22".into(),
                })
                .await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn sign_out_forgets_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let identity = DemoIdentity::new(store(&dir));
        identity
            .sign_in("warehouse@techtrader.demo", DEMO_PASSWORD)
            .await
            .unwrap();

        identity.sign_out().await.unwrap();

        assert_eq!(identity.restore().await.unwrap(), None);
    }

    #[test]
    fn sign_up_validation() {
        let valid = SignUpRequest {
            full_name: "A".into(),
            email: "a@b.co".into(),
            password: "123456".into(),
        };
        assert!(valid.validate().is_ok());

        let short = SignUpRequest {
            password: "12345".into(),
            ..valid.clone()
        };
        assert!(matches!(short.validate(), Err(AuthError::Invalid(_))));

        let bad_email = SignUpRequest {
            email: "nobody".into(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let nameless = SignUpRequest {
            full_name: "  ".into(),
            ..valid
        };
        assert!(nameless.validate().is_err());
    }

    #[tokio::test]
    async fn backend_sign_in_loads_profile_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "user": {"id": "u9", "email": "boss@b.c"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "u9",
                "email": "boss@b.c",
                "full_name": "Boss",
                "role": "admin"
            }])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = BackendClient::with_base_url(&format!("{}/", server.uri()), "anon").unwrap();
        let identity = BackendIdentity::new(client, store(&dir));

        let user = identity.sign_in("boss@b.c", "pw").await.unwrap();

        assert_eq!(user.role, Role::Admin);
        let stored = store(&dir).load().unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn backend_restore_drops_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "msg": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        store(&dir)
            .save(&StoredSession::new("u1".into(), "a@b.c".into()).with_tokens("old".into(), None))
            .unwrap();
        let client = BackendClient::with_base_url(&format!("{}/", server.uri()), "anon").unwrap();
        let identity = BackendIdentity::new(client, store(&dir));

        assert_eq!(identity.restore().await.unwrap(), None);
        assert_eq!(store(&dir).load(), None);
    }
}
