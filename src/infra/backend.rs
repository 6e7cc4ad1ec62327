//! Asynchronous client for the hosted backend's auth and table REST APIs.
//!
//! - Password sign-in, sign-up, session lookup and logout against `auth/v1`.
//! - Profile rows (name and role) from the `users` table under `rest/v1`.
//! - Device and part catalog rows from the `devices` and `parts` tables.
//! - Price history and orders with their line items.

use std::collections::HashMap;

use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Device, Order, OrderItem, Part, PriceHistory, Role, User};
use crate::infra::records::{
    DeviceRow, OrderItemRow, OrderRow, PartRow, PriceHistoryRow, RecordError,
};
use crate::util::config::BackendConfig;

const USER_AGENT: &str = concat!("tech-trader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("account created; confirm the email address before signing in")]
    ConfirmationRequired,
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Account as known to the auth service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens plus the account they were issued for.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Row of the `users` profile table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        let role = match row.role.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("admin") => Role::Admin,
            Some("warehouse") => Role::Warehouse,
            _ => Role::User,
        };
        let full_name = row
            .full_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| row.email.clone());
        Self {
            id: row.id,
            email: row.email,
            full_name,
            role,
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
}

/// Sign-up answers with a session when confirmation is off, or just the
/// account when it is on.
#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::with_base_url(config.url.as_str(), &config.anon_key)
    }

    pub fn with_base_url(base: &str, anon_key: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.to_string(),
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut url = self.url("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self
            .request(self.http.post(url), None)
            .json(&PasswordGrant { email, password });
        self.fetch_data(request).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, BackendError> {
        let url = self.url("auth/v1/signup")?;
        let request = self.request(self.http.post(url), None).json(&SignUpBody {
            email,
            password,
            data: SignUpMetadata { full_name },
        });
        let response: SignUpResponse = self.fetch_data(request).await?;
        match (response.access_token, response.user) {
            (Some(access_token), Some(user)) => Ok(AuthSession {
                access_token,
                refresh_token: response.refresh_token,
                user,
            }),
            _ => Err(BackendError::ConfirmationRequired),
        }
    }

    /// Resolves the account behind `access_token`.
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let url = self.url("auth/v1/user")?;
        self.fetch_data(self.request(self.http.get(url), Some(access_token)))
            .await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let url = self.url("auth/v1/logout")?;
        self.send(self.request(self.http.post(url), Some(access_token)))
            .await?;
        Ok(())
    }

    pub async fn profile(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Option<ProfileRow>, BackendError> {
        let mut url = self.url("rest/v1/users")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "id,email,full_name,role");
        let rows: Vec<ProfileRow> = self
            .fetch_data(self.request(self.http.get(url), Some(access_token)))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_profile(
        &self,
        access_token: &str,
        row: &ProfileRow,
    ) -> Result<(), BackendError> {
        let url = self.url("rest/v1/users")?;
        let request = self
            .request(self.http.post(url), Some(access_token))
            .header("Prefer", "return=minimal")
            .json(row);
        self.send(request).await?;
        Ok(())
    }

    /// Device catalog. Rows that fail to convert are skipped and logged.
    pub async fn fetch_devices(&self, access_token: Option<&str>) -> Result<Vec<Device>, BackendError> {
        let rows: Vec<DeviceRow> = self.fetch_table("devices", "brand.asc,model.asc", access_token).await?;
        Ok(convert_rows("devices", rows))
    }

    /// Parts catalog. Rows that fail to convert are skipped and logged.
    pub async fn fetch_parts(&self, access_token: Option<&str>) -> Result<Vec<Part>, BackendError> {
        let rows: Vec<PartRow> = self.fetch_table("parts", "name.asc", access_token).await?;
        Ok(convert_rows("parts", rows))
    }

    /// Price history, oldest first. `labels` maps item ids to display names;
    /// unknown items are labelled with their id.
    pub async fn fetch_price_history(
        &self,
        access_token: Option<&str>,
        labels: &HashMap<String, String>,
    ) -> Result<Vec<PriceHistory>, BackendError> {
        let rows: Vec<PriceHistoryRow> = self
            .fetch_table("price_history", "changed_at.asc", access_token)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let label = labels.get(&row.item_id).cloned().unwrap_or_else(|| row.item_id.clone());
                keep_valid("price_history", row.into_entry(label))
            })
            .collect())
    }

    /// Orders with their line items. `part_names` maps part ids to names.
    ///
    /// Customer names come from the `users` table; when that table cannot be
    /// read the customer's id stands in.
    pub async fn fetch_orders(
        &self,
        access_token: Option<&str>,
        part_names: &HashMap<String, String>,
    ) -> Result<Vec<Order>, BackendError> {
        let rows: Vec<OrderRow> = self.fetch_table("orders", "created_at.asc", access_token).await?;
        let item_rows: Vec<OrderItemRow> = self.fetch_table("order_items", "id.asc", access_token).await?;
        let customers: HashMap<String, String> = match self
            .fetch_table::<ProfileRow>("users", "email.asc", access_token)
            .await
        {
            Ok(profiles) => profiles
                .into_iter()
                .map(User::from)
                .map(|user| (user.id, user.full_name))
                .collect(),
            Err(err) => {
                tracing::warn!("customer names unavailable: {err}");
                HashMap::new()
            }
        };

        let mut items: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            let order_id = row.order_id.clone();
            let part_name = part_names.get(&row.part_id).cloned().unwrap_or_else(|| row.part_id.clone());
            if let Some(item) = keep_valid("order_items", row.into_item(part_name)) {
                items.entry(order_id).or_default().push(item);
            }
        }

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let customer = customers.get(&row.user_id).cloned().unwrap_or_else(|| row.user_id.clone());
                let lines = items.remove(&row.id).unwrap_or_default();
                keep_valid("orders", row.into_order(customer, lines))
            })
            .collect())
    }

    async fn fetch_table<T>(
        &self,
        table: &str,
        order: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.url(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", order);
        self.fetch_data(self.request(self.http.get(url), access_token))
            .await
    }

    fn request(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), %message, "backend request failed");
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_data<T>(&self, builder: RequestBuilder) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

fn convert_rows<R, T>(table: &str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = RecordError>,
{
    rows.into_iter()
        .filter_map(|row| keep_valid(table, T::try_from(row)))
        .collect()
}

fn keep_valid<T>(table: &str, converted: Result<T, RecordError>) -> Option<T> {
    match converted {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(table, "skipping row: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer) -> BackendClient {
        BackendClient::with_base_url(&format!("{}/", server.uri()), "anon-key").unwrap()
    }

    #[tokio::test]
    async fn sign_in_posts_password_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({"email": "a@b.c", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "refresh_token": "ref",
                "token_type": "bearer",
                "user": {"id": "u1", "email": "a@b.c"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client(&server).await.sign_in("a@b.c", "secret").await.unwrap();

        assert_eq!(session.access_token, "tok");
        assert_eq!(session.refresh_token.as_deref(), Some("ref"));
        assert_eq!(session.user.id, "u1");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .sign_in("a@b.c", "wrong")
            .await
            .unwrap_err();

        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_up_without_session_needs_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u2",
                "email": "new@b.c"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .sign_up("new@b.c", "secret1", "New Person")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::ConfirmationRequired));
    }

    #[tokio::test]
    async fn profile_lookup_uses_bearer_token_and_maps_role() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.u1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "u1",
                "email": "wh@b.c",
                "full_name": "Wendy Hale",
                "role": "warehouse"
            }])))
            .mount(&server)
            .await;

        let row = client(&server)
            .await
            .profile("tok", "u1")
            .await
            .unwrap()
            .unwrap();
        let user = User::from(row);

        assert_eq!(user.role, Role::Warehouse);
        assert_eq!(user.full_name, "Wendy Hale");
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let row = client(&server).await.profile("tok", "nobody").await.unwrap();

        assert_eq!(row, None);
    }

    #[tokio::test]
    async fn catalog_fetch_skips_rows_that_do_not_convert() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/devices"))
            .and(query_param("select", "*"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "d1",
                    "brand": "Apple",
                    "model": "MacBook Air M2",
                    "category": "MacBook",
                    "base_price": 1099.0,
                    "release_year": 2022,
                    "discontinued": false,
                    "updated_at": "2024-01-15T10:30:00Z"
                },
                {
                    "id": "d2",
                    "brand": "Apple",
                    "model": "Broken Row",
                    "category": "iPhone",
                    "base_price": 100.0,
                    "updated_at": "not a date"
                }
            ])))
            .mount(&server)
            .await;

        let devices = client(&server).await.fetch_devices(None).await.unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "d1");
    }

    #[tokio::test]
    async fn orders_are_assembled_from_items_and_customer_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "o1",
                    "user_id": "u1",
                    "status": "processing",
                    "priority": "high",
                    "total_amount": 79.98,
                    "shipping_address": "1 Main St",
                    "created_at": "2024-01-15T10:30:00Z"
                },
                {
                    "id": "o2",
                    "user_id": "u2",
                    "status": "lost",
                    "priority": "low",
                    "total_amount": 10.0,
                    "shipping_address": "2 Main St",
                    "created_at": "2024-01-16T10:30:00Z"
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/order_items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "i1",
                "order_id": "o1",
                "part_id": "p1",
                "quality": "premium",
                "quantity": 2,
                "unit_price": 39.99,
                "picked": true
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "u1",
                "email": "jane@b.c",
                "full_name": "Jane Doe",
                "role": "user"
            }])))
            .mount(&server)
            .await;

        let part_names = HashMap::from([("p1".to_string(), "Battery".to_string())]);
        let orders = client(&server).await.fetch_orders(None, &part_names).await.unwrap();

        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.customer_name, "Jane Doe");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].part_name, "Battery");
        assert!(order.all_picked());
        assert!(order.total_matches_items());
    }

    #[tokio::test]
    async fn price_history_is_labelled_and_bad_rows_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/price_history"))
            .and(query_param("order", "changed_at.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "h1",
                    "item_type": "device",
                    "item_id": "d1",
                    "old_price": 899.0,
                    "new_price": 849.0,
                    "changed_at": "2024-01-15T10:30:00Z",
                    "changed_by": "admin@b.c"
                },
                {
                    "id": "h2",
                    "item_type": "bundle",
                    "item_id": "x",
                    "old_price": 1.0,
                    "new_price": 2.0,
                    "changed_at": "2024-01-15T10:30:00Z",
                    "changed_by": "admin@b.c"
                }
            ])))
            .mount(&server)
            .await;

        let labels = HashMap::from([("d1".to_string(), "Apple iPhone 14 Pro".to_string())]);
        let entries = client(&server)
            .await
            .fetch_price_history(None, &labels)
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Apple iPhone 14 Pro");
        assert_eq!(entries[0].new_price, 849.0);
    }

    #[test]
    fn unknown_or_missing_role_maps_to_user() {
        let row = ProfileRow {
            id: "u".into(),
            email: "x@y.z".into(),
            full_name: None,
            role: Some("superuser".into()),
        };
        let user = User::from(row);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.full_name, "x@y.z");
    }
}
