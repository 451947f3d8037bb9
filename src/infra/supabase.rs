// Supabase (GoTrue + PostgREST) adapter for both collaborator traits

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::admin::directory::join_profiles_with_accounts;
use crate::api::{IdentityProvider, ProfileStore};
use crate::core::errors::AdminError;
use crate::core::models::{Account, CallerIdentity, NewProfile, Profile, ProfileUpdate, UserSummary};

/// Rows requested per page from the admin users API and from PostgREST.
/// Hosted projects cap PostgREST responses at 1000 rows.
const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
struct AdminUsersPage {
    #[serde(default)]
    users: Vec<Account>,
}

/// Client for a Supabase project, authenticated with the service role key
///
/// Implements `IdentityProvider` against the auth admin API and
/// `ProfileStore` against PostgREST. Built once and shared by all requests.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    service_role_key: String,
    page_size: usize,
}

impl SupabaseClient {
    pub fn new(project_url: &str, service_role_key: String, timeout_secs: u64) -> Result<Self, AdminError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AdminError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        // Trailing slash so relative joins keep any path prefix
        let base = format!("{}/", project_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| AdminError::ConfigurationError(format!("Invalid Supabase URL '{}': {}", project_url, e)))?;

        Ok(Self {
            client,
            base_url,
            service_role_key,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the rows requested per page when listing
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, AdminError> {
        self.base_url
            .join(path)
            .map_err(|e| AdminError::upstream(format!("Invalid endpoint {}", path), e))
    }

    /// `/rest/v1/profiles?id=eq.{id}`
    fn profile_endpoint(&self, id: &str) -> Result<Url, AdminError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        Ok(url)
    }

    /// `/auth/v1/admin/users/{id}`
    fn admin_user_endpoint(&self, id: &str) -> Result<Url, AdminError> {
        let mut url = self.endpoint("auth/v1/admin/users")?;
        url.path_segments_mut()
            .map_err(|_| AdminError::upstream_message("Supabase URL cannot be a base"))?
            .push(id);
        Ok(url)
    }

    /// Attach the service role credentials
    fn privileged(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, AdminError> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, operation = %what, "Supabase request failed");
            AdminError::upstream(format!("Failed to {}", what), e)
        })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, what).await);
        }
        Ok(response)
    }

    /// Turn a non-success response into an `Upstream` error carrying the
    /// provider's own message as details
    async fn error_from_response(response: Response, what: &str) -> AdminError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        error!(status = %status, body = %text, operation = %what, "Supabase error response");
        AdminError::upstream(format!("Failed to {}", what), extract_error_message(&text, status.as_u16()))
    }

    /// Every account, walking the admin API page by page
    ///
    /// Stops once `x-total-count` rows are collected, or on a short page when
    /// the header is absent.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AdminError> {
        let mut accounts = Vec::new();
        let mut page = 1usize;
        loop {
            let mut url = self.endpoint("auth/v1/admin/users")?;
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &self.page_size.to_string());

            let response = self
                .send(self.privileged(self.client.get(url)), "list accounts")
                .await?;
            let total = header_usize(&response, "x-total-count");
            let batch: AdminUsersPage = response
                .json()
                .await
                .map_err(|e| AdminError::upstream("Failed to list accounts", e))?;

            let fetched = batch.users.len();
            accounts.extend(batch.users);
            if !has_more(accounts.len(), fetched, total, self.page_size) {
                break;
            }
            page += 1;
        }
        debug!(count = accounts.len(), "Fetched accounts from Supabase");
        Ok(accounts)
    }

    /// Every profile row, paged with `offset`/`limit`
    ///
    /// Asks for an exact count so a server-side row cap below the page size
    /// still leads to the next page being fetched.
    async fn fetch_profiles(&self) -> Result<Vec<Profile>, AdminError> {
        let mut profiles: Vec<Profile> = Vec::new();
        loop {
            let mut url = self.endpoint("rest/v1/profiles")?;
            url.query_pairs_mut()
                .append_pair("select", "*")
                .append_pair("order", "id.asc")
                .append_pair("offset", &profiles.len().to_string())
                .append_pair("limit", &self.page_size.to_string());

            let builder = self
                .privileged(self.client.get(url))
                .header("Prefer", "count=exact");
            let response = self.send(builder, "list profiles").await?;
            let total = response
                .headers()
                .get("content-range")
                .and_then(|v| v.to_str().ok())
                .and_then(content_range_total);
            let batch: Vec<Profile> = response
                .json()
                .await
                .map_err(|e| AdminError::upstream("Failed to list profiles", e))?;

            let fetched = batch.len();
            profiles.extend(batch);
            if !has_more(profiles.len(), fetched, total, self.page_size) {
                break;
            }
        }
        debug!(count = profiles.len(), "Fetched profiles from Supabase");
        Ok(profiles)
    }
}

/// Whether another page should be requested after receiving `fetched` rows
fn has_more(collected: usize, fetched: usize, total: Option<usize>, page_size: usize) -> bool {
    if fetched == 0 {
        return false;
    }
    match total {
        Some(total) => collected < total,
        None => fetched >= page_size,
    }
}

fn header_usize(response: &Response, name: &str) -> Option<usize> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Total from a PostgREST `Content-Range` value such as `0-999/2500`;
/// `None` when the total is `*`
fn content_range_total(value: &str) -> Option<usize> {
    value.split_once('/')?.1.trim().parse().ok()
}

/// Pull a human-readable message out of a GoTrue/PostgREST error body
fn extract_error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn verify_token(&self, token: &str) -> Result<Option<CallerIdentity>, AdminError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .client
            .get(url)
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AdminError::upstream("Failed to verify token", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            debug!(status = %status, "Token rejected by Supabase");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response, "verify token").await);
        }

        let caller: CallerIdentity = response
            .json()
            .await
            .map_err(|e| AdminError::upstream("Failed to verify token", e))?;
        Ok(Some(caller))
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        pre_verified: bool,
    ) -> Result<Account, AdminError> {
        let url = self.endpoint("auth/v1/admin/users")?;
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "email_confirm": pre_verified,
        });

        let response = self
            .send(self.privileged(self.client.post(url)).json(&body), "create account")
            .await?;
        let account: Account = response
            .json()
            .await
            .map_err(|e| AdminError::upstream("Failed to create account", e))?;

        info!(account_id = %account.id, "Supabase account created");
        Ok(account)
    }

    async fn delete_account(&self, id: &str) -> Result<(), AdminError> {
        let url = self.admin_user_endpoint(id)?;
        self.send(self.privileged(self.client.delete(url)), "delete account")
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AdminError> {
        let mut url = self.profile_endpoint(id)?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .send(self.privileged(self.client.get(url)), "fetch profile")
            .await?;
        let rows: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| AdminError::upstream("Failed to fetch profile", e))?;
        Ok(rows.into_iter().next())
    }

    async fn list_profiles_with_account_info(&self) -> Result<Vec<UserSummary>, AdminError> {
        let profiles = self.fetch_profiles().await?;
        let accounts = self.list_accounts().await?;
        Ok(join_profiles_with_accounts(profiles, &accounts))
    }

    async fn upsert_profile(&self, profile: &NewProfile) -> Result<(), AdminError> {
        let url = self.endpoint("rest/v1/profiles")?;
        let builder = self
            .privileged(self.client.post(url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(profile);
        self.send(builder, "create profile").await?;
        Ok(())
    }

    async fn update_profile(&self, id: &str, fields: &ProfileUpdate) -> Result<(), AdminError> {
        let url = self.profile_endpoint(id)?;
        let builder = self
            .privileged(self.client.patch(url))
            .header("Prefer", "return=minimal")
            .json(fields);
        self.send(builder, "update profile").await?;
        Ok(())
    }
}
