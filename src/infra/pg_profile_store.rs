// Postgres-backed profile store (direct connection to the Supabase database)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;

use crate::api::ProfileStore;
use crate::core::errors::AdminError;
use crate::core::models::{NewProfile, Profile, ProfileUpdate, Role, UserSummary};

/// Profiles joined with their accounts, newest account first.
/// The LEFT JOIN keeps profiles whose account is gone; they sort last.
const LIST_PROFILES_SQL: &str = "SELECT p.id::text AS id, p.full_name, p.role::text AS role,
        COALESCE(u.email, p.email) AS email, u.created_at, p.updated_at
 FROM public.profiles p
 LEFT JOIN auth.users u ON u.id = p.id
 ORDER BY u.created_at DESC NULLS LAST";

/// `$3` says whether `full_name` was supplied; `$4` may be NULL to clear it
const UPDATE_PROFILE_SQL: &str = "UPDATE public.profiles
 SET role = $2,
     full_name = CASE WHEN $3 THEN $4 ELSE full_name END
 WHERE id::text = $1";

/// Database row for `public.profiles`
#[derive(FromRow)]
struct ProfileRow {
    id: String,
    full_name: Option<String>,
    role: String,
    email: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Database row for the profiles ⋈ auth.users listing
#[derive(FromRow)]
struct UserSummaryRow {
    id: String,
    full_name: Option<String>,
    role: String,
    email: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn parse_role(raw: &str) -> Result<Role, AdminError> {
    raw.parse::<Role>()
        .map_err(|e| AdminError::upstream("Unexpected profile role in database", e))
}

fn db_error(what: &str, e: sqlx::Error) -> AdminError {
    error!(error = %e, operation = %what, "Database error");
    AdminError::upstream(format!("Failed to {}", what), e)
}

/// `ProfileStore` over a `PgPool`.
///
/// Expects `profiles.id` to be a uuid referencing `auth.users(id)` with
/// `on delete cascade`, and `profiles.role` to be text.
pub struct PgProfileStore {
    db_pool: PgPool,
}

impl PgProfileStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AdminError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id::text AS id, full_name, role::text AS role, email, updated_at
             FROM public.profiles
             WHERE id::text = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| db_error("fetch profile", e))?;

        row.map(|r| {
            Ok(Profile {
                role: parse_role(&r.role)?,
                id: r.id,
                full_name: r.full_name,
                email: r.email,
                updated_at: r.updated_at,
            })
        })
        .transpose()
    }

    async fn list_profiles_with_account_info(&self) -> Result<Vec<UserSummary>, AdminError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(LIST_PROFILES_SQL)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| db_error("list profiles", e))?;

        rows.into_iter()
            .map(|r| {
                Ok(UserSummary {
                    role: parse_role(&r.role)?,
                    id: r.id,
                    full_name: r.full_name,
                    email: r.email,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                })
            })
            .collect()
    }

    async fn upsert_profile(&self, profile: &NewProfile) -> Result<(), AdminError> {
        sqlx::query(
            "INSERT INTO public.profiles (id, full_name, role, email, updated_at)
             VALUES ($1::uuid, $2, $3, $4, NOW())
             ON CONFLICT (id) DO UPDATE
             SET full_name = EXCLUDED.full_name,
                 role = EXCLUDED.role,
                 email = EXCLUDED.email,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(&profile.id)
        .bind(&profile.full_name)
        .bind(profile.role.as_str())
        .bind(&profile.email)
        .execute(&self.db_pool)
        .await
        .map_err(|e| db_error("create profile", e))?;
        Ok(())
    }

    async fn update_profile(&self, id: &str, fields: &ProfileUpdate) -> Result<(), AdminError> {
        // Zero matched rows is not an error, same as a PostgREST PATCH
        sqlx::query(UPDATE_PROFILE_SQL)
            .bind(id)
            .bind(fields.role.as_str())
            .bind(fields.full_name.is_some())
            .bind(fields.full_name.clone().flatten())
            .execute(&self.db_pool)
            .await
            .map_err(|e| db_error("update profile", e))?;
        Ok(())
    }
}
