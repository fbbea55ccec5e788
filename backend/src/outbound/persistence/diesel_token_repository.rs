//! PostgreSQL-backed `TokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenRepository, TokenRepositoryError};
use crate::domain::{TokenHash, TokenRecord, TokenScope, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTokenRow, TokenRow};
use super::pool::DbPool;
use super::schema::tokens;

/// Diesel-backed implementation of the token repository port.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> TokenRepositoryError {
    map_diesel_error(
        error,
        TokenRepositoryError::query,
        TokenRepositoryError::connection,
    )
}

fn row_to_record(row: TokenRow) -> Result<TokenRecord, TokenRepositoryError> {
    let hash = TokenHash::from_slice(&row.hash)
        .ok_or_else(|| TokenRepositoryError::query("stored token hash has the wrong length"))?;
    let scope = row
        .scope
        .parse::<TokenScope>()
        .map_err(|err| TokenRepositoryError::query(err.to_string()))?;
    Ok(TokenRecord {
        hash,
        user_id: UserId::new(row.user_id),
        expiry: row.expiry,
        scope,
    })
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn insert(&self, token: &TokenRecord) -> Result<(), TokenRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TokenRepositoryError::connection))?;

        let row = NewTokenRow {
            hash: token.hash.as_bytes(),
            user_id: token.user_id.get(),
            expiry: token.expiry,
            scope: token.scope.as_str(),
        };

        diesel::insert_into(tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_hash_scope_not_expired(
        &self,
        hash: &TokenHash,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<TokenRecord>, TokenRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TokenRepositoryError::connection))?;

        let row = tokens::table
            .filter(tokens::hash.eq(&hash.as_bytes()[..]))
            .filter(tokens::scope.eq(scope.as_str()))
            .filter(tokens::expiry.gt(now))
            .select(TokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_record).transpose()
    }

    async fn delete_all_for_user(
        &self,
        user_id: UserId,
        scope: TokenScope,
    ) -> Result<u64, TokenRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TokenRepositoryError::connection))?;

        let deleted = diesel::delete(
            tokens::table
                .filter(tokens::user_id.eq(user_id.get()))
                .filter(tokens::scope.eq(scope.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;

        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
