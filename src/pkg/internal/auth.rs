use sqlx::{
    prelude::{FromRow, Type},
    types::time::OffsetDateTime,
};
use uuid::Uuid;

use crate::{
    pkg::server::state::AppState,
    prelude::{Error, Result},
};

#[derive(Debug, Type)]
#[sqlx(type_name = "token_status", rename_all = "lowercase")]
pub enum TokenStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

#[derive(FromRow, Debug)]
pub struct AuthToken {
    pub token: Uuid,
    pub user_id: String,
    pub code: String,
    pub expiry: OffsetDateTime,
    pub status: TokenStatus,
}

#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl AuthToken {
    pub async fn check_token_validity(state: &AppState, token_str: &str) -> Result<User> {
        let pool = &*state.db_pool;
        let token = token_str
            .parse::<Uuid>()
            .map_err(|_| Error::Unauthorized)?;

        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT token, user_id, code, expiry, status
            FROM tokens
            WHERE token = $1
            AND status = $2
            AND expiry > now()
            "#,
        )
        .bind(token)
        .bind(TokenStatus::Verified)
        .fetch_optional(pool)
        .await?;
        match token {
            Some(token) => {
                tracing::debug!("token {} valid until {}", token.token, token.expiry);
                let user = sqlx::query_as::<_, User>(
                    "SELECT user_id, email, name FROM users WHERE user_id = $1",
                )
                .bind(&token.user_id)
                .fetch_one(pool)
                .await?;
                tracing::debug!("token resolved to {} <{}>", user.name, user.email);
                Ok(user)
            }
            None => Err(Error::Unauthorized),
        }
    }
}
