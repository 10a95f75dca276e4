use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::now_timestamp;
use crate::entities::{access_tokens, prelude::*};

use super::user::User;

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issues a new bearer token for `user_id` and returns it.
    pub async fn issue(&self, user_id: i32, name: &str) -> Result<String> {
        let token = generate_token();

        access_tokens::ActiveModel {
            user_web_id: Set(user_id),
            name: Set(name.to_string()),
            token: Set(token.clone()),
            last_used_at: Set(None),
            created_at: Set(now_timestamp()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert access token")?;

        Ok(token)
    }

    /// Resolves a token to its owner and records the use.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>> {
        let found = AccessTokens::find()
            .filter(access_tokens::Column::Token.eq(token))
            .find_also_related(UserWeb)
            .one(&self.conn)
            .await
            .context("Failed to query access token")?;

        let Some((token_row, Some(user))) = found else {
            return Ok(None);
        };

        AccessTokens::update_many()
            .col_expr(
                access_tokens::Column::LastUsedAt,
                Expr::value(now_timestamp()),
            )
            .filter(access_tokens::Column::Id.eq(token_row.id))
            .exec(&self.conn)
            .await
            .context("Failed to touch access token")?;

        Ok(Some(User::from(user)))
    }

    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = AccessTokens::delete_many()
            .filter(access_tokens::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to delete access token")?;
        Ok(result.rows_affected > 0)
    }
}

/// Generate a random bearer token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
