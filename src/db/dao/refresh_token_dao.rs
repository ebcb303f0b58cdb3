use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn create_refresh_token(
        &self,
        user_id: &Uuid,
        ttl_days: Option<i64>,
    ) -> DaoResult<refresh_token::Model> {
        let expires_at = Utc::now().fixed_offset()
            + Duration::days(ttl_days.unwrap_or(DEFAULT_REFRESH_TTL_DAYS));
        let model = refresh_token::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Revocation and expiry are left to the caller.
    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(refresh_token::Column::Token.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn revoke_token(&self, token: &str) -> DaoResult<()> {
        RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(
                refresh_token::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(refresh_token::Column::Token.eq(token))
            .exec(self.db())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::RefreshTokenDao;
    use crate::db::dao::DaoBase;
    use crate::db::entities::refresh_token;

    fn token_model(user_id: Uuid, token: &str) -> refresh_token::Model {
        let now = Utc::now().fixed_offset();
        refresh_token::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            token: token.to_string(),
            user_id,
            expires_at: now + Duration::days(30),
            revoked: false,
        }
    }

    #[tokio::test]
    async fn create_refresh_token_returns_inserted_row() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model(user_id, "tok")]])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let token = dao
            .create_refresh_token(&user_id, None)
            .await
            .expect("insert should succeed");
        assert_eq!(token.user_id, user_id);
        assert!(!token.revoked);
    }

    #[tokio::test]
    async fn find_by_token_returns_none_for_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token::Model>::new()])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let found = dao
            .find_by_token("unknown")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn revoke_token_runs_an_update() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        dao.revoke_token("tok").await.expect("update should succeed");
    }
}
