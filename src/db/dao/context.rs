use sea_orm::DatabaseConnection;

use super::{DaoBase, DonorProfileDao, RefreshTokenDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        UserDao::new(&self.db)
    }

    pub fn donor_profile(&self) -> DonorProfileDao {
        DonorProfileDao::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        RefreshTokenDao::new(&self.db)
    }
}
