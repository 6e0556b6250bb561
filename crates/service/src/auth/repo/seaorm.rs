use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::AuthUser;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| AuthUser { id: u.id, email: u.email, role: u.role }))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
        use sea_orm::EntityTrait;
        let res = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| u.password_hash))
    }

    async fn create_user(&self, email: &str, password_hash: &str, role: &str) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, email, password_hash, role)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                // Concurrent registration with the same email loses to the
                // unique index after the pre-check passed.
                models::errors::ModelError::Conflict(_) => AuthError::Conflict,
                other => AuthError::Repository(other.to_string()),
            })?;
        Ok(AuthUser { id: created.id, email: created.email, role: created.role })
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        models::user::hard_delete(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn donor_document_exists(&self, document: &str) -> Result<bool, AuthError> {
        let res = models::donor::find_by_document(&self.db, document)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.is_some())
    }

    async fn create_donor_profile(
        &self,
        document: &str,
        name: &str,
        email: &str,
        user_id: Uuid,
    ) -> Result<(), AuthError> {
        models::donor::create(&self.db, document, name, email, Some(user_id))
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                models::errors::ModelError::Conflict(_) => AuthError::DocumentConflict,
                other => AuthError::Repository(other.to_string()),
            })?;
        Ok(())
    }

    async fn create_entity_profile(
        &self,
        name: &str,
        email: &str,
        location: Option<String>,
        city: Option<String>,
        department: Option<String>,
        user_id: Uuid,
    ) -> Result<(), AuthError> {
        models::medical_entity::create(&self.db, name, email, location, city, department, Some(user_id))
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }
}
