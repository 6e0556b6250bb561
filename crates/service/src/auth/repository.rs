use async_trait::async_trait;
use uuid::Uuid;

use super::domain::AuthUser;
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError>;
    async fn create_user(&self, email: &str, password_hash: &str, role: &str) -> Result<AuthUser, AuthError>;
    /// Compensating delete when profile creation fails after the user row exists.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError>;

    async fn donor_document_exists(&self, document: &str) -> Result<bool, AuthError>;
    async fn create_donor_profile(
        &self,
        document: &str,
        name: &str,
        email: &str,
        user_id: Uuid,
    ) -> Result<(), AuthError>;
    async fn create_entity_profile(
        &self,
        name: &str,
        email: &str,
        location: Option<String>,
        city: Option<String>,
        department: Option<String>,
        user_id: Uuid,
    ) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, (AuthUser, String)>>, // key: email, value: (user, hash)
        donor_documents: Mutex<Vec<String>>,
        entity_names: Mutex<Vec<String>>,
        pub fail_donor_profile: bool,
    }

    impl MockAuthRepository {
        pub fn failing_donor_profiles() -> Self {
            Self { fail_donor_profile: true, ..Default::default() }
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).map(|(u, _)| u.clone()))
        }

        async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|(u, _)| u.id == user_id).map(|(_, h)| h.clone()))
        }

        async fn create_user(
            &self,
            email: &str,
            password_hash: &str,
            role: &str,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser { id: Uuid::new_v4(), email: email.to_string(), role: role.to_string() };
            users.insert(email.to_string(), (user.clone(), password_hash.to_string()));
            Ok(user)
        }

        async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
            let mut users = self.users.lock().unwrap();
            users.retain(|_, (u, _)| u.id != user_id);
            Ok(())
        }

        async fn donor_document_exists(&self, document: &str) -> Result<bool, AuthError> {
            Ok(self.donor_documents.lock().unwrap().iter().any(|d| d == document))
        }

        async fn create_donor_profile(
            &self,
            document: &str,
            _name: &str,
            _email: &str,
            _user_id: Uuid,
        ) -> Result<(), AuthError> {
            if self.fail_donor_profile {
                return Err(AuthError::Repository("profile insert failed".into()));
            }
            self.donor_documents.lock().unwrap().push(document.to_string());
            Ok(())
        }

        async fn create_entity_profile(
            &self,
            name: &str,
            _email: &str,
            _location: Option<String>,
            _city: Option<String>,
            _department: Option<String>,
            _user_id: Uuid,
        ) -> Result<(), AuthError> {
            self.entity_names.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }
}
