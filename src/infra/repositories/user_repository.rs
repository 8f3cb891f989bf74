//! User repository - Credential Store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::base::Executor;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, User, UserRole};
use crate::errors::{AppError, AppResult, FieldError};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user with the default role
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Change the role of the named user. `None` if there is no such user.
    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<Option<User>>;
}

/// SeaORM-backed user repository.
pub struct UserStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> UserStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> UserRepository for UserStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.connection())
            .await
            .map_err(map_insert_error)?;

        Ok(User::from(model))
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(Some(User::from(model)))
    }
}

/// A concurrent registration can slip past the existence check; the unique
/// index still rejects it and the caller sees a validation failure.
fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err().and_then(taken_fields) {
        Some(taken) => taken,
        None => AppError::from(err),
    }
}

/// Fields named by a unique violation. Postgres names the constraints
/// `users_username_key` and `users_email_key`; anything else reports both.
fn taken_fields(sql_err: SqlErr) -> Option<AppError> {
    let SqlErr::UniqueConstraintViolation(message) = sql_err else {
        return None;
    };

    let email = FieldError::new("email", "Email is already registered");
    let username = FieldError::new("username", "Username is already taken");
    let fields = if message.contains("users_email_key") {
        vec![email]
    } else if message.contains("users_username_key") {
        vec![username]
    } else {
        vec![email, username]
    };

    Some(AppError::Validation(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn violation(constraint: &str) -> SqlErr {
        SqlErr::UniqueConstraintViolation(format!(
            "duplicate key value violates unique constraint \"{}\"",
            constraint
        ))
    }

    #[test]
    fn test_email_race_reported_under_email() {
        let err = taken_fields(violation("users_email_key")).unwrap();
        assert_eq!(field_names(err), vec!["email"]);
    }

    #[test]
    fn test_username_race_reported_under_username() {
        let err = taken_fields(violation("users_username_key")).unwrap();
        assert_eq!(field_names(err), vec!["username"]);
    }

    #[test]
    fn test_unknown_constraint_reports_both() {
        let err = taken_fields(violation("users_pkey")).unwrap();
        assert_eq!(field_names(err), vec!["email", "username"]);
    }

    #[test]
    fn test_foreign_key_violation_is_not_a_taken_field() {
        let sql_err = SqlErr::ForeignKeyConstraintViolation("fk".to_string());
        assert!(taken_fields(sql_err).is_none());
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let err = map_insert_error(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_set_role_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = UserStore::new(db).set_role("ghost", UserRole::Admin).await.unwrap();

        assert!(result.is_none());
    }
}
