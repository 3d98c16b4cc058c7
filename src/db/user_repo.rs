// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cria um usuário. Recebe o executor para poder participar da mesma
    /// transação que cria o negócio (provisionamento do admin).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        business_id: Option<Uuid>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, business_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, business_id, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(business_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, business_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, business_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lista empregados. Com `business_id`, restringe ao negócio (modo admin);
    /// sem, lista todos (modo super admin).
    pub async fn list_employees(
        &self,
        business_id: Option<Uuid>,
    ) -> Result<Vec<User>, AppError> {
        let employees = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, business_id, created_at
            FROM users
            WHERE role = $1 AND ($2::uuid IS NULL OR business_id = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(Role::Employee)
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Update parcial de um empregado: campo ausente mantém o valor atual.
    pub async fn update_employee(
        &self,
        employee_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1 AND role = $5
            RETURNING id, name, email, password_hash, role, business_id, created_at
            "#,
        )
        .bind(employee_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Employee)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn delete_employee(
        &self,
        employee_id: Uuid,
        business_id: Option<Uuid>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1 AND role = $2 AND ($3::uuid IS NULL OR business_id = $3)
            "#,
        )
        .bind(employee_id)
        .bind(Role::Employee)
        .bind(business_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
