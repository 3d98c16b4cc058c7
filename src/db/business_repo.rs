// src/db/business_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::business::{Business, Service},
};

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  NEGÓCIOS
    // =========================================================================

    pub async fn create_business<'e, E>(
        &self,
        executor: E,
        name: &str,
        alias: &str,
        address: &str,
        province: &str,
    ) -> Result<Business, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let business = sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (name, alias, address, province)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, alias, address, province, owner_id, created_at
            "#,
        )
        .bind(name)
        .bind(alias)
        .bind(address)
        .bind(province)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::AliasAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(business)
    }

    pub async fn set_owner<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE businesses SET owner_id = $2 WHERE id = $1")
            .bind(business_id)
            .bind(owner_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_businesses(&self) -> Result<Vec<Business>, AppError> {
        let businesses = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, alias, address, province, owner_id, created_at
            FROM businesses
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(businesses)
    }

    /// Update parcial: campo ausente mantém o valor atual.
    pub async fn update_business(
        &self,
        business_id: Uuid,
        name: Option<&str>,
        alias: Option<&str>,
        address: Option<&str>,
        province: Option<&str>,
    ) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET name = COALESCE($2, name),
                alias = COALESCE($3, alias),
                address = COALESCE($4, address),
                province = COALESCE($5, province)
            WHERE id = $1
            RETURNING id, name, alias, address, province, owner_id, created_at
            "#,
        )
        .bind(business_id)
        .bind(name)
        .bind(alias)
        .bind(address)
        .bind(province)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::AliasAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(business)
    }

    pub async fn delete_business(&self, business_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  SERVIÇOS
    // =========================================================================

    pub async fn create_service(
        &self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        duration_minutes: i32,
        business_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, description, price, duration_minutes, business_id, employee_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, duration_minutes, business_id, employee_id
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .bind(business_id)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, description, price, duration_minutes, business_id, employee_id
            FROM services
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn update_service(
        &self,
        service_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        duration_minutes: Option<i32>,
    ) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                duration_minutes = COALESCE($5, duration_minutes)
            WHERE id = $1
            RETURNING id, name, description, price, duration_minutes, business_id, employee_id
            "#,
        )
        .bind(service_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn delete_service(&self, service_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
