// src/db/schedule_repo.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ScheduleStore,
    models::{
        business::Service,
        scheduling::{
            Booking, BookingStatus, Client, ClientRef, NewBooking, NewClient, NewWindow,
            WorkingWindow,
        },
    },
};

// Código SQLSTATE da violação de constraint de exclusão do Postgres.
// É o que a `bookings_no_overlap` dispara num double-booking entre processos.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Clone)]
pub struct PgScheduleStore {
    pool: PgPool,
}

impl PgScheduleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Traduz a violação da constraint bookings_no_overlap em SlotTaken.
    // Qualquer escrita que (re)ocupa um horário passa por aqui.
    fn map_exclusion(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
                return AppError::SlotTaken;
            }
        }
        e.into()
    }

    async fn insert_client(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        client: &NewClient,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, created_at
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .fetch_one(&mut **tx)
        .await?;

        Ok(client)
    }

    // --- Métodos fora do trait, usados só pelo modo super admin ---

    pub async fn list_all_bookings(&self) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, employee_id, service_id, client_id, starts_at, ends_at,
                   client_name, client_email, client_phone, payment_method,
                   amount_paid, status, created_at
            FROM bookings
            ORDER BY starts_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn delete_booking(&self, booking_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn windows_for_day(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<WorkingWindow>, AppError> {
        let windows = sqlx::query_as::<_, WorkingWindow>(
            r#"
            SELECT id, employee_id, day, start_time, end_time, slot_minutes
            FROM working_windows
            WHERE employee_id = $1 AND day = $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(employee_id)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    async fn windows_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<WorkingWindow>, AppError> {
        let windows = sqlx::query_as::<_, WorkingWindow>(
            r#"
            SELECT id, employee_id, day, start_time, end_time, slot_minutes
            FROM working_windows
            WHERE employee_id = $1
            ORDER BY day ASC, start_time ASC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    async fn insert_window(&self, window: NewWindow) -> Result<WorkingWindow, AppError> {
        let window = sqlx::query_as::<_, WorkingWindow>(
            r#"
            INSERT INTO working_windows (employee_id, day, start_time, end_time, slot_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, day, start_time, end_time, slot_minutes
            "#,
        )
        .bind(window.employee_id)
        .bind(window.day)
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(window.slot_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(window)
    }

    async fn replace_window(
        &self,
        id: Uuid,
        employee_id: Uuid,
        window: NewWindow,
    ) -> Result<Option<WorkingWindow>, AppError> {
        let window = sqlx::query_as::<_, WorkingWindow>(
            r#"
            UPDATE working_windows
            SET day = $3, start_time = $4, end_time = $5, slot_minutes = $6
            WHERE id = $1 AND employee_id = $2
            RETURNING id, employee_id, day, start_time, end_time, slot_minutes
            "#,
        )
        .bind(id)
        .bind(employee_id)
        .bind(window.day)
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(window.slot_minutes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(window)
    }

    async fn bookings_in_range(
        &self,
        employee_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Booking>, AppError> {
        // Pega qualquer turno cujo intervalo cruza [from, to), não só os que
        // começam dentro: um turno que invade a janela por fora também ocupa.
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, employee_id, service_id, client_id, starts_at, ends_at,
                   client_name, client_email, client_phone, payment_method,
                   amount_paid, status, created_at
            FROM bookings
            WHERE employee_id = $1 AND starts_at < $3 AND ends_at > $2
            ORDER BY starts_at ASC
            "#,
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn find_service(&self, service_id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, description, price, duration_minutes, business_id, employee_id
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, created_at
            FROM clients
            WHERE email = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, created_at
            FROM clients
            WHERE phone = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn persist_booking(
        &self,
        client: ClientRef,
        booking: NewBooking,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let client_id = match client {
            ClientRef::Existing(id) => id,
            ClientRef::New(new_client) => Self::insert_client(&mut tx, &new_client).await?.id,
        };

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                employee_id, service_id, client_id, starts_at, ends_at,
                client_name, client_email, client_phone, payment_method,
                amount_paid, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, employee_id, service_id, client_id, starts_at, ends_at,
                      client_name, client_email, client_phone, payment_method,
                      amount_paid, status, created_at
            "#,
        )
        .bind(booking.employee_id)
        .bind(booking.service_id)
        .bind(client_id)
        .bind(booking.starts_at)
        .bind(booking.ends_at)
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.client_phone)
        .bind(&booking.payment_method)
        .bind(booking.amount_paid)
        .bind(booking.status)
        .fetch_one(&mut *tx)
        .await
        // Se dois processos passarem na validação ao mesmo tempo, a
        // constraint de exclusão derruba o segundo aqui. O rollback do
        // tx desfaz o cliente que tiver sido inserido junto.
        .map_err(Self::map_exclusion)?;

        tx.commit().await?;

        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        employee_scope: Option<Uuid>,
        status: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $3
            WHERE id = $1 AND ($2::uuid IS NULL OR employee_id = $2)
            RETURNING id, employee_id, service_id, client_id, starts_at, ends_at,
                      client_name, client_email, client_phone, payment_method,
                      amount_paid, status, created_at
            "#,
        )
        .bind(booking_id)
        .bind(employee_scope)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        // Reativar um turno cancelado dispara a constraint se o horário
        // já foi tomado por outro turno nesse meio-tempo.
        .map_err(Self::map_exclusion)?;

        Ok(booking)
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, employee_id, service_id, client_id, starts_at, ends_at,
                   client_name, client_email, client_phone, payment_method,
                   amount_paid, status, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn update_booking_time(
        &self,
        booking_id: Uuid,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET starts_at = $2, ends_at = $3
            WHERE id = $1
            RETURNING id, employee_id, service_id, client_id, starts_at, ends_at,
                      client_name, client_email, client_phone, payment_method,
                      amount_paid, status, created_at
            "#,
        )
        .bind(booking_id)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_exclusion)?;

        Ok(booking)
    }
}
