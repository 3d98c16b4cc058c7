// src/services/booking.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use uuid::Uuid;

use crate::{
    common::{error::AppError, intervals::Interval},
    db::ScheduleStore,
    models::scheduling::{
        Booking, BookingStatus, ClientRef, CreateBookingPayload, NewBooking, NewClient,
    },
};

/// Validador/escritor de reservas.
///
/// A checagem de sobreposição (ler turnos, depois gravar) não é atômica por
/// natureza, então o serviço serializa as reservas POR EMPREGADO: cada
/// empregado tem um mutex próprio, segurado do início da validação até o
/// commit. Duas requisições concorrentes pro mesmo horário entram em fila e
/// a segunda falha com `SlotTaken`. A constraint de exclusão do Postgres
/// cobre o caso de mais de um processo.
pub struct BookingService<S> {
    store: Arc<S>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: ScheduleStore> BookingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn employee_lock(&self, employee_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Remove a entrada do registro quando só o mapa ainda segura o Arc.
    /// A rota pública aceita qualquer uuid de empregado, então o mapa não
    /// pode acumular uma entrada por uuid visto.
    async fn prune_employee_lock(&self, employee_id: Uuid) {
        let mut locks = self.locks.lock().await;
        if locks
            .get(&employee_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&employee_id);
        }
    }

    #[cfg(test)]
    pub async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Fluxo completo de reserva. Toda validação acontece antes de qualquer
    /// escrita; em caso de erro nada é persistido.
    pub async fn create(&self, payload: CreateBookingPayload) -> Result<Booking, AppError> {
        let employee_id = payload.employee_id;
        let lock = self.employee_lock(employee_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.validate_and_persist(payload).await
        };
        drop(lock);
        self.prune_employee_lock(employee_id).await;
        result
    }

    /// Move um turno para outro horário. A revalidação é a mesma da criação,
    /// fora o próprio turno; a duração gravada é preservada.
    pub async fn reschedule(
        &self,
        booking_id: Uuid,
        employee_scope: Option<Uuid>,
        starts_at: NaiveDateTime,
    ) -> Result<Booking, AppError> {
        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or(AppError::BookingNotFound)?;
        if employee_scope.is_some_and(|e| booking.employee_id != e) {
            return Err(AppError::BookingNotFound);
        }

        let employee_id = booking.employee_id;
        let lock = self.employee_lock(employee_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.validate_and_move(&booking, starts_at).await
        };
        drop(lock);
        self.prune_employee_lock(employee_id).await;
        result
    }

    async fn validate_and_persist(
        &self,
        payload: CreateBookingPayload,
    ) -> Result<Booking, AppError> {
        // 1. O empregado precisa ter agenda no dia pedido.
        let day = payload.starts_at.date();
        let windows = self
            .store
            .windows_for_day(payload.employee_id, day)
            .await?;
        if windows.is_empty() {
            return Err(AppError::NoScheduleForDay);
        }

        // 2. O serviço define a duração do turno. Um serviço de outro
        //    empregado não é reservável aqui.
        let service = self
            .store
            .find_service(payload.service_id)
            .await?
            .ok_or(AppError::ServiceNotFound)?;
        if service.employee_id != payload.employee_id {
            return Err(AppError::ServiceNotFound);
        }

        // 3. Fim do turno = início + duração do serviço reservado.
        let requested =
            Interval::from_start(payload.starts_at, i64::from(service.duration_minutes));

        // 4. O intervalo inteiro tem que caber em alguma janela do dia.
        //    Bordas valem: terminar exatamente no fim da janela é aceito.
        let window = windows
            .iter()
            .find(|w| w.interval().contains(&requested))
            .ok_or(AppError::OutOfHours)?;

        // 5. Nenhum turno não-cancelado pode cruzar o intervalo pedido.
        let range = window.interval();
        let existing = self
            .store
            .bookings_in_range(payload.employee_id, range.start, range.end)
            .await?;
        let taken = existing
            .iter()
            .any(|b| b.occupies_slot() && b.interval().overlaps(&requested));
        if taken {
            return Err(AppError::SlotTaken);
        }

        // 6. Resolve o cliente: e-mail tem prioridade sobre telefone;
        //    sem match, o cliente nasce junto com o turno.
        let client = self.resolve_client(&payload).await?;

        // 7. Escrita única: cliente (se novo) + turno na mesma transação.
        let new_booking = NewBooking {
            employee_id: payload.employee_id,
            service_id: payload.service_id,
            starts_at: requested.start,
            ends_at: requested.end,
            client_name: payload.client_name,
            client_email: payload.client_email,
            client_phone: payload.client_phone,
            payment_method: payload.payment_method,
            amount_paid: payload.amount_paid,
            status: payload.status.unwrap_or(BookingStatus::Pending),
        };

        self.store.persist_booking(client, new_booking).await
    }

    async fn validate_and_move(
        &self,
        booking: &Booking,
        starts_at: NaiveDateTime,
    ) -> Result<Booking, AppError> {
        let day = starts_at.date();
        let windows = self
            .store
            .windows_for_day(booking.employee_id, day)
            .await?;
        if windows.is_empty() {
            return Err(AppError::NoScheduleForDay);
        }

        let duration = booking.ends_at - booking.starts_at;
        let requested = Interval::new(starts_at, starts_at + duration);

        let window = windows
            .iter()
            .find(|w| w.interval().contains(&requested))
            .ok_or(AppError::OutOfHours)?;

        let range = window.interval();
        let existing = self
            .store
            .bookings_in_range(booking.employee_id, range.start, range.end)
            .await?;
        let taken = existing
            .iter()
            .any(|b| b.id != booking.id && b.occupies_slot() && b.interval().overlaps(&requested));
        if taken {
            return Err(AppError::SlotTaken);
        }

        self.store
            .update_booking_time(booking.id, requested.start, requested.end)
            .await?
            .ok_or(AppError::BookingNotFound)
    }

    async fn resolve_client(
        &self,
        payload: &CreateBookingPayload,
    ) -> Result<ClientRef, AppError> {
        if let Some(email) = payload.client_email.as_deref() {
            if let Some(client) = self.store.find_client_by_email(email).await? {
                return Ok(ClientRef::Existing(client.id));
            }
        }

        if let Some(phone) = payload.client_phone.as_deref() {
            if let Some(client) = self.store.find_client_by_phone(phone).await? {
                return Ok(ClientRef::Existing(client.id));
            }
        }

        Ok(ClientRef::New(NewClient {
            name: payload.client_name.clone(),
            email: payload.client_email.clone(),
            phone: payload.client_phone.clone(),
        }))
    }
}
