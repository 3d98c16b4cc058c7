// src/db/memory.rs
//
// Store em memória para os testes do núcleo de agendamento.
// Emula o comportamento do Postgres, incluindo a constraint de exclusão
// que derruba inserções sobrepostas.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, intervals::Interval},
    db::store::ScheduleStore,
    models::{
        business::Service,
        scheduling::{
            Booking, BookingStatus, Client, ClientRef, NewBooking, NewWindow, WorkingWindow,
        },
    },
};

#[derive(Default)]
struct MemoryState {
    windows: Vec<WorkingWindow>,
    bookings: Vec<Booking>,
    services: Vec<Service>,
    clients: Vec<Client>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_window(&self, window: NewWindow) -> WorkingWindow {
        let stored = WorkingWindow {
            id: Uuid::new_v4(),
            employee_id: window.employee_id,
            day: window.day,
            start_time: window.start_time,
            end_time: window.end_time,
            slot_minutes: window.slot_minutes,
        };
        self.state.lock().unwrap().windows.push(stored.clone());
        stored
    }

    pub fn seed_service(&self, service: Service) {
        self.state.lock().unwrap().services.push(service);
    }

    pub fn booking_count(&self) -> usize {
        self.state.lock().unwrap().bookings.len()
    }

    pub fn client_count(&self) -> usize {
        self.state.lock().unwrap().clients.len()
    }

    pub fn all_bookings(&self) -> Vec<Booking> {
        self.state.lock().unwrap().bookings.clone()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn windows_for_day(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<WorkingWindow>, AppError> {
        let state = self.state.lock().unwrap();
        let mut windows: Vec<_> = state
            .windows
            .iter()
            .filter(|w| w.employee_id == employee_id && w.day == day)
            .cloned()
            .collect();
        windows.sort_by_key(|w| w.start_time);
        Ok(windows)
    }

    async fn windows_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<WorkingWindow>, AppError> {
        let state = self.state.lock().unwrap();
        let mut windows: Vec<_> = state
            .windows
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .cloned()
            .collect();
        windows.sort_by_key(|w| (w.day, w.start_time));
        Ok(windows)
    }

    async fn insert_window(&self, window: NewWindow) -> Result<WorkingWindow, AppError> {
        Ok(self.seed_window(window))
    }

    async fn replace_window(
        &self,
        id: Uuid,
        employee_id: Uuid,
        window: NewWindow,
    ) -> Result<Option<WorkingWindow>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(stored) = state
            .windows
            .iter_mut()
            .find(|w| w.id == id && w.employee_id == employee_id)
        else {
            return Ok(None);
        };

        stored.day = window.day;
        stored.start_time = window.start_time;
        stored.end_time = window.end_time;
        stored.slot_minutes = window.slot_minutes;
        Ok(Some(stored.clone()))
    }

    async fn bookings_in_range(
        &self,
        employee_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Booking>, AppError> {
        let range = Interval::new(from, to);
        let state = self.state.lock().unwrap();
        let mut bookings: Vec<_> = state
            .bookings
            .iter()
            .filter(|b| b.employee_id == employee_id && b.interval().overlaps(&range))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.starts_at);
        Ok(bookings)
    }

    async fn find_service(&self, service_id: Uuid) -> Result<Option<Service>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.services.iter().find(|s| s.id == service_id).cloned())
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .clients
            .iter()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .clients
            .iter()
            .find(|c| c.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn persist_booking(
        &self,
        client: ClientRef,
        booking: NewBooking,
    ) -> Result<Booking, AppError> {
        let mut state = self.state.lock().unwrap();

        // Mesmo papel da constraint bookings_no_overlap do Postgres.
        let candidate = Interval::new(booking.starts_at, booking.ends_at);
        let collision = state.bookings.iter().any(|b| {
            b.employee_id == booking.employee_id
                && b.occupies_slot()
                && b.interval().overlaps(&candidate)
        });
        if collision && booking.status != BookingStatus::Cancelled {
            return Err(AppError::SlotTaken);
        }

        let client_id = match client {
            ClientRef::Existing(id) => id,
            ClientRef::New(new_client) => {
                let stored = Client {
                    id: Uuid::new_v4(),
                    name: new_client.name,
                    email: new_client.email,
                    phone: new_client.phone,
                    created_at: Utc::now(),
                };
                let id = stored.id;
                state.clients.push(stored);
                id
            }
        };

        let stored = Booking {
            id: Uuid::new_v4(),
            employee_id: booking.employee_id,
            service_id: booking.service_id,
            client_id,
            starts_at: booking.starts_at,
            ends_at: booking.ends_at,
            client_name: booking.client_name,
            client_email: booking.client_email,
            client_phone: booking.client_phone,
            payment_method: booking.payment_method,
            amount_paid: booking.amount_paid,
            status: booking.status,
            created_at: Utc::now(),
        };
        state.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        employee_scope: Option<Uuid>,
        status: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.bookings.iter().position(|b| {
            b.id == booking_id && employee_scope.is_none_or(|e| b.employee_id == e)
        }) else {
            return Ok(None);
        };

        // Reativar um turno cancelado reocupa o horário; a constraint de
        // exclusão do Postgres dispara no UPDATE, então aqui também.
        if status != BookingStatus::Cancelled {
            let target = state.bookings[index].clone();
            let collision = state.bookings.iter().any(|b| {
                b.id != target.id
                    && b.employee_id == target.employee_id
                    && b.occupies_slot()
                    && b.interval().overlaps(&target.interval())
            });
            if collision {
                return Err(AppError::SlotTaken);
            }
        }

        let booking = &mut state.bookings[index];
        booking.status = status;
        Ok(Some(booking.clone()))
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn update_booking_time(
        &self,
        booking_id: Uuid,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Result<Option<Booking>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.bookings.iter().position(|b| b.id == booking_id) else {
            return Ok(None);
        };

        let target = state.bookings[index].clone();
        let moved = Interval::new(starts_at, ends_at);
        if target.occupies_slot() {
            let collision = state.bookings.iter().any(|b| {
                b.id != target.id
                    && b.employee_id == target.employee_id
                    && b.occupies_slot()
                    && b.interval().overlaps(&moved)
            });
            if collision {
                return Err(AppError::SlotTaken);
            }
        }

        let booking = &mut state.bookings[index];
        booking.starts_at = starts_at;
        booking.ends_at = ends_at;
        Ok(Some(booking.clone()))
    }
}
