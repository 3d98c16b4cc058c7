// src/services/schedule.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ScheduleStore,
    models::scheduling::{
        Booking, BookingStatus, CreateWindowPayload, NewWindow, WorkingWindow,
    },
};

/// Gestão das agendas (janelas de atendimento) de um empregado.
/// Criação e substituição validam o invariante de não-sobreposição
/// entre janelas do mesmo dia.
#[derive(Clone)]
pub struct ScheduleService<S> {
    store: Arc<S>,
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_window(
        &self,
        employee_id: Uuid,
        payload: CreateWindowPayload,
    ) -> Result<WorkingWindow, AppError> {
        let window = Self::to_new_window(employee_id, payload)?;
        self.ensure_no_overlap(&window, None).await?;
        self.store.insert_window(window).await
    }

    /// Substituição integral: a janela inteira é trocada, nunca um campo só.
    pub async fn replace_window(
        &self,
        employee_id: Uuid,
        window_id: Uuid,
        payload: CreateWindowPayload,
    ) -> Result<WorkingWindow, AppError> {
        let window = Self::to_new_window(employee_id, payload)?;
        self.ensure_no_overlap(&window, Some(window_id)).await?;
        self.store
            .replace_window(window_id, employee_id, window)
            .await?
            .ok_or(AppError::WindowNotFound)
    }

    pub async fn list_windows(&self, employee_id: Uuid) -> Result<Vec<WorkingWindow>, AppError> {
        self.store.windows_for_employee(employee_id).await
    }

    /// Turnos do empregado entre dois dias (ambos inclusos).
    pub async fn bookings_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        let from_ts = from.and_time(chrono::NaiveTime::MIN);
        let to_ts = to.succ_opt().unwrap_or(to).and_time(chrono::NaiveTime::MIN);
        self.store
            .bookings_in_range(employee_id, from_ts, to_ts)
            .await
    }

    pub async fn update_status(
        &self,
        booking_id: Uuid,
        employee_scope: Option<Uuid>,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        self.store
            .update_booking_status(booking_id, employee_scope, status)
            .await?
            .ok_or(AppError::BookingNotFound)
    }

    fn to_new_window(
        employee_id: Uuid,
        payload: CreateWindowPayload,
    ) -> Result<NewWindow, AppError> {
        if payload.start_time >= payload.end_time {
            let mut errors = validator::ValidationErrors::new();
            let mut error = validator::ValidationError::new("invalid_range");
            error.message = Some("A hora de início deve ser anterior à de fim.".into());
            errors.add("startTime", error);
            return Err(AppError::ValidationError(errors));
        }

        Ok(NewWindow {
            employee_id,
            day: payload.day,
            start_time: payload.start_time,
            end_time: payload.end_time,
            slot_minutes: payload.slot_minutes,
        })
    }

    /// Janela nova/substituta não pode cruzar outra do mesmo dia.
    /// Na substituição, a própria janela fica fora da comparação.
    async fn ensure_no_overlap(
        &self,
        window: &NewWindow,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let same_day = self
            .store
            .windows_for_day(window.employee_id, window.day)
            .await?;

        let candidate = window.interval();
        let clashes = same_day
            .iter()
            .filter(|w| exclude_id != Some(w.id))
            .any(|w| w.interval().overlaps(&candidate));

        if clashes {
            return Err(AppError::OverlappingWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use chrono::NaiveTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn payload(day: &str, start: &str, end: &str) -> CreateWindowPayload {
        CreateWindowPayload {
            day: date(day),
            start_time: time(start),
            end_time: time(end),
            slot_minutes: 30,
        }
    }

    fn service() -> (ScheduleService<MemoryStore>, Uuid) {
        (
            ScheduleService::new(Arc::new(MemoryStore::new())),
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn janela_sobreposta_no_mesmo_dia_e_rejeitada() {
        let (service, employee) = service();
        service
            .create_window(employee, payload("2025-06-16", "09:00", "12:00"))
            .await
            .unwrap();

        let result = service
            .create_window(employee, payload("2025-06-16", "11:00", "14:00"))
            .await;

        assert!(matches!(result, Err(AppError::OverlappingWindow)));
    }

    #[tokio::test]
    async fn janelas_encostadas_sao_validas() {
        let (service, employee) = service();
        service
            .create_window(employee, payload("2025-06-16", "09:00", "12:00"))
            .await
            .unwrap();

        let result = service
            .create_window(employee, payload("2025-06-16", "12:00", "15:00"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mesmo_horario_em_dias_diferentes_nao_conflita() {
        let (service, employee) = service();
        service
            .create_window(employee, payload("2025-06-16", "09:00", "12:00"))
            .await
            .unwrap();

        let result = service
            .create_window(employee, payload("2025-06-17", "09:00", "12:00"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn substituicao_ignora_a_propria_janela() {
        let (service, employee) = service();
        let window = service
            .create_window(employee, payload("2025-06-16", "09:00", "12:00"))
            .await
            .unwrap();

        // Encolher a mesma janela cruza com ela mesma, mas não com outras.
        let replaced = service
            .replace_window(employee, window.id, payload("2025-06-16", "10:00", "12:00"))
            .await
            .unwrap();

        assert_eq!(replaced.id, window.id);
        assert_eq!(replaced.start_time, time("10:00"));
    }

    #[tokio::test]
    async fn inicio_depois_do_fim_e_invalido() {
        let (service, employee) = service();

        let result = service
            .create_window(employee, payload("2025-06-16", "12:00", "09:00"))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn substituir_janela_de_outro_empregado_nao_acha_nada() {
        let (service, employee) = service();
        let window = service
            .create_window(employee, payload("2025-06-16", "09:00", "12:00"))
            .await
            .unwrap();

        let result = service
            .replace_window(Uuid::new_v4(), window.id, payload("2025-06-16", "09:00", "12:00"))
            .await;

        assert!(matches!(result, Err(AppError::WindowNotFound)));
    }
}
