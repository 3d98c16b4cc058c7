// src/services/availability.rs

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        intervals::{Interval, slot_starts},
    },
    db::ScheduleStore,
    models::scheduling::{DayAvailability, WorkingWindow},
};

/// Horizonte padrão de busca de disponibilidade, em dias.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Slots livres de uma janela, dado o conjunto de intervalos ocupados.
/// Percorre a janela em incrementos de `slot_minutes`; um candidato é livre
/// se não cruza nenhum intervalo ocupado. Função pura, o serviço só orquestra.
pub fn free_slots(window: &WorkingWindow, occupied: &[Interval]) -> Vec<NaiveTime> {
    let slot = i64::from(window.slot_minutes);
    slot_starts(&window.interval(), slot)
        .into_iter()
        .filter(|start| {
            let candidate = Interval::from_start(*start, slot);
            !occupied.iter().any(|o| candidate.overlaps(o))
        })
        .map(|start| start.time())
        .collect()
}

/// Calculadora de disponibilidade: leitura pura sobre o `ScheduleStore`.
#[derive(Clone)]
pub struct AvailabilityService<S> {
    store: Arc<S>,
}

impl<S: ScheduleStore> AvailabilityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Disponibilidade a partir de hoje. `horizon_days` é opcional na rota;
    /// o padrão são 14 dias.
    pub async fn compute(
        &self,
        employee_id: Uuid,
        horizon_days: u32,
    ) -> Result<Vec<DayAvailability>, AppError> {
        self.compute_from(employee_id, Local::now().date_naive(), horizon_days)
            .await
    }

    /// Mesma lógica com o dia inicial explícito (os testes fixam a data).
    /// Dias sem janela ou sem nenhum slot livre ficam fora do resultado.
    pub async fn compute_from(
        &self,
        employee_id: Uuid,
        start_day: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<DayAvailability>, AppError> {
        let mut days = Vec::new();

        for offset in 0..horizon_days {
            let day = start_day + Duration::days(i64::from(offset));

            let windows = self.store.windows_for_day(employee_id, day).await?;
            if windows.is_empty() {
                continue;
            }

            let mut times: Vec<NaiveTime> = Vec::new();
            for window in &windows {
                let range = window.interval();
                let bookings = self
                    .store
                    .bookings_in_range(employee_id, range.start, range.end)
                    .await?;

                let occupied: Vec<Interval> = bookings
                    .iter()
                    .filter(|b| b.occupies_slot())
                    .map(|b| b.interval())
                    .collect();

                times.extend(free_slots(window, &occupied));
            }

            // Janelas do mesmo dia não se sobrepõem, então ordenar os inícios
            // basta para manter a sequência cronológica.
            times.sort();

            if !times.is_empty() {
                days.push(DayAvailability {
                    date: day,
                    times: times.iter().map(|t| t.format("%H:%M").to_string()).collect(),
                });
            }
        }

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::scheduling::{BookingStatus, ClientRef, NewBooking, NewClient, NewWindow};
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn window(employee_id: Uuid, day: &str, start: &str, end: &str, slot: i32) -> NewWindow {
        NewWindow {
            employee_id,
            day: date(day),
            start_time: time(start),
            end_time: time(end),
            slot_minutes: slot,
        }
    }

    async fn book(store: &MemoryStore, employee_id: Uuid, start: &str, end: &str) {
        let starts_at =
            chrono::NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M").unwrap();
        let ends_at = chrono::NaiveDateTime::parse_from_str(end, "%Y-%m-%d %H:%M").unwrap();
        store
            .persist_booking(
                ClientRef::New(NewClient {
                    name: "Cliente".into(),
                    email: None,
                    phone: None,
                }),
                NewBooking {
                    employee_id,
                    service_id: Uuid::new_v4(),
                    starts_at,
                    ends_at,
                    client_name: "Cliente".into(),
                    client_email: None,
                    client_phone: None,
                    payment_method: "efectivo".into(),
                    amount_paid: Decimal::ZERO,
                    status: BookingStatus::Confirmed,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn janela_de_tres_horas_com_slot_de_30_gera_seis_horarios() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "09:00", "12:00", 30));

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 1)
            .await
            .unwrap();

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2025-06-16"));
        assert_eq!(
            days[0].times,
            vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
    }

    #[tokio::test]
    async fn dia_sem_janela_fica_fora_do_resultado() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        // Janela só no segundo dia do horizonte.
        store.seed_window(window(employee, "2025-06-17", "09:00", "10:00", 30));

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 14)
            .await
            .unwrap();

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2025-06-17"));
    }

    #[tokio::test]
    async fn turno_existente_remove_o_slot_ocupado() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "09:00", "11:00", 30));
        book(&store, employee, "2025-06-16 09:30", "2025-06-16 10:00").await;

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 1)
            .await
            .unwrap();

        assert_eq!(days[0].times, vec!["09:00", "10:00", "10:30"]);
    }

    #[tokio::test]
    async fn dia_totalmente_ocupado_desaparece() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "09:00", "10:00", 30));
        book(&store, employee, "2025-06-16 09:00", "2025-06-16 10:00").await;

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 1)
            .await
            .unwrap();

        assert!(days.is_empty());
    }

    #[tokio::test]
    async fn turno_cancelado_nao_ocupa_horario() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "09:00", "10:00", 60));

        let starts_at =
            chrono::NaiveDateTime::parse_from_str("2025-06-16 09:00", "%Y-%m-%d %H:%M").unwrap();
        store
            .persist_booking(
                ClientRef::New(NewClient {
                    name: "Cliente".into(),
                    email: None,
                    phone: None,
                }),
                NewBooking {
                    employee_id: employee,
                    service_id: Uuid::new_v4(),
                    starts_at,
                    ends_at: starts_at + Duration::minutes(60),
                    client_name: "Cliente".into(),
                    client_email: None,
                    client_phone: None,
                    payment_method: "efectivo".into(),
                    amount_paid: Decimal::ZERO,
                    status: BookingStatus::Cancelled,
                },
            )
            .await
            .unwrap();

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 1)
            .await
            .unwrap();

        assert_eq!(days[0].times, vec!["09:00"]);
    }

    #[tokio::test]
    async fn duas_janelas_no_mesmo_dia_saem_em_ordem() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "14:00", "15:00", 30));
        store.seed_window(window(employee, "2025-06-16", "09:00", "10:00", 30));

        let service = AvailabilityService::new(store);
        let days = service
            .compute_from(employee, date("2025-06-16"), 1)
            .await
            .unwrap();

        assert_eq!(days[0].times, vec!["09:00", "09:30", "14:00", "14:30"]);
    }

    #[tokio::test]
    async fn consulta_repetida_sem_escritas_da_o_mesmo_resultado() {
        let store = Arc::new(MemoryStore::new());
        let employee = Uuid::new_v4();
        store.seed_window(window(employee, "2025-06-16", "09:00", "12:00", 30));
        book(&store, employee, "2025-06-16 10:00", "2025-06-16 10:30").await;

        let service = AvailabilityService::new(store);
        let first = service
            .compute_from(employee, date("2025-06-16"), 14)
            .await
            .unwrap();
        let second = service
            .compute_from(employee, date("2025-06-16"), 14)
            .await
            .unwrap();

        assert_eq!(first, second);
    }
}
