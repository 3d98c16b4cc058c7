// src/common/intervals.rs

use chrono::{Duration, NaiveDateTime};

/// Intervalo semiaberto [start, end) no tempo local do negócio.
/// Todo o núcleo de agendamento (disponibilidade e reservas) compara
/// intervalos com essa mesma primitiva.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Constrói o intervalo a partir de um início e uma duração em minutos.
    pub fn from_start(start: NaiveDateTime, minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    /// Teste de sobreposição de intervalos abertos: tocar na borda não conta.
    /// Um turno que começa exatamente onde o outro termina é válido.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// `other` cabe inteiro dentro de `self` (bordas inclusas).
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Percorre `window` em incrementos de `slot_minutes` e devolve os inícios
/// dos slots inteiros. Um slot parcial no final é descartado, nunca
/// arredondado: o critério é `t + slot <= window.end`.
pub fn slot_starts(window: &Interval, slot_minutes: i64) -> Vec<NaiveDateTime> {
    let mut starts = Vec::new();
    if slot_minutes <= 0 {
        return starts;
    }

    let step = Duration::minutes(slot_minutes);
    let mut cursor = window.start;
    while cursor + step <= window.end {
        starts.push(cursor);
        cursor += step;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn overlap_detecta_interseccao_real() {
        let a = Interval::new(dt("2025-06-16 09:00"), dt("2025-06-16 09:30"));
        let b = Interval::new(dt("2025-06-16 09:15"), dt("2025-06-16 09:45"));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn borda_compartilhada_nao_e_sobreposicao() {
        let a = Interval::new(dt("2025-06-16 09:00"), dt("2025-06-16 09:30"));
        let b = Interval::new(dt("2025-06-16 09:30"), dt("2025-06-16 10:00"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_aceita_bordas_iguais() {
        let window = Interval::new(dt("2025-06-16 09:00"), dt("2025-06-16 12:00"));
        let exato = Interval::new(dt("2025-06-16 11:30"), dt("2025-06-16 12:00"));
        let estoura = Interval::new(dt("2025-06-16 11:45"), dt("2025-06-16 12:15"));
        assert!(window.contains(&exato));
        assert!(!window.contains(&estoura));
    }

    #[test]
    fn slot_parcial_no_final_e_descartado() {
        // 09:00-10:15 com slots de 30min: 09:00 e 09:30 cabem, 10:00-10:30 não.
        let window = Interval::new(dt("2025-06-16 09:00"), dt("2025-06-16 10:15"));
        let starts = slot_starts(&window, 30);
        assert_eq!(starts, vec![dt("2025-06-16 09:00"), dt("2025-06-16 09:30")]);
    }

    #[test]
    fn janela_menor_que_um_slot_nao_gera_nada() {
        let window = Interval::new(dt("2025-06-16 09:00"), dt("2025-06-16 09:20"));
        assert!(slot_starts(&window, 30).is_empty());
    }
}
