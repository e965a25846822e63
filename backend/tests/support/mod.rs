#![allow(dead_code)]

use calendar_pro::config::CalendarSettings;
use calendar_pro::services::{CalendarWidget, EventLog, FixedClock};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).expect("valid test time")
}

/// Widget with default settings, a recording sink and a pinned "today".
pub fn widget_on(today: NaiveDate) -> CalendarWidget<EventLog, FixedClock> {
    CalendarWidget::with_clock(CalendarSettings::default(), FixedClock(today), EventLog::new())
        .expect("default settings are valid")
}

/// A host property object as a builder would bind it on 2024-03-15.
pub fn host_properties() -> Value {
    json!({
        "defaultView": "day",
        "workingHoursStart": 6,
        "workingHoursEnd": 22,
        "timeSlotMinutes": 30,
        "cancelledOpacity": 0.4,
        "monthLabel": "Mês",
        "agendamentos": [
            {
                "id": 101,
                "inicio": "2024-03-15T09:00:00",
                "fim": "2024-03-15T09:30:00",
                "profissional_id": "p1",
                "cliente_id": "c1",
                "servico_id": "s1",
                "status": "confirmado"
            },
            {
                "id": 102,
                "inicio": "2024-03-15T09:00:00",
                "fim": "2024-03-15T10:00:00",
                "profissional_id": "p2",
                "cliente_id": "c2",
                "servico_id": "s2",
                "status": "pendente"
            },
            {
                "id": 103,
                "inicio": "2024-03-15T15:00:00",
                "fim": "2024-03-15T16:00:00",
                "profissional_id": "p1",
                "status": "cancelado"
            },
            {
                "id": 104,
                "inicio": "2024-03-15T18:00:00",
                "fim": "2024-03-15T17:00:00",
                "profissional_id": "p2"
            }
        ],
        "bloqueios": [
            { "id": "b1", "inicio": "2024-03-15T12:00", "fim": "2024-03-15T13:00", "motivo": "Almoço" },
            { "id": "b2", "inicio": "2024-03-14T20:00", "fim": "2024-03-15T08:00", "profissional_id": "p2" }
        ],
        "servicos": [
            { "id": "s1", "nome": "Corte", "duracao": 30 },
            { "id": "s2", "nome": "Coloração", "duracao": 60 }
        ],
        "profissionais": [
            { "id": "p1", "nome": "Ana" },
            { "id": "p2", "nome": "Bruno" }
        ],
        "clientes": [
            { "id": "c1", "nome": "Carla" },
            { "id": "c2", "nome": "Diego" }
        ]
    })
}
