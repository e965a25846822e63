//! Typed records for the host-supplied collections.
//!
//! The core never mutates these; a render pass borrows them as an immutable
//! snapshot. Fields the engine does not understand are kept in `extra` so that
//! click payloads hand the host its own record back.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::define_id_type;

define_id_type!(AppointmentId);
define_id_type!(BlockId);
define_id_type!(ServiceId);
define_id_type!(ProfessionalId);
define_id_type!(ClientId);

/// Booking status of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
    Completed,
    NoShow,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Other(s) => s,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AppointmentStatus::Other(_))
    }
}

impl FromStr for AppointmentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "confirmed" | "confirmado" | "scheduled" | "agendado" => AppointmentStatus::Confirmed,
            "pending" | "pendente" => AppointmentStatus::Pending,
            "cancelled" | "canceled" | "cancelado" => AppointmentStatus::Cancelled,
            "completed" | "done" | "concluido" | "concluído" => AppointmentStatus::Completed,
            "no_show" | "noshow" | "faltou" => AppointmentStatus::NoShow,
            _ => AppointmentStatus::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<ProfessionalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    /// Minimal confirmed appointment with no references.
    pub fn new(id: impl Into<AppointmentId>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            professional_id: None,
            client_id: None,
            service_id: None,
            status: AppointmentStatus::Confirmed,
            extra: Map::new(),
        }
    }

    pub fn with_professional(mut self, id: impl Into<ProfessionalId>) -> Self {
        self.professional_id = Some(id.into());
        self
    }

    pub fn with_client(mut self, id: impl Into<ClientId>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn with_service(mut self, id: impl Into<ServiceId>) -> Self {
        self.service_id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A blocked interval. Without a professional it blocks everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<ProfessionalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            professional_id: None,
            reason: None,
            extra: Map::new(),
        }
    }

    pub fn with_professional(mut self, id: impl Into<ProfessionalId>) -> Self {
        self.professional_id = Some(id.into());
        self
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Whether this block makes `professional` unavailable.
    pub fn applies_to(&self, professional: &ProfessionalId) -> bool {
        match &self.professional_id {
            None => true,
            Some(p) => p == professional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: ProfessionalId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The five host collections as one immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub appointments: Vec<Appointment>,
    pub blocks: Vec<Block>,
    pub services: Vec<Service>,
    pub professionals: Vec<Professional>,
    pub clients: Vec<Client>,
}

impl Collections {
    pub fn find_appointment(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| &a.id == id)
    }
}
