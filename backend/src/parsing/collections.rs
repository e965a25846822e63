//! Coercion of host-bound collections into typed records.
//!
//! Every record is deserialized on its own, so one malformed entry only drops
//! that entry. Records whose interval is inverted are kept: placement reports
//! them as diagnostics, ingestion only warns.
//!
//! Hosts name the same field several ways (`profissional_id`, `professionalId`,
//! an embedded `profissional` object) and may send more than one of them. Each
//! record is canonicalized first: the first non-null candidate in lookup order
//! fills the field and the others stay in `extra`.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CalendarResult;
use crate::models::{
    parse_timestamp, Appointment, AppointmentStatus, Block, Client, Collections, Professional,
    Service,
};

/// Outcome of one ingestion pass.
///
/// Errors are records that were dropped; warnings are records that were kept
/// but look suspicious (unknown status, inverted interval, repeated id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: IngestStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub appointments: CollectionStats,
    pub blocks: CollectionStats,
    pub services: CollectionStats,
    pub professionals: CollectionStats,
    pub clients: CollectionStats,
    pub cancelled_appointments: usize,
    pub unknown_statuses: usize,
    pub inverted_intervals: usize,
}

/// Per-collection counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicate_ids: usize,
}

impl IngestReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    /// Adds an error and marks the report as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn total_accepted(&self) -> usize {
        let s = &self.stats;
        s.appointments.accepted
            + s.blocks.accepted
            + s.services.accepted
            + s.professionals.accepted
            + s.clients.accepted
    }
}

/// Identifier sent as a string, an integer or an embedded record carrying
/// an `id` (a joined select).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
    Nested {
        #[serde(alias = "_id")]
        id: Box<RawId>,
    },
}

impl RawId {
    fn into_key(self) -> Option<String> {
        match self {
            RawId::Int(n) => Some(n.to_string()),
            RawId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawId::Nested { id } => id.into_key(),
        }
    }
}

/// Timestamp sent as text or as epoch milliseconds (read as UTC).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(i64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            RawTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc()),
            RawTimestamp::Text(s) => parse_timestamp(s),
        }
    }
}

fn optional_ref<T: From<String>>(raw: Option<RawId>) -> Option<T> {
    raw.and_then(RawId::into_key).map(T::from)
}

fn required_id(raw: Option<RawId>) -> Result<String, String> {
    raw.and_then(RawId::into_key)
        .ok_or_else(|| "missing id".to_string())
}

fn required_time(raw: Option<RawTimestamp>, field: &str) -> Result<NaiveDateTime, String> {
    match raw {
        None => Err(format!("missing {}", field)),
        Some(ts) => ts
            .resolve()
            .ok_or_else(|| format!("unparsable {} {:?}", field, ts)),
    }
}

/// A canonical field name and the host names that may stand in for it.
type FieldNames = (&'static str, &'static [&'static str]);

const ID: FieldNames = ("id", &["_id", "uuid"]);
const START: FieldNames = (
    "start",
    &["inicio", "data_inicio", "dataInicio", "startTime", "start_time"],
);
const END: FieldNames = ("end", &["fim", "data_fim", "dataFim", "endTime", "end_time"]);
const PROFESSIONAL: FieldNames = (
    "professional_id",
    &["professionalId", "profissional_id", "profissionalId", "profissional", "professional"],
);
const CLIENT: FieldNames = (
    "client_id",
    &["clientId", "cliente_id", "clienteId", "cliente", "client"],
);
const SERVICE: FieldNames = (
    "service_id",
    &["serviceId", "servico_id", "servicoId", "servico", "service"],
);
const STATUS: FieldNames = ("status", &["situacao"]);
const REASON: FieldNames = ("reason", &["motivo", "descricao", "description"]);
const NAME: FieldNames = ("name", &["nome", "fullName", "nome_completo", "title", "titulo"]);
const DURATION: FieldNames = (
    "duration_minutes",
    &["durationMinutes", "duracao", "duracao_minutos", "duration"],
);
const COLOR: FieldNames = ("color", &["cor"]);

/// Move the first non-null candidate of each field under its canonical name.
fn canonicalize(item: &Value, fields: &[FieldNames]) -> Value {
    let Value::Object(map) = item else {
        return item.clone();
    };
    let mut map = map.clone();
    for &(canonical, alternatives) in fields {
        if map.get(canonical).is_some_and(|v| !v.is_null()) {
            continue;
        }
        let found = alternatives
            .iter()
            .find(|&&k| map.get(k).is_some_and(|v| !v.is_null()));
        if let Some(value) = found.and_then(|&k| map.remove(k)) {
            map.insert(canonical.to_string(), value);
        }
    }
    Value::Object(map)
}

/// A loosely-shaped host record that can be checked into a typed one.
trait RawRecord: DeserializeOwned {
    type Record;

    /// Fields resolved by [`canonicalize`] before deserializing.
    const FIELDS: &'static [FieldNames];

    fn into_record(self, warnings: &mut Vec<String>) -> Result<Self::Record, String>;

    fn key(record: &Self::Record) -> &str;
}

#[derive(Debug, Deserialize)]
struct RawAppointment {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    start: Option<RawTimestamp>,
    #[serde(default)]
    end: Option<RawTimestamp>,
    #[serde(default)]
    professional_id: Option<RawId>,
    #[serde(default)]
    client_id: Option<RawId>,
    #[serde(default)]
    service_id: Option<RawId>,
    #[serde(default)]
    status: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawRecord for RawAppointment {
    type Record = Appointment;
    const FIELDS: &'static [FieldNames] = &[ID, START, END, PROFESSIONAL, CLIENT, SERVICE, STATUS];

    fn into_record(self, warnings: &mut Vec<String>) -> Result<Appointment, String> {
        let id = required_id(self.id)?;
        let start = required_time(self.start, "start")?;
        let end = required_time(self.end, "end")?;
        if start >= end {
            warnings.push(format!("{}: start {} is not before end {}", id, start, end));
        }

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => AppointmentStatus::default(),
            Some(s) => AppointmentStatus::from(s.to_string()),
        };
        if !status.is_known() {
            warnings.push(format!("{}: unknown status {:?}", id, status.as_str()));
        }

        Ok(Appointment {
            id: id.into(),
            start,
            end,
            professional_id: optional_ref(self.professional_id),
            client_id: optional_ref(self.client_id),
            service_id: optional_ref(self.service_id),
            status,
            extra: self.extra,
        })
    }

    fn key(record: &Appointment) -> &str {
        record.id.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    start: Option<RawTimestamp>,
    #[serde(default)]
    end: Option<RawTimestamp>,
    #[serde(default)]
    professional_id: Option<RawId>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawRecord for RawBlock {
    type Record = Block;
    const FIELDS: &'static [FieldNames] = &[ID, START, END, PROFESSIONAL, REASON];

    fn into_record(self, warnings: &mut Vec<String>) -> Result<Block, String> {
        let id = required_id(self.id)?;
        let start = required_time(self.start, "start")?;
        let end = required_time(self.end, "end")?;
        if start >= end {
            warnings.push(format!("{}: start {} is not before end {}", id, start, end));
        }

        Ok(Block {
            id: id.into(),
            start,
            end,
            professional_id: optional_ref(self.professional_id),
            reason: self.reason.filter(|r| !r.trim().is_empty()),
            extra: self.extra,
        })
    }

    fn key(record: &Block) -> &str {
        record.id.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct RawService {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    duration_minutes: Option<Value>,
    #[serde(default)]
    color: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawRecord for RawService {
    type Record = Service;
    const FIELDS: &'static [FieldNames] = &[ID, NAME, DURATION, COLOR];

    fn into_record(self, warnings: &mut Vec<String>) -> Result<Service, String> {
        let id = required_id(self.id)?;
        let duration_minutes = match self.duration_minutes {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let minutes = match &raw {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                }
                .and_then(|m| u32::try_from(m).ok());
                if minutes.is_none() {
                    warnings.push(format!("{}: ignoring duration {}", id, raw));
                }
                minutes
            }
        };

        Ok(Service {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            duration_minutes,
            color: self.color,
            extra: self.extra,
        })
    }

    fn key(record: &Service) -> &str {
        record.id.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawPerson {
    fn into_parts(self) -> Result<(String, String, Map<String, Value>), String> {
        let id = required_id(self.id)?;
        Ok((id, self.name.unwrap_or_default(), self.extra))
    }
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawProfessional(RawPerson);

impl RawRecord for RawProfessional {
    type Record = Professional;
    const FIELDS: &'static [FieldNames] = &[ID, NAME];

    fn into_record(self, _warnings: &mut Vec<String>) -> Result<Professional, String> {
        let (id, name, extra) = self.0.into_parts()?;
        Ok(Professional {
            id: id.into(),
            name,
            extra,
        })
    }

    fn key(record: &Professional) -> &str {
        record.id.as_str()
    }
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawClient(RawPerson);

impl RawRecord for RawClient {
    type Record = Client;
    const FIELDS: &'static [FieldNames] = &[ID, NAME];

    fn into_record(self, _warnings: &mut Vec<String>) -> Result<Client, String> {
        let (id, name, extra) = self.0.into_parts()?;
        Ok(Client {
            id: id.into(),
            name,
            extra,
        })
    }

    fn key(record: &Client) -> &str {
        record.id.as_str()
    }
}

const APPOINTMENT_KEYS: [&str; 2] = ["agendamentos", "appointments"];
const BLOCK_KEYS: [&str; 2] = ["bloqueios", "blocks"];
const SERVICE_KEYS: [&str; 2] = ["servicos", "services"];
const PROFESSIONAL_KEYS: [&str; 2] = ["profissionais", "professionals"];
const CLIENT_KEYS: [&str; 2] = ["clientes", "clients"];

fn lookup<'v>(root: &'v Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'v Value)> {
    keys.iter()
        .find_map(|&k| root.get(k).map(|v| (k, v)))
}

fn ingest<R: RawRecord>(
    root: &Map<String, Value>,
    keys: &[&'static str],
    report: &mut IngestReport,
) -> (Vec<R::Record>, CollectionStats) {
    let mut stats = CollectionStats::default();
    let Some((name, value)) = lookup(root, keys) else {
        return (Vec::new(), stats);
    };
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return (Vec::new(), stats),
        other => {
            report.add_error(format!("{}: expected an array, got {}", name, json_kind(other)));
            return (Vec::new(), stats);
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut notes = Vec::new();

    for (index, item) in items.iter().enumerate() {
        stats.total += 1;
        let outcome = R::deserialize(canonicalize(item, R::FIELDS))
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.into_record(&mut notes));
        for note in notes.drain(..) {
            report.add_warning(format!("{}[{}]: {}", name, index, note));
        }

        match outcome {
            Ok(record) => {
                let key = R::key(&record);
                if !seen.insert(key.to_string()) {
                    stats.duplicate_ids += 1;
                    report.add_warning(format!("{}[{}]: duplicate id {}", name, index, key));
                }
                stats.accepted += 1;
                records.push(record);
            }
            Err(reason) => {
                stats.rejected += 1;
                warn!("Skipping {}[{}]: {}", name, index, reason);
                report.add_error(format!("{}[{}]: {}", name, index, reason));
            }
        }
    }

    debug!(
        "Ingested {}: {} accepted, {} rejected",
        name, stats.accepted, stats.rejected
    );
    (records, stats)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Coerce the host's five collections into typed records.
///
/// `properties` is the host property object; collections are looked up by
/// their host name (`agendamentos`, `bloqueios`, `servicos`, `profissionais`,
/// `clientes`) or the English equivalent. Missing or `null` collections are
/// empty. Never fails: problems are collected in the report.
pub fn parse_collections(properties: &Value) -> (Collections, IngestReport) {
    let mut report = IngestReport::new();
    let Value::Object(root) = properties else {
        report.add_error(format!(
            "expected an object of collections, got {}",
            json_kind(properties)
        ));
        return (Collections::default(), report);
    };

    let (appointments, appt_stats) = ingest::<RawAppointment>(root, &APPOINTMENT_KEYS, &mut report);
    let (blocks, block_stats) = ingest::<RawBlock>(root, &BLOCK_KEYS, &mut report);
    let (services, service_stats) = ingest::<RawService>(root, &SERVICE_KEYS, &mut report);
    let (professionals, pro_stats) = ingest::<RawProfessional>(root, &PROFESSIONAL_KEYS, &mut report);
    let (clients, client_stats) = ingest::<RawClient>(root, &CLIENT_KEYS, &mut report);

    report.stats = IngestStats {
        appointments: appt_stats,
        blocks: block_stats,
        services: service_stats,
        professionals: pro_stats,
        clients: client_stats,
        cancelled_appointments: appointments.iter().filter(|a| a.is_cancelled()).count(),
        unknown_statuses: appointments.iter().filter(|a| !a.status.is_known()).count(),
        inverted_intervals: appointments.iter().filter(|a| !a.is_well_formed()).count()
            + blocks.iter().filter(|b| !b.is_well_formed()).count(),
    };

    let collections = Collections {
        appointments,
        blocks,
        services,
        professionals,
        clients,
    };
    (collections, report)
}

/// [`parse_collections`] over a JSON document.
///
/// # Errors
///
/// `ConfigurationError` if `json` is not valid JSON.
pub fn parse_collections_str(json: &str) -> CalendarResult<(Collections, IngestReport)> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_collections(&value))
}

impl Collections {
    pub fn from_json_str(json: &str) -> CalendarResult<(Self, IngestReport)> {
        parse_collections_str(json).map_err(|e| e.with_operation("parse_collections"))
    }
}
