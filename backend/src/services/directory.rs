//! Id lookup for the reference collections.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{
    Appointment, Block, Client, ClientId, Collections, Professional, ProfessionalId, Service,
    ServiceId,
};

/// An appointment with its references looked up. Dangling ids resolve to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAppointment<'a> {
    pub appointment: &'a Appointment,
    pub service: Option<&'a Service>,
    pub professional: Option<&'a Professional>,
    pub client: Option<&'a Client>,
}

/// Borrowed index over the services, professionals and clients of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Directory<'a> {
    services: HashMap<&'a ServiceId, &'a Service>,
    professionals: HashMap<&'a ProfessionalId, &'a Professional>,
    clients: HashMap<&'a ClientId, &'a Client>,
}

impl<'a> Directory<'a> {
    /// First record wins when an id is repeated.
    pub fn new(collections: &'a Collections) -> Self {
        let mut directory = Self::default();
        for s in &collections.services {
            directory.services.entry(&s.id).or_insert(s);
        }
        for p in &collections.professionals {
            directory.professionals.entry(&p.id).or_insert(p);
        }
        for c in &collections.clients {
            directory.clients.entry(&c.id).or_insert(c);
        }
        directory
    }

    pub fn service(&self, id: &ServiceId) -> Option<&'a Service> {
        self.services.get(id).copied()
    }

    pub fn professional(&self, id: &ProfessionalId) -> Option<&'a Professional> {
        self.professionals.get(id).copied()
    }

    pub fn client(&self, id: &ClientId) -> Option<&'a Client> {
        self.clients.get(id).copied()
    }

    pub fn resolve(&self, appointment: &'a Appointment) -> ResolvedAppointment<'a> {
        ResolvedAppointment {
            appointment,
            service: appointment
                .service_id
                .as_ref()
                .and_then(|id| self.service(id)),
            professional: appointment
                .professional_id
                .as_ref()
                .and_then(|id| self.professional(id)),
            client: appointment.client_id.as_ref().and_then(|id| self.client(id)),
        }
    }

    /// Professional a block is scoped to, if any and if known.
    pub fn block_professional(&self, block: &'a Block) -> Option<&'a Professional> {
        block
            .professional_id
            .as_ref()
            .and_then(|id| self.professional(id))
    }
}
