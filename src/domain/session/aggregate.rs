//! Session aggregate: all mutable state of one interview.
//!
//! # Invariants
//!
//! - `step_seq` strictly increases with every applied transition.
//! - `current_step` always names a step of the workflow definition (the
//!   engine only ever advances to targets the definition resolved).
//! - The certificate set never holds two entries with the same
//!   `(kind, owner)` pair.
//! - Parties and certificates are created and mutated only through the
//!   engine; callers outside the engine read, never write.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::certificate::{Certificate, CertificateKind, CertificateOwner};
use crate::domain::foundation::{FieldMap, SessionId, StepName, Timestamp};
use crate::domain::party::{MaritalStatus, Party, PartyKind, PartyRole};

use super::{EntityError, HistoryEntry};

/// Urban or rural property, recorded once answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Urban,
    Rural,
}

/// One interview in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    current_step: StepName,
    step_seq: u64,
    /// Reset stamp. Bumped whenever the session is reset so results of
    /// suspended extraction calls started before the reset can be dropped.
    generation: u64,
    buyers: Vec<Party>,
    sellers: Vec<Party>,
    certificates: Vec<Certificate>,
    answers: BTreeMap<String, String>,
    property_kind: Option<PropertyKind>,
    subdivision: Option<bool>,
    /// Index of the seller the clearance loop is currently collecting for.
    clearance_seller: usize,
    history: Vec<HistoryEntry>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates a fresh session positioned at the entry step.
    pub fn new(id: SessionId, entry: StepName) -> Self {
        Self::with_generation(id, entry, 0)
    }

    /// Creates a fresh session carrying an explicit generation stamp.
    ///
    /// Used by reset: the replacement session gets the old generation plus
    /// one, which invalidates extraction results still in flight.
    pub fn with_generation(id: SessionId, entry: StepName, generation: u64) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            current_step: entry,
            step_seq: 0,
            generation,
            buyers: Vec::new(),
            sellers: Vec::new(),
            certificates: Vec::new(),
            answers: BTreeMap::new(),
            property_kind: None,
            subdivision: None,
            clearance_seller: 0,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_step(&self) -> &StepName {
        &self.current_step
    }

    pub fn step_seq(&self) -> u64 {
        self.step_seq
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn buyers(&self) -> &[Party] {
        &self.buyers
    }

    pub fn sellers(&self) -> &[Party] {
        &self.sellers
    }

    pub fn parties(&self, role: PartyRole) -> &[Party] {
        match role {
            PartyRole::Buyer => &self.buyers,
            PartyRole::Seller => &self.sellers,
        }
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn certificate(&self, kind: CertificateKind, owner: CertificateOwner) -> Option<&Certificate> {
        self.certificates
            .iter()
            .find(|c| c.kind() == kind && c.owner() == owner)
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    pub fn property_kind(&self) -> Option<PropertyKind> {
        self.property_kind
    }

    pub fn subdivision(&self) -> Option<bool> {
        self.subdivision
    }

    pub fn clearance_seller(&self) -> usize {
        self.clearance_seller
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations (engine only)
    // ─────────────────────────────────────────────────────────────────────

    /// Records a free-form answer under a stable key.
    pub fn record_answer(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(key.into(), value.into());
    }

    /// Appends a new party of the given role and kind. The new party
    /// becomes the "current" one for subsequent party-scoped steps.
    pub fn begin_party(&mut self, role: PartyRole, kind: PartyKind) {
        let party = match kind {
            PartyKind::Individual => Party::individual(),
            PartyKind::Company => Party::company(),
        };
        match role {
            PartyRole::Buyer => self.buyers.push(party),
            PartyRole::Seller => self.sellers.push(party),
        }
    }

    /// Index of the party the interview is currently collecting.
    pub fn current_party_index(&self, role: PartyRole) -> Result<usize, EntityError> {
        let len = self.parties(role).len();
        if len == 0 {
            Err(EntityError::NoCurrentParty { role })
        } else {
            Ok(len - 1)
        }
    }

    fn current_party_mut(&mut self, role: PartyRole) -> Result<&mut Party, EntityError> {
        let list = match role {
            PartyRole::Buyer => &mut self.buyers,
            PartyRole::Seller => &mut self.sellers,
        };
        list.last_mut().ok_or(EntityError::NoCurrentParty { role })
    }

    pub fn set_marital_status(&mut self, role: PartyRole, status: MaritalStatus) -> Result<(), EntityError> {
        self.current_party_mut(role)?.set_marital_status(status)
    }

    pub fn record_spouse(&mut self, role: PartyRole, signs_deed: bool) -> Result<(), EntityError> {
        self.current_party_mut(role)?.record_spouse(signs_deed)
    }

    pub fn merge_party_identity(&mut self, role: PartyRole, fields: FieldMap) -> Result<(), EntityError> {
        self.current_party_mut(role)?.merge_identity(fields);
        Ok(())
    }

    pub fn merge_spouse_identity(&mut self, role: PartyRole, fields: FieldMap) -> Result<(), EntityError> {
        self.current_party_mut(role)?.merge_spouse_identity(fields)
    }

    /// Adds a certificate, rejecting duplicates of the `(kind, owner)` pair.
    pub fn add_certificate(&mut self, certificate: Certificate) -> Result<(), EntityError> {
        if self
            .certificate(certificate.kind(), certificate.owner())
            .is_some()
        {
            return Err(EntityError::DuplicateCertificate {
                kind: certificate.kind(),
                owner: certificate.owner(),
            });
        }
        self.certificates.push(certificate);
        Ok(())
    }

    pub fn set_property_kind(&mut self, kind: PropertyKind) {
        self.property_kind = Some(kind);
    }

    pub fn set_subdivision(&mut self, subdivision: bool) {
        self.subdivision = Some(subdivision);
    }

    /// Moves the clearance loop to the next seller.
    pub fn advance_clearance_seller(&mut self) -> Result<(), EntityError> {
        let next = self.clearance_seller + 1;
        if next >= self.sellers.len() {
            return Err(EntityError::ClearanceCursorOutOfRange {
                index: next,
                count: self.sellers.len(),
            });
        }
        self.clearance_seller = next;
        Ok(())
    }

    /// Applies a resolved transition: sets the current step and bumps the
    /// step-sequence counter.
    pub fn advance_to(&mut self, target: StepName) {
        self.current_step = target;
        self.step_seq += 1;
        self.updated_at = Timestamp::now();
    }

    /// Appends one applied step to the history.
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }
}
