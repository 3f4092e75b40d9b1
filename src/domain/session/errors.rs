//! Errors raised by session entity mutation.
//!
//! These indicate a defect in the workflow graph or engine, not bad user
//! input: a correctly shaped graph never routes a mutation that violates an
//! entity invariant.

use thiserror::Error;

use crate::domain::certificate::{CertificateKind, CertificateOwner};
use crate::domain::party::PartyRole;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("company parties do not carry marital status")]
    CompanyMaritalStatus,

    #[error("company parties do not carry a spouse record")]
    CompanySpouse,

    #[error("marital status must be recorded as married before the spouse record")]
    MaritalStatusMissing,

    #[error("no spouse record has been created for this party")]
    SpouseMissing,

    #[error("certificate {kind} for {owner} is already recorded")]
    DuplicateCertificate {
        kind: CertificateKind,
        owner: CertificateOwner,
    },

    #[error("no {role} has been added to the session yet")]
    NoCurrentParty { role: PartyRole },

    #[error("clearance cursor {index} is out of range for {count} sellers")]
    ClearanceCursorOutOfRange { index: usize, count: usize },
}
