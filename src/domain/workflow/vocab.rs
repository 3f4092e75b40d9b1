//! Response vocabulary.
//!
//! Every option literal offered to the user and every literal a transition
//! condition checks is defined here, once. The build-time vocabulary check
//! in `WorkflowBuilder` keeps the two sides from drifting apart.

use crate::domain::foundation::ValidationError;
use crate::domain::party::{MaritalStatus, PartyKind};
use crate::domain::session::PropertyKind;

pub const YES: &str = "yes";
pub const NO: &str = "no";
pub const INDIVIDUAL: &str = "individual";
pub const COMPANY: &str = "company";
pub const MARRIED: &str = "married";
pub const UNMARRIED: &str = "unmarried";
pub const PRESENT: &str = "present";
pub const WAIVE: &str = "waive";
pub const URBAN: &str = "urban";
pub const RURAL: &str = "rural";
pub const CASH: &str = "cash";
pub const ALREADY_SETTLED: &str = "already-settled";
pub const BANK_TRANSFER: &str = "bank-transfer";
pub const CHECK: &str = "check";

pub const YES_NO: &[&str] = &[YES, NO];
pub const PARTY_KINDS: &[&str] = &[INDIVIDUAL, COMPANY];
pub const MARITAL_STATUSES: &[&str] = &[MARRIED, UNMARRIED];
pub const PRESENT_WAIVE: &[&str] = &[PRESENT, WAIVE];
pub const PROPERTY_KINDS: &[&str] = &[URBAN, RURAL];
pub const PAYMENT_FORMS: &[&str] = &[CASH, ALREADY_SETTLED];
pub const PAYMENT_METHODS: &[&str] = &[BANK_TRANSFER, CASH, CHECK];

fn not_an_option(offered: &[&str], got: &str) -> ValidationError {
    ValidationError::NotAnOption {
        offered: offered.iter().map(|s| s.to_string()).collect(),
        got: got.to_string(),
    }
}

pub fn party_kind(literal: &str) -> Result<PartyKind, ValidationError> {
    match literal {
        INDIVIDUAL => Ok(PartyKind::Individual),
        COMPANY => Ok(PartyKind::Company),
        other => Err(not_an_option(PARTY_KINDS, other)),
    }
}

pub fn marital_status(literal: &str) -> Result<MaritalStatus, ValidationError> {
    match literal {
        MARRIED => Ok(MaritalStatus::Married),
        UNMARRIED => Ok(MaritalStatus::Unmarried),
        other => Err(not_an_option(MARITAL_STATUSES, other)),
    }
}

pub fn yes_no(literal: &str) -> Result<bool, ValidationError> {
    match literal {
        YES => Ok(true),
        NO => Ok(false),
        other => Err(not_an_option(YES_NO, other)),
    }
}

pub fn property_kind(literal: &str) -> Result<PropertyKind, ValidationError> {
    match literal {
        URBAN => Ok(PropertyKind::Urban),
        RURAL => Ok(PropertyKind::Rural),
        other => Err(not_an_option(PROPERTY_KINDS, other)),
    }
}

/// True when the user chose to present the certificate, false on waive.
pub fn presents(literal: &str) -> Result<bool, ValidationError> {
    match literal {
        PRESENT => Ok(true),
        WAIVE => Ok(false),
        other => Err(not_an_option(PRESENT_WAIVE, other)),
    }
}
