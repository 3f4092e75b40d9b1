//! Supporting certificates and clearances.
//!
//! A certificate is either property-level (tied to the deal itself) or
//! party-level (tied to one buyer or seller). Waived certificates are still
//! recorded, with `presented = false` and no extracted fields, so downstream
//! completeness checks can rely on every applicable kind having an entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::FieldMap;
use crate::domain::party::PartyRole;

/// Closed enumeration of every certificate the interview can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateKind {
    FederalClearance,
    StateClearance,
    MunicipalClearance,
    LaborClearance,
    TitleDeed,
    PropertyTax,
    Liens,
    Condominium,
    RuralTax,
    LandRegistry,
    EnvironmentalClearance,
    SubdivisionSurvey,
    SubdivisionPlan,
    BirthRecord,
    MarriageRecord,
}

impl CertificateKind {
    /// All certificate kinds, in a stable order.
    pub const ALL: [CertificateKind; 15] = [
        CertificateKind::FederalClearance,
        CertificateKind::StateClearance,
        CertificateKind::MunicipalClearance,
        CertificateKind::LaborClearance,
        CertificateKind::TitleDeed,
        CertificateKind::PropertyTax,
        CertificateKind::Liens,
        CertificateKind::Condominium,
        CertificateKind::RuralTax,
        CertificateKind::LandRegistry,
        CertificateKind::EnvironmentalClearance,
        CertificateKind::SubdivisionSurvey,
        CertificateKind::SubdivisionPlan,
        CertificateKind::BirthRecord,
        CertificateKind::MarriageRecord,
    ];

    /// Kebab-case slug used in step names.
    pub fn slug(&self) -> &'static str {
        match self {
            CertificateKind::FederalClearance => "federal-clearance",
            CertificateKind::StateClearance => "state-clearance",
            CertificateKind::MunicipalClearance => "municipal-clearance",
            CertificateKind::LaborClearance => "labor-clearance",
            CertificateKind::TitleDeed => "title-deed",
            CertificateKind::PropertyTax => "property-tax",
            CertificateKind::Liens => "liens",
            CertificateKind::Condominium => "condominium",
            CertificateKind::RuralTax => "rural-tax",
            CertificateKind::LandRegistry => "land-registry",
            CertificateKind::EnvironmentalClearance => "environmental-clearance",
            CertificateKind::SubdivisionSurvey => "subdivision-survey",
            CertificateKind::SubdivisionPlan => "subdivision-plan",
            CertificateKind::BirthRecord => "birth-record",
            CertificateKind::MarriageRecord => "marriage-record",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            CertificateKind::FederalClearance => "federal debt clearance",
            CertificateKind::StateClearance => "state debt clearance",
            CertificateKind::MunicipalClearance => "municipal debt clearance",
            CertificateKind::LaborClearance => "labor debt clearance",
            CertificateKind::TitleDeed => "title deed",
            CertificateKind::PropertyTax => "property tax certificate",
            CertificateKind::Liens => "liens and encumbrances certificate",
            CertificateKind::Condominium => "condominium dues certificate",
            CertificateKind::RuralTax => "rural land tax certificate",
            CertificateKind::LandRegistry => "rural land registry certificate",
            CertificateKind::EnvironmentalClearance => "environmental clearance",
            CertificateKind::SubdivisionSurvey => "subdivision survey",
            CertificateKind::SubdivisionPlan => "subdivision plan",
            CertificateKind::BirthRecord => "birth record",
            CertificateKind::MarriageRecord => "marriage record",
        }
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Who a certificate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateOwner {
    /// Tied to the deal itself, not to any single party.
    Property,
    /// Tied to one party, identified by role and position in that role's list.
    Party { role: PartyRole, index: usize },
}

impl CertificateOwner {
    pub fn buyer(index: usize) -> Self {
        CertificateOwner::Party {
            role: PartyRole::Buyer,
            index,
        }
    }

    pub fn seller(index: usize) -> Self {
        CertificateOwner::Party {
            role: PartyRole::Seller,
            index,
        }
    }
}

impl fmt::Display for CertificateOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateOwner::Property => f.write_str("property"),
            CertificateOwner::Party { role, index } => write!(f, "{} #{}", role, index + 1),
        }
    }
}

/// One collected (or waived) certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    kind: CertificateKind,
    owner: CertificateOwner,
    presented: bool,
    fields: FieldMap,
}

impl Certificate {
    /// A certificate the user presented; fields come from extraction.
    pub fn presented(kind: CertificateKind, owner: CertificateOwner, fields: FieldMap) -> Self {
        Self {
            kind,
            owner,
            presented: true,
            fields,
        }
    }

    /// A certificate the user chose to waive. Still recorded, with no fields.
    pub fn waived(kind: CertificateKind, owner: CertificateOwner) -> Self {
        Self {
            kind,
            owner,
            presented: false,
            fields: FieldMap::new(),
        }
    }

    pub fn kind(&self) -> CertificateKind {
        self.kind
    }

    pub fn owner(&self) -> CertificateOwner {
        self.owner
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}
