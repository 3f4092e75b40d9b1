//! Party entities: the buyers and sellers of the deal.
//!
//! A party is either an individual or a company. Only individuals carry
//! marital status and a spouse sub-record; the constructors and mutators
//! keep company parties free of both.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::FieldMap;
use crate::domain::session::EntityError;

/// Which side of the deal a party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Buyer,
    Seller,
}

impl PartyRole {
    /// Kebab-case slug used in step names and answer keys.
    pub fn slug(&self) -> &'static str {
        match self {
            PartyRole::Buyer => "buyer",
            PartyRole::Seller => "seller",
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Legal nature of a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Individual,
    Company,
}

/// Marital status of an individual party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Married,
    Unmarried,
}

/// Spouse sub-record for a married individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseRecord {
    /// Whether the spouse will sign the deed.
    pub signs_deed: bool,
    /// Identity fields extracted from the spouse's document.
    pub identity: FieldMap,
}

impl SpouseRecord {
    pub fn new(signs_deed: bool) -> Self {
        Self {
            signs_deed,
            identity: FieldMap::new(),
        }
    }
}

/// One buyer or seller.
///
/// # Invariants
///
/// - Company parties never carry marital status or a spouse record.
/// - `identity` is only populated by a successful file-upload step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    kind: PartyKind,
    marital_status: Option<MaritalStatus>,
    spouse: Option<SpouseRecord>,
    identity: FieldMap,
}

impl Party {
    /// Creates an individual party with nothing recorded yet.
    pub fn individual() -> Self {
        Self {
            kind: PartyKind::Individual,
            marital_status: None,
            spouse: None,
            identity: FieldMap::new(),
        }
    }

    /// Creates a company party.
    pub fn company() -> Self {
        Self {
            kind: PartyKind::Company,
            marital_status: None,
            spouse: None,
            identity: FieldMap::new(),
        }
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    pub fn marital_status(&self) -> Option<MaritalStatus> {
        self.marital_status
    }

    pub fn spouse(&self) -> Option<&SpouseRecord> {
        self.spouse.as_ref()
    }

    pub fn identity(&self) -> &FieldMap {
        &self.identity
    }

    /// Display name taken from the extracted identity fields, if present.
    pub fn full_name(&self) -> Option<&str> {
        self.identity.get("full_name").and_then(|v| v.as_text())
    }

    /// Records the marital status of an individual party.
    ///
    /// # Errors
    ///
    /// - `CompanyMaritalStatus` for company parties
    pub fn set_marital_status(&mut self, status: MaritalStatus) -> Result<(), EntityError> {
        if self.kind == PartyKind::Company {
            return Err(EntityError::CompanyMaritalStatus);
        }
        self.marital_status = Some(status);
        Ok(())
    }

    /// Creates the spouse record with the signs-deed flag.
    ///
    /// # Errors
    ///
    /// - `CompanySpouse` for company parties
    /// - `MaritalStatusMissing` if marital status has not been recorded as married
    pub fn record_spouse(&mut self, signs_deed: bool) -> Result<(), EntityError> {
        if self.kind == PartyKind::Company {
            return Err(EntityError::CompanySpouse);
        }
        if self.marital_status != Some(MaritalStatus::Married) {
            return Err(EntityError::MaritalStatusMissing);
        }
        self.spouse = Some(SpouseRecord::new(signs_deed));
        Ok(())
    }

    /// Merges extracted identity fields into the party.
    pub fn merge_identity(&mut self, fields: FieldMap) {
        self.identity.extend(fields);
    }

    /// Merges extracted identity fields into the spouse record.
    ///
    /// # Errors
    ///
    /// - `SpouseMissing` if no spouse record has been created
    pub fn merge_spouse_identity(&mut self, fields: FieldMap) -> Result<(), EntityError> {
        match self.spouse.as_mut() {
            Some(spouse) => {
                spouse.identity.extend(fields);
                Ok(())
            }
            None => Err(EntityError::SpouseMissing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FieldValue;

    fn name_fields(name: &str) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("full_name".into(), FieldValue::Text(name.into()));
        fields
    }

    #[test]
    fn new_individual_has_nothing_recorded() {
        let party = Party::individual();
        assert_eq!(party.kind(), PartyKind::Individual);
        assert!(party.marital_status().is_none());
        assert!(party.spouse().is_none());
        assert!(party.identity().is_empty());
    }

    #[test]
    fn company_rejects_marital_status() {
        let mut party = Party::company();
        let result = party.set_marital_status(MaritalStatus::Married);
        assert_eq!(result, Err(EntityError::CompanyMaritalStatus));
    }

    #[test]
    fn company_rejects_spouse_record() {
        let mut party = Party::company();
        assert_eq!(party.record_spouse(true), Err(EntityError::CompanySpouse));
    }

    #[test]
    fn spouse_requires_married_status() {
        let mut party = Party::individual();
        assert_eq!(party.record_spouse(true), Err(EntityError::MaritalStatusMissing));

        party.set_marital_status(MaritalStatus::Unmarried).unwrap();
        assert_eq!(party.record_spouse(true), Err(EntityError::MaritalStatusMissing));

        party.set_marital_status(MaritalStatus::Married).unwrap();
        party.record_spouse(false).unwrap();
        assert!(!party.spouse().unwrap().signs_deed);
    }

    #[test]
    fn merge_spouse_identity_requires_spouse_record() {
        let mut party = Party::individual();
        party.set_marital_status(MaritalStatus::Married).unwrap();
        assert_eq!(
            party.merge_spouse_identity(name_fields("Ana")),
            Err(EntityError::SpouseMissing)
        );

        party.record_spouse(true).unwrap();
        party.merge_spouse_identity(name_fields("Ana")).unwrap();
        assert_eq!(
            party.spouse().unwrap().identity.get("full_name"),
            Some(&FieldValue::Text("Ana".into()))
        );
    }

    #[test]
    fn merge_identity_extends_existing_fields() {
        let mut party = Party::individual();
        party.merge_identity(name_fields("Jo Doe"));
        let mut more = FieldMap::new();
        more.insert("person_id".into(), FieldValue::Text("123".into()));
        party.merge_identity(more);

        assert_eq!(party.full_name(), Some("Jo Doe"));
        assert_eq!(party.identity().len(), 2);
    }

    #[test]
    fn role_slugs_are_kebab_case() {
        assert_eq!(PartyRole::Buyer.slug(), "buyer");
        assert_eq!(PartyRole::Seller.to_string(), "seller");
    }
}
