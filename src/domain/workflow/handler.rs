//! Step handlers.
//!
//! Four handler kinds share one contract: render a prompt, validate a
//! response, and apply the response's effect to the session. The kinds are
//! a closed set so the build-time checks in `WorkflowBuilder` can reason
//! about every variant.
//!
//! Handlers are parameterized data, not per-step implementations: the same
//! `FileUpload` variant serves every upload step and the same
//! `DynamicQuestion` variant serves every certificate choice, bound to a
//! certificate kind and owner scope at registration.

use serde::{Deserialize, Serialize};

use crate::domain::certificate::{Certificate, CertificateKind, CertificateOwner};
use crate::domain::foundation::{FieldMap, StepName, ValidationError};
use crate::domain::party::PartyRole;
use crate::domain::sanitize;
use crate::domain::session::{EntityError, ResponseSummary, Session};

use super::{vocab, EngineError};

/// What the caller submitted for the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePayload {
    /// One of a closed option set.
    Choice(String),
    /// Free text.
    Text(String),
    /// Raw document bytes plus the original filename.
    File { bytes: Vec<u8>, filename: String },
}

impl ResponsePayload {
    /// The literal used for transition evaluation. Open-ended responses
    /// never drive conditional routing, so they reduce to the empty string.
    pub fn literal(&self) -> &str {
        match self {
            ResponsePayload::Choice(value) => value,
            _ => "",
        }
    }

    /// Reduction of the response for the session history.
    pub fn summary(&self) -> ResponseSummary {
        match self {
            ResponsePayload::Choice(value) => ResponseSummary::Choice(value.clone()),
            ResponsePayload::Text(value) => ResponseSummary::Text(value.clone()),
            ResponsePayload::File { filename, .. } => ResponseSummary::File {
                filename: filename.clone(),
            },
        }
    }
}

/// Rendering payload for one step, handed to whatever hosts the interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPrompt {
    pub step: StepName,
    pub question: String,
    /// Offered option literals; empty for text and file steps.
    pub options: Vec<String>,
    pub requires_file: bool,
    pub placeholder: Option<String>,
    pub file_description: Option<String>,
    /// Human-readable position, e.g. "step 12 of about 50".
    pub progress: String,
}

/// Validation rule for free-text steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    NonEmpty,
    Numeric,
    Date,
    Monetary,
}

impl TextRule {
    pub fn check(&self, text: &str) -> Result<(), ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        match self {
            TextRule::NonEmpty => Ok(()),
            TextRule::Numeric => {
                if trimmed.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(ValidationError::NotNumeric {
                        got: trimmed.to_string(),
                    })
                }
            }
            TextRule::Date => {
                if sanitize::parse_date(trimmed).is_some() {
                    Ok(())
                } else {
                    Err(ValidationError::NotADate {
                        got: trimmed.to_string(),
                    })
                }
            }
            TextRule::Monetary => {
                if sanitize::parse_money_cents(trimmed).is_some() {
                    Ok(())
                } else {
                    Err(ValidationError::NotMonetary {
                        got: trimmed.to_string(),
                    })
                }
            }
        }
    }
}

/// Hint passed to the extraction gateway alongside the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentHint {
    IdentityDocument,
    CompanyRegistry,
    Certificate(CertificateKind),
}

/// Which certificate owner a step binds to, resolved against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    /// The deal itself.
    Property,
    /// The party most recently added for a role.
    CurrentParty(PartyRole),
    /// The seller the clearance loop is currently on.
    ClearanceSeller,
}

impl OwnerScope {
    pub fn resolve(&self, session: &Session) -> Result<CertificateOwner, EntityError> {
        match self {
            OwnerScope::Property => Ok(CertificateOwner::Property),
            OwnerScope::CurrentParty(role) => Ok(CertificateOwner::Party {
                role: *role,
                index: session.current_party_index(*role)?,
            }),
            OwnerScope::ClearanceSeller => {
                let index = session.clearance_seller();
                let count = session.sellers().len();
                if index >= count {
                    Err(EntityError::ClearanceCursorOutOfRange { index, count })
                } else {
                    Ok(CertificateOwner::seller(index))
                }
            }
        }
    }

    /// Display name for prompts, preferring the extracted full name.
    fn describe(&self, session: &Session) -> String {
        match self.resolve(session) {
            Ok(CertificateOwner::Party { role, index }) => session
                .parties(role)
                .get(index)
                .and_then(|p| p.full_name())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} #{}", role, index + 1)),
            _ => "the property".to_string(),
        }
    }
}

/// Where extracted fields from a file upload are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeTarget {
    PartyIdentity(PartyRole),
    SpouseIdentity(PartyRole),
    Certificate {
        kind: CertificateKind,
        owner: OwnerScope,
    },
}

/// Session mutation a non-upload step performs on accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptEffect {
    /// History only; nothing else recorded.
    None,
    /// Store the raw response in the answers map under a stable key.
    RecordAnswer(&'static str),
    /// Append a new party; the response literal selects its kind.
    BeginParty(PartyRole),
    /// Record marital status on the current party of a role.
    SetMaritalStatus(PartyRole),
    /// Create the spouse record with the signs-deed flag.
    RecordSpouseSigns(PartyRole),
    /// On waive, record the certificate as waived. Presenting defers entry
    /// creation to the upload step that follows.
    RecordCertificateChoice {
        kind: CertificateKind,
        owner: OwnerScope,
    },
    /// Record whether the property is urban or rural.
    SetPropertyKind,
    /// Record the subdivision answer.
    SetSubdivision,
    /// On yes, move the clearance loop to the next seller.
    AdvanceClearanceSeller,
}

impl AcceptEffect {
    fn apply(&self, session: &mut Session, literal: &str) -> Result<(), EngineError> {
        match self {
            AcceptEffect::None => Ok(()),
            AcceptEffect::RecordAnswer(key) => {
                session.record_answer(*key, literal);
                Ok(())
            }
            AcceptEffect::BeginParty(role) => {
                let kind = vocab::party_kind(literal)?;
                session.begin_party(*role, kind);
                Ok(())
            }
            AcceptEffect::SetMaritalStatus(role) => {
                let status = vocab::marital_status(literal)?;
                session.set_marital_status(*role, status)?;
                Ok(())
            }
            AcceptEffect::RecordSpouseSigns(role) => {
                let signs = vocab::yes_no(literal)?;
                session.record_spouse(*role, signs)?;
                Ok(())
            }
            AcceptEffect::RecordCertificateChoice { kind, owner } => {
                if !vocab::presents(literal)? {
                    let owner = owner.resolve(session)?;
                    session.add_certificate(Certificate::waived(*kind, owner))?;
                }
                Ok(())
            }
            AcceptEffect::SetPropertyKind => {
                let kind = vocab::property_kind(literal)?;
                session.set_property_kind(kind);
                Ok(())
            }
            AcceptEffect::SetSubdivision => {
                let subdivision = vocab::yes_no(literal)?;
                session.set_subdivision(subdivision);
                Ok(())
            }
            AcceptEffect::AdvanceClearanceSeller => {
                if vocab::yes_no(literal)? {
                    session.advance_clearance_seller()?;
                }
                Ok(())
            }
        }
    }
}

/// Prompt computation for steps whose wording depends on session state.
///
/// The generated option set is always a subset of the options registered
/// for the step; validation runs against the generated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicPrompt {
    /// "Is buyer #2 an individual or a company?"
    PartyKind(PartyRole),
    /// "1 buyer recorded so far. Add another?"
    MoreParties(PartyRole),
    /// "Present the federal debt clearance for seller #1, or waive it?"
    CertificateChoice {
        kind: CertificateKind,
        owner: OwnerScope,
    },
    /// "Clearances recorded for seller 1 of 2. Continue with the next?"
    /// Narrows to `no` once the last seller is done.
    NextSellerClearances,
}

impl DynamicPrompt {
    fn render(&self, session: &Session, registered: &[&'static str]) -> (String, Vec<String>) {
        let owned = |opts: &[&str]| opts.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        match self {
            DynamicPrompt::PartyKind(role) => {
                let ordinal = session.parties(*role).len() + 1;
                (
                    format!("Is {} #{} an individual or a company?", role, ordinal),
                    owned(registered),
                )
            }
            DynamicPrompt::MoreParties(role) => {
                let count = session.parties(*role).len();
                (
                    format!("{} {}(s) recorded so far. Add another {}?", count, role, role),
                    owned(registered),
                )
            }
            DynamicPrompt::CertificateChoice { kind, owner } => (
                format!(
                    "Present the {} for {}, or waive it?",
                    kind.label(),
                    owner.describe(session)
                ),
                owned(registered),
            ),
            DynamicPrompt::NextSellerClearances => {
                let current = session.clearance_seller() + 1;
                let total = session.sellers().len();
                let options = if current < total {
                    owned(registered)
                } else {
                    owned(&[vocab::NO])
                };
                (
                    format!(
                        "Clearances recorded for seller {} of {}. Continue with the next seller?",
                        current, total
                    ),
                    options,
                )
            }
        }
    }
}

/// One of the four step handler kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepHandler {
    /// Fixed question over a closed option set.
    Question {
        question: String,
        options: &'static [&'static str],
        effect: AcceptEffect,
    },
    /// Question whose wording or option set is computed from session state.
    DynamicQuestion {
        prompt: DynamicPrompt,
        options: &'static [&'static str],
        effect: AcceptEffect,
    },
    /// Free text, checked by a validation rule.
    TextInput {
        question: String,
        placeholder: Option<String>,
        rule: TextRule,
        effect: AcceptEffect,
    },
    /// Document upload. The only handler kind with a suspending external
    /// call; the engine runs the extraction and hands the sanitized fields
    /// into `accept`.
    FileUpload {
        description: String,
        hint: DocumentHint,
        target: MergeTarget,
    },
}

impl StepHandler {
    pub fn requires_file(&self) -> bool {
        matches!(self, StepHandler::FileUpload { .. })
    }

    /// The registered closed option set, if this handler offers one.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            StepHandler::Question { options, .. }
            | StepHandler::DynamicQuestion { options, .. } => Some(*options),
            _ => None,
        }
    }

    /// The extraction hint, for file-upload handlers.
    pub fn document_hint(&self) -> Option<DocumentHint> {
        match self {
            StepHandler::FileUpload { hint, .. } => Some(*hint),
            _ => None,
        }
    }

    /// Renders the prompt for this step against the current session.
    pub fn prompt(&self, session: &Session, step: &StepName, progress: String) -> StepPrompt {
        match self {
            StepHandler::Question {
                question, options, ..
            } => StepPrompt {
                step: step.clone(),
                question: question.clone(),
                options: options.iter().map(|s| s.to_string()).collect(),
                requires_file: false,
                placeholder: None,
                file_description: None,
                progress,
            },
            StepHandler::DynamicQuestion {
                prompt, options, ..
            } => {
                let (question, options) = prompt.render(session, options);
                StepPrompt {
                    step: step.clone(),
                    question,
                    options,
                    requires_file: false,
                    placeholder: None,
                    file_description: None,
                    progress,
                }
            }
            StepHandler::TextInput {
                question,
                placeholder,
                ..
            } => StepPrompt {
                step: step.clone(),
                question: question.clone(),
                options: Vec::new(),
                requires_file: false,
                placeholder: placeholder.clone(),
                file_description: None,
                progress,
            },
            StepHandler::FileUpload { description, .. } => StepPrompt {
                step: step.clone(),
                question: format!("Upload the {}.", description),
                options: Vec::new(),
                requires_file: true,
                placeholder: None,
                file_description: Some(description.clone()),
                progress,
            },
        }
    }

    /// Validates a response against this handler. Never mutates the session.
    pub fn validate(
        &self,
        session: &Session,
        response: &ResponsePayload,
    ) -> Result<(), ValidationError> {
        match self {
            StepHandler::Question { options, .. } => match response {
                ResponsePayload::Choice(value) => {
                    if options.contains(&value.as_str()) {
                        Ok(())
                    } else {
                        Err(ValidationError::NotAnOption {
                            offered: options.iter().map(|s| s.to_string()).collect(),
                            got: value.clone(),
                        })
                    }
                }
                _ => Err(ValidationError::WrongResponseKind { expected: "choice" }),
            },
            StepHandler::DynamicQuestion {
                prompt, options, ..
            } => match response {
                ResponsePayload::Choice(value) => {
                    let (_, generated) = prompt.render(session, options);
                    if generated.iter().any(|o| o == value) {
                        Ok(())
                    } else {
                        Err(ValidationError::NotAnOption {
                            offered: generated,
                            got: value.clone(),
                        })
                    }
                }
                _ => Err(ValidationError::WrongResponseKind { expected: "choice" }),
            },
            StepHandler::TextInput { rule, .. } => match response {
                ResponsePayload::Text(value) => rule.check(value),
                _ => Err(ValidationError::WrongResponseKind { expected: "text" }),
            },
            StepHandler::FileUpload { .. } => match response {
                ResponsePayload::File { bytes, filename } => {
                    if bytes.is_empty() {
                        Err(ValidationError::EmptyFile)
                    } else if filename.trim().is_empty() {
                        Err(ValidationError::MissingFilename)
                    } else {
                        Ok(())
                    }
                }
                _ => Err(ValidationError::WrongResponseKind { expected: "file" }),
            },
        }
    }

    /// Applies the response to the session.
    ///
    /// The caller must have validated the response first. For file uploads,
    /// `extracted` carries the sanitized fields from the extraction
    /// gateway; for every other kind it must be `None`.
    pub fn accept(
        &self,
        session: &mut Session,
        response: &ResponsePayload,
        extracted: Option<FieldMap>,
    ) -> Result<(), EngineError> {
        match self {
            StepHandler::Question { effect, .. }
            | StepHandler::DynamicQuestion { effect, .. } => {
                effect.apply(session, response.literal())
            }
            StepHandler::TextInput { effect, .. } => {
                let text = match response {
                    ResponsePayload::Text(value) => value.trim(),
                    _ => return Err(ValidationError::WrongResponseKind { expected: "text" }.into()),
                };
                effect.apply(session, text)
            }
            StepHandler::FileUpload { target, .. } => {
                let fields = extracted.ok_or(EngineError::MissingExtraction)?;
                match target {
                    MergeTarget::PartyIdentity(role) => {
                        session.merge_party_identity(*role, fields)?;
                    }
                    MergeTarget::SpouseIdentity(role) => {
                        session.merge_spouse_identity(*role, fields)?;
                    }
                    MergeTarget::Certificate { kind, owner } => {
                        let owner = owner.resolve(session)?;
                        session.add_certificate(Certificate::presented(*kind, owner, fields))?;
                    }
                }
                Ok(())
            }
        }
    }
}
