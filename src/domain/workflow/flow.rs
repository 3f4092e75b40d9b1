//! The deed interview graph.
//!
//! Single source of truth for the complete flow: every step, handler
//! binding, and transition is registered here declaratively. The buyer and
//! seller loops share one registration helper, and every certificate step
//! is an instance of the same parameterized choice/upload pair.
//!
//! Phases, in order: buyer loop, seller loop, title deed, per-seller
//! clearances, property facts (urban or rural, subdivision), payment.
//! Property-fact questions come after the clearance loop so that each fork
//! in the graph hangs off the step whose response drives it.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::domain::certificate::CertificateKind;
use crate::domain::party::PartyRole;

use super::{
    vocab, AcceptEffect, ConfigurationError, DocumentHint, DynamicPrompt, MergeTarget,
    OwnerScope, StepDefinition, StepHandler, TextRule, TransitionRule, WorkflowBuilder,
    WorkflowDefinition,
};

/// Fixed step names referenced across phases and from tests.
pub mod steps {
    pub const ENTRY: &str = "buyer-kind";
    pub const TITLE_DEED_UPLOAD: &str = "title-deed-upload";
    pub const MORE_SELLER_CLEARANCES: &str = "more-seller-clearances";
    pub const PROPERTY_KIND: &str = "property-kind";
    pub const LAND_REGISTRY_UPLOAD: &str = "land-registry-upload";
    pub const SUBDIVISION_CHOICE: &str = "subdivision-choice";
    pub const SUBDIVISION_SURVEY_UPLOAD: &str = "subdivision-survey-upload";
    pub const SUBDIVISION_PLAN_UPLOAD: &str = "subdivision-plan-upload";
    pub const PROPERTY_VALUE: &str = "property-value";
    pub const PAYMENT_FORM: &str = "payment-form";
    pub const PAYMENT_METHOD: &str = "payment-method";
    pub const COMPLETE: &str = "complete";
}

/// Step name for a role-scoped step, e.g. `buyer-marital-status`.
pub fn party_step(role: PartyRole, suffix: &str) -> String {
    format!("{}-{}", role.slug(), suffix)
}

/// Step name of the "add another party?" step for a role.
pub fn more_parties_step(role: PartyRole) -> String {
    format!("more-{}s", role.slug())
}

/// Step name of a certificate's present-or-waive step.
pub fn certificate_choice_step(kind: CertificateKind) -> String {
    format!("{}-choice", kind.slug())
}

/// Step name of a certificate's upload step.
pub fn certificate_upload_step(kind: CertificateKind) -> String {
    format!("{}-upload", kind.slug())
}

fn choice_of(
    name: &str,
    kind: CertificateKind,
    owner: OwnerScope,
    on_present: &str,
    on_waive: &str,
) -> StepDefinition {
    StepDefinition::new(
        name,
        StepHandler::DynamicQuestion {
            prompt: DynamicPrompt::CertificateChoice { kind, owner },
            options: vocab::PRESENT_WAIVE,
            effect: AcceptEffect::RecordCertificateChoice { kind, owner },
        },
        TransitionRule::when(vec![(vocab::PRESENT, on_present), (vocab::WAIVE, on_waive)]),
    )
}

fn upload_of(
    name: &str,
    description: String,
    kind: CertificateKind,
    owner: OwnerScope,
    next: &str,
) -> StepDefinition {
    StepDefinition::new(
        name,
        StepHandler::FileUpload {
            description,
            hint: DocumentHint::Certificate(kind),
            target: MergeTarget::Certificate { kind, owner },
        },
        TransitionRule::always(next),
    )
}

/// Registers the eleven-step flow for one party role.
///
/// Individuals go through identity upload, marital status, the applicable
/// civil-record certificate, and the spouse questions. Companies route
/// from their registry upload straight to the "add another?" step; the
/// graph itself skips every marital and spouse step for them.
fn register_party_flow(builder: WorkflowBuilder, role: PartyRole, exit: &str) -> WorkflowBuilder {
    let kind_step = party_step(role, "kind");
    let identity_upload = party_step(role, "identity-upload");
    let company_upload = party_step(role, "company-upload");
    let marital_status = party_step(role, "marital-status");
    let birth_choice = party_step(role, "birth-record-choice");
    let birth_upload = party_step(role, "birth-record-upload");
    let marriage_choice = party_step(role, "marriage-record-choice");
    let marriage_upload = party_step(role, "marriage-record-upload");
    let spouse_signs = party_step(role, "spouse-signs");
    let spouse_upload = party_step(role, "spouse-identity-upload");
    let more = more_parties_step(role);

    builder
        .register(StepDefinition::new(
            &kind_step,
            StepHandler::DynamicQuestion {
                prompt: DynamicPrompt::PartyKind(role),
                options: vocab::PARTY_KINDS,
                effect: AcceptEffect::BeginParty(role),
            },
            TransitionRule::when(vec![
                (vocab::INDIVIDUAL, identity_upload.as_str()),
                (vocab::COMPANY, company_upload.as_str()),
            ]),
        ))
        .register(StepDefinition::new(
            &identity_upload,
            StepHandler::FileUpload {
                description: format!("identity document of the {}", role),
                hint: DocumentHint::IdentityDocument,
                target: MergeTarget::PartyIdentity(role),
            },
            TransitionRule::always(marital_status.as_str()),
        ))
        .register(StepDefinition::new(
            &company_upload,
            StepHandler::FileUpload {
                description: format!("company registry certificate of the {}", role),
                hint: DocumentHint::CompanyRegistry,
                target: MergeTarget::PartyIdentity(role),
            },
            TransitionRule::always(more.as_str()),
        ))
        .register(StepDefinition::new(
            &marital_status,
            StepHandler::Question {
                question: format!("What is the {}'s marital status?", role),
                options: vocab::MARITAL_STATUSES,
                effect: AcceptEffect::SetMaritalStatus(role),
            },
            TransitionRule::when(vec![
                (vocab::MARRIED, marriage_choice.as_str()),
                (vocab::UNMARRIED, birth_choice.as_str()),
            ]),
        ))
        .register(choice_of(
            &birth_choice,
            CertificateKind::BirthRecord,
            OwnerScope::CurrentParty(role),
            birth_upload.as_str(),
            more.as_str(),
        ))
        .register(upload_of(
            &birth_upload,
            format!("birth record of the {}", role),
            CertificateKind::BirthRecord,
            OwnerScope::CurrentParty(role),
            more.as_str(),
        ))
        .register(choice_of(
            &marriage_choice,
            CertificateKind::MarriageRecord,
            OwnerScope::CurrentParty(role),
            marriage_upload.as_str(),
            spouse_signs.as_str(),
        ))
        .register(upload_of(
            &marriage_upload,
            format!("marriage record of the {}", role),
            CertificateKind::MarriageRecord,
            OwnerScope::CurrentParty(role),
            spouse_signs.as_str(),
        ))
        .register(StepDefinition::new(
            &spouse_signs,
            StepHandler::Question {
                question: format!("Will the {}'s spouse sign the deed?", role),
                options: vocab::YES_NO,
                effect: AcceptEffect::RecordSpouseSigns(role),
            },
            TransitionRule::when(vec![
                (vocab::YES, spouse_upload.as_str()),
                (vocab::NO, more.as_str()),
            ]),
        ))
        .register(StepDefinition::new(
            &spouse_upload,
            StepHandler::FileUpload {
                description: format!("identity document of the {}'s spouse", role),
                hint: DocumentHint::IdentityDocument,
                target: MergeTarget::SpouseIdentity(role),
            },
            TransitionRule::always(more.as_str()),
        ))
        .register(StepDefinition::new(
            &more,
            StepHandler::DynamicQuestion {
                prompt: DynamicPrompt::MoreParties(role),
                options: vocab::YES_NO,
                effect: AcceptEffect::None,
            },
            TransitionRule::when(vec![(vocab::YES, kind_step.as_str()), (vocab::NO, exit)]),
        ))
}

/// Registers a chain of present-or-waive certificate pairs. Each choice
/// routes to its own upload on present and to the next pair on waive; the
/// last pair exits to `exit`.
fn register_certificate_chain(
    mut builder: WorkflowBuilder,
    chain: &[CertificateKind],
    owner: OwnerScope,
    owner_label: &str,
    exit: &str,
) -> WorkflowBuilder {
    for (i, kind) in chain.iter().enumerate() {
        let next = match chain.get(i + 1) {
            Some(following) => certificate_choice_step(*following),
            None => exit.to_string(),
        };
        let choice = certificate_choice_step(*kind);
        let upload = certificate_upload_step(*kind);
        builder = builder
            .register(choice_of(&choice, *kind, owner, upload.as_str(), next.as_str()))
            .register(upload_of(
                &upload,
                format!("{} {}", kind.label(), owner_label),
                *kind,
                owner,
                next.as_str(),
            ));
    }
    builder
}

/// Per-seller clearances collected in one loop pass.
const SELLER_CLEARANCES: [CertificateKind; 4] = [
    CertificateKind::FederalClearance,
    CertificateKind::StateClearance,
    CertificateKind::MunicipalClearance,
    CertificateKind::LaborClearance,
];

/// Property certificates on the urban branch.
const URBAN_CERTIFICATES: [CertificateKind; 3] = [
    CertificateKind::PropertyTax,
    CertificateKind::Liens,
    CertificateKind::Condominium,
];

/// Builds the complete deed interview definition.
pub fn build_workflow() -> Result<WorkflowDefinition, ConfigurationError> {
    let mut builder = WorkflowBuilder::new()
        .entry(steps::ENTRY)
        .terminal(steps::COMPLETE);

    builder = register_party_flow(builder, PartyRole::Buyer, "seller-kind");
    builder = register_party_flow(builder, PartyRole::Seller, steps::TITLE_DEED_UPLOAD);

    // Title deed is the one document every deal must present.
    builder = builder.register(upload_of(
        steps::TITLE_DEED_UPLOAD,
        "title deed of the property".to_string(),
        CertificateKind::TitleDeed,
        OwnerScope::Property,
        certificate_choice_step(SELLER_CLEARANCES[0]).as_str(),
    ));

    builder = register_certificate_chain(
        builder,
        &SELLER_CLEARANCES,
        OwnerScope::ClearanceSeller,
        "of the seller",
        steps::MORE_SELLER_CLEARANCES,
    );

    builder = builder.register(StepDefinition::new(
        steps::MORE_SELLER_CLEARANCES,
        StepHandler::DynamicQuestion {
            prompt: DynamicPrompt::NextSellerClearances,
            options: vocab::YES_NO,
            effect: AcceptEffect::AdvanceClearanceSeller,
        },
        TransitionRule::when(vec![
            (vocab::YES, certificate_choice_step(SELLER_CLEARANCES[0]).as_str()),
            (vocab::NO, steps::PROPERTY_KIND),
        ]),
    ));

    builder = builder.register(StepDefinition::new(
        steps::PROPERTY_KIND,
        StepHandler::Question {
            question: "Is the property urban or rural?".to_string(),
            options: vocab::PROPERTY_KINDS,
            effect: AcceptEffect::SetPropertyKind,
        },
        TransitionRule::when(vec![
            (vocab::URBAN, certificate_choice_step(URBAN_CERTIFICATES[0]).as_str()),
            (vocab::RURAL, certificate_choice_step(CertificateKind::RuralTax).as_str()),
        ]),
    ));

    builder = register_certificate_chain(
        builder,
        &URBAN_CERTIFICATES,
        OwnerScope::Property,
        "of the property",
        steps::PROPERTY_VALUE,
    );

    // Rural branch: tax clearance, then the mandatory registry document,
    // then environmental clearance, then the subdivision fork.
    builder = register_certificate_chain(
        builder,
        &[CertificateKind::RuralTax],
        OwnerScope::Property,
        "of the property",
        steps::LAND_REGISTRY_UPLOAD,
    );
    builder = builder.register(upload_of(
        steps::LAND_REGISTRY_UPLOAD,
        "rural land registry certificate of the property".to_string(),
        CertificateKind::LandRegistry,
        OwnerScope::Property,
        certificate_choice_step(CertificateKind::EnvironmentalClearance).as_str(),
    ));
    builder = register_certificate_chain(
        builder,
        &[CertificateKind::EnvironmentalClearance],
        OwnerScope::Property,
        "of the property",
        steps::SUBDIVISION_CHOICE,
    );

    builder = builder
        .register(StepDefinition::new(
            steps::SUBDIVISION_CHOICE,
            StepHandler::Question {
                question: "Does the conveyance subdivide the rural property?".to_string(),
                options: vocab::YES_NO,
                effect: AcceptEffect::SetSubdivision,
            },
            TransitionRule::when(vec![
                (vocab::YES, steps::SUBDIVISION_SURVEY_UPLOAD),
                (vocab::NO, steps::PROPERTY_VALUE),
            ]),
        ))
        .register(upload_of(
            steps::SUBDIVISION_SURVEY_UPLOAD,
            "subdivision survey of the property".to_string(),
            CertificateKind::SubdivisionSurvey,
            OwnerScope::Property,
            steps::SUBDIVISION_PLAN_UPLOAD,
        ))
        .register(upload_of(
            steps::SUBDIVISION_PLAN_UPLOAD,
            "subdivision plan of the property".to_string(),
            CertificateKind::SubdivisionPlan,
            OwnerScope::Property,
            steps::PROPERTY_VALUE,
        ));

    builder = builder
        .register(StepDefinition::new(
            steps::PROPERTY_VALUE,
            StepHandler::TextInput {
                question: "Enter the agreed property value (for example 250000.00).".to_string(),
                placeholder: Some("0.00".to_string()),
                rule: TextRule::Monetary,
                effect: AcceptEffect::RecordAnswer("property-value"),
            },
            TransitionRule::always(steps::PAYMENT_FORM),
        ))
        .register(StepDefinition::new(
            steps::PAYMENT_FORM,
            StepHandler::Question {
                question: "How is the price being paid?".to_string(),
                options: vocab::PAYMENT_FORMS,
                effect: AcceptEffect::RecordAnswer("payment-form"),
            },
            TransitionRule::always(steps::PAYMENT_METHOD),
        ))
        .register(StepDefinition::new(
            steps::PAYMENT_METHOD,
            StepHandler::Question {
                question: "Payment method?".to_string(),
                options: vocab::PAYMENT_METHODS,
                effect: AcceptEffect::RecordAnswer("payment-method"),
            },
            TransitionRule::always(steps::COMPLETE),
        ));

    builder.build()
}

static WORKFLOW: Lazy<Arc<WorkflowDefinition>> = Lazy::new(|| {
    // An inconsistent definition is fatal; refuse to start.
    match build_workflow() {
        Ok(definition) => Arc::new(definition),
        Err(err) => panic!("deed interview definition failed to build: {err}"),
    }
});

/// The process-wide interview definition. Built once, immutable afterward.
pub fn workflow() -> Arc<WorkflowDefinition> {
    Arc::clone(&WORKFLOW)
}
