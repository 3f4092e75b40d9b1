//! End-to-end interview flows.
//!
//! Drives the real workflow definition through the application handlers
//! with in-memory infrastructure: a buyer/seller interview from start to
//! completion, the company and rural branches, waive-versus-present
//! behavior, stale and concurrent submissions, and resumption from a
//! reloaded session.

use std::sync::Arc;

use deed_scribe::adapters::{FixedExtractionGateway, InMemorySessionStore, JsonFileSessionStore};
use deed_scribe::application::handlers::interview::{
    InterviewError, ProcessStepCommand, ProcessStepHandler, RetryPolicy, SessionLockRegistry,
    StartInterviewHandler,
};
use deed_scribe::domain::certificate::{CertificateKind, CertificateOwner};
use deed_scribe::domain::foundation::{RawFieldMap, SessionId};
use deed_scribe::domain::party::{MaritalStatus, PartyKind};
use deed_scribe::domain::session::Session;
use deed_scribe::domain::workflow::{flow, NextStep, ResponsePayload};
use deed_scribe::ports::SessionStore;

// =============================================================================
// Test harness
// =============================================================================

fn identity_fields() -> RawFieldMap {
    let mut raw = RawFieldMap::new();
    raw.insert("full_name".into(), "Jo Doe".into());
    raw.insert("person_id".into(), "52998224725".into());
    raw.insert("birth_date".into(), "13/08/1961".into());
    raw
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: std::time::Duration::from_millis(1),
        multiplier: 2.0,
    }
}

/// Run with `RUST_LOG=deed_scribe=debug` to see the engine's transitions.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Drives one session through the interview, recording every visited step.
struct Harness {
    handler: ProcessStepHandler,
    store: Arc<InMemorySessionStore>,
    gateway: Arc<FixedExtractionGateway>,
    session_id: SessionId,
    seq: u64,
    visited: Vec<String>,
    complete: bool,
}

impl Harness {
    async fn start() -> Self {
        Self::start_with_gateway(FixedExtractionGateway::new().with_fallback(identity_fields()))
            .await
    }

    async fn start_with_gateway(gateway: FixedExtractionGateway) -> Self {
        init_tracing();
        let store = Arc::new(InMemorySessionStore::new());
        let gateway = Arc::new(gateway);
        let started = StartInterviewHandler::new(flow::workflow(), store.clone())
            .handle()
            .await
            .unwrap();
        let handler = ProcessStepHandler::new(
            flow::workflow(),
            store.clone(),
            gateway.clone(),
            Arc::new(SessionLockRegistry::new()),
            fast_retry(),
        );
        Self {
            handler,
            store,
            gateway,
            session_id: started.session_id,
            seq: started.step_seq,
            visited: vec![started.prompt.step.to_string()],
            complete: false,
        }
    }

    async fn submit(&mut self, response: ResponsePayload) {
        let result = self
            .handler
            .handle(ProcessStepCommand {
                session_id: self.session_id,
                step_seq: self.seq,
                response,
            })
            .await
            .unwrap_or_else(|e| panic!("step {} failed at seq {}: {e}", self.current(), self.seq));
        self.seq = result.step_seq;
        match result.next {
            NextStep::Prompt(prompt) => self.visited.push(prompt.step.to_string()),
            NextStep::Complete => self.complete = true,
        }
    }

    async fn answer(&mut self, value: &str) {
        self.submit(ResponsePayload::Choice(value.into())).await;
    }

    async fn text(&mut self, value: &str) {
        self.submit(ResponsePayload::Text(value.into())).await;
    }

    async fn upload(&mut self, filename: &str) {
        self.submit(ResponsePayload::File {
            bytes: vec![0xFF, 0xD8, 0xFF],
            filename: filename.into(),
        })
        .await;
    }

    fn current(&self) -> &str {
        self.visited.last().map(String::as_str).unwrap_or("")
    }

    fn saw(&self, step: &str) -> bool {
        self.visited.iter().any(|s| s == step)
    }

    async fn session(&self) -> Session {
        self.store.load(self.session_id).await.unwrap()
    }

    /// Answers the party flow for one unmarried individual who waives the
    /// birth record, then declines to add another party of that role.
    async fn minimal_individual_party(&mut self) {
        self.answer("individual").await;
        self.upload("id.png").await;
        self.answer("unmarried").await;
        self.answer("waive").await;
        self.answer("no").await;
    }

    /// Waives the four per-seller clearances and exits the loop.
    async fn waive_all_clearances(&mut self) {
        for _ in 0..4 {
            self.answer("waive").await;
        }
        self.answer("no").await;
    }

    /// Finishes the payment phase.
    async fn pay(&mut self) {
        self.text("R$ 250.000,00").await;
        self.answer("cash").await;
        self.answer("bank-transfer").await;
    }
}

// =============================================================================
// Scenario A: unmarried individuals go to the birth record, never marriage
// =============================================================================

#[tokio::test]
async fn unmarried_buyer_routes_to_birth_record_never_marriage() {
    let mut h = Harness::start().await;

    h.answer("individual").await;
    h.upload("id.png").await;
    assert_eq!(h.current(), "buyer-marital-status");

    h.answer("unmarried").await;
    assert_eq!(h.current(), "buyer-birth-record-choice");

    h.answer("present").await;
    h.upload("birth.pdf").await;
    assert_eq!(h.current(), "more-buyers");

    assert!(!h.saw("buyer-marriage-record-choice"));
    assert!(!h.saw("buyer-spouse-signs"));

    let session = h.session().await;
    let cert = session
        .certificate(CertificateKind::BirthRecord, CertificateOwner::buyer(0))
        .unwrap();
    assert!(cert.is_presented());
}

// =============================================================================
// Scenario B: company sellers skip every marital and spouse step
// =============================================================================

#[tokio::test]
async fn company_seller_skips_marital_and_spouse_steps() {
    let mut h = Harness::start().await;
    h.minimal_individual_party().await; // buyers
    assert_eq!(h.current(), "seller-kind");

    h.answer("company").await;
    assert_eq!(h.current(), "seller-company-upload");
    h.upload("registry.pdf").await;
    assert_eq!(h.current(), "more-sellers");
    h.answer("no").await;
    assert_eq!(h.current(), "title-deed-upload");

    assert!(!h.saw("seller-marital-status"));
    assert!(!h.saw("seller-spouse-signs"));
    assert!(!h.saw("seller-marriage-record-choice"));
    assert!(!h.saw("seller-birth-record-choice"));

    let session = h.session().await;
    assert_eq!(session.sellers()[0].kind(), PartyKind::Company);
    assert!(session.sellers()[0].marital_status().is_none());
    assert!(session.sellers()[0].spouse().is_none());
}

// =============================================================================
// Scenario C: the subdivision fork
// =============================================================================

async fn rural_harness_at_subdivision() -> Harness {
    let mut h = Harness::start().await;
    h.minimal_individual_party().await; // buyers
    h.minimal_individual_party().await; // sellers
    h.upload("deed.pdf").await; // title deed
    h.waive_all_clearances().await;
    assert_eq!(h.current(), "property-kind");

    h.answer("rural").await;
    h.answer("waive").await; // rural tax
    h.upload("registry.pdf").await; // land registry
    h.answer("waive").await; // environmental clearance
    assert_eq!(h.current(), "subdivision-choice");
    h
}

#[tokio::test]
async fn subdivision_yes_visits_survey_and_plan_before_payment() {
    let mut h = rural_harness_at_subdivision().await;

    h.answer("yes").await;
    assert_eq!(h.current(), "subdivision-survey-upload");
    h.upload("survey.pdf").await;
    assert_eq!(h.current(), "subdivision-plan-upload");
    h.upload("plan.pdf").await;
    assert_eq!(h.current(), "property-value");

    h.pay().await;
    assert!(h.complete);

    let session = h.session().await;
    assert!(session
        .certificate(CertificateKind::SubdivisionSurvey, CertificateOwner::Property)
        .is_some());
    assert!(session
        .certificate(CertificateKind::SubdivisionPlan, CertificateOwner::Property)
        .is_some());
    assert_eq!(session.subdivision(), Some(true));
}

#[tokio::test]
async fn subdivision_no_reaches_payment_directly() {
    let mut h = rural_harness_at_subdivision().await;

    h.answer("no").await;
    assert_eq!(h.current(), "property-value");
    assert!(!h.saw("subdivision-survey-upload"));
    assert!(!h.saw("subdivision-plan-upload"));

    h.pay().await;
    assert!(h.complete);

    let session = h.session().await;
    assert!(session
        .certificate(CertificateKind::SubdivisionSurvey, CertificateOwner::Property)
        .is_none());
    assert_eq!(session.subdivision(), Some(false));
}

// =============================================================================
// Scenario D: waive records an entry with no extraction; present extracts once
// =============================================================================

#[tokio::test]
async fn waive_creates_entry_without_extraction_present_extracts_once() {
    let mut h = Harness::start().await;
    h.minimal_individual_party().await;
    h.minimal_individual_party().await;

    let calls_before_deed = h.gateway.call_count();
    h.upload("deed.pdf").await; // title deed, one extraction
    assert_eq!(h.gateway.call_count(), calls_before_deed + 1);

    // Waive the federal clearance: an entry appears, no gateway call.
    let calls = h.gateway.call_count();
    h.answer("waive").await;
    assert_eq!(h.gateway.call_count(), calls);
    let session = h.session().await;
    let cert = session
        .certificate(CertificateKind::FederalClearance, CertificateOwner::seller(0))
        .unwrap();
    assert!(!cert.is_presented());
    assert!(cert.fields().is_empty());

    // Present the state clearance: exactly one extraction call.
    h.answer("present").await;
    let calls = h.gateway.call_count();
    h.upload("state.pdf").await;
    assert_eq!(h.gateway.call_count(), calls + 1);
    let session = h.session().await;
    let cert = session
        .certificate(CertificateKind::StateClearance, CertificateOwner::seller(0))
        .unwrap();
    assert!(cert.is_presented());
}

// =============================================================================
// Scenario E: concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_process_step_calls_are_serialized() {
    let store = Arc::new(InMemorySessionStore::new());
    let started = StartInterviewHandler::new(flow::workflow(), store.clone())
        .handle()
        .await
        .unwrap();
    let handler = Arc::new(ProcessStepHandler::new(
        flow::workflow(),
        store.clone(),
        Arc::new(FixedExtractionGateway::new().with_fallback(identity_fields())),
        Arc::new(SessionLockRegistry::new()),
        fast_retry(),
    ));

    let mut tasks = Vec::new();
    for value in ["individual", "company"] {
        let handler = handler.clone();
        let id = started.session_id;
        tasks.push(tokio::spawn(async move {
            handler
                .handle(ProcessStepCommand {
                    session_id: id,
                    step_seq: 0,
                    response: ResponsePayload::Choice(value.into()),
                })
                .await
        }));
    }

    let mut ok = 0;
    let mut stale = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => ok += 1,
            Err(InterviewError::Stale(_)) => stale += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((ok, stale), (1, 1));

    // One winner: exactly one buyer exists, never a merge of both attempts.
    let session = store.load(started.session_id).await.unwrap();
    assert_eq!(session.buyers().len(), 1);
    assert_eq!(session.step_seq(), 1);
}

// =============================================================================
// Full urban interview, certificate inventory, and invariants
// =============================================================================

#[tokio::test]
async fn full_urban_interview_collects_a_consistent_certificate_set() {
    let mut h = Harness::start().await;

    // Married buyer whose spouse signs.
    h.answer("individual").await;
    h.upload("id.png").await;
    h.answer("married").await;
    h.answer("present").await;
    h.upload("marriage.pdf").await;
    h.answer("yes").await;
    h.upload("spouse-id.png").await;
    h.answer("no").await; // no more buyers

    // Two individual sellers.
    h.answer("individual").await;
    h.upload("seller1.png").await;
    h.answer("unmarried").await;
    h.answer("waive").await;
    h.answer("yes").await; // another seller
    h.answer("individual").await;
    h.upload("seller2.png").await;
    h.answer("unmarried").await;
    h.answer("waive").await;
    h.answer("no").await;

    h.upload("deed.pdf").await;

    // Clearance loop: first seller presents federal, waives the rest.
    h.answer("present").await;
    h.upload("federal.pdf").await;
    h.answer("waive").await;
    h.answer("waive").await;
    h.answer("waive").await;
    h.answer("yes").await; // continue with seller #2
    h.waive_all_clearances().await;

    h.answer("urban").await;
    h.answer("present").await;
    h.upload("property-tax.pdf").await;
    h.answer("waive").await; // liens
    h.answer("waive").await; // condominium
    h.pay().await;
    assert!(h.complete);

    let session = h.session().await;
    assert_eq!(session.buyers().len(), 1);
    assert_eq!(session.sellers().len(), 2);
    assert_eq!(
        session.buyers()[0].marital_status(),
        Some(MaritalStatus::Married)
    );
    assert!(session.buyers()[0].spouse().unwrap().signs_deed);
    assert!(!session.buyers()[0].spouse().unwrap().identity.is_empty());

    // Every applicable certificate has exactly one entry per owner.
    let expected = [
        (CertificateKind::MarriageRecord, CertificateOwner::buyer(0), true),
        (CertificateKind::BirthRecord, CertificateOwner::seller(0), false),
        (CertificateKind::BirthRecord, CertificateOwner::seller(1), false),
        (CertificateKind::TitleDeed, CertificateOwner::Property, true),
        (CertificateKind::FederalClearance, CertificateOwner::seller(0), true),
        (CertificateKind::StateClearance, CertificateOwner::seller(0), false),
        (CertificateKind::MunicipalClearance, CertificateOwner::seller(0), false),
        (CertificateKind::LaborClearance, CertificateOwner::seller(0), false),
        (CertificateKind::FederalClearance, CertificateOwner::seller(1), false),
        (CertificateKind::StateClearance, CertificateOwner::seller(1), false),
        (CertificateKind::MunicipalClearance, CertificateOwner::seller(1), false),
        (CertificateKind::LaborClearance, CertificateOwner::seller(1), false),
        (CertificateKind::PropertyTax, CertificateOwner::Property, true),
        (CertificateKind::Liens, CertificateOwner::Property, false),
        (CertificateKind::Condominium, CertificateOwner::Property, false),
    ];
    assert_eq!(session.certificates().len(), expected.len());
    for (kind, owner, presented) in expected {
        let cert = session
            .certificate(kind, owner)
            .unwrap_or_else(|| panic!("missing {kind} for {owner}"));
        assert_eq!(cert.is_presented(), presented, "{kind} for {owner}");
    }

    // No duplicate (kind, owner) pairs.
    let mut pairs: Vec<_> = session
        .certificates()
        .iter()
        .map(|c| (c.kind(), c.owner()))
        .collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), session.certificates().len());

    // Payment answers landed.
    assert_eq!(session.answer("property-value"), Some("R$ 250.000,00"));
    assert_eq!(session.answer("payment-form"), Some("cash"));
    assert_eq!(session.answer("payment-method"), Some("bank-transfer"));

    // History covers every applied step and the sequence counter agrees.
    assert_eq!(session.history().len() as u64, session.step_seq());
}

// =============================================================================
// Resumption: a session survives a store round trip mid-interview
// =============================================================================

#[tokio::test]
async fn interview_resumes_identically_from_a_reloaded_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileSessionStore::new(dir.path()));
    let gateway = Arc::new(FixedExtractionGateway::new().with_fallback(identity_fields()));
    let started = StartInterviewHandler::new(flow::workflow(), store.clone())
        .handle()
        .await
        .unwrap();

    let handler = ProcessStepHandler::new(
        flow::workflow(),
        store.clone(),
        gateway.clone(),
        Arc::new(SessionLockRegistry::new()),
        fast_retry(),
    );
    handler
        .handle(ProcessStepCommand {
            session_id: started.session_id,
            step_seq: 0,
            response: ResponsePayload::Choice("individual".into()),
        })
        .await
        .unwrap();
    handler
        .handle(ProcessStepCommand {
            session_id: started.session_id,
            step_seq: 1,
            response: ResponsePayload::File {
                bytes: vec![1, 2, 3],
                filename: "id.png".into(),
            },
        })
        .await
        .unwrap();

    let before = store.load(started.session_id).await.unwrap();

    // A second process picks the session up from disk.
    let second_store = Arc::new(JsonFileSessionStore::new(dir.path()));
    let reloaded = second_store.load(started.session_id).await.unwrap();
    assert_eq!(reloaded, before);
    assert_eq!(reloaded.current_step(), before.current_step());
    assert_eq!(reloaded.buyers(), before.buyers());
    assert_eq!(reloaded.certificates(), before.certificates());

    let second_handler = ProcessStepHandler::new(
        flow::workflow(),
        second_store.clone(),
        gateway,
        Arc::new(SessionLockRegistry::new()),
        fast_retry(),
    );
    let result = second_handler
        .handle(ProcessStepCommand {
            session_id: started.session_id,
            step_seq: reloaded.step_seq(),
            response: ResponsePayload::Choice("unmarried".into()),
        })
        .await
        .unwrap();
    assert!(matches!(result.next, NextStep::Prompt(ref p) if p.step == "buyer-birth-record-choice"));
}

// =============================================================================
// Failed extraction leaves the step resubmittable with identical results
// =============================================================================

#[tokio::test]
async fn failed_upload_can_be_resubmitted_with_the_same_outcome() {
    // Retry budget of 3 is exhausted by 5 scripted failures, then the
    // resubmission's calls succeed.
    let mut h = Harness::start_with_gateway(
        FixedExtractionGateway::new()
            .with_fallback(identity_fields())
            .failing_first(5),
    )
    .await;

    h.answer("individual").await;

    let err = h
        .handler
        .handle(ProcessStepCommand {
            session_id: h.session_id,
            step_seq: h.seq,
            response: ResponsePayload::File {
                bytes: vec![1],
                filename: "id.png".into(),
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InterviewError::Extraction { attempts: 3, .. }));

    // Untouched session, same step, same sequence number.
    let session = h.session().await;
    assert_eq!(session.current_step().as_str(), "buyer-identity-upload");
    assert_eq!(session.step_seq(), h.seq);

    // Resubmitting the same upload now succeeds and merges once.
    h.upload("id.png").await;
    let session = h.session().await;
    assert_eq!(session.buyers()[0].full_name(), Some("Jo Doe"));
    assert_eq!(session.current_step().as_str(), "buyer-marital-status");
}
