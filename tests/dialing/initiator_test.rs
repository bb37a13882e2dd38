//! Tests for the permission-gated call path.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rotary::dialing::{
    CallHandler, CallInitiator, CallOutcome, CommandDialer, DialError, TelUri,
};
use rotary::permissions::{Permission, PermissionDecision, PermissionGate, PermissionService};

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

/// Permission service with pre-seeded grants and scripted prompt answers.
struct ScriptedService {
    granted: Mutex<HashSet<Permission>>,
    answers: Mutex<VecDeque<PermissionDecision>>,
    prompts_shown: AtomicUsize,
}

impl ScriptedService {
    fn new(granted: &[Permission], answers: &[PermissionDecision]) -> Self {
        Self {
            granted: Mutex::new(granted.iter().copied().collect()),
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts_shown: AtomicUsize::new(0),
        }
    }

    fn prompts_shown(&self) -> usize {
        self.prompts_shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionService for ScriptedService {
    async fn status(&self, permission: Permission) -> bool {
        self.granted.lock().expect("lock").contains(&permission)
    }

    async fn prompt(&self, permission: Permission) -> PermissionDecision {
        self.prompts_shown.fetch_add(1, Ordering::SeqCst);
        let decision = self
            .answers
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(PermissionDecision::Denied);
        if decision.is_granted() {
            self.granted.lock().expect("lock").insert(permission);
        }
        decision
    }
}

/// Handler that records every URI it is asked to dial.
#[derive(Default)]
struct RecordingHandler {
    calls: Mutex<Vec<String>>,
}

impl RecordingHandler {
    fn dialed(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CallHandler for RecordingHandler {
    async fn place_call(&self, uri: &TelUri) -> Result<(), DialError> {
        self.calls.lock().expect("lock").push(uri.to_string());
        Ok(())
    }
}

/// Handler that always fails.
struct FailingHandler;

#[async_trait]
impl CallHandler for FailingHandler {
    async fn place_call(&self, _uri: &TelUri) -> Result<(), DialError> {
        Err(DialError::HandlerUnconfigured)
    }
}

fn initiator_with(
    service: Arc<ScriptedService>,
    handler: Arc<dyn CallHandler>,
) -> CallInitiator {
    let gate = PermissionGate::new(service);
    CallInitiator::new(gate, handler)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn granted_number_dispatches_without_prompt() {
    let service = Arc::new(ScriptedService::new(&[Permission::PlaceCall], &[]));
    let handler = Arc::new(RecordingHandler::default());
    let initiator = initiator_with(service.clone(), handler.clone());

    let outcome = initiator.call("5551234").await;

    assert_eq!(outcome, CallOutcome::Dispatched);
    assert_eq!(handler.dialed(), vec!["tel:5551234".to_owned()]);
    assert_eq!(service.prompts_shown(), 0);
}

#[tokio::test]
async fn prompt_grant_dispatches_once() {
    let service = Arc::new(ScriptedService::new(&[], &[PermissionDecision::Granted]));
    let handler = Arc::new(RecordingHandler::default());
    let initiator = initiator_with(service.clone(), handler.clone());

    let outcome = initiator.call("5551234").await;

    assert_eq!(outcome, CallOutcome::Dispatched);
    assert_eq!(handler.dialed().len(), 1);
    assert_eq!(service.prompts_shown(), 1);
}

#[tokio::test]
async fn prompt_denial_suppresses_the_call() {
    let service = Arc::new(ScriptedService::new(&[], &[PermissionDecision::Denied]));
    let handler = Arc::new(RecordingHandler::default());
    let initiator = initiator_with(service.clone(), handler.clone());

    let outcome = initiator.call("5551234").await;

    assert_eq!(outcome, CallOutcome::Suppressed);
    assert!(handler.dialed().is_empty());
    assert_eq!(service.prompts_shown(), 1);
}

#[tokio::test]
async fn blank_number_suppresses_without_prompting() {
    let service = Arc::new(ScriptedService::new(&[], &[PermissionDecision::Granted]));
    let handler = Arc::new(RecordingHandler::default());
    let initiator = initiator_with(service.clone(), handler.clone());

    let outcome = initiator.call("   ").await;

    assert_eq!(outcome, CallOutcome::Suppressed);
    assert!(handler.dialed().is_empty());
    // An unusable number never reaches the permission layer.
    assert_eq!(service.prompts_shown(), 0);
}

#[tokio::test]
async fn handler_failure_is_suppressed() {
    let service = Arc::new(ScriptedService::new(&[Permission::PlaceCall], &[]));
    let initiator = initiator_with(service.clone(), Arc::new(FailingHandler));

    let outcome = initiator.call("5551234").await;

    assert_eq!(outcome, CallOutcome::Suppressed);
}

#[tokio::test]
async fn command_dialer_runs_the_configured_argv() {
    let dialer = CommandDialer::new(vec!["true".to_owned()]);
    let uri = TelUri::new("5551234").expect("valid number");

    dialer.place_call(&uri).await.expect("spawn should succeed");
}
