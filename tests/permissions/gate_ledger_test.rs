//! Tests for the gate and grant ledger working end to end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;

use rotary::permissions::{
    GrantLedger, LedgerPermissions, Permission, PermissionDecision, PermissionGate, PromptRequest,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gate over a ledger file, with a spawned answerer standing in for the UI.
///
/// Every prompt is counted and resolved with `answer`.
fn scripted_gate(
    ledger_path: PathBuf,
    answer: PermissionDecision,
    prompts_seen: Arc<AtomicUsize>,
) -> PermissionGate {
    let ledger = GrantLedger::new(ledger_path);
    let (prompts_tx, mut prompts_rx) = mpsc::unbounded_channel::<PromptRequest>();
    tokio::spawn(async move {
        while let Some(request) = prompts_rx.recv().await {
            prompts_seen.fetch_add(1, Ordering::SeqCst);
            let _ = request.responder.send(answer);
        }
    });
    PermissionGate::new(Arc::new(LedgerPermissions::new(ledger, prompts_tx)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_grant_persists_across_instances() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("grants.toml");
    let prompts = Arc::new(AtomicUsize::new(0));

    let gate = scripted_gate(
        path.clone(),
        PermissionDecision::Granted,
        Arc::clone(&prompts),
    );
    assert!(!gate.check(Permission::ReadCallLog).await);
    assert!(gate.ensure(Permission::ReadCallLog).await.is_granted());
    assert_eq!(prompts.load(Ordering::SeqCst), 1);

    // A fresh stack over the same file sees the grant without prompting,
    // even though this answerer would deny.
    let gate = scripted_gate(path, PermissionDecision::Denied, Arc::clone(&prompts));
    assert!(gate.check(Permission::ReadCallLog).await);
    assert!(gate.ensure(Permission::ReadCallLog).await.is_granted());
    assert_eq!(prompts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn denial_is_never_persisted() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("grants.toml");
    let prompts = Arc::new(AtomicUsize::new(0));

    let gate = scripted_gate(
        path.clone(),
        PermissionDecision::Denied,
        Arc::clone(&prompts),
    );
    assert!(!gate.ensure(Permission::ReadContacts).await.is_granted());
    assert!(!path.exists(), "a denial must not create the ledger file");

    // The next sensitive action asks again.
    assert!(!gate.ensure(Permission::ReadContacts).await.is_granted());
    assert_eq!(prompts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn grants_are_scoped_per_permission() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("grants.toml");
    let prompts = Arc::new(AtomicUsize::new(0));

    let gate = scripted_gate(
        path,
        PermissionDecision::Granted,
        Arc::clone(&prompts),
    );
    assert!(gate.ensure(Permission::ReadCallLog).await.is_granted());

    // Only the granted permission sticks.
    assert!(gate.check(Permission::ReadCallLog).await);
    assert!(!gate.check(Permission::ReadContacts).await);
    assert!(!gate.check(Permission::PlaceCall).await);
}

#[tokio::test]
async fn closed_prompt_channel_denies() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = GrantLedger::new(dir.path().join("grants.toml"));
    let (prompts_tx, prompts_rx) = mpsc::unbounded_channel();
    drop(prompts_rx);

    let gate = PermissionGate::new(Arc::new(LedgerPermissions::new(ledger, prompts_tx)));
    assert!(!gate.ensure(Permission::PlaceCall).await.is_granted());
}
