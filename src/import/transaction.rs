//! Import transaction orchestrator
//!
//! Drives one run against the appliance:
//!
//! 1. validate the document locally
//! 2. `start` uploads it; on rejection the transaction is discarded unless forced
//! 3. `commit` with `async: true`
//! 4. poll `status` while the appliance answers busy
//!
//! Every phase needs both a 200 response and a business-level success flag
//! in the body before the next one begins.

use reqwest::Method;
use serde_json::Value;
use tokio::sync::watch;

use super::{ImportEvent, ImportOptions, ImportPayload, Phase, TransactionState};
use crate::api::endpoints::{self, paths};
use crate::api::ApiTransport;
use crate::error::{ClientError, ClientResult, ImportError, ImportResult};
use crate::models::{Envelope, TransactionId, TransactionRequest};

/// Result of a successful import run
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub transaction_id: Option<TransactionId>,
    pub entity_count: usize,
    /// Number of status requests issued
    pub status_checks: u32,
    /// Start diagnostics that force mode went past
    pub forced_diagnostics: Vec<String>,
}

/// One response, interpreted far enough to decide on the next step
struct Reply {
    envelope: Envelope,
    /// 200 received
    http_ok: bool,
    /// Raw body, or the full status line of a failed request, shown when the
    /// envelope has no diagnostics
    raw: String,
}

impl Reply {
    fn read(response: ClientResult<Value>) -> ImportResult<Self> {
        match response {
            Ok(body) => Ok(Self {
                envelope: Envelope::from_value(&body),
                http_ok: true,
                raw: raw_text(&body),
            }),
            Err(e @ ClientError::Status { .. }) => {
                let envelope = match &e {
                    ClientError::Status { body: Some(body), .. } => Envelope::from_value(body),
                    _ => Envelope::default(),
                };
                Ok(Self {
                    envelope,
                    http_ok: false,
                    raw: e.to_string(),
                })
            }
            Err(e) => Err(ImportError::Transport(e.to_string())),
        }
    }

    fn diagnostics(&self) -> Vec<String> {
        let diagnostics = self.envelope.diagnostics();
        if diagnostics.is_empty() {
            vec![self.raw.clone()]
        } else {
            diagnostics
        }
    }

    fn rejection(&self, phase: Phase) -> ImportError {
        ImportError::RemoteRejected {
            phase,
            diagnostics: self.diagnostics(),
        }
    }
}

fn raw_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Entity import orchestrator, one per run
pub struct Importer<'a, T> {
    transport: &'a T,
    options: ImportOptions,
    cancel: Option<watch::Receiver<bool>>,
    state: TransactionState,
}

impl<'a, T: ApiTransport> Importer<'a, T> {
    pub fn new(transport: &'a T, options: ImportOptions) -> Self {
        Self {
            transport,
            options,
            cancel: None,
            state: TransactionState::Validating,
        }
    }

    /// Stop polling once the channel flips to `true`
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Run the whole transaction for a JSON import document
    pub async fn run<F>(&mut self, input: &str, mut on_event: F) -> ImportResult<ImportOutcome>
    where
        F: FnMut(ImportEvent),
    {
        let result = self.drive(input, &mut on_event).await;

        if let Err(e) = &result {
            tracing::warn!("Import ended in {:?}: {}", self.state, e);
        }
        self.enter(
            TransactionState::Done {
                success: result.is_ok(),
            },
            &mut on_event,
        );

        result
    }

    async fn drive<F>(&mut self, input: &str, on_event: &mut F) -> ImportResult<ImportOutcome>
    where
        F: FnMut(ImportEvent),
    {
        self.enter(TransactionState::Validating, on_event);
        let payload = ImportPayload::parse(input)?;
        tracing::info!("Import document holds {} entities", payload.entity_count());
        on_event(ImportEvent::Passed(Phase::Validate));

        self.enter(TransactionState::Starting, on_event);
        let (transaction_id, forced_diagnostics) = self.start(&payload, on_event).await?;

        self.enter(TransactionState::Committing, on_event);
        self.commit(transaction_id.as_ref()).await?;
        on_event(ImportEvent::Passed(Phase::Commit));

        self.enter(TransactionState::Polling, on_event);
        let status_checks = self.poll(transaction_id.as_ref()).await?;
        on_event(ImportEvent::Passed(Phase::Status));

        Ok(ImportOutcome {
            transaction_id,
            entity_count: payload.entity_count(),
            status_checks,
            forced_diagnostics,
        })
    }

    fn enter<F>(&mut self, state: TransactionState, on_event: &mut F)
    where
        F: FnMut(ImportEvent),
    {
        tracing::debug!("Import state {:?} -> {:?}", self.state, state);
        self.state = state;
        on_event(ImportEvent::Entered(state));
    }

    /// Upload the document. Returns the transaction id to commit and, in
    /// force mode, the diagnostics that were ignored.
    async fn start<F>(
        &mut self,
        payload: &ImportPayload,
        on_event: &mut F,
    ) -> ImportResult<(Option<TransactionId>, Vec<String>)>
    where
        F: FnMut(ImportEvent),
    {
        let reply = Reply::read(
            self.transport
                .request(Method::PUT, paths::IMPORT_START, Some(payload.document()), &[])
                .await,
        )?;

        if reply.http_ok && reply.envelope.is_ok() {
            let id = reply.envelope.transaction_id().cloned().ok_or_else(|| {
                ImportError::Inconsistent {
                    phase: Phase::Start,
                    detail: "status OK without result.transactionId".into(),
                }
            })?;
            tracing::info!("Import transaction {} started", id);
            on_event(ImportEvent::Passed(Phase::Start));
            return Ok((Some(id), Vec::new()));
        }

        let diagnostics = reply.diagnostics();
        let transaction_id = reply.envelope.transaction_id().cloned();

        if !self.options.force {
            if let Some(id) = &transaction_id {
                self.enter(TransactionState::Discarding, on_event);
                self.discard(id).await;
            }
            return Err(ImportError::RemoteRejected {
                phase: Phase::Start,
                diagnostics,
            });
        }

        match &transaction_id {
            Some(id) => tracing::warn!("Start rejected, forcing commit of transaction {}", id),
            None => tracing::warn!("Start rejected without a transaction id, forcing commit anyway"),
        }
        on_event(ImportEvent::Forced {
            diagnostics: diagnostics.clone(),
        });

        Ok((transaction_id, diagnostics))
    }

    /// Best effort; a failed discard is logged and otherwise ignored
    async fn discard(&self, id: &TransactionId) {
        let body = TransactionRequest::new(Some(id));
        match self
            .transport
            .request(Method::DELETE, paths::IMPORT_DISCARD, Some(&body), &[])
            .await
        {
            Ok(reply) if Envelope::from_value(&reply).is_ok() => {
                tracing::info!("Discarded import transaction {}", id)
            }
            Ok(reply) => tracing::warn!(
                "Appliance did not confirm discard of import transaction {}: {}",
                id,
                reply
            ),
            Err(e) => tracing::warn!("Could not discard import transaction {}: {}", id, e),
        }
    }

    async fn commit(&self, id: Option<&TransactionId>) -> ImportResult<()> {
        let body = TransactionRequest::new(id);
        let reply = Reply::read(
            self.transport
                .request(Method::PUT, paths::IMPORT_COMMIT, Some(&body), &[])
                .await,
        )?;

        if reply.http_ok && reply.envelope.is_ok() {
            return Ok(());
        }
        Err(reply.rejection(Phase::Commit))
    }

    /// Poll status until the appliance is no longer busy. Returns the number
    /// of status requests issued.
    async fn poll(&mut self, id: Option<&TransactionId>) -> ImportResult<u32> {
        let query = endpoints::status_query(id);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let reply = Reply::read(
                self.transport
                    .request::<()>(Method::GET, paths::IMPORT_STATUS, None, &query)
                    .await,
            )?;

            if !(reply.http_ok && reply.envelope.is_busy()) {
                return self.finish(reply, attempts);
            }

            if let Some(max) = self.options.poll.max_attempts {
                if attempts >= max {
                    return Err(ImportError::Timeout { attempts });
                }
            }

            tracing::debug!("Appliance busy after status check {}", attempts);
            self.wait().await?;
        }
    }

    fn finish(&self, reply: Reply, attempts: u32) -> ImportResult<u32> {
        if reply.http_ok && reply.envelope.is_success() {
            tracing::info!("Import finished after {} status checks", attempts);
            return Ok(attempts);
        }

        if reply.http_ok
            && reply.envelope.success.is_none()
            && reply.envelope.diagnostics().is_empty()
        {
            return Err(ImportError::Inconsistent {
                phase: Phase::Status,
                detail: format!("no success flag in status response: {}", reply.raw),
            });
        }

        Err(reply.rejection(Phase::Status))
    }

    /// Sleep one poll interval, returning early with `Cancelled` if asked to
    async fn wait(&mut self) -> ImportResult<()> {
        let interval = self.options.poll.interval;

        let Some(cancel) = self.cancel.as_mut() else {
            tokio::time::sleep(interval).await;
            return Ok(());
        };

        if *cancel.borrow_and_update() {
            return Err(ImportError::Cancelled);
        }

        let woke = tokio::select! {
            _ = tokio::time::sleep(interval) => None,
            changed = cancel.changed() => Some(changed.is_ok()),
        };

        match woke {
            None => Ok(()),
            Some(true) if *cancel.borrow() => Err(ImportError::Cancelled),
            Some(true) => Ok(()),
            Some(false) => {
                // sender gone, nobody can cancel any more
                self.cancel = None;
                tokio::time::sleep(interval).await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::interpret_response;
    use crate::import::PollPolicy;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct Call {
        method: Method,
        endpoint: String,
        body: Option<Value>,
        query: Vec<(String, String)>,
    }

    /// Transport that replays canned responses and records every request
    #[derive(Default)]
    struct StubTransport {
        responses: Mutex<VecDeque<ClientResult<Value>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl StubTransport {
        fn with(responses: Vec<ClientResult<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_to(&self, endpoint: &str) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| c.endpoint == endpoint)
                .collect()
        }
    }

    impl ApiTransport for StubTransport {
        async fn request<B>(
            &self,
            method: Method,
            endpoint: &str,
            body: Option<&B>,
            query: &[(&str, String)],
        ) -> ClientResult<Value>
        where
            B: Serialize + ?Sized + Sync,
        {
            self.calls.lock().unwrap().push(Call {
                method,
                endpoint: endpoint.to_string(),
                body: body.map(|b| serde_json::to_value(b).unwrap()),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no canned response left for {}", endpoint))
        }
    }

    const DOCUMENT: &str =
        r#"{"version": 2, "entities": [{"new_name": "a1", "wwn": "50:AA:BB", "type": "fcport"}]}"#;

    fn fast_options(force: bool) -> ImportOptions {
        ImportOptions {
            force,
            poll: PollPolicy {
                interval: Duration::ZERO,
                max_attempts: Some(10),
            },
        }
    }

    fn started(id: &str) -> ClientResult<Value> {
        Ok(json!({"status": "OK", "result": {"transactionId": id}}))
    }

    fn committed() -> ClientResult<Value> {
        Ok(json!({"status": "OK"}))
    }

    fn busy() -> ClientResult<Value> {
        Ok(json!({"success": false, "status": "Busy"}))
    }

    fn done() -> ClientResult<Value> {
        Ok(json!({"success": true}))
    }

    async fn run(
        stub: &StubTransport,
        options: ImportOptions,
        input: &str,
    ) -> (ImportResult<ImportOutcome>, Vec<ImportEvent>) {
        let mut events = Vec::new();
        let result = Importer::new(stub, options)
            .run(input, |e| events.push(e))
            .await;
        (result, events)
    }

    #[tokio::test]
    async fn test_invalid_documents_send_nothing() {
        for input in [
            r#"{"entities": [{}]}"#,
            r#"{"version": 3, "entities": [{}]}"#,
            r#"{"version": 2, "entities": []}"#,
            "not json",
        ] {
            let stub = StubTransport::default();
            let (result, _) = run(&stub, fast_options(false), input).await;
            assert!(matches!(result, Err(ImportError::InvalidInput(_))), "{}", input);
            assert!(stub.calls().is_empty(), "{}", input);
        }
    }

    #[tokio::test]
    async fn test_full_run_polls_until_done() {
        let stub = StubTransport::with(vec![started("T1"), committed(), busy(), busy(), done()]);
        let (result, events) = run(&stub, fast_options(false), DOCUMENT).await;

        let outcome = result.unwrap();
        assert_eq!(outcome.transaction_id, Some(TransactionId::from("T1")));
        assert_eq!(outcome.status_checks, 3);
        assert_eq!(outcome.entity_count, 1);

        let calls = stub.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0].method, Method::PUT);
        assert_eq!(calls[0].endpoint, paths::IMPORT_START);
        assert_eq!(calls[0].body.as_ref().unwrap()["entities"][0]["new_name"], "a1");
        assert_eq!(calls[1].endpoint, paths::IMPORT_COMMIT);
        assert_eq!(calls[1].body, Some(json!({"async": true, "transactionId": "T1"})));

        let status = stub.calls_to(paths::IMPORT_STATUS);
        assert_eq!(status.len(), 3);
        assert!(status.iter().all(|c| c.method == Method::GET));
        assert_eq!(status[0].query, vec![("transactionId".to_string(), "T1".to_string())]);

        assert!(stub.calls_to(paths::IMPORT_DISCARD).is_empty());
        assert_eq!(
            events.last(),
            Some(&ImportEvent::Entered(TransactionState::Done { success: true }))
        );
        assert!(events.contains(&ImportEvent::Passed(Phase::Start)));
    }

    #[tokio::test]
    async fn test_rejected_start_is_discarded() {
        let stub = StubTransport::with(vec![
            Ok(json!({
                "status": "ERROR",
                "error": {"message": "Import file has errors"},
                "result": {"transactionId": "T2"}
            })),
            Ok(json!({"status": "OK"})),
        ]);
        let (result, events) = run(&stub, fast_options(false), DOCUMENT).await;

        match result {
            Err(ImportError::RemoteRejected { phase, diagnostics }) => {
                assert_eq!(phase, Phase::Start);
                assert_eq!(diagnostics, vec!["Import file has errors".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let discards = stub.calls_to(paths::IMPORT_DISCARD);
        assert_eq!(discards.len(), 1);
        assert_eq!(discards[0].method, Method::DELETE);
        assert_eq!(discards[0].body, Some(json!({"async": true, "transactionId": "T2"})));
        assert!(stub.calls_to(paths::IMPORT_COMMIT).is_empty());
        assert!(events.contains(&ImportEvent::Entered(TransactionState::Discarding)));
    }

    #[tokio::test]
    async fn test_failed_discard_is_not_escalated() {
        let stub = StubTransport::with(vec![
            Ok(json!({"status": "ERROR", "result": {"transactionId": 99}})),
            Err(ClientError::Transport("connection reset".into())),
        ]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        match result {
            Err(ImportError::RemoteRejected { phase, diagnostics }) => {
                assert_eq!(phase, Phase::Start);
                // no diagnostics in the envelope, so the raw body is shown
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics[0].contains("ERROR"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let discards = stub.calls_to(paths::IMPORT_DISCARD);
        assert_eq!(discards[0].body, Some(json!({"async": true, "transactionId": 99})));
    }

    #[tokio::test]
    async fn test_unconfirmed_discard_is_not_escalated() {
        let stub = StubTransport::with(vec![
            Ok(json!({"status": "ERROR", "error": {"message": "bad file"}, "result": {"transactionId": "T3"}})),
            Ok(json!({"status": "ERROR", "error": {"message": "unknown transaction"}})),
        ]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        match result {
            Err(ImportError::RemoteRejected { phase, diagnostics }) => {
                assert_eq!(phase, Phase::Start);
                assert_eq!(diagnostics, vec!["bad file".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(stub.calls_to(paths::IMPORT_DISCARD).len(), 1);
        assert!(stub.calls_to(paths::IMPORT_COMMIT).is_empty());
    }

    #[tokio::test]
    async fn test_start_not_found_with_empty_body_keeps_status_line() {
        let stub = StubTransport::with(vec![interpret_response(
            &Method::PUT,
            paths::IMPORT_START,
            404,
            "",
        )]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upload and verification failed: PUT to /api/v1/entitiesimport/start failed with status code 404 ()"
        );
        assert!(err.details().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_start_without_id_skips_discard() {
        let stub = StubTransport::with(vec![Ok(json!({"status": "ERROR"}))]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        assert!(matches!(result, Err(ImportError::RemoteRejected { .. })));
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_forced_start_commits_anyway() {
        let stub = StubTransport::with(vec![
            Ok(json!({
                "status": "ERROR",
                "result": {
                    "transactionId": "T2",
                    "entities": [{
                        "marker": {"message": "bad wwn", "location": {"line": 3, "column": 1}},
                        "name": "x",
                        "type": "fcport"
                    }]
                }
            })),
            committed(),
            done(),
        ]);
        let (result, events) = run(&stub, fast_options(true), DOCUMENT).await;

        let outcome = result.unwrap();
        assert_eq!(outcome.forced_diagnostics.len(), 3);
        assert!(stub.calls_to(paths::IMPORT_DISCARD).is_empty());

        let commits = stub.calls_to(paths::IMPORT_COMMIT);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].body, Some(json!({"async": true, "transactionId": "T2"})));
        assert!(events
            .iter()
            .any(|e| matches!(e, ImportEvent::Forced { diagnostics } if diagnostics.len() == 3)));
    }

    #[tokio::test]
    async fn test_forced_start_without_id_commits_null() {
        let stub = StubTransport::with(vec![
            Ok(json!({"status": "ERROR", "error": {"message": "rejected"}})),
            Ok(json!({"status": "ERROR", "errors": {"message": "transactionId is required"}})),
        ]);
        let (result, _) = run(&stub, fast_options(true), DOCUMENT).await;

        match result {
            Err(ImportError::RemoteRejected { phase, diagnostics }) => {
                assert_eq!(phase, Phase::Commit);
                assert_eq!(diagnostics, vec!["transactionId is required".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let commits = stub.calls_to(paths::IMPORT_COMMIT);
        assert_eq!(commits[0].body, Some(json!({"async": true, "transactionId": null})));
    }

    #[tokio::test]
    async fn test_start_http_error_keeps_body_diagnostics() {
        let stub = StubTransport::with(vec![
            Err(ClientError::Status {
                method: "PUT".into(),
                endpoint: paths::IMPORT_START.into(),
                status: 400,
                message: "400 body".into(),
                body: Some(json!({"error": {"message": "Malformed entity"}})),
            }),
        ]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        match result {
            Err(ImportError::RemoteRejected { diagnostics, .. }) => {
                assert_eq!(diagnostics, vec!["Malformed entity".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_transport_failure() {
        let stub = StubTransport::with(vec![Err(ClientError::Transport("timed out".into()))]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        assert!(matches!(result, Err(ImportError::Transport(m)) if m.contains("timed out")));
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_start_ok_without_id_is_inconsistent() {
        let stub = StubTransport::with(vec![Ok(json!({"status": "OK", "result": {}}))]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        assert!(matches!(
            result,
            Err(ImportError::Inconsistent {
                phase: Phase::Start,
                ..
            })
        ));
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejected() {
        let stub = StubTransport::with(vec![
            started("T1"),
            Ok(json!({"status": "ERROR", "errors": {"message": "Transaction expired"}})),
        ]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "File commit failed: Transaction expired");
        assert!(stub.calls_to(paths::IMPORT_STATUS).is_empty());
    }

    #[tokio::test]
    async fn test_import_failure_reported() {
        let stub = StubTransport::with(vec![
            started("T1"),
            committed(),
            busy(),
            Ok(json!({"success": false, "status": "Failed", "errors": {"message": "Duplicate name"}})),
        ]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "File import failed: Duplicate name");
        assert_eq!(stub.calls_to(paths::IMPORT_STATUS).len(), 2);
    }

    #[tokio::test]
    async fn test_status_without_success_flag_is_inconsistent() {
        let stub = StubTransport::with(vec![started("T1"), committed(), Ok(json!({"status": "Done"}))]);
        let (result, _) = run(&stub, fast_options(false), DOCUMENT).await;

        assert!(matches!(
            result,
            Err(ImportError::Inconsistent {
                phase: Phase::Status,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_poll_gives_up_after_max_attempts() {
        let mut responses = vec![started("T1"), committed()];
        responses.extend((0..3).map(|_| busy()));
        let stub = StubTransport::with(responses);

        let mut options = fast_options(false);
        options.poll.max_attempts = Some(3);
        let (result, _) = run(&stub, options, DOCUMENT).await;

        assert!(matches!(result, Err(ImportError::Timeout { attempts: 3 })));
        assert_eq!(stub.calls_to(paths::IMPORT_STATUS).len(), 3);
    }

    #[tokio::test]
    async fn test_poll_cancelled() {
        let stub = StubTransport::with(vec![started("T1"), committed(), busy()]);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();

        let mut importer = Importer::new(&stub, fast_options(false)).with_cancel(cancel_rx);
        let result = importer.run(DOCUMENT, |_| {}).await;

        assert!(matches!(result, Err(ImportError::Cancelled)));
        assert_eq!(importer.state(), TransactionState::Done { success: false });
        assert_eq!(stub.calls_to(paths::IMPORT_STATUS).len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_cancel_sender_keeps_polling() {
        let stub = StubTransport::with(vec![started("T1"), committed(), busy(), done()]);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        drop(cancel_tx);

        let mut importer = Importer::new(&stub, fast_options(false)).with_cancel(cancel_rx);
        let outcome = importer.run(DOCUMENT, |_| {}).await.unwrap();

        assert_eq!(outcome.status_checks, 2);
    }
}
