//! End-to-end pipeline scenarios against in-memory store, queue, provider and
//! notifier stubs. The Postgres implementations must honor the same trait
//! contracts these stubs implement.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common_types::{Contact, ReportJob, ReportStatus, Stage};
use language_model::{Completion, CompletionClient, CompletionRequest, ProviderError, ProviderResult};
use report_pipeline::{
    execute_stage, sweep, DeliveryError, ModelRouter, Notifier, PipelineContext, ReportEmail,
    ReportStore, StageError, StageOutcome, StageQueue, StoreError,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct InMemoryStore {
    jobs: Mutex<HashMap<Uuid, ReportJob>>,
    contacts: Mutex<HashMap<Uuid, Contact>>,
    answers: Mutex<HashMap<Uuid, Value>>,
}

impl InMemoryStore {
    fn insert_job(&self, contact: Contact, answers: Value) -> Uuid {
        let id = Uuid::new_v4();
        let job = ReportJob {
            id,
            quiz_response_id: Uuid::new_v4(),
            status: ReportStatus::Pending,
            stage1_output: None,
            stage2_output: None,
            stage3_output: None,
            stage4_output: None,
            access_token: format!("tok-{id}"),
            failed_at_stage: None,
            error_message: None,
            version: 0,
            email_sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.jobs.lock().unwrap().insert(id, job);
        self.contacts.lock().unwrap().insert(id, contact);
        self.answers.lock().unwrap().insert(id, answers);
        id
    }

    fn job(&self, id: Uuid) -> ReportJob {
        self.jobs.lock().unwrap().get(&id).cloned().expect("job exists")
    }

    fn age_job(&self, id: Uuid, by: Duration) {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id).expect("job exists");
        job.updated_at -= by;
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn fetch(&self, report_id: Uuid) -> Result<ReportJob, StoreError> {
        self.jobs
            .lock()
            .unwrap()
            .get(&report_id)
            .cloned()
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn fetch_by_token(&self, access_token: &str) -> Result<Option<ReportJob>, StoreError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .find(|job| job.access_token == access_token)
            .cloned())
    }

    async fn set_status(
        &self,
        report_id: Uuid,
        expected_version: i32,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&report_id).ok_or(StoreError::NotFound(report_id))?;
        if job.version != expected_version {
            return Err(StoreError::VersionConflict {
                report_id,
                expected: expected_version,
            });
        }
        if !job.status.can_transition(status) {
            return Err(StoreError::InvalidTransition {
                report_id,
                from: job.status,
                to: status,
            });
        }
        job.status = status;
        job.version += 1;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn save_stage_output(
        &self,
        report_id: Uuid,
        expected_version: i32,
        stage: Stage,
        output: &Value,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&report_id).ok_or(StoreError::NotFound(report_id))?;
        if job.version != expected_version {
            return Err(StoreError::VersionConflict {
                report_id,
                expected: expected_version,
            });
        }
        if !job.status.can_transition(status) {
            return Err(StoreError::InvalidTransition {
                report_id,
                from: job.status,
                to: status,
            });
        }
        match stage {
            Stage::ProblemAnalysis => job.stage1_output = Some(output.clone()),
            Stage::ToolResearch => job.stage2_output = Some(output.clone()),
            Stage::ToolCuration => job.stage3_output = Some(output.clone()),
            Stage::ReportGeneration => job.stage4_output = Some(output.clone()),
        }
        job.status = status;
        job.version += 1;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn mark_failed(
        &self,
        report_id: Uuid,
        stage: Stage,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&report_id).ok_or(StoreError::NotFound(report_id))?;
        if job.status == ReportStatus::Completed {
            return Ok(());
        }
        job.status = ReportStatus::Failed;
        job.failed_at_stage = Some(stage.number());
        job.error_message = Some(message.to_string());
        job.version += 1;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_email_sent(&self, report_id: Uuid) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&report_id).ok_or(StoreError::NotFound(report_id))?;
        job.email_sent_at = Some(Utc::now());
        Ok(())
    }

    async fn contact(&self, report_id: Uuid) -> Result<Contact, StoreError> {
        self.contacts
            .lock()
            .unwrap()
            .get(&report_id)
            .cloned()
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn quiz_answers(&self, report_id: Uuid) -> Result<Value, StoreError> {
        self.answers
            .lock()
            .unwrap()
            .get(&report_id)
            .cloned()
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn unsettled(&self, limit: i64) -> Result<Vec<ReportJob>, StoreError> {
        let mut jobs: Vec<ReportJob> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.status != ReportStatus::Completed)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.updated_at);
        jobs.truncate(limit as usize);
        Ok(jobs)
    }
}

struct QueuedRun {
    report_id: Uuid,
    stage: Stage,
    force: bool,
    done: bool,
}

#[derive(Default)]
struct InMemoryQueue {
    runs: Mutex<Vec<QueuedRun>>,
}

impl InMemoryQueue {
    /// Pop every not-yet-claimed run, in enqueue order.
    fn drain(&self) -> Vec<(Uuid, Stage, bool)> {
        let mut runs = self.runs.lock().unwrap();
        runs.iter_mut()
            .filter(|r| !r.done)
            .map(|r| {
                r.done = true;
                (r.report_id, r.stage, r.force)
            })
            .collect()
    }
}

#[async_trait]
impl StageQueue for InMemoryQueue {
    async fn enqueue(
        &self,
        report_id: Uuid,
        stage: Stage,
        force: bool,
        _delay: Duration,
    ) -> Result<bool, StoreError> {
        let mut runs = self.runs.lock().unwrap();
        if runs
            .iter()
            .any(|r| !r.done && r.report_id == report_id && r.stage == stage)
        {
            return Ok(false);
        }
        runs.push(QueuedRun {
            report_id,
            stage,
            force,
            done: false,
        });
        Ok(true)
    }
}

enum Reply {
    Content(String),
    Fail,
}

/// Completion client fed a per-model script of replies; records every prompt.
#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    fn script(&self, model: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
    }

    fn prompts_for(&self, model: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == model)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<Completion> {
        self.prompts
            .lock()
            .unwrap()
            .push((request.model.clone(), request.prompt.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.model)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Content(content)) => Ok(Completion { content }),
            Some(Reply::Fail) | None => Err(ProviderError::EmptyCompletion),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<ReportEmail>>,
    fail: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, email: &ReportEmail) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Send("scripted outage".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

struct Harness {
    ctx: PipelineContext,
    store: Arc<InMemoryStore>,
    queue: Arc<InMemoryQueue>,
    client: Arc<ScriptedClient>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let queue = Arc::new(InMemoryQueue::default());
        let client = Arc::new(ScriptedClient::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let models = ModelRouter::new(client.clone(), client.clone());
        let ctx = PipelineContext::new(
            settings(),
            store.clone(),
            queue.clone(),
            models,
            notifier.clone(),
        );
        Self {
            ctx,
            store,
            queue,
            client,
            notifier,
        }
    }

    fn submit(&self) -> Uuid {
        let contact = Contact {
            email: "dana@example.com".to_string(),
            name: "Dana Vermeer".to_string(),
        };
        let answers = json!({
            "industry": "logistics",
            "teamSize": "11-50",
            "biggestTimeSink": "manual dispatch planning"
        });
        self.store.insert_job(contact, answers)
    }

    fn script_happy_path(&self) {
        self.client
            .script("model-1", Reply::Content(stage1_json().to_string()));
        self.client
            .script("model-2", Reply::Content(stage2_json().to_string()));
        self.client
            .script("model-3", Reply::Content(stage3_json().to_string()));
        self.client
            .script("model-4", Reply::Content(stage4_json().to_string()));
    }

    /// Run queued stage jobs until the queue stays empty, like the worker
    /// loop would.
    async fn run_until_idle(&self) {
        loop {
            let batch = self.queue.drain();
            if batch.is_empty() {
                return;
            }
            for (report_id, stage, force) in batch {
                // Failures land on the report row; the loop keeps going.
                let _ = execute_stage(&self.ctx, report_id, stage, force).await;
            }
        }
    }
}

fn settings() -> app_state::AppSettings {
    let yaml = r#"
api:
  host: 127.0.0.1
  port: 3000
  allowed_origins: []
  public_url: "https://studio.example.com"
logging:
  level: info
pipeline:
  providers:
    reasoning_base_url: "http://unused.invalid"
    search_base_url: "http://unused.invalid"
  stages:
    stage1: { provider: reasoning, model: model-1, temperature: 0.3, timeout_secs: 120 }
    stage2: { provider: search, model: model-2, temperature: 0.2, timeout_secs: 180 }
    stage3: { provider: reasoning, model: model-3, temperature: 0.3, timeout_secs: 120 }
    stage4: { provider: reasoning, model: model-4, temperature: 0.4, timeout_secs: 300 }
  sweep:
    stuck_after_secs: 300
    retry_cooldown_secs: 60
    retry_window_secs: 10800
    batch_size: 5
    stagger_secs: 2
  email:
    base_url: "http://unused.invalid"
    from: "reports@example.com"
secrets:
  database_url: "postgres://unused"
  internal_secret: "internal"
  cron_secret: "cron"
  reasoning_api_key: "k"
  search_api_key: "k"
  email_api_key: "k"
"#;
    let raw: app_state::RawSettings = config::Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()
        .expect("valid yaml")
        .try_deserialize()
        .expect("valid settings");
    app_state::AppSettings::from(raw)
}

fn stage1_json() -> Value {
    json!({
        "businessContext": "Logistics firm with manual dispatch planning",
        "opportunities": [{
            "title": "Automated dispatch",
            "description": "Planners spend four hours a day on routing",
            "estimatedMonthlyCost": 4200.0,
            "severity": "high",
            "aiSolutionCategory": "workflow-automation"
        }]
    })
}

fn stage2_json() -> Value {
    json!({
        "opportunities": [{
            "opportunity": "Automated dispatch",
            "tools": [{
                "name": "DispatchBot",
                "pricing": "$500/mo",
                "integrationNotes": "REST API, CSV import"
            }]
        }]
    })
}

fn stage3_json() -> Value {
    json!({
        "shortlist": [{
            "name": "DispatchBot",
            "monthlyInvestment": 500.0,
            "roiEstimate": "8x",
            "reason": "Directly removes the routing time sink"
        }],
        "roadmap": [{ "phase": "Pilot", "durationWeeks": 4, "actions": ["Connect TMS"] }]
    })
}

fn stage4_json() -> Value {
    json!({
        "executiveSummary": "Dispatch automation is the highest-leverage win.",
        "recommendations": [{
            "title": "Adopt DispatchBot",
            "priority": 1,
            "monthlyInvestment": 500.0
        }],
        "implementationPlan": [{ "name": "Pilot", "timeline": "Weeks 1-4" }],
        "successMetrics": ["Routing time under 30 minutes per day"]
    })
}

#[tokio::test]
async fn full_pipeline_completes_and_delivers_once() {
    let h = Harness::new();
    h.script_happy_path();
    let id = h.submit();

    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    h.run_until_idle().await;

    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Completed);
    assert_eq!(job.completed_stages(), 4);
    assert_eq!(job.progress(), 100);
    assert_eq!(job.stage4_output, Some(stage4_json()));
    assert!(job.email_sent_at.is_some());

    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "dana@example.com");
    assert!(sent[0]
        .html
        .contains(&format!("https://studio.example.com/report/tok-{id}")));
}

#[tokio::test]
async fn curated_costs_flow_into_the_report_prompt() {
    let h = Harness::new();
    h.script_happy_path();
    let id = h.submit();

    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    h.run_until_idle().await;

    let stage4_prompts = h.client.prompts_for("model-4");
    assert_eq!(stage4_prompts.len(), 1);
    assert!(stage4_prompts[0].contains("DispatchBot"));
    assert!(stage4_prompts[0].contains("500"));
    // Stage 1 context is carried along too, not just the shortlist.
    assert!(stage4_prompts[0].contains("Automated dispatch"));
}

#[tokio::test]
async fn later_stages_refuse_to_run_out_of_order() {
    for stage in [Stage::ToolResearch, Stage::ToolCuration, Stage::ReportGeneration] {
        let h = Harness::new();
        let id = h.submit();

        let err = execute_stage(&h.ctx, id, stage, false)
            .await
            .expect_err("missing prerequisite must fail");
        match err {
            StageError::PrerequisiteMissing { missing, .. } => assert_eq!(missing, 1),
            other => panic!("expected PrerequisiteMissing, got {other:?}"),
        }

        let job = h.store.job(id);
        assert_eq!(job.status, ReportStatus::Failed);
        assert_eq!(job.failed_at_stage, Some(stage.number()));
        assert!(job.error_message.is_some());
    }
}

#[tokio::test]
async fn rerun_without_force_is_a_no_op() {
    let h = Harness::new();
    h.script_happy_path();
    let id = h.submit();

    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    h.run_until_idle().await;
    let before = h.store.job(id);

    let outcome = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false)
        .await
        .expect("rerun succeeds");
    assert_eq!(outcome, StageOutcome::Skipped);

    let after = h.store.job(id);
    assert_eq!(after.version, before.version);
    assert_eq!(after.status, before.status);
    assert_eq!(after.stage1_output, before.stage1_output);
    assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unparsable_model_output_marks_the_report_failed() {
    let h = Harness::new();
    h.client.script(
        "model-1",
        Reply::Content("I could not produce the requested structure.".to_string()),
    );
    let id = h.submit();

    let err = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false)
        .await
        .expect_err("prose output must fail");
    assert!(matches!(err, StageError::MalformedResponse { .. }));

    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Failed);
    assert_eq!(job.failed_at_stage, Some(1));
    assert!(job.stage1_output.is_none());
}

#[tokio::test]
async fn schema_mismatch_is_rejected_even_when_json_parses() {
    let h = Harness::new();
    h.client.script(
        "model-1",
        Reply::Content(json!({"opportunities": "lots"}).to_string()),
    );
    let id = h.submit();

    let err = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false)
        .await
        .expect_err("wrong shape must fail");
    assert!(matches!(err, StageError::MalformedResponse { .. }));
    assert!(h.store.job(id).stage1_output.is_none());
}

#[tokio::test]
async fn sweep_resumes_a_failed_report_after_cooldown() {
    let h = Harness::new();
    h.client.script("model-1", Reply::Fail);
    let id = h.submit();

    let _ = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false).await;
    assert_eq!(h.store.job(id).status, ReportStatus::Failed);

    // Fresh failure: still cooling down, the sweeper leaves it alone.
    let outcome = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(outcome.enqueued, 0);

    h.store.age_job(id, Duration::seconds(120));
    h.script_happy_path();
    let outcome = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(outcome.examined, 1);
    assert_eq!(outcome.enqueued, 1);

    h.run_until_idle().await;
    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Completed);
    assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sweep_deduplicates_against_queued_work() {
    let h = Harness::new();
    h.client.script("model-1", Reply::Fail);
    let id = h.submit();
    let _ = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false).await;
    h.store.age_job(id, Duration::seconds(120));

    let first = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(first.enqueued, 1);

    // Second pass before the worker picks the job up: no duplicate run.
    let second = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(second.enqueued, 0);
    assert_eq!(second.deduplicated, 1);
}

#[tokio::test]
async fn sweep_abandons_failures_older_than_the_window() {
    let h = Harness::new();
    h.client.script("model-1", Reply::Fail);
    let id = h.submit();
    let _ = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, false).await;
    h.store.age_job(id, Duration::seconds(10801));

    let outcome = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(outcome.examined, 1);
    assert_eq!(outcome.enqueued, 0);
}

#[tokio::test]
async fn sweep_resumes_a_stuck_report_at_its_first_missing_stage() {
    let h = Harness::new();
    h.script_happy_path();
    let id = h.submit();

    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    // Run only stage 1, then pretend the stage 2 hand-off was lost.
    for (report_id, stage, force) in h.queue.drain() {
        let _ = execute_stage(&h.ctx, report_id, stage, force).await;
    }
    h.queue.drain();
    assert_eq!(h.store.job(id).status, ReportStatus::Stage1Complete);

    h.store.age_job(id, Duration::seconds(301));
    let outcome = sweep(&h.ctx).await.expect("sweep runs");
    assert_eq!(outcome.enqueued, 1);

    h.run_until_idle().await;
    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Completed);
    // Stage 1 output was kept, not regenerated.
    assert_eq!(h.client.prompts_for("model-1").len(), 1);
}

#[tokio::test]
async fn delivery_outage_does_not_fail_the_report() {
    let h = Harness::new();
    h.script_happy_path();
    h.notifier.fail.store(true, Ordering::SeqCst);
    let id = h.submit();

    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    h.run_until_idle().await;

    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Completed);
    assert!(job.email_sent_at.is_none());
}

#[tokio::test]
async fn forced_rerun_regenerates_from_stage_one() {
    let h = Harness::new();
    h.script_happy_path();
    let id = h.submit();
    h.ctx
        .queue
        .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
        .await
        .expect("enqueue kickoff");
    h.run_until_idle().await;
    assert_eq!(h.store.job(id).status, ReportStatus::Completed);

    h.script_happy_path();
    let outcome = execute_stage(&h.ctx, id, Stage::ProblemAnalysis, true)
        .await
        .expect("forced rerun starts");
    assert_eq!(outcome, StageOutcome::Completed);
    h.run_until_idle().await;

    let job = h.store.job(id);
    assert_eq!(job.status, ReportStatus::Completed);
    assert_eq!(h.client.prompts_for("model-1").len(), 2);
    assert_eq!(h.notifier.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn store_contract_rejects_stale_versions_and_bad_transitions() {
    let h = Harness::new();
    let id = h.submit();

    let err = h
        .store
        .set_status(id, 7, ReportStatus::Processing)
        .await
        .expect_err("stale version must be rejected");
    assert!(matches!(err, StoreError::VersionConflict { expected: 7, .. }));

    let err = h
        .store
        .set_status(id, 0, ReportStatus::Stage2Complete)
        .await
        .expect_err("pending cannot jump to stage2_complete");
    assert!(matches!(err, StoreError::InvalidTransition { .. }));
    assert!(StageError::from(err).is_lost_race());
}

#[tokio::test]
async fn access_token_resolves_to_exactly_its_own_report() {
    let h = Harness::new();
    h.script_happy_path();
    h.script_happy_path();
    let first = h.submit();
    let second = h.submit();

    for id in [first, second] {
        h.ctx
            .queue
            .enqueue(id, Stage::ProblemAnalysis, false, Duration::zero())
            .await
            .expect("enqueue kickoff");
    }
    h.run_until_idle().await;

    let first_token = h.store.job(first).access_token;
    let second_token = h.store.job(second).access_token;
    assert_ne!(first_token, second_token);

    let found = h
        .ctx
        .store
        .fetch_by_token(&first_token)
        .await
        .expect("lookup works")
        .expect("token is known");
    assert_eq!(found.id, first);

    let found = h
        .ctx
        .store
        .fetch_by_token(&second_token)
        .await
        .expect("lookup works")
        .expect("token is known");
    assert_eq!(found.id, second);
    assert_eq!(found.stage4_output, Some(stage4_json()));

    let missing = h
        .ctx
        .store
        .fetch_by_token("tok-unknown")
        .await
        .expect("lookup works");
    assert!(missing.is_none());
}
