//! Behavioural tests for copying Shortcut labels onto pull requests.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use story_label_sync::{
    AllowList, IssueTarget, LabelSyncConfig, LabelSyncRequest, SyncError, SyncOutcome,
    sync_pull_request,
};
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LABELS_PATH: &str = "/repos/octo/repo/issues/12/labels";

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
struct LabelSyncState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    config: Slot<LabelSyncConfig>,
    allow_list: Slot<AllowList>,
    outcome: Slot<Result<SyncOutcome, SyncError>>,
}

#[fixture]
fn label_sync_state() -> LabelSyncState {
    LabelSyncState::default()
}

/// Ensures the runtime, mock server, and configuration are initialised.
fn ensure_runtime_and_server(state: &LabelSyncState) -> Result<SharedRuntime, SyncError> {
    if state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new().map_err(|error| SyncError::Io {
            message: format!("failed to create Tokio runtime: {error}"),
        })?;
        state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = state.runtime.get().ok_or_else(|| SyncError::Configuration {
        message: "runtime not initialised".to_owned(),
    })?;

    if state.server.with_ref(|_| ()).is_none() {
        let server = shared_runtime.block_on(MockServer::start());
        let accept_labels = Mock::given(method("POST"))
            .and(path(LABELS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])));
        shared_runtime.block_on(accept_labels.mount(&server));

        state.config.set(LabelSyncConfig {
            shortcut_token: Some("sc-token".to_owned()),
            github_token: Some("ghp_example".to_owned()),
            shortcut_api_url: Some(server.uri()),
            github_api_url: Some(server.uri()),
            ..Default::default()
        });
        state.server.set(server);
    }

    Ok(shared_runtime)
}

fn mount(state: &LabelSyncState, mock: Mock) -> Result<(), SyncError> {
    let runtime = ensure_runtime_and_server(state)?;
    state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)))
        .ok_or_else(|| SyncError::Configuration {
            message: "mock server not initialised".to_owned(),
        })
}

fn update_config(
    state: &LabelSyncState,
    change: impl FnOnce(&mut LabelSyncConfig),
) -> Result<(), SyncError> {
    ensure_runtime_and_server(state)?;
    let mut config = state.config.get().ok_or_else(|| SyncError::Configuration {
        message: "configuration not initialised".to_owned(),
    })?;
    change(&mut config);
    state.config.set(config);
    Ok(())
}

fn label_list(raw: &str) -> Vec<String> {
    AllowList::parse_comma_separated(raw.trim_matches('"'))
        .as_slice()
        .to_vec()
}

fn label_payload(raw: &str) -> Vec<Value> {
    label_list(raw)
        .into_iter()
        .map(|name| json!({ "name": name }))
        .collect()
}

fn recorded_outcome(state: &LabelSyncState) -> Result<SyncOutcome, SyncError> {
    state
        .outcome
        .get()
        .unwrap_or_else(|| panic!("sync has not run"))
}

fn received_requests(state: &LabelSyncState) -> Vec<wiremock::Request> {
    let runtime = state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    state
        .server
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .unwrap_or_default()
}

// --- Given steps ---

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a Shortcut story {id:u64} without an epic, labelled {labels}")]
fn seed_story_without_epic(
    label_sync_state: &LabelSyncState,
    id: u64,
    labels: String,
) -> Result<(), SyncError> {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/api/v3/stories/{id}")))
        .and(header("Shortcut-Token", "sc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "labels": label_payload(&labels),
            "epic_id": null
        })));
    mount(label_sync_state, mock)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a Shortcut story {id:u64} in epic {epic_id:u64}, labelled {labels}")]
fn seed_story_in_epic(
    label_sync_state: &LabelSyncState,
    id: u64,
    epic_id: u64,
    labels: String,
) -> Result<(), SyncError> {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/api/v3/stories/{id}")))
        .and(header("Shortcut-Token", "sc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "labels": label_payload(&labels),
            "epic_id": epic_id
        })));
    mount(label_sync_state, mock)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a Shortcut epic {id:u64} labelled {labels}")]
fn seed_epic(label_sync_state: &LabelSyncState, id: u64, labels: String) -> Result<(), SyncError> {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/api/v3/epics/{id}")))
        .and(header("Shortcut-Token", "sc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "labels": label_payload(&labels)
        })));
    mount(label_sync_state, mock)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("the allow-list {labels}")]
fn remember_allow_list(label_sync_state: &LabelSyncState, labels: String) {
    label_sync_state
        .allow_list
        .set(AllowList::new(label_list(&labels)));
}

#[given("no allow-list")]
fn clear_allow_list(label_sync_state: &LabelSyncState) {
    drop(label_sync_state.allow_list.take());
}

#[given("no Shortcut token")]
fn drop_shortcut_token(label_sync_state: &LabelSyncState) -> Result<(), SyncError> {
    update_config(label_sync_state, |config| config.shortcut_token = None)
}

#[given("no GitHub token")]
fn drop_github_token(label_sync_state: &LabelSyncState) -> Result<(), SyncError> {
    update_config(label_sync_state, |config| config.github_token = None)
}

// --- When steps ---

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the sync runs for head ref {head_ref}")]
fn run_sync(label_sync_state: &LabelSyncState, head_ref: String) -> Result<(), SyncError> {
    let runtime = ensure_runtime_and_server(label_sync_state)?;
    let config = label_sync_state
        .config
        .get()
        .ok_or_else(|| SyncError::Configuration {
            message: "configuration not initialised".to_owned(),
        })?;
    let allow_list = label_sync_state.allow_list.get().unwrap_or_default();
    let issue = IssueTarget::new("octo", "repo", 12)?;
    let request =
        LabelSyncRequest::new(head_ref.trim_matches('"'), issue).with_allow_list(allow_list);

    let _guard = env_lock::lock_env([
        ("SHORTCUT_API_TOKEN", None::<&str>),
        ("GITHUB_TOKEN", None::<&str>),
    ]);
    let outcome = runtime.block_on(sync_pull_request(&config, &request));
    label_sync_state.outcome.set(outcome);
    Ok(())
}

// --- Then steps ---

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the pull request receives the labels {labels}")]
fn assert_labels_added(label_sync_state: &LabelSyncState, labels: String) {
    let expected = label_list(&labels);

    match recorded_outcome(label_sync_state) {
        Ok(SyncOutcome::LabelsAdded { labels: added, .. }) => {
            assert_eq!(added, expected, "labels sent to GitHub");
        }
        other => panic!("expected labels to be added, got {other:?}"),
    }

    let bodies: Vec<Value> = received_requests(label_sync_state)
        .into_iter()
        .filter(|request| request.url.path() == LABELS_PATH)
        .filter_map(|request| serde_json::from_slice(&request.body).ok())
        .collect();
    assert_eq!(bodies, vec![json!({ "labels": expected })]);
}

#[then("no labels are added to the pull request")]
fn assert_nothing_added(label_sync_state: &LabelSyncState) {
    let outcome = recorded_outcome(label_sync_state);
    assert!(
        matches!(outcome, Ok(SyncOutcome::NothingToAdd { .. })),
        "expected nothing to add, got {outcome:?}"
    );

    let posted = received_requests(label_sync_state)
        .iter()
        .any(|request| request.url.path() == LABELS_PATH);
    assert!(!posted, "no label request should reach GitHub");
}

#[then("the sync reports that no story was found")]
fn assert_no_story(label_sync_state: &LabelSyncState) {
    assert_eq!(recorded_outcome(label_sync_state), Ok(SyncOutcome::NoStoryId));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the sync fails for the missing credential {name}")]
fn assert_missing_credential(label_sync_state: &LabelSyncState, name: String) {
    let outcome = recorded_outcome(label_sync_state);
    assert!(
        matches!(
            &outcome,
            Err(SyncError::MissingCredential { name: missing })
                if *missing == name.trim_matches('"')
        ),
        "expected missing credential {name}, got {outcome:?}"
    );
}

#[then("no request reaches the mock APIs")]
fn assert_no_requests(label_sync_state: &LabelSyncState) {
    let received = received_requests(label_sync_state);
    assert!(received.is_empty(), "expected no requests, got {received:?}");
}

#[scenario(path = "tests/features/label_sync.feature", index = 0)]
fn allowed_story_label_is_added(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}

#[scenario(path = "tests/features/label_sync.feature", index = 1)]
fn epic_label_is_added(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}

#[scenario(path = "tests/features/label_sync.feature", index = 2)]
fn empty_allow_list_adds_nothing(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}

#[scenario(path = "tests/features/label_sync.feature", index = 3)]
fn head_ref_without_story_is_skipped(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}

#[scenario(path = "tests/features/label_sync.feature", index = 4)]
fn missing_shortcut_token_fails_early(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}

#[scenario(path = "tests/features/label_sync.feature", index = 5)]
fn missing_github_token_allows_skip(label_sync_state: LabelSyncState) {
    let _ = label_sync_state;
}
