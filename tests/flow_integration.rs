//! Flow Integration Tests
//!
//! Drives complete flows through the public API against the scripted mock
//! host: a step chain carrying state in step values, back/forward over
//! recorded steps, configuration loaded from a file, and a custom host.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use quickstep::config::{BackAtRoot, Config};
use quickstep::flow::mock::{MockEvent, MockPromptHost};
use quickstep::flow::{
    run_flow, FlowController, FlowError, FlowOutcome, InputBoxParams, InputBoxSpec,
    MultiStepInput, NavigationError, PromptError, PromptEvent, PromptHandle, PromptHost,
    QuickPickParams, QuickPickSpec, Step, StepOutcome, StepRef,
};

// ─── A small sign-up wizard ──────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    plan: Option<String>,
    name: Option<String>,
    seats: Option<String>,
}

type Shared = Arc<Mutex<Account>>;

struct PickPlan {
    account: Shared,
}

struct EnterName {
    account: Shared,
}

struct EnterSeats {
    account: Shared,
}

#[async_trait]
impl Step for PickPlan {
    fn name(&self) -> &str {
        "plan"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let params = QuickPickParams::new("Plan", input.position(), 3, vec!["personal", "team"]);
        let plan = match input.show_quick_pick(params).await?.into_result() {
            Ok(plan) => plan,
            Err(signal) => return Ok(signal.into()),
        };
        self.account.lock().unwrap().plan = Some(plan.to_string());
        Ok(StepOutcome::next(EnterName {
            account: Arc::clone(&self.account),
        }))
    }
}

#[async_trait]
impl Step for EnterName {
    fn name(&self) -> &str {
        "name"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let team = self.account.lock().unwrap().plan.as_deref() == Some("team");
        let params = InputBoxParams::new(input.position(), if team { 3 } else { 2 })
            .title("Account name")
            .on_change(|value: String| async move {
                value.trim().is_empty().then(|| "name is required".to_string())
            });
        let name = match input.show_input_box(params).await?.into_result() {
            Ok(name) => name,
            Err(signal) => return Ok(signal.into()),
        };
        self.account.lock().unwrap().name = Some(name);

        if team {
            Ok(StepOutcome::next(EnterSeats {
                account: Arc::clone(&self.account),
            }))
        } else {
            Ok(StepOutcome::Finish)
        }
    }
}

#[async_trait]
impl Step for EnterSeats {
    fn name(&self) -> &str {
        "seats"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let params = InputBoxParams::new(input.position(), 3).title("Seats");
        match input.show_input_box(params).await?.into_result() {
            Ok(seats) => {
                self.account.lock().unwrap().seats = Some(seats);
                Ok(StepOutcome::Finish)
            }
            Err(signal) => Ok(signal.into()),
        }
    }
}

fn signup(account: &Shared) -> StepRef {
    Arc::new(PickPlan {
        account: Arc::clone(account),
    })
}

#[tokio::test]
async fn test_signup_collects_every_answer() {
    let account = Shared::default();
    let host = MockPromptHost::new()
        .script(vec![MockEvent::pick("team")])
        .script(vec![MockEvent::typed("acme"), MockEvent::accept("acme")])
        .script(vec![MockEvent::accept("12")]);

    let report = run_flow(host.clone(), signup(&account)).await.unwrap();

    assert_eq!(report.outcome, FlowOutcome::Completed);
    assert_eq!(report.history, vec!["plan", "name", "seats"]);
    assert_eq!(
        *account.lock().unwrap(),
        Account {
            plan: Some("team".to_string()),
            name: Some("acme".to_string()),
            seats: Some("12".to_string()),
        }
    );
    assert_eq!(host.live_prompts(), 0);
    assert_eq!(host.unused_scripts(), 0);
}

#[tokio::test]
async fn test_changing_plan_drops_later_steps() {
    let account = Shared::default();
    let host = MockPromptHost::new()
        .script(vec![MockEvent::pick("team")])
        .script(vec![MockEvent::accept("acme")])
        .script(vec![MockEvent::Back])
        .script(vec![MockEvent::Back])
        .script(vec![MockEvent::pick("personal")])
        .script(vec![MockEvent::accept("solo")]);

    let report = run_flow(host.clone(), signup(&account)).await.unwrap();

    assert!(report.is_completed());
    assert_eq!(report.history, vec!["plan", "name"]);
    let account = account.lock().unwrap().clone();
    assert_eq!(account.plan.as_deref(), Some("personal"));
    assert_eq!(account.name.as_deref(), Some("solo"));

    // the personal branch counts two steps
    let prompts = host.prompts();
    assert_eq!(prompts[5].total_steps, 2);
    assert_eq!(prompts[5].step, 2);
}

#[tokio::test]
async fn test_live_validation_reaches_prompt() {
    let account = Shared::default();
    let host = MockPromptHost::new()
        .script(vec![MockEvent::pick("personal")])
        .script(vec![
            MockEvent::typed(" "),
            MockEvent::Pause(Duration::from_millis(20)),
            MockEvent::Hide,
        ]);

    let report = run_flow(host.clone(), signup(&account)).await.unwrap();

    assert!(report.is_cancelled());
    assert_eq!(
        host.prompts()[1].validation_messages,
        vec![Some("name is required".to_string())]
    );
    assert_eq!(account.lock().unwrap().name, None);
}

#[tokio::test]
async fn test_back_at_root_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("quickstep.toml");
    std::fs::write(&path, "[flow]\nback_at_root = \"error\"\n").unwrap();
    let config = Config::load(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.flow.back_at_root, BackAtRoot::Error);

    let account = Shared::default();
    let host = MockPromptHost::new().script(vec![MockEvent::Back]);
    let mut controller = FlowController::new(Box::new(host.clone()), config.flow);

    let err = controller.run(signup(&account)).await.unwrap_err();

    assert!(matches!(
        err,
        FlowError::Navigation(NavigationError::NoPrevious { .. })
    ));
    assert_eq!(host.live_prompts(), 0);
}

#[tokio::test]
async fn test_controller_runs_flows_back_to_back() {
    let host = MockPromptHost::new()
        .script(vec![MockEvent::pick("personal")])
        .script(vec![MockEvent::Hide])
        .script(vec![MockEvent::pick("personal")])
        .script(vec![MockEvent::accept("again")]);
    let mut controller = FlowController::with_host(host.clone());

    let first = controller.run(signup(&Shared::default())).await.unwrap();
    let second = controller.run(signup(&Shared::default())).await.unwrap();

    assert!(first.is_cancelled());
    assert!(second.is_completed());
    // every run starts from an empty history
    assert!(host.prompts()[2].buttons.is_empty());
}

// ─── A host written outside the crate ────────────────────────────────────────

/// Answers every choice list with its first item and every text entry with
/// a fixed value
struct AutoHost {
    answer: String,
    created: Arc<Mutex<Vec<String>>>,
}

struct AutoHandle {
    event: Option<PromptEvent>,
}

#[async_trait]
impl PromptHandle for AutoHandle {
    fn show(&mut self) -> Result<(), PromptError> {
        Ok(())
    }

    async fn next_event(&mut self) -> Result<PromptEvent, PromptError> {
        self.event.take().ok_or(PromptError::InputClosed)
    }

    fn set_enabled(&mut self, _enabled: bool) {}

    fn set_busy(&mut self, _busy: bool) {}

    fn set_validation_message(&mut self, _message: Option<String>) {}

    fn dispose(&mut self) {}
}

impl PromptHost for AutoHost {
    fn create_quick_pick(
        &mut self,
        spec: QuickPickSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        self.created.lock().unwrap().push(spec.title);
        Ok(Box::new(AutoHandle {
            event: Some(PromptEvent::Selected(0)),
        }))
    }

    fn create_input_box(
        &mut self,
        spec: InputBoxSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        self.created
            .lock()
            .unwrap()
            .push(spec.title.unwrap_or_default());
        Ok(Box::new(AutoHandle {
            event: Some(PromptEvent::Accepted(self.answer.clone())),
        }))
    }
}

#[tokio::test]
async fn test_custom_host_drives_flow() {
    let created = Arc::new(Mutex::new(Vec::new()));
    let host = AutoHost {
        answer: "bot".to_string(),
        created: Arc::clone(&created),
    };
    let account = Shared::default();

    let report = run_flow(host, signup(&account)).await.unwrap();

    assert!(report.is_completed());
    assert_eq!(account.lock().unwrap().name.as_deref(), Some("bot"));
    assert_eq!(*created.lock().unwrap(), vec!["Plan", "Account name"]);
}
