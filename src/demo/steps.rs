use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::catalog::{Catalog, Program, Radio};
use super::selection::{ProgramAction, RadioSelection};
use crate::flow::{
    FlowSignal, InputBoxParams, MultiStepInput, PickItem, QuickPickParams, Step, StepOutcome,
};

pub const TOTAL_STEPS: usize = 3;

const SEARCH_LABEL: &str = "Search programs…";
const COPY_LABEL: &str = "Copy link…";

/// Step 1: choose a radio
#[derive(Clone)]
pub struct PickRadioStep {
    catalog: Arc<Catalog>,
    selection: RadioSelection,
}

impl PickRadioStep {
    pub fn new(catalog: Arc<Catalog>, selection: RadioSelection) -> Self {
        Self { catalog, selection }
    }
}

#[async_trait]
impl Step for PickRadioStep {
    fn name(&self) -> &str {
        "pick-radio"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        // highlight the radio picked last time we were here
        let previous: Vec<Radio> = self
            .selection
            .snapshot()
            .radio
            .and_then(|name| self.catalog.radios.iter().find(|r| r.name == name).cloned())
            .into_iter()
            .collect();

        let params = QuickPickParams::new("Pick a radio", 1, TOTAL_STEPS, self.catalog.radios.clone())
            .active(previous)
            .placeholder("Type to filter radios");

        let radio = match input.show_quick_pick(params).await?.into_result() {
            Ok(radio) => radio,
            Err(signal) => return Ok(signal.into()),
        };
        self.selection.set_radio(&radio.name);

        Ok(StepOutcome::next(RadioMenuStep {
            catalog: Arc::clone(&self.catalog),
            selection: self.selection.clone(),
            radio: Arc::new(radio),
        }))
    }
}

#[derive(Clone)]
enum MenuEntry {
    Program { program: Program, duration: String },
    Search,
    CopyLink,
}

impl PickItem for MenuEntry {
    fn label(&self) -> &str {
        match self {
            MenuEntry::Program { program, .. } => &program.name,
            MenuEntry::Search => SEARCH_LABEL,
            MenuEntry::CopyLink => COPY_LABEL,
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            MenuEntry::Program { duration, .. } => Some(duration.as_str()),
            MenuEntry::Search => Some("filter by name"),
            MenuEntry::CopyLink => None,
        }
    }
}

/// Step 2: choose a program of the radio, or an action on the radio
#[derive(Clone)]
pub struct RadioMenuStep {
    catalog: Arc<Catalog>,
    selection: RadioSelection,
    radio: Arc<Radio>,
}

#[async_trait]
impl Step for RadioMenuStep {
    fn name(&self) -> &str {
        "radio-menu"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let mut items: Vec<MenuEntry> = self
            .radio
            .programs
            .iter()
            .map(|program| MenuEntry::Program {
                duration: program.duration_label(),
                program: program.clone(),
            })
            .collect();
        items.push(MenuEntry::Search);
        items.push(MenuEntry::CopyLink);

        let params = QuickPickParams::new(self.radio.name.clone(), 2, TOTAL_STEPS, items)
            .placeholder("Pick a program");

        let entry = match input.show_quick_pick(params).await?.into_result() {
            Ok(entry) => entry,
            Err(signal) => return Ok(signal.into()),
        };

        Ok(match entry {
            MenuEntry::Program { program, .. } => StepOutcome::next(ProgramActionStep {
                selection: self.selection.clone(),
                program,
            }),
            MenuEntry::Search => StepOutcome::next(SearchProgramsStep {
                selection: self.selection.clone(),
                radio: Arc::clone(&self.radio),
            }),
            MenuEntry::CopyLink => StepOutcome::next(CopyLinkStep {
                catalog: Arc::clone(&self.catalog),
                selection: self.selection.clone(),
                radio: Arc::clone(&self.radio),
            }),
        })
    }
}

impl PickItem for ProgramAction {
    fn label(&self) -> &str {
        ProgramAction::label(self)
    }
}

/// Step 3: what to do with the chosen program
#[derive(Clone)]
pub struct ProgramActionStep {
    selection: RadioSelection,
    program: Program,
}

#[async_trait]
impl Step for ProgramActionStep {
    fn name(&self) -> &str {
        "program-action"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let params = QuickPickParams::new(
            self.program.name.clone(),
            3,
            TOTAL_STEPS,
            ProgramAction::ALL.to_vec(),
        );

        let action = match input.show_quick_pick(params).await?.into_result() {
            Ok(action) => action,
            Err(signal) => return Ok(signal.into()),
        };
        if action == ProgramAction::CopyLink {
            self.selection.copy_link(self.program.link());
        }
        self.selection.set_program(&self.program.name, action);
        Ok(StepOutcome::Finish)
    }
}

pub fn match_message(count: usize) -> String {
    match count {
        0 => "No matching programs".to_string(),
        1 => "1 matching program".to_string(),
        n => format!("{} matching programs", n),
    }
}

/// Step 3 (search branch): type part of a program name
#[derive(Clone)]
pub struct SearchProgramsStep {
    selection: RadioSelection,
    radio: Arc<Radio>,
}

#[async_trait]
impl Step for SearchProgramsStep {
    fn name(&self) -> &str {
        "search-programs"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let radio = Arc::clone(&self.radio);
        let previous = self.selection.snapshot().search.unwrap_or_default();

        let params = InputBoxParams::new(3, TOTAL_STEPS)
            .title(format!("Search {}", self.radio.name))
            .value(previous)
            .prompt("Part of a program name")
            .on_change(move |value: String| {
                let radio = Arc::clone(&radio);
                async move { Some(match_message(radio.search(&value).len())) }
            });

        let query = match input.show_input_box(params).await?.into_result() {
            Ok(query) => query,
            Err(signal) => return Ok(signal.into()),
        };
        self.selection.set_search(&query);

        let programs = self.radio.search(&query);
        if programs.is_empty() {
            debug!(%query, "search matched nothing, asking again");
            return Ok(FlowSignal::Resume.into());
        }

        Ok(StepOutcome::next(SearchResultsStep {
            selection: self.selection.clone(),
            query,
            programs,
        }))
    }
}

/// Matches of a search, picking one leads to the action step
#[derive(Clone)]
pub struct SearchResultsStep {
    selection: RadioSelection,
    query: String,
    programs: Vec<Program>,
}

#[async_trait]
impl Step for SearchResultsStep {
    fn name(&self) -> &str {
        "search-results"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let params = QuickPickParams::new(
            format!("Programs matching '{}'", self.query),
            3,
            TOTAL_STEPS,
            self.programs.clone(),
        );

        let program = match input.show_quick_pick(params).await?.into_result() {
            Ok(program) => program,
            Err(signal) => return Ok(signal.into()),
        };
        Ok(StepOutcome::next(ProgramActionStep {
            selection: self.selection.clone(),
            program,
        }))
    }
}

/// Shortcut that copies a link and goes back to the radio list. It does not
/// stay in the history, so going back from the radio list lands on the menu.
#[derive(Clone)]
pub struct CopyLinkStep {
    catalog: Arc<Catalog>,
    selection: RadioSelection,
    radio: Arc<Radio>,
}

const RADIO_PAGE: &str = "Radio page";
const LATEST_PROGRAM: &str = "Latest program";

#[async_trait]
impl Step for CopyLinkStep {
    fn name(&self) -> &str {
        "copy-link"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        let mut choices = vec![RADIO_PAGE];
        if !self.radio.programs.is_empty() {
            choices.push(LATEST_PROGRAM);
        }
        let params = QuickPickParams::new("Copy link", 3, TOTAL_STEPS, choices).unsave();

        let choice = match input.show_quick_pick(params).await?.into_result() {
            Ok(choice) => choice,
            Err(signal) => return Ok(signal.into()),
        };
        let link = match (choice, self.radio.programs.last()) {
            (LATEST_PROGRAM, Some(program)) => program.link(),
            _ => self.radio.link(),
        };
        debug!(%link, "copied link");
        self.selection.copy_link(link);

        Ok(StepOutcome::next(PickRadioStep::new(
            Arc::clone(&self.catalog),
            self.selection.clone(),
        )))
    }
}
