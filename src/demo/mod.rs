//! Radio browsing wizard used by the `radio` command.
//!
//! Pick a radio, then one of its programs (or search them, or copy a link),
//! then what to do with the program. The steps record what was chosen in a
//! shared [`RadioSelection`].

pub mod catalog;
pub mod selection;
pub mod steps;

use std::sync::Arc;

pub use catalog::{Catalog, Program, Radio};
pub use selection::{ProgramAction, RadioSelection, SelectionState};

use crate::flow::{FlowController, FlowError, FlowReport, StepRef};

/// First step of the wizard
pub fn radio_wizard(catalog: Arc<Catalog>, selection: RadioSelection) -> StepRef {
    Arc::new(steps::PickRadioStep::new(catalog, selection))
}

/// Run the wizard to completion and return what was picked
pub async fn browse_radios(
    controller: &mut FlowController,
    catalog: Arc<Catalog>,
) -> Result<(FlowReport, SelectionState), FlowError> {
    let selection = RadioSelection::new();
    let report = controller
        .run(radio_wizard(catalog, selection.clone()))
        .await?;
    Ok((report, selection.snapshot()))
}
