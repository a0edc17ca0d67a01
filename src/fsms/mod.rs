//! Built-in FSMs, one module per category, plus the actions they share.

pub mod drop_fsm;
pub mod gen_mob_fsm;
pub mod leader_fsm;
pub mod pikmin_fsm;
pub mod resource_fsm;
pub mod scale_fsm;
pub mod track_fsm;

use crate::content::errors::ContentError;
use crate::fsm::builder::{FsmBuilder, check_state_count};
use crate::mobs::mobtype::MobType;

/// Compiles `efc` into `mob_type`, checking it against the number of states
/// the category's state enum declares.
pub(crate) fn install(
    mob_type: &mut MobType,
    efc: FsmBuilder,
    first_state: &str,
    expected_states: usize,
) -> Result<(), Vec<ContentError>> {
    let fsm = efc.finish(first_state)?;
    check_state_count(&mob_type.name, &fsm.states, expected_states).map_err(|e| vec![e])?;
    mob_type.set_fsm(fsm);
    Ok(())
}
