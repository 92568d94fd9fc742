//! Per-cycle fan-out and ordered reassembly.
//!
//! Every custom command runs as its own task. Results come back in
//! completion order and are placed by slot, so the merged output order
//! only depends on the configured command order.

use crate::command::{self, CommandSpec};
use crate::error::MuxError;
use crate::models::{Block, CycleBlock, UpstreamBlock};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

/// Run every command concurrently and merge the results with the
/// upstream blocks.
///
/// The returned vector holds the custom blocks in slot order followed by
/// `upstream` unchanged. The first command failure aborts the remaining
/// commands and is returned; no partial cycle is ever produced.
pub async fn run_cycle(
    specs: &Arc<[CommandSpec]>,
    upstream: Vec<UpstreamBlock>,
) -> Result<Vec<CycleBlock>, MuxError> {
    let custom = run_all(specs).await?;

    let mut combined = Vec::with_capacity(custom.len() + upstream.len());
    combined.extend(custom.into_iter().map(CycleBlock::Custom));
    combined.extend(upstream.into_iter().map(CycleBlock::Upstream));
    Ok(combined)
}

/// Run all commands and return their blocks indexed by slot.
async fn run_all(specs: &Arc<[CommandSpec]>) -> Result<Vec<Block>, MuxError> {
    let mut slots: Vec<Option<Block>> = vec![None; specs.len()];
    let mut tasks = JoinSet::new();

    for index in 0..specs.len() {
        let specs = Arc::clone(specs);
        tasks.spawn(async move {
            let spec = &specs[index];
            (spec.slot, command::run(spec).await)
        });
    }

    // Dropping `tasks` on an early return aborts the rest, which kills their children
    let mut completed = 0;
    while let Some(joined) = tasks.join_next().await {
        let (slot, result) = joined?;
        let block = result?;

        let entry = slots.get_mut(slot).ok_or(MuxError::UnknownSlot(slot))?;
        if entry.is_some() {
            return Err(MuxError::DuplicateSlot(slot));
        }
        *entry = Some(block);

        completed += 1;
        debug!("Slot {} done ({}/{})", slot, completed, specs.len());
    }

    in_slot_order(slots)
}

/// Unwrap the slot buffer once every task has joined.
///
/// An empty slot means a command never reported, which is an internal
/// error rather than a shorter cycle.
fn in_slot_order(slots: Vec<Option<Block>>) -> Result<Vec<Block>, MuxError> {
    slots
        .into_iter()
        .enumerate()
        .map(|(slot, block)| block.ok_or(MuxError::MissingSlot(slot)))
        .collect()
}
