//! Accumulation of steps across incremental calls

use aeron_core::RecoveryStep;

/// Add `incoming` steps to `steps`, keeping the first step seen for each
/// number, then order by number
///
/// Returns how many steps were added.
pub fn merge_steps(steps: &mut Vec<RecoveryStep>, incoming: Vec<RecoveryStep>) -> usize {
    let before = steps.len();

    for step in incoming {
        if steps.iter().any(|existing| existing.step == step.step) {
            tracing::trace!(step = step.step, "step already present, keeping first");
            continue;
        }
        steps.push(step);
    }

    steps.sort_by_key(|step| step.step);
    steps.len() - before
}
