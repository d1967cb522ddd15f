use super::stimulus::{Channel, StimulusStep};

/// Ground truth for `channel` at `current_index`: does it repeat the step
/// `lag` places back?
///
/// Returns `None` while there is not enough history (`current_index < lag`),
/// for a zero lag, or when `current_index` is past the end of `history`.
/// Words compare exactly, without any case folding.
pub fn is_match(
    history: &[StimulusStep],
    current_index: usize,
    lag: usize,
    channel: Channel,
) -> Option<bool> {
    if lag == 0 || current_index < lag {
        return None;
    }
    let current = history.get(current_index)?;
    let target = history.get(current_index - lag)?;

    Some(match channel {
        Channel::Position => current.position == target.position,
        Channel::Word => current.word == target.word,
    })
}
