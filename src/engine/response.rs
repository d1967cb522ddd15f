use super::matcher::is_match;
use super::scorer::ScoreTally;
use super::stimulus::{Channel, StimulusStep};

/// Which channels the user has flagged during the current step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseState {
    pub position_responded: bool,
    pub word_responded: bool,
}

impl ResponseState {
    pub fn has_responded(&self, channel: Channel) -> bool {
        match channel {
            Channel::Position => self.position_responded,
            Channel::Word => self.word_responded,
        }
    }

    /// Flags `channel`; returns false if it was already flagged.
    pub fn flag(&mut self, channel: Channel) -> bool {
        let slot = match channel {
            Channel::Position => &mut self.position_responded,
            Channel::Word => &mut self.word_responded,
        };
        !std::mem::replace(slot, true)
    }
}

/// What a single key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The channel matched and was credited.
    Hit,
    /// The channel did not match. Not penalized and not counted.
    NoMatch,
    /// The channel was already flagged this step.
    Repeated,
    /// No scorable step: not playing, or still inside the first `lag` steps.
    Ignored,
    /// The press addressed a step that is no longer current.
    Stale,
}

/// Applies a press on `channel` to the step at `current_index`.
///
/// The first press per channel per step is checked against the lag window and
/// credited on a match; later presses are no-ops.
pub fn record_response(
    response: &mut ResponseState,
    tally: &mut ScoreTally,
    history: &[StimulusStep],
    current_index: usize,
    lag: usize,
    channel: Channel,
) -> ResponseOutcome {
    let Some(matched) = is_match(history, current_index, lag, channel) else {
        return ResponseOutcome::Ignored;
    };
    if !response.flag(channel) {
        return ResponseOutcome::Repeated;
    }
    if matched {
        tally.hit(channel);
        ResponseOutcome::Hit
    } else {
        ResponseOutcome::NoMatch
    }
}
