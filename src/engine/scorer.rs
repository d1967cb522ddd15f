use super::matcher::is_match;
use super::response::ResponseState;
use super::stimulus::{Channel, StimulusStep};

/// Per-channel hit and miss counts for one session. Counters only go up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub pos_hit: u32,
    pub pos_miss: u32,
    pub word_hit: u32,
    pub word_miss: u32,
}

impl ScoreTally {
    pub fn hit(&mut self, channel: Channel) {
        match channel {
            Channel::Position => self.pos_hit += 1,
            Channel::Word => self.word_hit += 1,
        }
    }

    fn miss(&mut self, channel: Channel) {
        match channel {
            Channel::Position => self.pos_miss += 1,
            Channel::Word => self.word_miss += 1,
        }
    }

    pub fn hits(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Position => self.pos_hit,
            Channel::Word => self.word_hit,
        }
    }

    pub fn misses(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Position => self.pos_miss,
            Channel::Word => self.word_miss,
        }
    }

    /// Share of true matches that were caught, as a percentage.
    pub fn hit_rate(&self, channel: Channel) -> Option<f64> {
        let hits = self.hits(channel);
        match hits + self.misses(channel) {
            0 => None,
            targets => Some(hits as f64 / targets as f64 * 100.0),
        }
    }

    /// Closes the response window of `current_index`: every channel with a
    /// true match that `response` did not flag counts as a miss.
    ///
    /// Must run once per step, before the response state is reset for the
    /// next one. Returns the number of misses added.
    pub fn check_missed(
        &mut self,
        history: &[StimulusStep],
        current_index: usize,
        lag: usize,
        response: &ResponseState,
    ) -> u32 {
        let mut added = 0;
        for channel in Channel::ALL {
            let matched = is_match(history, current_index, lag, channel).unwrap_or(false);
            if matched && !response.has_responded(channel) {
                self.miss(channel);
                added += 1;
            }
        }
        added
    }
}
