use crate::watched::WatchedError;

/// Scratchpad for the user's rating of the currently open title.
///
/// Tracks how many distinct rating values were picked before the entry is
/// finalized; the count lands on the watched entry as a telemetry field.
#[derive(Debug, Clone, Default)]
pub struct RatingDraft {
    rating: Option<u8>,
    decisions: u32,
}

impl RatingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating pick. Re-picking the current value is not a decision.
    pub fn set(&mut self, rating: u8) -> Result<(), WatchedError> {
        if !(1..=10).contains(&rating) {
            return Err(WatchedError::InvalidRating(rating));
        }
        if self.rating != Some(rating) {
            self.rating = Some(rating);
            self.decisions += 1;
        }
        Ok(())
    }

    /// The currently picked rating, if any.
    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// How many distinct values were picked so far.
    pub fn decisions(&self) -> u32 {
        self.decisions
    }

    /// Discard the draft (selection closed without adding).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
