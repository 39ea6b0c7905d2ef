//! High score leaderboard system
//!
//! Persisted to LocalStorage, tracks top 10 rounds. Doubles as the score sink
//! for a [`Session`](crate::Session): every finished round is offered to it.

use serde::{Deserialize, Serialize};

use crate::session::{RoundSummary, ScoreSink, SubmitError};
use crate::sim::EndReason;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Points scored in the round
    pub score: u64,
    /// Largest radius reached
    pub peak_radius: f32,
    /// Round length (ms)
    pub duration_ms: f64,
    /// Whether a bot ended the round (as opposed to quitting)
    pub eaten: bool,
    /// Timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Score shown live while a round runs
    #[serde(skip)]
    pub current: u64,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "blob_arena_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// A non-zero score makes the table while it has room or beats the last entry
    pub fn qualifies(&self, score: u64) -> bool {
        let lowest = match self.entries.get(MAX_HIGH_SCORES - 1) {
            Some(entry) => entry.score,
            None => 0,
        };
        score > lowest
    }

    /// Add a finished round (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn record(&mut self, summary: &RoundSummary) -> Option<usize> {
        let score = summary.final_score;
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            peak_radius: summary.peak_radius,
            duration_ms: summary.duration_ms,
            eaten: matches!(summary.reason, EndReason::Eaten { .. }),
            timestamp: summary.ended_ms,
        };

        // Sorted descending by score; ties keep the older entry first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| serde_json::from_str::<HighScores>(&json)) {
            Some(Ok(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Some(Err(e)) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SubmitError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(SubmitError::Unavailable)?;

        let json = serde_json::to_string(self)
            .map_err(|e| SubmitError::Rejected(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| SubmitError::Rejected("LocalStorage write failed".into()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), SubmitError> {
        // No-op for native
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn score_changed(&mut self, score: u64) {
        self.current = score;
    }

    fn game_over(&mut self, summary: &RoundSummary) -> Result<(), SubmitError> {
        self.current = summary.final_score;
        // Nothing to submit for an empty round
        if summary.final_score == 0 {
            return Ok(());
        }
        match self.record(summary) {
            Some(rank) => {
                log::info!("New high score #{}: {}", rank, summary.final_score);
                self.save()
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(score: u64, at: f64) -> RoundSummary {
        RoundSummary {
            final_score: score,
            peak_radius: 25.0,
            duration_ms: 60_000.0,
            ended_ms: at,
            reason: EndReason::Eaten { bot_id: 4 },
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&round(10, 1.0)), Some(1));
        assert_eq!(scores.record(&round(30, 2.0)), Some(1));
        assert_eq!(scores.record(&round(20, 3.0)), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![30, 20, 10]);
        assert_eq!(scores.top_score(), Some(30));
        assert!(scores.entries[0].eaten);
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for s in 1..=15 {
            scores.record(&round(s, s as f64));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(6));
        assert!(!scores.qualifies(6));
        assert!(scores.qualifies(7));
        assert!(!HighScores::new().qualifies(0));
    }

    #[test]
    fn test_sink_skips_zero_score() {
        let mut scores = HighScores::new();
        scores.score_changed(0);
        assert!(scores.game_over(&round(0, 1.0)).is_ok());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sink_records_round() {
        let mut scores = HighScores::new();
        scores.score_changed(12);
        assert_eq!(scores.current, 12);
        assert!(scores.game_over(&round(12, 1.0)).is_ok());
        assert_eq!(scores.top_score(), Some(12));
    }

    #[test]
    fn test_roundtrips_through_json() {
        let mut scores = HighScores::new();
        scores.record(&round(42, 9.0));
        let json = serde_json::to_string(&scores).expect("serialize");
        let back: HighScores = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.entries, scores.entries);
    }
}
