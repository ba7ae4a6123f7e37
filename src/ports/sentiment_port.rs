//! Headline sentiment port trait.

/// Scores a batch of headlines as one scalar in `[-1, 1]`:
/// negative for bearish tone, positive for bullish.
pub trait SentimentPort {
    fn sentiment(&self, headlines: &[String]) -> f64;
}
