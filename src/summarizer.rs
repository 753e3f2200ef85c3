//! Behavior summarization
//!
//! Folds an ordered event batch into an aggregate [`BehaviorProfile`]. The
//! fold is a pure function of the batch and the timing inputs: the same
//! batch always yields the same profile.

use chrono::{DateTime, Utc};

use crate::types::{BehaviorProfile, EventKind, InteractionEvent};

/// Scroll count contribution to the engagement score saturates here
const ENGAGEMENT_SCROLL_CAP: u32 = 5;

/// Summarizer for interaction event batches
pub struct BehaviorSummarizer;

impl BehaviorSummarizer {
    /// Fold a batch into a behavioral profile.
    ///
    /// `session_start` and `now` bound the elapsed-time measurement;
    /// everything else is derived from the events alone.
    pub fn summarize(
        events: &[InteractionEvent],
        session_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> BehaviorProfile {
        let clicks: Vec<&InteractionEvent> = events
            .iter()
            .filter(|e| e.kind == EventKind::Click)
            .collect();

        let scroll_percents: Vec<u8> = events
            .iter()
            .filter(|e| e.kind == EventKind::Scroll)
            .filter_map(|e| e.scroll)
            .map(|s| s.percent)
            .collect();

        let total_clicks = clicks.len() as u32;
        let total_scrolls = scroll_percents.len() as u32;

        // No scroll samples means no depth observation at all, not depth 0.
        let max_scroll_percent = scroll_percents.iter().copied().max();

        let clicked_elements = clicks
            .iter()
            .filter_map(|e| e.click.as_ref())
            .map(|c| c.target.tag.clone())
            .collect();

        let engagement_score = total_clicks + total_scrolls.min(ENGAGEMENT_SCROLL_CAP);

        BehaviorProfile {
            total_clicks: Some(total_clicks),
            total_scrolls: Some(total_scrolls),
            max_scroll_percent,
            clicked_elements,
            time_spent_ms: Some((now - session_start).num_milliseconds()),
            engagement_score: Some(engagement_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClickPosition, ClickTarget};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, sec).unwrap()
    }

    fn click_on(tag: &str, sec: u32) -> InteractionEvent {
        InteractionEvent::click(
            at(sec),
            ClickTarget {
                tag: tag.to_string(),
                text: String::new(),
                class_name: String::new(),
                id: String::new(),
            },
            Some(ClickPosition { x: 10, y: 20 }),
        )
    }

    fn make_test_batch() -> Vec<InteractionEvent> {
        vec![
            InteractionEvent::page_load(at(1), Some(900)),
            click_on("BUTTON", 2),
            InteractionEvent::scroll(at(3), 25),
            InteractionEvent::scroll(at(4), 70),
            click_on("A", 5),
            InteractionEvent::scroll(at(6), 40),
        ]
    }

    #[test]
    fn test_summarize_counts_and_max_scroll() {
        let profile = BehaviorSummarizer::summarize(&make_test_batch(), at(0), at(10));

        assert_eq!(profile.total_clicks, Some(2));
        assert_eq!(profile.total_scrolls, Some(3));
        assert_eq!(profile.max_scroll_percent, Some(70));
        assert_eq!(
            profile.clicked_elements,
            vec!["BUTTON".to_string(), "A".to_string()]
        );
        assert_eq!(profile.time_spent_ms, Some(10_000));
    }

    #[test]
    fn test_engagement_score_formula() {
        // 2 clicks + min(3 scrolls, 5) = 5
        let profile = BehaviorSummarizer::summarize(&make_test_batch(), at(0), at(10));
        assert_eq!(profile.engagement_score, Some(5));
    }

    #[test]
    fn test_engagement_scroll_contribution_saturates() {
        let mut events = vec![click_on("BUTTON", 0)];
        for i in 0..8 {
            events.push(InteractionEvent::scroll(at(i + 1), 10));
        }

        let profile = BehaviorSummarizer::summarize(&events, at(0), at(20));
        // 1 click + min(8, 5) = 6
        assert_eq!(profile.engagement_score, Some(6));
    }

    #[test]
    fn test_no_scrolls_yields_no_max_percent() {
        let events = vec![click_on("BUTTON", 1)];
        let profile = BehaviorSummarizer::summarize(&events, at(0), at(5));

        assert_eq!(profile.max_scroll_percent, None);
        assert_eq!(profile.total_scrolls, Some(0));
    }

    #[test]
    fn test_empty_batch() {
        let profile = BehaviorSummarizer::summarize(&[], at(0), at(5));

        assert_eq!(profile.total_clicks, Some(0));
        assert_eq!(profile.total_scrolls, Some(0));
        assert_eq!(profile.max_scroll_percent, None);
        assert!(profile.clicked_elements.is_empty());
        assert_eq!(profile.engagement_score, Some(0));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let batch = make_test_batch();
        let first = BehaviorSummarizer::summarize(&batch, at(0), at(10));
        let second = BehaviorSummarizer::summarize(&batch, at(0), at(10));
        assert_eq!(first, second);
    }
}
