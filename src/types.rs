//! Core types for the croscope pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: interaction events, behavior profiles, page context snapshots,
//! submissions, and suggestion records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of captured click target text
pub const CLICK_TEXT_MAX_LEN: usize = 50;

/// Interaction event kinds captured from an instrumented page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    Scroll,
    PageLoad,
    Test,
}

/// The DOM element a click landed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    /// Element tag name (e.g. "BUTTON", "A")
    pub tag: String,
    /// Visible text, truncated to [`CLICK_TEXT_MAX_LEN`] characters
    #[serde(default)]
    pub text: String,
    /// CSS class attribute
    #[serde(default)]
    pub class_name: String,
    /// Element id attribute
    #[serde(default)]
    pub id: String,
}

/// Viewport-relative click coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPosition {
    pub x: i32,
    pub y: i32,
}

/// Click event data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Target element
    pub target: ClickTarget,
    /// Pointer position at click time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<ClickPosition>,
}

/// Scroll event data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollEvent {
    /// Scroll depth as a percentage of the page, clamped to 0-100
    pub percent: u8,
}

/// Page load event data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLoadEvent {
    /// Navigation-start to load-event-end duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time_ms: Option<u32>,
}

/// Synthetic test event data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    /// 1-based sequence number within the generated batch
    pub number: u32,
}

/// One observed interaction, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Event timestamp, monotonic per session
    pub occurred_at: DateTime<Utc>,
    /// Event kind
    pub kind: EventKind,
    /// Click data (present when kind is Click)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickEvent>,
    /// Scroll data (present when kind is Scroll)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollEvent>,
    /// Page load data (present when kind is PageLoad)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_load: Option<PageLoadEvent>,
    /// Test data (present when kind is Test)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<TestEvent>,
}

impl InteractionEvent {
    /// Build a click event, truncating target text to [`CLICK_TEXT_MAX_LEN`]
    pub fn click(
        occurred_at: DateTime<Utc>,
        mut target: ClickTarget,
        position: Option<ClickPosition>,
    ) -> Self {
        if target.text.chars().count() > CLICK_TEXT_MAX_LEN {
            target.text = target.text.chars().take(CLICK_TEXT_MAX_LEN).collect();
        }
        Self {
            occurred_at,
            kind: EventKind::Click,
            click: Some(ClickEvent { target, position }),
            scroll: None,
            page_load: None,
            test: None,
        }
    }

    /// Build a scroll event with the percent clamped to 0-100
    pub fn scroll(occurred_at: DateTime<Utc>, percent: u8) -> Self {
        Self {
            occurred_at,
            kind: EventKind::Scroll,
            click: None,
            scroll: Some(ScrollEvent {
                percent: percent.min(100),
            }),
            page_load: None,
            test: None,
        }
    }

    /// Build a page load event
    pub fn page_load(occurred_at: DateTime<Utc>, load_time_ms: Option<u32>) -> Self {
        Self {
            occurred_at,
            kind: EventKind::PageLoad,
            click: None,
            scroll: None,
            page_load: Some(PageLoadEvent { load_time_ms }),
            test: None,
        }
    }

    /// Build a synthetic test event
    pub fn test(occurred_at: DateTime<Utc>, number: u32) -> Self {
        Self {
            occurred_at,
            kind: EventKind::Test,
            click: None,
            scroll: None,
            page_load: None,
            test: Some(TestEvent { number }),
        }
    }
}

/// Detected page category, derived from the URL path via first-match rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Homepage,
    Product,
    Cart,
    Checkout,
    Contact,
    About,
    Pricing,
    #[default]
    Other,
}

/// Counts of notable element groups on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ElementCounts {
    pub buttons: u32,
    pub links: u32,
    pub forms: u32,
    pub images: u32,
}

/// Viewport dimensions at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Static snapshot of page structure, captured once per submission.
///
/// Rule guard fields are optional: an absent field means the corresponding
/// suggestion rule does not apply, never that the condition is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageContext {
    /// Document title
    #[serde(default)]
    pub title: String,
    /// Full page URL
    #[serde(default)]
    pub url: String,
    /// Detected page category
    #[serde(default)]
    pub page_type: PageType,
    /// Viewport dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Element group counts
    #[serde(default)]
    pub element_counts: ElementCounts,
    /// Whether a call-to-action element was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_call_to_action: Option<bool>,
    /// Whether testimonial/review elements were detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_testimonials: Option<bool>,
    /// Length of the visible page text in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<u64>,
    /// Page load time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time_ms: Option<u32>,
}

/// Aggregate behavioral profile folded from one event batch.
///
/// Derived, never stored independently; recomputed fresh from a batch each
/// time. Guard fields mirror [`PageContext`]: absent means "no sample", so
/// the matching rule is inapplicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BehaviorProfile {
    /// Number of click events in the batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_clicks: Option<u32>,
    /// Number of scroll samples in the batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_scrolls: Option<u32>,
    /// Deepest scroll percent observed; None when the batch has no scrolls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scroll_percent: Option<u8>,
    /// Tag names of clicked elements, in click order
    #[serde(default)]
    pub clicked_elements: Vec<String>,
    /// Elapsed time since session start in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_ms: Option<i64>,
    /// Engagement score: clicks + min(scrolls, 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<u32>,
}

/// One drained batch of events sent to the collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Client-generated session identifier derived from session start time
    pub session_id: String,
    /// When the submission was assembled
    pub timestamp: DateTime<Utc>,
    /// Page URL at flush time
    pub url: String,
    /// The drained event batch, in arrival order
    pub events: Vec<InteractionEvent>,
    /// Page snapshot captured at flush time
    #[serde(default)]
    pub page_context: PageContext,
    /// Behavioral profile folded from the batch
    #[serde(default)]
    pub behavior_profile: BehaviorProfile,
    /// True when sent during page teardown (best-effort transport)
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

/// Suggestion priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

/// One improvement suggestion produced by the rules engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short headline
    pub title: String,
    /// Explanation, may embed observed values
    pub description: String,
    /// Free-text impact estimate
    pub impact: String,
    /// Rule-assigned priority
    pub priority: Priority,
    /// Example remediation snippet
    pub code: String,
}

/// A submission as kept by the session store, with server-assigned metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    /// Server-assigned unique id
    pub id: String,
    /// Server receive time
    pub received_at: DateTime<Utc>,
    /// The submission as received
    pub submission: Submission,
    /// Suggestions generated for this submission
    pub suggestions: Vec<Suggestion>,
}

/// Success body for `POST /events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub suggestions_count: usize,
    pub total_stored: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Error body for `POST /events` (HTTP 400)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_kind_serialization() {
        let kind = EventKind::PageLoad;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"page_load\"");

        let parsed: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EventKind::PageLoad);
    }

    #[test]
    fn test_click_text_truncation() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let target = ClickTarget {
            tag: "BUTTON".to_string(),
            text: "x".repeat(80),
            class_name: "btn".to_string(),
            id: String::new(),
        };
        let event = InteractionEvent::click(at, target, None);
        assert_eq!(
            event.click.unwrap().target.text.chars().count(),
            CLICK_TEXT_MAX_LEN
        );
    }

    #[test]
    fn test_scroll_percent_clamped() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = InteractionEvent::scroll(at, 250);
        assert_eq!(event.scroll.unwrap().percent, 100);
    }

    #[test]
    fn test_submission_deserialization_with_sparse_fields() {
        let json = r#"{
            "session_id": "session_1709294400000",
            "timestamp": "2024-03-01T12:00:05Z",
            "url": "https://example.com/pricing",
            "events": [],
            "final": true
        }"#;

        let submission: Submission = serde_json::from_str(json).unwrap();
        assert!(submission.is_final);
        assert_eq!(submission.page_context.page_type, PageType::Other);
        assert!(submission.behavior_profile.total_clicks.is_none());
        assert!(submission.behavior_profile.max_scroll_percent.is_none());
    }

    #[test]
    fn test_final_flag_wire_name() {
        let submission = Submission {
            session_id: "session_1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            url: "https://example.com/".to_string(),
            events: vec![],
            page_context: PageContext::default(),
            behavior_profile: BehaviorProfile::default(),
            is_final: true,
        };

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["final"], true);
        assert!(value.get("is_final").is_none());
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let body = ErrorResponse {
            error: "Malformed submission".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
