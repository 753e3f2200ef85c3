//! Suggestion engine
//!
//! A pure function mapping (page context, behavior profile) to an ordered
//! list of suggestions. Rules are independent and evaluated in declaration
//! order; each contributes zero or exactly one suggestion, and the output is
//! never re-sorted. A rule whose guard field is absent does not apply.

use crate::types::{BehaviorProfile, PageContext, PageType, Priority, Suggestion};

/// Scroll depth below this percent triggers the engagement rule (strict `<`)
pub const LOW_SCROLL_THRESHOLD_PCT: u8 = 50;

/// Click counts below this trigger the interactivity rule (strict `<`)
pub const LOW_CLICK_THRESHOLD: u32 = 2;

/// Load times above this many milliseconds trigger the performance rule (strict `>`)
pub const SLOW_LOAD_THRESHOLD_MS: u32 = 3000;

/// Priority of the low-scroll engagement rule.
///
/// Historically this diverged between two handler implementations (one said
/// high, one said medium). It is a single named constant so the choice is
/// explicit and pinned by tests.
pub const ENGAGEMENT_RULE_PRIORITY: Priority = Priority::High;

/// Rule-based suggestion generator
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Evaluate all rules in fixed order against one submission's inputs
    pub fn generate(context: &PageContext, profile: &BehaviorProfile) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        if let Some(s) = rule_missing_call_to_action(context) {
            suggestions.push(s);
        }
        if let Some(s) = rule_low_scroll_engagement(profile) {
            suggestions.push(s);
        }
        if let Some(s) = rule_low_interactivity(profile) {
            suggestions.push(s);
        }
        if let Some(s) = rule_slow_load(context) {
            suggestions.push(s);
        }
        if let Some(s) = rule_homepage_social_proof(context) {
            suggestions.push(s);
        }

        suggestions
    }
}

/// Rule 1: no call-to-action detected on the page
fn rule_missing_call_to_action(context: &PageContext) -> Option<Suggestion> {
    if context.has_call_to_action != Some(false) {
        return None;
    }
    Some(Suggestion {
        title: "Add a primary call to action".to_string(),
        description: "No action button detected. Add a visible CTA to improve conversion."
            .to_string(),
        impact: "+15-25% conversion".to_string(),
        priority: Priority::High,
        code: r#"<button style="background: #ff6b35; color: white; padding: 15px 30px; border: none; border-radius: 6px;">Action</button>"#
            .to_string(),
    })
}

/// Rule 2: visitors stop scrolling in the upper half of the page
fn rule_low_scroll_engagement(profile: &BehaviorProfile) -> Option<Suggestion> {
    let percent = profile.max_scroll_percent?;
    if percent >= LOW_SCROLL_THRESHOLD_PCT {
        return None;
    }
    Some(Suggestion {
        title: "Improve initial engagement".to_string(),
        description: format!(
            "Users only scroll to {percent}%. Strengthen the content above the fold."
        ),
        impact: "+20-30% engagement".to_string(),
        priority: ENGAGEMENT_RULE_PRIORITY,
        code: "Move the key elements into the first 600px".to_string(),
    })
}

/// Rule 3: fewer than two clicks in the batch
fn rule_low_interactivity(profile: &BehaviorProfile) -> Option<Suggestion> {
    let clicks = profile.total_clicks?;
    if clicks >= LOW_CLICK_THRESHOLD {
        return None;
    }
    Some(Suggestion {
        title: "Increase interactivity".to_string(),
        description: "Few interactions detected. Add clickable elements and internal links."
            .to_string(),
        impact: "+25% engagement".to_string(),
        priority: Priority::Medium,
        code: r##"<a href="#section" style="color: #ff6b35;">Learn more</a>"##.to_string(),
    })
}

/// Rule 4: page took longer than the slow-load threshold
fn rule_slow_load(context: &PageContext) -> Option<Suggestion> {
    let load_time_ms = context.load_time_ms?;
    if load_time_ms <= SLOW_LOAD_THRESHOLD_MS {
        return None;
    }
    let seconds = (f64::from(load_time_ms) / 1000.0).round() as u32;
    Some(Suggestion {
        title: "Optimize load speed".to_string(),
        description: format!("Slow page ({seconds}s). Optimize images and scripts."),
        impact: "+7% conversion per second saved".to_string(),
        priority: Priority::High,
        code: "Compress images, minify CSS/JS, use a CDN".to_string(),
    })
}

/// Rule 5: homepage without testimonial elements
fn rule_homepage_social_proof(context: &PageContext) -> Option<Suggestion> {
    if context.page_type != PageType::Homepage || context.has_testimonials != Some(false) {
        return None;
    }
    Some(Suggestion {
        title: "Add social proof".to_string(),
        description: "Homepage has no testimonials. Social proof builds trust.".to_string(),
        impact: "+10-20% conversion".to_string(),
        priority: Priority::Medium,
        code: r#"<div class="testimonial">"Great product" - A happy customer</div>"#.to_string(),
    })
}
