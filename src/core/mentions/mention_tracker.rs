// Mention tracker - decides when the bot should react to its trigger keyword.
//
// Two stages of rate limiting sit on top of a keyword match:
// - a short observation window: the first mention gets one reaction, a second
//   mention inside the window gets the other
// - a long global cooldown armed by that second reaction, during which every
//   message is ignored
//
// The state machine itself is a pure function over `MentionState`; the
// tracker only adds the lock around it.

use crate::core::ign::RawMessage;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// What the caller should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionDecision {
    NoAction,
    FirstReaction,
    SecondReaction,
}

/// Mentions seen in the current window. A window never holds zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCount {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionWindow {
    pub count: WindowCount,
    pub started_at: DateTime<Utc>,
}

/// Something the tracker was told about.
#[derive(Debug, Clone, Copy)]
pub struct MentionEvent {
    pub keyword_present: bool,
    pub at: DateTime<Utc>,
}

/// Configuration for mention reactions.
#[derive(Debug, Clone)]
pub struct MentionConfig {
    /// Matched case-insensitively anywhere in the message.
    pub trigger_keyword: String,
    /// How long a window stays open after its first mention.
    pub window_secs: u64,
    /// Quiet period after the second reaction.
    pub cooldown_secs: u64,
}

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            trigger_keyword: "oda".to_string(),
            window_secs: 60,      // 1 minute to mention again...
            cooldown_secs: 3_600, // ...then silence for an hour
        }
    }
}

/// Config values come straight from the environment, so clamp instead of
/// overflowing.
fn saturating_secs(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MentionState {
    /// When the cooldown was last armed.
    pub last_global_trigger: Option<DateTime<Utc>>,
    pub window: Option<MentionWindow>,
}

impl MentionState {
    pub fn cooldown_active(&self, now: DateTime<Utc>, config: &MentionConfig) -> bool {
        match self.last_global_trigger {
            Some(armed_at) => now - armed_at < saturating_secs(config.cooldown_secs),
            None => false,
        }
    }

    /// Apply one event and return the next state with the decision.
    pub fn apply(self, event: MentionEvent, config: &MentionConfig) -> (Self, ReactionDecision) {
        if self.cooldown_active(event.at, config) || !event.keyword_present {
            return (self, ReactionDecision::NoAction);
        }

        let window_len = saturating_secs(config.window_secs);
        let open_window = self
            .window
            .filter(|w| event.at - w.started_at <= window_len);

        match open_window {
            None => {
                let next = Self {
                    window: Some(MentionWindow {
                        count: WindowCount::One,
                        started_at: event.at,
                    }),
                    ..self
                };
                (next, ReactionDecision::FirstReaction)
            }
            Some(window) if window.count == WindowCount::One => {
                let next = Self {
                    last_global_trigger: Some(event.at),
                    window: Some(MentionWindow {
                        count: WindowCount::Two,
                        ..window
                    }),
                };
                (next, ReactionDecision::SecondReaction)
            }
            Some(_) => (self, ReactionDecision::NoAction),
        }
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Process-wide tracker. Every transition happens under one lock.
pub struct MentionTracker {
    config: MentionConfig,
    keyword: String,
    state: Mutex<MentionState>,
}

impl MentionTracker {
    pub fn new(config: MentionConfig) -> Self {
        Self {
            keyword: config.trigger_keyword.to_lowercase(),
            config,
            state: Mutex::new(MentionState::default()),
        }
    }

    /// Feed one message. Bot messages never trigger anything.
    pub async fn observe(&self, message: &RawMessage, now: DateTime<Utc>) -> ReactionDecision {
        if message.is_from_bot {
            return ReactionDecision::NoAction;
        }

        let event = MentionEvent {
            keyword_present: self.contains_keyword(&message.content),
            at: now,
        };

        let mut state = self.state.lock().await;
        let (next, decision) = state.apply(event, &self.config);
        *state = next;

        if decision != ReactionDecision::NoAction {
            tracing::debug!(author_id = message.author_id, ?decision, "Mention reaction");
        }
        decision
    }

    pub fn config(&self) -> &MentionConfig {
        &self.config
    }

    /// Copy of the current state, for diagnostics.
    pub async fn snapshot(&self) -> MentionState {
        *self.state.lock().await
    }

    /// Whether mentions are currently being ignored.
    pub async fn is_cooling_down(&self, now: DateTime<Utc>) -> bool {
        self.snapshot().await.cooldown_active(now, &self.config)
    }

    fn contains_keyword(&self, content: &str) -> bool {
        !self.keyword.is_empty() && content.to_lowercase().contains(&self.keyword)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> RawMessage {
        RawMessage {
            message_id: 1,
            author_id: 5,
            author_display_name: "tenno".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            is_from_bot: false,
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[tokio::test]
    async fn test_first_then_second_reaction() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();

        assert_eq!(
            tracker.observe(&message("hey Oda"), t0).await,
            ReactionDecision::FirstReaction
        );
        assert_eq!(
            tracker.observe(&message("ODA again"), t0 + secs(30)).await,
            ReactionDecision::SecondReaction
        );
    }

    #[tokio::test]
    async fn test_message_without_keyword_leaves_state() {
        let tracker = MentionTracker::new(MentionConfig::default());

        assert_eq!(
            tracker.observe(&message("hello there"), start()).await,
            ReactionDecision::NoAction
        );
        assert_eq!(tracker.snapshot().await, MentionState::default());
    }

    #[tokio::test]
    async fn test_cooldown_silences_everything() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();
        tracker.observe(&message("oda"), t0).await;
        tracker.observe(&message("oda"), t0 + secs(10)).await;

        // A fresh window pattern during cooldown still yields nothing.
        for offset in [20, 100, 200, 3_000, 3_609] {
            assert_eq!(
                tracker.observe(&message("oda"), t0 + secs(offset)).await,
                ReactionDecision::NoAction,
                "offset {}",
                offset
            );
        }
    }

    #[tokio::test]
    async fn test_cooldown_expires() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();
        tracker.observe(&message("oda"), t0).await;
        tracker.observe(&message("oda"), t0 + secs(10)).await;

        assert_eq!(
            tracker.observe(&message("oda"), t0 + secs(10 + 3_600)).await,
            ReactionDecision::FirstReaction
        );
    }

    #[tokio::test]
    async fn test_expired_window_restarts() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();

        tracker.observe(&message("oda"), t0).await;
        assert_eq!(
            tracker.observe(&message("oda"), t0 + secs(61)).await,
            ReactionDecision::FirstReaction
        );

        let state = tracker.snapshot().await;
        assert_eq!(state.window.unwrap().started_at, t0 + secs(61));
        assert!(state.last_global_trigger.is_none());
    }

    #[tokio::test]
    async fn test_window_boundary_is_inclusive() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();

        tracker.observe(&message("oda"), t0).await;
        assert_eq!(
            tracker.observe(&message("oda"), t0 + secs(60)).await,
            ReactionDecision::SecondReaction
        );
    }

    #[tokio::test]
    async fn test_huge_durations_saturate() {
        let tracker = MentionTracker::new(MentionConfig {
            window_secs: 100_000_000_000_000_000,
            cooldown_secs: u64::MAX,
            ..Default::default()
        });
        let t0 = start();

        assert_eq!(
            tracker.observe(&message("oda"), t0).await,
            ReactionDecision::FirstReaction
        );
        assert_eq!(
            tracker.observe(&message("oda"), t0 + secs(86_400 * 365)).await,
            ReactionDecision::SecondReaction
        );
        assert_eq!(
            tracker.observe(&message("oda"), t0 + secs(86_400 * 730)).await,
            ReactionDecision::NoAction
        );
    }

    #[tokio::test]
    async fn test_is_cooling_down_follows_second_reaction() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let t0 = start();

        tracker.observe(&message("oda"), t0).await;
        assert!(!tracker.is_cooling_down(t0 + secs(5)).await);

        tracker.observe(&message("oda"), t0 + secs(10)).await;
        assert!(tracker.is_cooling_down(t0 + secs(20)).await);
        assert!(!tracker.is_cooling_down(t0 + secs(10 + 3_600)).await);
    }

    #[tokio::test]
    async fn test_bot_messages_ignored() {
        let tracker = MentionTracker::new(MentionConfig::default());
        let mut msg = message("oda");
        msg.is_from_bot = true;

        assert_eq!(tracker.observe(&msg, start()).await, ReactionDecision::NoAction);
        assert_eq!(tracker.snapshot().await, MentionState::default());
    }

    #[test]
    fn test_full_window_without_cooldown_is_noop() {
        // Only reachable when the cooldown is shorter than the window.
        let config = MentionConfig {
            cooldown_secs: 5,
            ..Default::default()
        };
        let t0 = start();
        let state = MentionState {
            last_global_trigger: Some(t0),
            window: Some(MentionWindow {
                count: WindowCount::Two,
                started_at: t0,
            }),
        };
        let event = MentionEvent {
            keyword_present: true,
            at: t0 + secs(30),
        };

        let (next, decision) = state.apply(event, &config);
        assert_eq!(decision, ReactionDecision::NoAction);
        assert_eq!(next, state);
    }

    #[test]
    fn test_window_expiry_keeps_cooldown_clock() {
        let config = MentionConfig {
            cooldown_secs: 5,
            ..Default::default()
        };
        let t0 = start();
        let armed = t0 + secs(1);
        let state = MentionState {
            last_global_trigger: Some(armed),
            window: Some(MentionWindow {
                count: WindowCount::Two,
                started_at: t0,
            }),
        };
        let event = MentionEvent {
            keyword_present: true,
            at: t0 + secs(120),
        };

        let (next, decision) = state.apply(event, &config);
        assert_eq!(decision, ReactionDecision::FirstReaction);
        assert_eq!(next.last_global_trigger, Some(armed));
    }

    #[test]
    fn test_custom_keyword_case_insensitive() {
        let tracker = MentionTracker::new(MentionConfig {
            trigger_keyword: "Ordis".to_string(),
            ..Default::default()
        });
        assert!(tracker.contains_keyword("hey ORDIS"));
        assert!(!tracker.contains_keyword("hey oda"));
    }
}
