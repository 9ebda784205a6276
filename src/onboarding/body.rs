//! Renderable frames for each step body.
//!
//! Bodies keep no state of their own: a frame is a pure function of the
//! step's data and the milliseconds elapsed since the step became current.
//! Nothing here is shared between steps.

use serde::Serialize;

use super::model::{Outcome, QuestPreview, Realm, Reward, StepKind, StreakBenefit};

/// XP shown as soon as the XP step mounts.
pub const XP_INITIAL: u32 = 75;
/// XP after the bar fills.
pub const XP_FULL: u32 = 100;
pub const XP_FILL_AT_MS: u64 = 1_000;
pub const LEVEL_UP_AT_MS: u64 = 3_000;

pub const STREAK_START_AT_MS: u64 = 500;
pub const STREAK_STEP_MS: u64 = 200;
pub const STREAK_TARGET: u32 = 7;

/// How a streak benefit card is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitFrame {
    pub days: u32,
    pub bonus: String,
    pub unlocked: bool,
}

/// A button on the call-to-action step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceFrame {
    pub outcome: Outcome,
    pub label: String,
}

/// Snapshot of one step body at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyFrame {
    Entrance {
        greeting: String,
    },
    Realms {
        realms: Vec<Realm>,
    },
    XpLeveling {
        xp: u32,
        level: u32,
        next_level: u32,
        show_crown: bool,
        quest: QuestPreview,
    },
    Streaks {
        count: u32,
        benefits: Vec<BenefitFrame>,
    },
    Rewards {
        rewards: Vec<Reward>,
    },
    CallToAction {
        choices: Vec<ChoiceFrame>,
    },
}

/// XP and level `elapsed_ms` after the XP step mounted.
pub fn xp_at(elapsed_ms: u64) -> (u32, u32) {
    let xp = if elapsed_ms >= XP_FILL_AT_MS {
        XP_FULL
    } else {
        XP_INITIAL
    };
    let level = if elapsed_ms >= LEVEL_UP_AT_MS { 2 } else { 1 };
    (xp, level)
}

/// Streak counter value `elapsed_ms` after the streak step mounted.
pub fn streak_count_at(elapsed_ms: u64) -> u32 {
    if elapsed_ms < STREAK_START_AT_MS {
        return 0;
    }
    let steps = (elapsed_ms - STREAK_START_AT_MS) / STREAK_STEP_MS;
    steps.min(STREAK_TARGET as u64) as u32
}

fn benefit_frames(benefits: &[StreakBenefit], count: u32) -> Vec<BenefitFrame> {
    benefits
        .iter()
        .map(|b| BenefitFrame {
            days: b.days,
            bonus: b.bonus.clone(),
            unlocked: count >= b.days,
        })
        .collect()
}

impl BodyFrame {
    /// Renders `kind` as it looks `elapsed_ms` into its step.
    pub fn at(kind: &StepKind, elapsed_ms: u64) -> Self {
        match kind {
            StepKind::Entrance { user_name } => BodyFrame::Entrance {
                greeting: format!("Welcome, {}!", user_name),
            },
            StepKind::Realms { realms } => BodyFrame::Realms {
                realms: realms.clone(),
            },
            StepKind::XpLeveling { quest } => {
                let (xp, level) = xp_at(elapsed_ms);
                BodyFrame::XpLeveling {
                    xp,
                    level,
                    next_level: level + 1,
                    show_crown: level >= 2,
                    quest: quest.clone(),
                }
            }
            StepKind::Streaks { benefits } => {
                let count = streak_count_at(elapsed_ms);
                BodyFrame::Streaks {
                    count,
                    benefits: benefit_frames(benefits, count),
                }
            }
            StepKind::Rewards { rewards } => BodyFrame::Rewards {
                rewards: rewards.clone(),
            },
            StepKind::CallToAction { outcomes } => BodyFrame::CallToAction {
                choices: outcomes
                    .iter()
                    .map(|o| ChoiceFrame {
                        outcome: *o,
                        label: o.label().to_string(),
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_timeline() {
        assert_eq!(xp_at(0), (75, 1));
        assert_eq!(xp_at(999), (75, 1));
        assert_eq!(xp_at(1000), (100, 1));
        assert_eq!(xp_at(2999), (100, 1));
        assert_eq!(xp_at(3000), (100, 2));
    }

    #[test]
    fn test_streak_counts_up_to_seven() {
        assert_eq!(streak_count_at(0), 0);
        assert_eq!(streak_count_at(699), 0);
        assert_eq!(streak_count_at(700), 1);
        assert_eq!(streak_count_at(1100), 3);
        assert_eq!(streak_count_at(1900), 7);
        assert_eq!(streak_count_at(60_000), 7);
    }

    #[test]
    fn test_streak_benefits_unlock() {
        let kind = StepKind::Streaks {
            benefits: vec![StreakBenefit::new(3, "+10% XP"), StreakBenefit::new(7, "+25% XP")],
        };
        match BodyFrame::at(&kind, 1100) {
            BodyFrame::Streaks { count, benefits } => {
                assert_eq!(count, 3);
                assert!(benefits[0].unlocked);
                assert!(!benefits[1].unlocked);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_crown_after_level_up() {
        let kind = StepKind::XpLeveling {
            quest: QuestPreview {
                title: "Complete Daily Standup".to_string(),
                xp: 25,
                category: "Daily Quest".to_string(),
            },
        };
        let before = BodyFrame::at(&kind, 2000);
        let after = BodyFrame::at(&kind, 3500);
        assert!(matches!(before, BodyFrame::XpLeveling { show_crown: false, level: 1, next_level: 2, .. }));
        assert!(matches!(after, BodyFrame::XpLeveling { show_crown: true, level: 2, next_level: 3, .. }));
    }

    #[test]
    fn test_greeting_and_choices() {
        let greeting = BodyFrame::at(
            &StepKind::Entrance {
                user_name: "Ada".to_string(),
            },
            0,
        );
        assert_eq!(
            greeting,
            BodyFrame::Entrance {
                greeting: "Welcome, Ada!".to_string()
            }
        );

        let cta = BodyFrame::at(
            &StepKind::CallToAction {
                outcomes: Outcome::ALL.to_vec(),
            },
            0,
        );
        match cta {
            BodyFrame::CallToAction { choices } => {
                assert_eq!(choices.len(), 3);
                assert_eq!(choices[1].label, "Create a Clan Instead");
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }
}
