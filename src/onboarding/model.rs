//! Data models for the onboarding flow.
//!
//! A flow is an immutable, ordered [`StepRegistry`]. Each [`Step`] carries a
//! [`StepKind`] variant holding exactly the data its body needs to render.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OnboardingConfig;
use crate::error::{StreaklyError, StreaklyResult};

// =============================================================================
// OUTCOME
// =============================================================================

/// Choice made on the terminal step, reported to the hosting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    StartSolo,
    CreateClan,
    SkipToDashboard,
}

impl Outcome {
    /// Every outcome, in the order the call-to-action offers them.
    pub const ALL: [Outcome; 3] = [
        Outcome::StartSolo,
        Outcome::CreateClan,
        Outcome::SkipToDashboard,
    ];

    /// Wire tag for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::StartSolo => "start_solo",
            Outcome::CreateClan => "create_clan",
            Outcome::SkipToDashboard => "skip_to_dashboard",
        }
    }

    /// Navigation target the host should move to after completion.
    pub fn route(&self) -> &'static str {
        // Every choice currently lands on the solo dashboard.
        "/solo-adventure-dashboard"
    }

    /// Button label shown on the call-to-action step.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::StartSolo => "Start Your Adventure",
            Outcome::CreateClan => "Create a Clan Instead",
            Outcome::SkipToDashboard => "Skip to Dashboard",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = StreaklyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| StreaklyError::unknown_outcome(s))
    }
}

// =============================================================================
// STEP BODY DATA
// =============================================================================

/// A life area shown on the realms step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Realm {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Example quest card on the XP step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestPreview {
    pub title: String,
    pub xp: u32,
    pub category: String,
}

/// Bonus unlocked after keeping a streak for `days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakBenefit {
    pub days: u32,
    pub bonus: String,
}

impl StreakBenefit {
    pub fn new(days: u32, bonus: impl Into<String>) -> Self {
        Self {
            days,
            bonus: bonus.into(),
        }
    }
}

/// Rarity tier of a cosmetic reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Rare,
    Epic,
    Legendary,
}

/// Cosmetic item previewed on the rewards step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: u32,
    pub name: String,
    /// Slot the item occupies: "Avatar", "Background", "Border".
    pub kind: String,
    pub rarity: Rarity,
}

impl Reward {
    pub fn new(id: u32, name: impl Into<String>, kind: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            rarity,
        }
    }
}

// =============================================================================
// STEP
// =============================================================================

/// Discriminated body of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    Entrance { user_name: String },
    Realms { realms: Vec<Realm> },
    XpLeveling { quest: QuestPreview },
    Streaks { benefits: Vec<StreakBenefit> },
    Rewards { rewards: Vec<Reward> },
    CallToAction { outcomes: Vec<Outcome> },
}

/// One stage of the onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    /// Display duration; `0` means manual advance only.
    pub duration_ms: u64,
    pub title: String,
    pub kind: StepKind,
}

impl Step {
    pub fn new(id: impl Into<String>, duration_ms: u64, title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            duration_ms,
            title: title.into(),
            kind,
        }
    }

    /// True when the step never auto-advances.
    pub fn is_manual(&self) -> bool {
        self.duration_ms == 0
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered, immutable list of steps with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    /// Builds a registry, rejecting empty lists and duplicate ids.
    pub fn new(steps: Vec<Step>) -> StreaklyResult<Self> {
        if steps.is_empty() {
            return Err(StreaklyError::EmptyRegistry);
        }
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(StreaklyError::duplicate_step_id(&step.id));
            }
        }
        Ok(Self { steps })
    }

    /// The stock six-step Streakly onboarding.
    pub fn standard(config: &OnboardingConfig, user_name: Option<&str>) -> Self {
        let duration = config.step_duration_ms;
        let steps = vec![
            Step::new(
                "entrance",
                duration,
                "Welcome!",
                StepKind::Entrance {
                    user_name: config.resolve_user_name(user_name),
                },
            ),
            Step::new(
                "realms",
                duration,
                "Explore Realms",
                StepKind::Realms {
                    realms: vec![
                        Realm::new("daily", "Daily Quests", "Complete daily tasks and build habits"),
                        Realm::new("learning", "Learning", "Expand your knowledge and skills"),
                        Realm::new("health", "Health", "Take care of your body and mind"),
                    ],
                },
            ),
            Step::new(
                "xp-leveling",
                duration,
                "Gain Experience",
                StepKind::XpLeveling {
                    quest: QuestPreview {
                        title: "Complete Daily Standup".to_string(),
                        xp: 25,
                        category: "Daily Quest".to_string(),
                    },
                },
            ),
            Step::new(
                "streaks",
                duration,
                "Build Streaks",
                StepKind::Streaks {
                    benefits: vec![
                        StreakBenefit::new(3, "+10% XP"),
                        StreakBenefit::new(7, "+25% XP"),
                        StreakBenefit::new(30, "Rare Items"),
                        StreakBenefit::new(100, "Legend Status"),
                    ],
                },
            ),
            Step::new(
                "rewards",
                duration,
                "Unlock Rewards",
                StepKind::Rewards {
                    rewards: vec![
                        Reward::new(1, "Fire Crown", "Avatar", Rarity::Epic),
                        Reward::new(2, "Lightning BG", "Background", Rarity::Rare),
                        Reward::new(3, "Golden Frame", "Border", Rarity::Legendary),
                    ],
                },
            ),
            Step::new(
                "cta",
                0,
                "Start Adventure",
                StepKind::CallToAction {
                    outcomes: Outcome::ALL.to_vec(),
                },
            ),
        ];
        Self { steps }
    }

    /// Number of steps (always at least one).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the registry holds no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the terminal step.
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// True when `index` is the terminal step.
    pub fn is_terminal(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Step at `index`.
    ///
    /// # Panics
    /// If `index` is out of range; callers hold the index invariant.
    pub fn step(&self, index: usize) -> &Step {
        &self.steps[index]
    }

    /// Looks up the position of a step by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

// =============================================================================
// TESTS
// =============================================================================
