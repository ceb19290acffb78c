use serde::Serialize;
use thiserror::Error;

/// Rule category a violation belongs to, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    UniqueEnhancement,
    Companion,
    PointsCap,
    General,
    RegimentCount,
    Warmaster,
    RegimentSize,
    LeaderCategory,
    UniqueDuplicate,
    Reinforcement,
    WeaponOptions,
    LeaderAssignment,
    CatalogPresence,
    EnhancementSingleton,
    RegimentOptions,
    VariantExclusivity,
    UndersizeCondition,
}

impl RuleKind {
    /// Stable identifier used in logs and JSON output.
    pub fn code(self) -> &'static str {
        match self {
            RuleKind::UniqueEnhancement => "unique_enhancement",
            RuleKind::Companion => "companion",
            RuleKind::PointsCap => "points_cap",
            RuleKind::General => "general",
            RuleKind::RegimentCount => "regiment_count",
            RuleKind::Warmaster => "warmaster",
            RuleKind::RegimentSize => "regiment_size",
            RuleKind::LeaderCategory => "leader_category",
            RuleKind::UniqueDuplicate => "unique_duplicate",
            RuleKind::Reinforcement => "reinforcement",
            RuleKind::WeaponOptions => "weapon_options",
            RuleKind::LeaderAssignment => "leader_assignment",
            RuleKind::CatalogPresence => "catalog_presence",
            RuleKind::EnhancementSingleton => "enhancement_singleton",
            RuleKind::RegimentOptions => "regiment_options",
            RuleKind::VariantExclusivity => "variant_exclusivity",
            RuleKind::UndersizeCondition => "undersize_condition",
        }
    }
}

/// A single legality problem with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
}

/// Ordered violations produced by one engine run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    /// Returns true when the roster is legal.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Record a violation.
    pub fn push(&mut self, rule: RuleKind, message: impl Into<String>) {
        self.violations.push(Violation {
            rule,
            message: message.into(),
        });
    }

    /// Violations of one category, in the order they were found.
    pub fn for_rule(&self, rule: RuleKind) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.rule == rule)
    }

    /// Plain messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|violation| violation.message.clone())
            .collect()
    }
}

/// Failures that prevent the engine from running at all.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("unknown faction: {0}")]
    UnknownFaction(String),
}

/// Result type for rules operations.
pub type Result<T> = std::result::Result<T, RulesError>;
