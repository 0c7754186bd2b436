// 🎯 Strategy - Swappable movement behavior
// Context holds one Behavior at a time and delegates to it without knowing which one

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Printed by `Context::perform_move` when nothing has been selected yet
pub const NO_STRATEGY_MESSAGE: &str = "No movement strategy set!";

// ============================================================================
// BEHAVIOR CONTRACT
// ============================================================================

/// Behavior - the movement capability
///
/// Adding a movement style = implement this trait. `Context` never changes.
pub trait Behavior: Send + Sync {
    /// Short name used in logs and move outcomes
    fn name(&self) -> &str;

    /// Description of the movement style
    fn description(&self) -> &str;

    /// Perform the movement
    ///
    /// The movement itself cannot fail; the only error is the output sink.
    fn perform(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.description())
    }
}

// ============================================================================
// VARIANTS
// ============================================================================

/// Assertive, hostile movement
#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveBehavior;

impl Behavior for AggressiveBehavior {
    fn name(&self) -> &str {
        "aggressive"
    }

    fn description(&self) -> &str {
        "Moving Aggressively..."
    }
}

/// Cautious movement that avoids danger
#[derive(Debug, Clone, Copy, Default)]
pub struct DefensiveBehavior;

impl Behavior for DefensiveBehavior {
    fn name(&self) -> &str {
        "defensive"
    }

    fn description(&self) -> &str {
        "Moving Defensively..."
    }
}

/// Neutral, balanced movement
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalBehavior;

impl Behavior for NormalBehavior {
    fn name(&self) -> &str {
        "normal"
    }

    fn description(&self) -> &str {
        "Moving Normally..."
    }
}

// ============================================================================
// BEHAVIOR KIND (tag + factory)
// ============================================================================

/// Tag for the built-in behaviors, used by config and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    Aggressive,
    Defensive,
    Normal,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 3] = [
        BehaviorKind::Aggressive,
        BehaviorKind::Defensive,
        BehaviorKind::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::Aggressive => "aggressive",
            BehaviorKind::Defensive => "defensive",
            BehaviorKind::Normal => "normal",
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggressive" => Ok(BehaviorKind::Aggressive),
            "defensive" => Ok(BehaviorKind::Defensive),
            "normal" => Ok(BehaviorKind::Normal),
            other => Err(anyhow!(
                "Unknown behavior '{}' (expected aggressive, defensive or normal)",
                other
            )),
        }
    }
}

/// Get the behavior for a kind
///
/// Factory: returns Box<dyn Behavior> so callers stay variant-agnostic
pub fn get_behavior(kind: BehaviorKind) -> Box<dyn Behavior> {
    match kind {
        BehaviorKind::Aggressive => Box::new(AggressiveBehavior),
        BehaviorKind::Defensive => Box::new(DefensiveBehavior),
        BehaviorKind::Normal => Box::new(NormalBehavior),
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// What happened on a `perform_move` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The held behavior moved
    Moved(String),

    /// Nothing was selected; the fallback message was written
    NoStrategy,
}

/// Holds zero or one behavior and delegates movement to it
#[derive(Default)]
pub struct Context {
    strategy: Option<Box<dyn Behavior>>,
}

impl Context {
    /// Create an empty context (no behavior selected)
    pub fn new() -> Self {
        Context { strategy: None }
    }

    /// Builder: start with a behavior already selected
    pub fn with_strategy(strategy: Box<dyn Behavior>) -> Self {
        Context {
            strategy: Some(strategy),
        }
    }

    /// Replace the held behavior (None clears it). Last write wins.
    pub fn set_strategy(&mut self, strategy: Option<Box<dyn Behavior>>) {
        match &strategy {
            Some(b) => tracing::debug!(behavior = b.name(), "strategy selected"),
            None => tracing::debug!("strategy cleared"),
        }
        self.strategy = strategy;
    }

    /// Name of the held behavior, if any
    pub fn strategy_name(&self) -> Option<&str> {
        self.strategy.as_deref().map(|b| b.name())
    }

    pub fn has_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    /// Move using the held behavior, or write the fallback signal
    pub fn perform_move(&self, out: &mut dyn Write) -> io::Result<MoveOutcome> {
        match self.strategy.as_deref() {
            None => {
                writeln!(out, "{}", NO_STRATEGY_MESSAGE)?;
                Ok(MoveOutcome::NoStrategy)
            }
            Some(behavior) => {
                behavior.perform(out)?;
                Ok(MoveOutcome::Moved(behavior.name().to_string()))
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("strategy", &self.strategy_name())
            .finish()
    }
}
