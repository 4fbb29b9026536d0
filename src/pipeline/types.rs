//! Shared types for the outbound sanitization pipeline.

use crate::config::FilterConfig;
use crate::error::StageError;
use crate::segment::MessageChain;
use crate::state::GroupState;

// ── Stage decision ──────────────────────────────────────────────────

/// Decision returned by each filter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageDecision {
    /// Pass the (possibly mutated) chain to the next stage.
    Continue(MessageChain),
    /// Drop the message entirely. Terminal: no later stage runs and no
    /// state commits.
    Suppress,
    /// Substitute a different chain for the composed reply. Terminal, same
    /// as `Suppress`; the orchestrator performs the substitution and falls
    /// back to suppression on platforms that cannot substitute.
    Replace(MessageChain),
}

impl StageDecision {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue(_) => "continue",
            Self::Suppress => "suppress",
            Self::Replace(_) => "replace",
        }
    }
}

// ── Pipeline outcome ────────────────────────────────────────────────

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Delivery was withheld.
    Suppressed,
    /// The outgoing result was substituted with this chain.
    Replaced(MessageChain),
    /// The message goes out as this chain, possibly normalized.
    PassedThrough(MessageChain),
}

impl PipelineOutcome {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Suppressed => "suppressed",
            Self::Replaced(_) => "replaced",
            Self::PassedThrough(_) => "passed_through",
        }
    }
}

// ── Run context ─────────────────────────────────────────────────────

/// Mutable per-run context shared by the stages.
///
/// `group` is the locked state record of the owning group. The orchestrator
/// holds the group lock for the whole run, so the duplicate check a stage
/// performs here and the commit the orchestrator performs afterwards happen
/// inside a single critical section.
pub struct StageContext<'a> {
    /// Immutable option snapshot for this run.
    pub config: &'a FilterConfig,
    /// Locked group record; `None` for non-group conversations.
    pub group: Option<&'a mut GroupState>,
    /// Whether the triggering sender is a bot administrator.
    pub is_admin: bool,
    /// Set by the type gate when the chain carries segment kinds the text
    /// cleaner must not touch.
    pub skip_normalization: bool,
}

// ── Stage trait ─────────────────────────────────────────────────────

/// One ordered unit of the sanitization pipeline.
///
/// Stages are pure with respect to the host: they see the current chain
/// and the run context and return a decision. Host I/O (substitution,
/// suppression) belongs to the orchestrator.
pub trait FilterStage: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Consume the current chain and decide how the run proceeds.
    fn process(
        &self,
        chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError>;
}
