//! Pipeline orchestrator — runs the ordered stages against one event.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::FilterConfig;
use crate::error::{ConfigError, HostError};
use crate::host::OutboundEvent;
use crate::pipeline::stages::{
    DuplicateFilter, ErrorInterceptor, LeakFailsafe, TextNormalizer, TypeGate,
};
use crate::pipeline::types::{FilterStage, PipelineOutcome, StageContext, StageDecision};
use crate::segment::MessageChain;
use crate::state::GroupStateStore;

/// The outbound sanitization pipeline.
///
/// Owns the group-state store and the statically ordered stage list; one
/// instance serves every outgoing event. Execution order is a constant of
/// this type, not a registration priority:
/// leak failsafe → duplicate filter → error interceptor → type gate →
/// text normalizer.
pub struct OutputPipeline {
    config: FilterConfig,
    store: Arc<GroupStateStore>,
    stages: Vec<Box<dyn FilterStage>>,
}

impl OutputPipeline {
    /// Build the pipeline from a config snapshot.
    ///
    /// Fails only on an invalid removal pattern.
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        Self::with_store(config, Arc::new(GroupStateStore::new()))
    }

    /// Build with an externally owned state store.
    pub fn with_store(
        config: FilterConfig,
        store: Arc<GroupStateStore>,
    ) -> Result<Self, ConfigError> {
        let normalizer = TextNormalizer::new(&config)?;
        // The failsafe must run before any state-touching stage, and the
        // duplicate check must precede error interception.
        let stages: Vec<Box<dyn FilterStage>> = vec![
            Box::new(LeakFailsafe::new()),
            Box::new(DuplicateFilter),
            Box::new(ErrorInterceptor),
            Box::new(TypeGate),
            Box::new(normalizer),
        ];
        Ok(Self::assemble(config, store, stages))
    }

    /// Build with a custom stage list (replaces the standard five).
    ///
    /// The list is run in the given order; mostly useful for tests and
    /// hosts that splice in their own stages.
    pub fn with_stages(
        config: FilterConfig,
        store: Arc<GroupStateStore>,
        stages: Vec<Box<dyn FilterStage>>,
    ) -> Self {
        Self::assemble(config, store, stages)
    }

    fn assemble(
        config: FilterConfig,
        store: Arc<GroupStateStore>,
        stages: Vec<Box<dyn FilterStage>>,
    ) -> Self {
        Self {
            config,
            store,
            stages,
        }
    }

    /// Shared handle to the group-state store.
    pub fn store(&self) -> Arc<GroupStateStore> {
        self.store.clone()
    }

    /// Run the pipeline against one outgoing-message event.
    ///
    /// Never fails toward the host: an unexpected stage error is logged and
    /// the run aborts fail-open — the original message goes through
    /// unmodified and nothing commits. A suppression or replacement is
    /// applied through the event before the outcome is returned; on
    /// `PassedThrough` the returned chain is what the host should deliver.
    pub async fn run(&self, event: &dyn OutboundEvent) -> PipelineOutcome {
        let original = event.outgoing_chain();
        debug!(
            platform = event.platform(),
            sender = event.sender_id(),
            inbound = event.message_text(),
            segments = original.len(),
            "processing outgoing reply"
        );

        // Empty results never go out.
        if original.is_empty() {
            debug!(platform = event.platform(), "empty outgoing result, withholding delivery");
            event.suppress_delivery().await;
            return PipelineOutcome::Suppressed;
        }

        let group_id = event.group_id();
        let state_handle = match group_id.as_deref() {
            Some(gid) => Some(self.store.get(gid).await),
            None => None,
        };
        // Held until the run finishes: same-group events serialize in
        // arrival order, and the duplicate check plus the final commit form
        // one critical section.
        let mut state_guard = match &state_handle {
            Some(handle) => Some(handle.lock().await),
            None => None,
        };

        let mut ctx = StageContext {
            config: &self.config,
            group: state_guard.as_deref_mut(),
            is_admin: event.is_sender_admin(),
            skip_normalization: false,
        };

        let mut chain = original.clone();
        for stage in &self.stages {
            match stage.process(chain, &mut ctx) {
                Ok(StageDecision::Continue(next)) => chain = next,
                Ok(StageDecision::Suppress) => {
                    debug!(
                        stage = stage.name(),
                        sender = event.sender_id(),
                        "delivery withheld"
                    );
                    event.suppress_delivery().await;
                    return PipelineOutcome::Suppressed;
                }
                Ok(StageDecision::Replace(replacement)) => {
                    debug!(stage = stage.name(), "outgoing reply substituted");
                    return replace_or_suppress(event, replacement).await;
                }
                Err(e) => {
                    // Fail open: a broken filter must not silence the bot.
                    error!(
                        stage = stage.name(),
                        error = %e,
                        "stage failed, passing original message through"
                    );
                    return PipelineOutcome::PassedThrough(original);
                }
            }
        }

        if let Some(group) = ctx.group {
            group.commit(chain.clone());
            debug!(group = %group.group_id, "last-message state committed");
        }
        PipelineOutcome::PassedThrough(chain)
    }
}

/// Apply a replacement decision, falling back to suppression on platforms
/// that cannot substitute an already-composed reply.
async fn replace_or_suppress(
    event: &dyn OutboundEvent,
    replacement: MessageChain,
) -> PipelineOutcome {
    match event.replace_result(replacement.clone()).await {
        Ok(()) => PipelineOutcome::Replaced(replacement),
        Err(HostError::Unsupported { platform }) => {
            warn!(
                platform = %platform,
                "reply substitution unsupported, withholding delivery instead"
            );
            event.suppress_delivery().await;
            PipelineOutcome::Suppressed
        }
    }
}
