//! Outbound sanitization pipeline.
//!
//! Every outgoing reply flows through five ordered stages:
//! 1. `LeakFailsafe` — withhold replies carrying an internal reasoning trace
//! 2. `DuplicateFilter` — suppress per-group repeats
//! 3. `ErrorInterceptor` — swap internal error text for an empty reply
//! 4. `TypeGate` — flag chains the text cleaner must not touch
//! 5. `TextNormalizer` — emoji / removal-pattern / lead-prefix cleanup
//!
//! `Suppress` and `Replace` decisions are terminal. The orchestrator holds
//! the owning group's lock for the whole run, so the duplicate check and the
//! commit of the surviving chain form one critical section per group.

pub mod orchestrator;
pub mod stages;
pub mod types;

pub use orchestrator::OutputPipeline;
pub use types::{FilterStage, PipelineOutcome, StageContext, StageDecision};
