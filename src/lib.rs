//! Outsift — outbound-message sanitization core for a conversational bot.
//!
//! Before a composed reply leaves the bot and reaches a chat group, the
//! pipeline inspects, mutates, or suppresses it: per-group duplicate
//! suppression, a reasoning-trace failsafe, error-keyword interception,
//! content-type gating, and text normalization, safe under concurrent
//! outgoing events. The host framework is reached only through the
//! [`host::OutboundEvent`] boundary.

pub mod config;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod segment;
pub mod state;
