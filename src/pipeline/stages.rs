//! The five ordered filter stages.

use regex::Regex;
use tracing::{debug, error};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::FilterConfig;
use crate::error::{ConfigError, StageError};
use crate::pipeline::types::{FilterStage, StageContext, StageDecision};
use crate::segment::{MessageChain, Segment};

// ── Leak failsafe ───────────────────────────────────────────────────

/// Opening marker of an internal reasoning trace.
const MONOLOGUE_OPEN_MARKER: &str = "<thinking>";

/// Final-reply marker, with an optional colon (ASCII or fullwidth) and
/// space after it.
const FINAL_REPLY_PATTERN: &str = r"(?i)final reply[:：]?\s?";

/// Last line of defense against an internal reasoning trace reaching the
/// chat. If an upstream stripping step failed, the raw trace still carries
/// both the monologue opening marker and the final-reply marker; a message
/// containing both is withheld outright. Fail-closed on detection.
pub struct LeakFailsafe {
    final_reply: Regex,
}

impl LeakFailsafe {
    pub fn new() -> Self {
        Self {
            final_reply: Regex::new(FINAL_REPLY_PATTERN).unwrap(),
        }
    }
}

impl Default for LeakFailsafe {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStage for LeakFailsafe {
    fn name(&self) -> &'static str {
        "leak_failsafe"
    }

    fn process(
        &self,
        chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError> {
        if !ctx.config.enable_cot_failsafe {
            return Ok(StageDecision::Continue(chain));
        }

        let text = chain.plain_text();
        if text.contains(MONOLOGUE_OPEN_MARKER) && self.final_reply.is_match(&text) {
            error!(
                marker = MONOLOGUE_OPEN_MARKER,
                "internal reasoning trace detected in outgoing reply, withholding delivery"
            );
            return Ok(StageDecision::Suppress);
        }

        Ok(StageDecision::Continue(chain))
    }
}

// ── Duplicate filter ────────────────────────────────────────────────

/// Suppresses a reply identical to the last one accepted for the group.
///
/// Comparison is exact structural equality over the full segment sequence;
/// one differing character means "not a duplicate". Non-group conversations
/// carry no duplicate state and pass through untouched.
pub struct DuplicateFilter;

impl FilterStage for DuplicateFilter {
    fn name(&self) -> &'static str {
        "duplicate_filter"
    }

    fn process(
        &self,
        chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError> {
        let Some(group) = ctx.group.as_deref() else {
            return Ok(StageDecision::Continue(chain));
        };

        if group.is_duplicate(&chain) {
            debug!(group = %group.group_id, "duplicate reply suppressed");
            return Ok(StageDecision::Suppress);
        }

        // Not a duplicate. The orchestrator commits this chain only if it
        // survives every remaining stage; the group lock stays held until
        // then, so no concurrent event can slip in between check and commit.
        Ok(StageDecision::Continue(chain))
    }
}

// ── Error interceptor ───────────────────────────────────────────────

/// Hides internal error text from the chat.
///
/// Triggers when interception is enabled for this sender and any configured
/// keyword occurs in the plain-text projection (case-sensitive substring).
/// The composed reply is swapped for an empty one.
pub struct ErrorInterceptor;

impl FilterStage for ErrorInterceptor {
    fn name(&self) -> &'static str {
        "error_interceptor"
    }

    fn process(
        &self,
        chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError> {
        // Admin senders see error text unless interception is forced on.
        if !ctx.config.intercept_error && ctx.is_admin {
            return Ok(StageDecision::Continue(chain));
        }

        let text = chain.plain_text();
        let hit = ctx
            .config
            .error_keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .find(|keyword| text.contains(keyword.as_str()));

        if let Some(keyword) = hit {
            debug!(keyword = %keyword, "error keyword in outgoing reply, replacing with empty message");
            return Ok(StageDecision::Replace(MessageChain::empty_reply()));
        }

        Ok(StageDecision::Continue(chain))
    }
}

// ── Type gate ───────────────────────────────────────────────────────

/// Flags chains the text cleaner does not understand.
///
/// Mentions and reply quotes must reach the platform intact, so their
/// presence bypasses normalization; the chain itself passes through
/// unchanged and the duplicate-state commit still proceeds normally.
pub struct TypeGate;

impl FilterStage for TypeGate {
    fn name(&self) -> &'static str {
        "type_gate"
    }

    fn process(
        &self,
        chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError> {
        let cleanable = chain.segments().iter().all(|seg| match seg {
            Segment::Plain { .. } | Segment::Image { .. } | Segment::Sticker { .. } => true,
            Segment::Mention { .. } | Segment::ReplyQuote { .. } => false,
        });

        if !cleanable {
            ctx.skip_normalization = true;
            debug!("chain carries non-cleanable segment kinds, normalization bypassed");
        }

        Ok(StageDecision::Continue(chain))
    }
}

// ── Text normalizer ─────────────────────────────────────────────────

/// Cleans the trailing text segment of short replies.
///
/// Applies only when the chain ends in a text segment, the type gate did
/// not bypass cleaning, and the text is strictly shorter (in code points)
/// than the configured bound. Steps run in fixed order, each independently
/// toggleable: emoji stripping, removal-pattern stripping, lead-prefix
/// removal. The cleaned text replaces the segment's text in place; tag and
/// position are preserved.
pub struct TextNormalizer {
    removal: Option<Regex>,
}

impl TextNormalizer {
    /// Compile the removal pattern from the config snapshot.
    ///
    /// An empty pattern disables the removal step. An invalid pattern is a
    /// construction-time error so a broken config cannot silently degrade
    /// the pipeline.
    pub fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        let removal = if config.clean_punctuation.is_empty() {
            None
        } else {
            let regex = Regex::new(&config.clean_punctuation).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: config.clean_punctuation.clone(),
                    source,
                }
            })?;
            Some(regex)
        };
        Ok(Self { removal })
    }

    fn clean(&self, text: &str, config: &FilterConfig) -> String {
        let mut cleaned = if config.clean_emoji {
            strip_emoji(text)
        } else {
            text.to_string()
        };

        if let Some(removal) = &self.removal {
            cleaned = removal.replace_all(&cleaned, "").into_owned();
        }

        for lead in &config.remove_lead {
            if !lead.is_empty() && cleaned.starts_with(lead.as_str()) {
                cleaned = cleaned[lead.len()..].to_string();
                break;
            }
        }

        cleaned
    }
}

impl FilterStage for TextNormalizer {
    fn name(&self) -> &'static str {
        "text_normalizer"
    }

    fn process(
        &self,
        mut chain: MessageChain,
        ctx: &mut StageContext<'_>,
    ) -> Result<StageDecision, StageError> {
        if ctx.skip_normalization {
            return Ok(StageDecision::Continue(chain));
        }

        let config = ctx.config;
        if let Some(Segment::Plain { text }) = chain.last_mut() {
            // Exclusive bound: a text of exactly the configured length is
            // left alone.
            if text.chars().count() < config.clean_text_length {
                *text = self.clean(text, config);
            }
        }

        Ok(StageDecision::Continue(chain))
    }
}

/// Remove every grapheme cluster the emoji registry recognizes.
///
/// Coverage is whatever the registry knows; exotic or future graphemes may
/// survive, which the removal pattern usually picks up.
fn strip_emoji(text: &str) -> String {
    text.graphemes(true)
        .filter(|grapheme| emojis::get(grapheme).is_none())
        .collect()
}
