//! Message segment model — the content units of one outgoing message.

use serde::{Deserialize, Serialize};

/// One typed unit of outgoing message content.
///
/// The set is closed: every consumer matches exhaustively, so adding a kind
/// is a compile-visible change. A stage may rewrite the text of a `Plain`
/// segment but must keep the variant tag and its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text.
    Plain { text: String },
    /// Image by platform-native reference (file id or URL).
    Image { file: String },
    /// Sticker / face by platform-native id.
    Sticker { id: String },
    /// @-mention of another conversation member.
    Mention { target_id: String },
    /// Quote of an earlier message.
    ReplyQuote { message_id: String },
}

impl Segment {
    /// Build a plain-text segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    /// Short kind label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plain { .. } => "plain",
            Self::Image { .. } => "image",
            Self::Sticker { .. } => "sticker",
            Self::Mention { .. } => "mention",
            Self::ReplyQuote { .. } => "reply_quote",
        }
    }
}

/// Ordered sequence of segments forming one outgoing message.
///
/// Order is rendering order. Equality is structural over the full sequence,
/// element-wise — a single differing character in one text segment makes two
/// chains unequal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChain(Vec<Segment>);

impl MessageChain {
    /// Build a chain from segments in rendering order.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// The canonical empty reply: a single empty text segment.
    ///
    /// Used as the substitution payload when an outgoing message is
    /// intercepted but the host still expects something to deliver.
    pub fn empty_reply() -> Self {
        Self(vec![Segment::plain("")])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Segments in rendering order.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Segment> {
        self.0.last_mut()
    }

    /// Concatenated text of all `Plain` segments — the projection every
    /// text-inspecting stage works on.
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|seg| match seg {
                Segment::Plain { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Segment>> for MessageChain {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}
