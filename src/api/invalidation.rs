use serde::{Deserialize, Serialize};
use tracing::trace;

/// Ordered repaint classes; merging keeps the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Same data, different emphasis or animation frame.
    Light,
    /// Data or canvas size changed.
    Full,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

/// What caused a redraw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Data,
    Selection,
    Animation,
    Viewport,
    Style,
}

impl InvalidationTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Data => 1 << 0,
            Self::Selection => 1 << 1,
            Self::Animation => 1 << 2,
            Self::Viewport => 1 << 3,
            Self::Style => 1 << 4,
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        match self {
            Self::Data | Self::Viewport | Self::Style => InvalidationLevel::Full,
            Self::Selection | Self::Animation => InvalidationLevel::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u8,
}

impl InvalidationTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesced invalidation consumed by one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    topics: InvalidationTopics,
}

impl InvalidationMask {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            level: InvalidationLevel::None,
            topics: InvalidationTopics::none(),
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self {
            level: topic.level(),
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn topics(self) -> InvalidationTopics {
        self.topics
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.topics.contains_topic(topic)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.topics = self.topics.union(other.topics);
    }
}

/// Dirty flag owned by a chart.
///
/// Any number of requests between two draws collapse into one pending mask;
/// the host's draw pass takes it and clears the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedrawRequest {
    pending: InvalidationMask,
    coalesced_requests: u32,
}

impl RedrawRequest {
    pub fn request(&mut self, topic: InvalidationTopic) {
        self.pending.merge(InvalidationMask::from_topic(topic));
        self.coalesced_requests = self.coalesced_requests.saturating_add(1);
        trace!(
            ?topic,
            level = ?self.pending.level(),
            coalesced = self.coalesced_requests,
            "redraw requested"
        );
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_none()
    }

    #[must_use]
    pub fn pending(&self) -> InvalidationMask {
        self.pending
    }

    /// Requests folded into the pending mask since the last draw.
    #[must_use]
    pub fn coalesced_requests(&self) -> u32 {
        self.coalesced_requests
    }

    /// Clears the dirty state and returns what was pending.
    pub fn take(&mut self) -> InvalidationMask {
        let pending = self.pending;
        self.pending = InvalidationMask::none();
        self.coalesced_requests = 0;
        pending
    }
}
