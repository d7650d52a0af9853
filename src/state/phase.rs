/// Phase definitions for the crawl engine
///
/// The engine cycles `Idle → Fetching → Extracting → Filtering → Recording`
/// once per frontier entry and stops in `Done`.
use std::fmt;

/// Represents the current phase of the crawl engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Waiting to pop the next frontier entry
    Idle,

    /// Page markup is being fetched
    Fetching,

    /// Metadata, text and media references are being extracted
    Extracting,

    /// The keyword rule is being applied
    Filtering,

    /// Results are appended and new links enqueued
    Recording,

    /// Frontier exhausted, single page processed, or crawl cancelled
    Done,
}

impl CrawlPhase {
    /// Returns true if the engine may move from `self` to `next`
    ///
    /// A failed fetch returns straight to `Idle`; extraction never fails.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Idle, Done)
                | (Fetching, Extracting)
                | (Fetching, Idle)
                | (Extracting, Filtering)
                | (Filtering, Recording)
                | (Recording, Idle)
                | (Recording, Done)
        )
    }

    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Filtering => "filtering",
            Self::Recording => "recording",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
