//! The seven ordered authoring stages and their sequencer.
//!
//! Stages are informational, not access-controlled: `go_to` is always
//! allowed, `next`/`previous` clamp at the ends. A stage counts as
//! "visited" once the session has advanced past it; that is a navigation
//! progress marker and deliberately distinct from artifact completion
//! (see [`crate::completion`]).

/// One authoring stage of a rule's workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Metadata,
    Ontology,
    Interface,
    Configuration,
    Tests,
    Logic,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Self::Metadata,
        Self::Ontology,
        Self::Interface,
        Self::Configuration,
        Self::Tests,
        Self::Logic,
        Self::Review,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Metadata => "Metadata",
            Self::Ontology => "Ontology",
            Self::Interface => "Interface",
            Self::Configuration => "Configuration",
            Self::Tests => "Tests",
            Self::Logic => "Logic",
            Self::Review => "Review",
        }
    }
}

/// Tracks the current stage of one authoring session.
///
/// Every session starts at `Metadata`; the stage is not persisted across
/// sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequencer {
    current: Stage,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            current: Stage::Metadata,
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    /// Jump directly to any stage.
    pub fn go_to(&mut self, stage: Stage) {
        self.current = stage;
    }

    /// Advance one stage; no-op at `Review`.
    pub fn next(&mut self) {
        if let Some(next) = Stage::from_index(self.current.index() + 1) {
            self.current = next;
        }
    }

    /// Step back one stage; no-op at `Metadata`.
    pub fn previous(&mut self) {
        if self.current != Stage::Metadata {
            self.current = Stage::from_index(self.current.index() - 1).unwrap_or(Stage::Metadata);
        }
    }

    /// Whether the session has advanced past `stage`.
    ///
    /// Navigation progress only; says nothing about artifact content.
    pub fn visited(&self, stage: Stage) -> bool {
        stage < self.current
    }
}
