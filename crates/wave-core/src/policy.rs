//! Named outcomes for range operations that silently decline out-of-range input

/// What a bounded operation did with the range it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// The range was in bounds and used
    Applied,
    /// The range was out of bounds or inverted; input left unchanged
    Ignored,
}

impl RangeOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, RangeOutcome::Applied)
    }
}

/// What [`SampleBuffer::erase`](crate::SampleBuffer::erase) removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
    /// The range covered the whole buffer; every sample was removed
    Cleared { removed: usize },
    /// Leading samples were removed and the start time moved forward
    Prefix { removed: usize },
    /// Trailing samples were removed
    Suffix { removed: usize },
    /// The range does not touch the buffer
    Disjoint,
    /// The range lies strictly inside the buffer; nothing was removed
    Unsupported,
}

impl EraseOutcome {
    /// Number of samples removed
    pub fn removed(self) -> usize {
        match self {
            EraseOutcome::Cleared { removed }
            | EraseOutcome::Prefix { removed }
            | EraseOutcome::Suffix { removed } => removed,
            EraseOutcome::Disjoint | EraseOutcome::Unsupported => 0,
        }
    }
}
