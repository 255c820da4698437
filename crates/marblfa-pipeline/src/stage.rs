//! PDF request states

use std::fmt;

/// States of one PDF request, in order
///
/// ```text
/// QueryBuilt -> Queried -> Transformed(1) -> Transformed(2)
///   -> Persisted -> Rendered -> Streamed -> CleanedUp
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PdfStage {
    QueryBuilt,
    Queried,
    /// 1-based transform stage number
    Transformed(u8),
    Persisted,
    Rendered,
    Streamed,
    CleanedUp,
}

impl PdfStage {
    /// True once an artifact exists in the working area
    pub fn holds_artifact(self) -> bool {
        matches!(self, PdfStage::Persisted | PdfStage::Rendered | PdfStage::Streamed)
    }
}

impl fmt::Display for PdfStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfStage::QueryBuilt => write!(f, "query-built"),
            PdfStage::Queried => write!(f, "queried"),
            PdfStage::Transformed(n) => write!(f, "transformed({})", n),
            PdfStage::Persisted => write!(f, "persisted"),
            PdfStage::Rendered => write!(f, "rendered"),
            PdfStage::Streamed => write!(f, "streamed"),
            PdfStage::CleanedUp => write!(f, "cleaned-up"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        assert!(PdfStage::QueryBuilt < PdfStage::Queried);
        assert!(PdfStage::Transformed(1) < PdfStage::Transformed(2));
        assert!(PdfStage::Transformed(2) < PdfStage::Persisted);
        assert!(PdfStage::Streamed < PdfStage::CleanedUp);
    }

    #[test]
    fn test_holds_artifact() {
        assert!(!PdfStage::Transformed(2).holds_artifact());
        assert!(PdfStage::Persisted.holds_artifact());
        assert!(!PdfStage::CleanedUp.holds_artifact());
    }
}
