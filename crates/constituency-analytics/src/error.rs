use constituency_model::{UnknownColumnError, UnknownPartyError};

/// Failures surfaced unchanged to the caller of any analysis.
///
/// An empty cohort is not an error: it produces an empty
/// [`ResultBundle`](crate::view::ResultBundle).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalyticsError {
    /// A numeric column has no non-missing value in the cohort, so its median
    /// (or a categorical column its mode) is undefined.
    #[display("column '{column}' has no values in the cohort; cannot impute")]
    DataQuality { column: String },
    /// A party filter or row limit that is not recognised.
    #[display("invalid filter value '{value}'")]
    InvalidFilter { value: String },
    /// A target variable that does not name a known column.
    #[display("unknown column '{name}'")]
    InvalidColumn { name: String },
}

impl From<UnknownPartyError> for AnalyticsError {
    fn from(err: UnknownPartyError) -> Self {
        AnalyticsError::InvalidFilter { value: err.name }
    }
}

impl From<UnknownColumnError> for AnalyticsError {
    fn from(err: UnknownColumnError) -> Self {
        AnalyticsError::InvalidColumn { name: err.name }
    }
}
