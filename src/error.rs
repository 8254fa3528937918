use thiserror::Error;

use crate::data::model::SampleId;

/// Failures while retrieving a dataset. Neither is fatal: the UI reports
/// the message and keeps whatever it showed before.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network or I/O failure.
    #[error("Error fetching {url}: {message}")]
    Fetch { url: String, message: String },

    /// The document was retrieved but does not match the expected shape.
    #[error("Error parsing {url}: {message}")]
    Parse { url: String, message: String },
}

/// Failures while selecting a subject from a loaded dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    #[error("No subject with id {0} in the dataset")]
    NotFound(SampleId),
}
