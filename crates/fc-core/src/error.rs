use crate::id::NodeId;
use thiserror::Error;

/// Structural edits and encoders that can refuse to run.
///
/// None of these are fatal: the document is left untouched and the
/// editor surfaces the problem as a notice.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("select at least two layers to group")]
    TooFewToGroup,

    #[error("select layers with the same parent to group")]
    MixedParents,

    #[error("add a frame before exporting to SVG")]
    NoFrame,

    #[error("element {0} not found")]
    NotFound(NodeId),

    #[error("master {0} not found")]
    MasterNotFound(NodeId),

    #[error("duplicate element id {0}")]
    DuplicateId(NodeId),

    #[error("master registered as {key} has root id {id}")]
    MasterKeyMismatch { key: NodeId, id: NodeId },

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditError {
    /// Stable key handed to the localization collaborator.
    pub fn notice_key(&self) -> &'static str {
        match self {
            EditError::TooFewToGroup => "notice.group.tooFew",
            EditError::MixedParents => "notice.group.sameParent",
            EditError::NoFrame => "notice.export.noFrame",
            EditError::NotFound(_) => "notice.element.notFound",
            EditError::MasterNotFound(_) => "notice.master.notFound",
            EditError::DuplicateId(_) => "notice.import.duplicateId",
            EditError::MasterKeyMismatch { .. } => "notice.import.masterKey",
            EditError::Json(_) => "notice.import.invalid",
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;
