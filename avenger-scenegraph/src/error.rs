use thiserror::Error;

use crate::scene::{ItemId, MarkId};

#[derive(Error, Debug)]
pub enum AvengerSceneGraphError {
    #[error("Internal error: `{0}`")]
    InternalError(String),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("No mark with id {0:?}")]
    UnknownMark(MarkId),

    #[error("No item with id {0:?}")]
    UnknownItem(ItemId),

    #[error("Item {0:?} is not a group item")]
    NotAGroup(ItemId),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
