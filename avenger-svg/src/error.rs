use thiserror::Error;

use avenger_scenegraph::error::AvengerSceneGraphError;

use crate::document::NodeId;

#[derive(Error, Debug)]
pub enum AvengerSvgError {
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Scene graph error: {0}")]
    SceneGraphError(#[from] AvengerSceneGraphError),
}
