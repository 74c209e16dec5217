use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvengerTextError {
    #[error("Failed to load fonts from `{0}`")]
    FontLoadError(String),

    #[error("Internal error: `{0}`")]
    InternalError(String),
}
