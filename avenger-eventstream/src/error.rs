use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvengerEventStreamError {
    #[error("Touch event {0} carries no touch points")]
    MissingTouch(String),
}
