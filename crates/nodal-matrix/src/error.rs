use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("system matrix is singular")]
    Singular,
}
