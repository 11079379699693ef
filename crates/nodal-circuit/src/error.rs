use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A device references a node or element identifier that was never declared.
    #[error("unrecognized label: {0}")]
    UnrecognizedLabel(String),

    /// Two elements were given the same identifier.
    #[error("duplicate element identifier: {0}")]
    DuplicateElement(String),

    /// A device variant has no stamping rule defined (e.g. the reserved
    /// current-controlled voltage source).
    #[error("unsupported element: {0}")]
    UnsupportedElement(String),

    /// A node other than ground has no element referencing it.
    #[error("node '{0}' is not referenced by any element")]
    DanglingNode(String),

    /// A model parameter name was not recognized by the target element.
    #[error("invalid model parameter '{0}' for {1}")]
    InvalidModelParameter(String, &'static str),
}
