#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("expected one of json, yaml or text")]
    UnknownFormat,

    #[error("expected NAME:VALUE")]
    MalformedHeader,

    #[error("header name can't be empty")]
    EmptyHeaderName,
}
