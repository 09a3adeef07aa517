#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HMAC key rejected: {0}")]
    Hmac(#[from] hmac::digest::InvalidLength),
}

pub type Result<T> = std::result::Result<T, Error>;
