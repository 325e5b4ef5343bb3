//! Errors raised by the scan driver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine rejected a state or parameter set.
    #[error("simulation error: {0}")]
    Sim(#[from] neutron_sim::Error),

    /// A least-squares fit could not be carried out.
    #[error("fit error: {0}")]
    Fit(String),

    /// A sweep range or scan description is unusable.
    #[error("invalid scan: {0}")]
    Scan(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("npz write error: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),
}

impl Error {
    pub(crate) fn fit<S: Into<String>>(msg: S) -> Self { Self::Fit(msg.into()) }

    pub(crate) fn scan<S: Into<String>>(msg: S) -> Self { Self::Scan(msg.into()) }
}

pub type Result<T> = std::result::Result<T, Error>;
