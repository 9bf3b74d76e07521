use thiserror::Error;

pub mod export;
pub mod game;
pub mod leaderboard;
pub mod player;
pub mod repository;
pub mod service;
pub mod stats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub i64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(pub i64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database not initialized: {0}")]
    Uninitialized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn bad_request<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::BadRequest(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Players inserted when an empty store is initialized.
pub const DEFAULT_PLAYERS: [&str; 2] = ["Kristian", "Johan"];
