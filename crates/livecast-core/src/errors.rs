use thiserror::Error;

#[derive(Debug, Error)]
pub enum CastError {
    #[error("engine error: {0}")]
    Engine(String),
    #[error("channel error: {0}")]
    Channel(String),
    #[error("missing media permissions: {0}")]
    Permission(String),
    #[error("role switch already in progress")]
    RoleSwitchPending,
    #[error("invalid viewport dimensions: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}
