use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Taxa deve ser maior que zero")]
    InvalidRate,
    #[error("Conversão inválida")]
    InvalidPair,
    #[error("O valor informado é muito pequeno e resultaria em 0,00 após a conversão")]
    ResultTooSmall,
    #[error("{0}")]
    Validation(String),
    #[error("Operação interrompida: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

impl ExchangeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ExchangeError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response<Body> {
        (self.status(), self.to_string()).into_response()
    }
}
