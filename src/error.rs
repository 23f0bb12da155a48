// region:    --- Imports
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Shop Error
/// 샵 서비스 공통 오류
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0} 을(를) 찾을 수 없습니다")]
    NotFound(String),
    #[error("이미 히어로 아이템입니다: {0}")]
    AlreadyPromoted(String),
    #[error("이미 존재하는 상품입니다: {0}")]
    AlreadyExists(String),
    #[error("잔액이 부족합니다 (잔액: {balance}, 가격: {price})")]
    InsufficientFunds { balance: i64, price: i64 },
    #[error("재고가 없습니다: {0}")]
    OutOfStock(String),
    #[error("내부 오류: {0}")]
    Internal(String),
}

impl ShopError {
    /// 응답 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            ShopError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ShopError::NotFound(_) => "NOT_FOUND",
            ShopError::AlreadyPromoted(_) => "ALREADY_PROMOTED",
            ShopError::AlreadyExists(_) => "ALREADY_EXISTS",
            ShopError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            ShopError::OutOfStock(_) => "OUT_OF_STOCK",
            ShopError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ShopError::InvalidArgument(_)
            | ShopError::InsufficientFunds { .. }
            | ShopError::OutOfStock(_) => StatusCode::BAD_REQUEST,
            ShopError::NotFound(_) => StatusCode::NOT_FOUND,
            ShopError::AlreadyPromoted(_) | ShopError::AlreadyExists(_) => StatusCode::CONFLICT,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ShopError {
    fn from(e: sqlx::Error) -> Self {
        error!("{:<12} --> 저장소 오류: {:?}", "Store", e);
        ShopError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ShopError {
    fn from(rejection: JsonRejection) -> Self {
        ShopError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}
// endregion: --- Shop Error
