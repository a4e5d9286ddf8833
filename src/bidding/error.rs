// src/bidding/error.rs

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use thiserror::Error;

/// 错误分类，对应对外暴露的 HTTP 语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedMediaType,
    BadRequest,
    InternalError,
}

/// 请求体读取失败的原因（超出大小限制、连接中断等），只用于日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyReadError {
    pub status: StatusCode,
    pub reason: String,
}

impl fmt::Display for BodyReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.reason)
    }
}

impl From<&BytesRejection> for BodyReadError {
    fn from(rejection: &BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            reason: rejection.body_text(),
        }
    }
}

/// 竞价请求处理失败的原因。
/// `Display` 带完整诊断信息，只写日志；返回给调用方的只有 `public_message()`。
#[derive(Debug, Error)]
pub enum BidError {
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("request body is empty")]
    EmptyBody,

    #[error("request body is unreadable ({0})")]
    UnreadableBody(BodyReadError),

    #[error("malformed bid request: {0}")]
    MalformedContent(String),

    #[error("bid request has no impressions")]
    NoImpressions,

    #[error("failed to serialize bid request: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BidError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BidError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            BidError::EmptyBody
            | BidError::UnreadableBody(_)
            | BidError::MalformedContent(_)
            | BidError::NoImpressions => ErrorKind::BadRequest,
            BidError::Serialization(_) => ErrorKind::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            BidError::UnsupportedMediaType(_) => "Content-Type header is not application/json",
            BidError::EmptyBody | BidError::UnreadableBody(_) => "Empty request body",
            BidError::MalformedContent(_) | BidError::NoImpressions => "Malformed content",
            BidError::Serialization(_) => "Please, try again later",
        }
    }
}

impl IntoResponse for BidError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
