use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::bidding::engine::{process_bid_request, JSON_CONTENT_TYPE};
use crate::bidding::error::{BodyReadError, ErrorKind};
use crate::logging::bid_log::BidLog;
use crate::model::context::BidContext;
use crate::AppState;

/// 诊断日志中请求体预览的最大字节数
const BODY_PREVIEW_BYTES: usize = 512;

/// **处理 OpenRTB 竞价请求，写入 ext 扩展后原样返回**
pub async fn handle_bid_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let context = BidContext::new(&headers);

    // 读取失败（超出大小限制、连接中断等）按"请求体不可读"处理，日志里保留原始状态码
    let body = body.map_err(|rejection| {
        let cause = BodyReadError::from(&rejection);
        warn!(
            trace_id = %context.trace_id,
            status = cause.status.as_u16(),
            reason = %cause.reason,
            "Failed to read request body"
        );
        cause
    });

    let result = process_bid_request(
        &headers,
        body.as_deref().map_err(Clone::clone),
        state.tokens.as_ref(),
    );

    let mut bid_log = BidLog::new(&context);
    let response = match result {
        Ok(transformed) => {
            info!(
                trace_id = %context.trace_id,
                request_id = %transformed.request_id,
                imp_id = %transformed.imp_id,
                "Bid request extended"
            );
            bid_log.set_success(&transformed);
            ([(CONTENT_TYPE, JSON_CONTENT_TYPE)], transformed.body).into_response()
        }
        Err(err) => {
            match err.kind() {
                ErrorKind::UnsupportedMediaType => warn!(
                    trace_id = %context.trace_id,
                    content_type = ?context.content_type,
                    "Invalid content type"
                ),
                ErrorKind::BadRequest => warn!(
                    trace_id = %context.trace_id,
                    error = %err,
                    body = %body_preview(body.as_deref().ok()),
                    "Rejected bid request"
                ),
                ErrorKind::InternalError => error!(
                    trace_id = %context.trace_id,
                    error = %err,
                    "Failed to build bid response"
                ),
            }
            bid_log.set_failure(&err);
            err.into_response()
        }
    };

    bid_log.finish(&context);
    state
        .runtime_logger
        .log_json(bid_log.level(), bid_log.to_json())
        .await;

    response
}

fn body_preview(body: Option<&[u8]>) -> String {
    match body {
        None => "<unreadable>".to_string(),
        Some(body) => {
            let end = body.len().min(BODY_PREVIEW_BYTES);
            String::from_utf8_lossy(&body[..end]).into_owned()
        }
    }
}
