// src/bidding/engine.rs

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;

use crate::bidding::error::{BidError, BodyReadError};
use crate::bidding::token::TokenGenerator;
use crate::model::context::user_agent;
use crate::model::ext::ExtensionPayload;
use crate::openrtb::request::BidRequest;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 处理成功后的结果，除响应体外保留部分字段用于日志
#[derive(Debug, Clone)]
pub struct TransformedBid {
    pub request_id: String,
    pub imp_id: String,
    pub is_secure: Option<i8>,
    pub body: Vec<u8>,
}

/// **处理竞价请求：校验、提取字段、生成扩展对象、写回 ext 并重新序列化**
///
/// `body` 为 `Err` 表示请求体读取失败。每一步失败都直接返回，不做重试。
pub fn process_bid_request(
    headers: &HeaderMap,
    body: Result<&[u8], BodyReadError>,
    tokens: &dyn TokenGenerator,
) -> Result<TransformedBid, BidError> {
    check_content_type(headers)?;

    let body = body.map_err(BidError::UnreadableBody)?;
    if body.is_empty() {
        return Err(BidError::EmptyBody);
    }

    let mut bid_request = BidRequest::from_slice(body).map_err(malformed)?;
    let request_id = bid_request.id().map_err(malformed)?;
    let imps = bid_request.imps().map_err(malformed)?;

    let imp = imps.first().ok_or(BidError::NoImpressions)?;
    let payload = ExtensionPayload {
        id: imp.id.clone(),
        cb: tokens.generate(),
        is_secure: imp.secure,
        user_agent: user_agent(headers),
    };

    bid_request.set_ext(serde_json::to_value(&payload)?);
    let body = serde_json::to_vec(&bid_request)?;

    Ok(TransformedBid {
        request_id,
        imp_id: payload.id,
        is_secure: payload.is_secure,
        body,
    })
}

/// 声明了非空且不等于 application/json 的 Content-Type 时拒绝；未声明则放行
fn check_content_type(headers: &HeaderMap) -> Result<(), BidError> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(());
    };
    if value.is_empty() {
        return Ok(());
    }
    match value.to_str() {
        Ok(JSON_CONTENT_TYPE) => Ok(()),
        _ => Err(BidError::UnsupportedMediaType(
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )),
    }
}

fn malformed(err: serde_json::Error) -> BidError {
    BidError::MalformedContent(err.to_string())
}
