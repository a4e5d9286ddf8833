use serde::{Serialize, Deserialize};
use chrono::Utc;

use crate::bidding::engine::TransformedBid;
use crate::bidding::error::BidError;
use crate::model::context::BidContext;

/// **单次扩展请求的审计日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BidLog {
    pub timestamp: String,          // 记录时间
    pub log_type: String,           // 日志类型，固定为 "bid_ext_request"
    pub trace_id: String,           // 请求追踪 ID
    pub request_id: Option<String>, // OpenRTB `BidRequest.id`，解析成功后才有
    pub imp_id: Option<String>,     // 第一个 imp 的 id
    pub is_secure: Option<i8>,
    pub user_agent: String,
    pub status: String,             // "success" or "failure"
    pub status_code: u16,
    pub reason: Option<String>,     // 失败时的诊断信息，不会返回给调用方
    pub elapsed_ms: u128,
}

impl BidLog {
    /// **创建审计日志，默认失败，后续更新**
    pub fn new(context: &BidContext) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "bid_ext_request".to_string(),
            trace_id: context.trace_id.to_string(),
            request_id: None,
            imp_id: None,
            is_secure: None,
            user_agent: context.user_agent.clone(),
            status: "failure".to_string(),
            status_code: 0,
            reason: None,
            elapsed_ms: 0,
        }
    }

    pub fn set_success(&mut self, bid: &TransformedBid) {
        self.status = "success".to_string();
        self.status_code = 200;
        self.request_id = Some(bid.request_id.clone());
        self.imp_id = Some(bid.imp_id.clone());
        self.is_secure = bid.is_secure;
    }

    pub fn set_failure(&mut self, err: &BidError) {
        self.status = "failure".to_string();
        self.status_code = err.status().as_u16();
        self.reason = Some(err.to_string());
    }

    pub fn finish(&mut self, context: &BidContext) {
        self.elapsed_ms = context.elapsed_ms();
    }

    /// 客户端错误记 WARN，服务端错误记 ERROR
    pub fn level(&self) -> &'static str {
        match self.status_code {
            200 => "INFO",
            500..=599 => "ERROR",
            _ => "WARN",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"log_type":"bid_ext_request","trace_id":"{}","log_error":"{}"}}"#, self.trace_id, e)
        })
    }
}
