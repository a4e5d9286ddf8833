// src/model/ext.rs

use serde::{Deserialize, Serialize};

/// **响应中写入 `BidRequest.ext` 的扩展对象**
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtensionPayload {
    pub id: String, // 第一个 imp 的 id
    pub cb: String, // 随机 cache-buster
    /// 与 imp.secure 一致；imp 未设置 secure 时整个 key 不出现
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_secure: Option<i8>,
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_secure_omitted_when_unset() {
        let payload = ExtensionPayload {
            id: "someId".to_string(),
            cb: "abcdefghij".to_string(),
            is_secure: None,
            user_agent: String::new(),
        };
        let out = serde_json::to_string(&payload).unwrap();
        assert_eq!(out, r#"{"id":"someId","cb":"abcdefghij","user-agent":""}"#);
    }

    #[test]
    fn is_secure_false_is_written() {
        let payload = ExtensionPayload {
            id: "someId".to_string(),
            cb: "abcdefghij".to_string(),
            is_secure: Some(0),
            user_agent: "curl/8.0".to_string(),
        };
        let out = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            out,
            r#"{"id":"someId","cb":"abcdefghij","is_secure":0,"user-agent":"curl/8.0"}"#
        );
    }
}
