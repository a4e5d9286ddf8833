// src/openrtb/request.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenRTB BidRequest。
/// 顶层整体保存为 JSON 对象（保持字段顺序、数字按原文保存），
/// 本服务只按需读取 `id` / `imp`，并整体替换 `ext`，其余字段原样写回。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct BidRequest {
    fields: Map<String, Value>,
}

/// Imp 表示 imp 数组中单个广告展示请求里本服务关心的字段，
/// banner、video、native、pmp 等字段在解析时忽略，输出时来自原始对象
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Imp {
    #[serde(default)]
    pub id: String,

    /// 三态标记：未设置 / 0 / 1
    #[serde(default)]
    pub secure: Option<i8>,
}

impl BidRequest {
    /// 解析请求体。serde_json 自带 128 层嵌套上限，超过时返回错误而不是栈溢出
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// `BidRequest.id`，缺失或为 null 时为空字符串，类型不对时报错
    pub fn id(&self) -> Result<String, serde_json::Error> {
        match self.fields.get("id") {
            Some(value) => Ok(Option::<String>::deserialize(value)?.unwrap_or_default()),
            None => Ok(String::new()),
        }
    }

    /// 按类型解析全部 imp，缺失或为 null 时为空列表
    pub fn imps(&self) -> Result<Vec<Imp>, serde_json::Error> {
        match self.fields.get("imp") {
            Some(value) => Ok(Option::<Vec<Imp>>::deserialize(value)?.unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    pub fn ext(&self) -> Option<&Value> {
        self.fields.get("ext")
    }

    /// 替换扩展字段；已存在时保持原位置，否则追加在末尾
    pub fn set_ext(&mut self, ext: Value) {
        self.fields.insert("ext".to_string(), ext);
    }

    /// 除 id / imp / ext 以外的顶层字段
    pub fn extra(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "id" | "imp" | "ext"))
    }
}
