use serde::{Deserialize, Deserializer};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Long 主键：后端可能按数字或字符串下发
pub fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

/// 可选的 Long 主键
pub fn flexible_id_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "flexible_id")]
        id: String,
        #[serde(default, deserialize_with = "flexible_id_opt")]
        rule_id: Option<String>,
    }

    #[test]
    fn test_flexible_id() {
        let row: Row = serde_json::from_str(r#"{"id":1790000000000000001,"rule_id":"7"}"#).unwrap();
        assert_eq!(row.id, "1790000000000000001");
        assert_eq!(row.rule_id.as_deref(), Some("7"));

        let row: Row = serde_json::from_str(r#"{"id":"42","rule_id":null}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.rule_id, None);

        let row: Row = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(row.rule_id, None);
    }
}
