//! 表单字段的反序列化辅助

use serde::{Deserialize, Deserializer, de::Error};
use std::str::FromStr;

/// 空字符串视为未填写，其余按 `FromStr` 解析
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::empty_string_as_none")]
        value: Option<i64>,
    }

    #[test]
    fn test_empty_string_as_none() {
        let parsed: Sample = serde_json::from_str(r#"{"value":""}"#).expect("empty value");
        assert_eq!(parsed.value, None);

        let parsed: Sample = serde_json::from_str(r#"{"value":" 12 "}"#).expect("number");
        assert_eq!(parsed.value, Some(12));

        let parsed: Sample = serde_json::from_str("{}").expect("missing value");
        assert_eq!(parsed.value, None);

        assert!(serde_json::from_str::<Sample>(r#"{"value":"abc"}"#).is_err());
    }
}
