//! 国家 / 省 / 区县参考数据

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 下拉选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "location.ts")]
pub struct LocationOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "location.ts")]
pub struct State {
    pub id: i64,
    pub country_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "location.ts")]
pub struct District {
    pub id: i64,
    pub state_id: i64,
    pub name: String,
}

/// 导入文件中的国家条目
#[derive(Debug, Clone, Deserialize)]
pub struct CountrySeed {
    pub name: String,
    #[serde(default)]
    pub states: Vec<StateSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateSeed {
    pub name: String,
    #[serde(default)]
    pub districts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_file_shape() {
        let json = r#"[{"name": "India", "states": [{"name": "Kerala", "districts": ["Kollam"]}]}, {"name": "Nepal"}]"#;
        let seeds: Vec<CountrySeed> = serde_json::from_str(json).expect("valid seed");
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].states[0].districts, vec!["Kollam".to_string()]);
        assert!(seeds[1].states.is_empty());
    }
}
