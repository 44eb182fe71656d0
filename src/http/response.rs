use serde::Deserialize;
use serde_json::Value;

/// Body returned by the compliance suite. `statistics` and each entry of
/// `results` are passed to the display untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(default)]
    pub statistics: Option<Value>,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RunReport {
    pub fn error_message(&self) -> Option<&str> {
        non_empty(self.error_message.as_deref())
    }

    pub fn report_link(&self) -> Option<&str> {
        non_empty(self.link.as_deref())
    }

    /// Scalar statistics as `key: value` rows, sorted by key.
    pub fn statistics_rows(&self) -> Vec<(String, String)> {
        match &self.statistics {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| (key.clone(), scalar_text(value)))
                .collect(),
            Some(other) => vec![("statistics".to_string(), scalar_text(other))],
            None => Vec::new(),
        }
    }

    /// One-line summary for the run history.
    pub fn summary_line(&self) -> Option<String> {
        let rows = self.statistics_rows();
        if rows.is_empty() {
            return None;
        }
        Some(
            rows.iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Title and status of one per-test result, when the suite provides them.
pub fn result_heading(result: &Value) -> (String, Option<String>) {
    let title = ["name", "testCaseName", "testName"]
        .iter()
        .find_map(|key| result.get(key).and_then(Value::as_str))
        .unwrap_or("Test result")
        .to_string();
    let status = result.get("status").map(scalar_text);
    (title, status)
}

pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
