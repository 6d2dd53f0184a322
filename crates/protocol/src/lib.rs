use serde::{Deserialize, Serialize};

pub mod flags;
pub mod framing;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Input {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub digest: String,
}

/// One unit of work sent by the build system to a persistent worker.
///
/// Field names follow the build system's JSON worker protocol, where every
/// field is optional and defaults to its zero value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub request_id: i32,
    #[serde(default)]
    pub cancel: bool,
    #[serde(default)]
    pub verbosity: i32,
    #[serde(default)]
    pub sandbox_dir: String,
}

impl WorkRequest {
    pub fn sandbox_dir(&self) -> Option<&str> {
        let dir = self.sandbox_dir.trim();
        if dir.is_empty() {
            None
        } else {
            Some(dir)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    #[serde(default)]
    pub request_id: i32,
}

impl WorkResponse {
    pub fn success(request_id: i32) -> Self {
        Self {
            exit_code: 0,
            output: String::new(),
            request_id,
        }
    }

    pub fn completed(request_id: i32, exit_code: i32, output: Option<String>) -> Self {
        Self {
            exit_code,
            output: output.unwrap_or_default(),
            request_id,
        }
    }

    pub fn error(request_id: i32, message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            output: message.into(),
            request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_request_uses_camel_case_fields() {
        let json = r#"{"arguments":["--input","src"],"requestId":7,"sandboxDir":"/tmp/sb"}"#;
        let request: WorkRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.arguments, vec!["--input", "src"]);
        assert_eq!(request.request_id, 7);
        assert_eq!(request.sandbox_dir(), Some("/tmp/sb"));
        assert!(!request.cancel);
        assert!(request.inputs.is_empty());
    }

    #[test]
    fn work_request_defaults_missing_fields() {
        let request: WorkRequest = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(request, WorkRequest::default());
        assert_eq!(request.sandbox_dir(), None);
    }

    #[test]
    fn work_response_omits_empty_output() {
        let json = serde_json::to_string(&WorkResponse::success(3)).expect("serialize");
        assert_eq!(json, r#"{"exitCode":0,"requestId":3}"#);
    }

    #[test]
    fn work_response_roundtrip() {
        let response = WorkResponse::completed(4, 2, Some("rule violated".to_string()));
        let json = serde_json::to_string(&response).expect("serialize");
        assert!(json.contains(r#""output":"rule violated""#));
        let decoded: WorkResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(response, decoded);
    }
}
