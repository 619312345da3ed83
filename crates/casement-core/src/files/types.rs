use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::FileError;

/// Metadata for one filesystem entry, as returned to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub is_directory: bool,
    pub is_file: bool,
    /// Leading dot included. Only set for files that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub modified: DateTime<Utc>,
}

/// Well-known directories the UI may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemPathKind {
    UserData,
    Temp,
    Desktop,
    Documents,
    Downloads,
}

impl SystemPathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemPathKind::UserData => "userData",
            SystemPathKind::Temp => "temp",
            SystemPathKind::Desktop => "desktop",
            SystemPathKind::Documents => "documents",
            SystemPathKind::Downloads => "downloads",
        }
    }
}

impl fmt::Display for SystemPathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemPathKind {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "userData" => Ok(SystemPathKind::UserData),
            "temp" => Ok(SystemPathKind::Temp),
            "desktop" => Ok(SystemPathKind::Desktop),
            "documents" => Ok(SystemPathKind::Documents),
            "downloads" => Ok(SystemPathKind::Downloads),
            other => Err(FileError::UnknownSystemPath {
                kind: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
    /// e.g. `openFile`, `openDirectory`, `multiSelections`.
    #[serde(default)]
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogResult {
    pub canceled: bool,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogResult {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_serializes_camel_case_without_missing_extension() {
        let info = FileInfo {
            name: "docs".to_string(),
            path: "/tmp/docs".to_string(),
            size: 0,
            is_directory: true,
            is_file: false,
            extension: None,
            modified: DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["isDirectory"], true);
        assert_eq!(json["modified"], "2024-01-02T03:04:05Z");
        assert!(json.get("extension").is_none());
    }

    #[test]
    fn test_system_path_kind_parses_known_names() {
        assert_eq!(
            "userData".parse::<SystemPathKind>().unwrap(),
            SystemPathKind::UserData
        );
        assert_eq!(
            "downloads".parse::<SystemPathKind>().unwrap(),
            SystemPathKind::Downloads
        );
        let err = "music".parse::<SystemPathKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown system path 'music'");
    }

    #[test]
    fn test_save_result_omits_missing_path() {
        let result = SaveDialogResult {
            canceled: true,
            file_path: None,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"canceled":true}"#
        );
    }

    #[test]
    fn test_open_options_accept_partial_input() {
        let options: OpenDialogOptions =
            serde_json::from_str(r#"{"title":"Pick","properties":["openFile"]}"#).unwrap();
        assert_eq!(options.title.as_deref(), Some("Pick"));
        assert!(options.filters.is_empty());
        assert_eq!(options.properties, vec!["openFile"]);
    }
}
