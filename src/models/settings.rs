//! Class settings model.

use serde::{Deserialize, Serialize};

/// Class name, teacher and roster. Free-form, no validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub students: Vec<String>,
}

/// Request body for saving settings.
///
/// The roster may arrive either as a list or as the comma-separated text the
/// settings form collects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub students: Option<Vec<String>>,
    #[serde(default)]
    pub students_text: Option<String>,
}

impl SaveSettingsRequest {
    pub fn into_record(self) -> SettingsRecord {
        let students = match (self.students, self.students_text) {
            (Some(list), _) => list,
            (None, Some(text)) => parse_student_list(&text),
            (None, None) => Vec::new(),
        };

        SettingsRecord {
            class_name: self.class_name,
            teacher: self.teacher,
            students,
        }
    }
}

/// Split on commas, trim, drop empty entries. Duplicates and order are kept.
pub fn parse_student_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_student_list() {
        assert_eq!(
            parse_student_list(" Ana, Ben ,, ,Ana,Chloé "),
            vec!["Ana", "Ben", "Ana", "Chloé"]
        );
        assert!(parse_student_list("").is_empty());
        assert!(parse_student_list(" , ,").is_empty());
    }

    #[test]
    fn test_request_prefers_list_over_text() {
        let request: SaveSettingsRequest = serde_json::from_str(
            r#"{"className": "3B", "teacher": "Ms. Ode", "students": ["Zed"], "studentsText": "A, B"}"#,
        )
        .unwrap();
        let record = request.into_record();

        assert_eq!(record.class_name, "3B");
        assert_eq!(record.students, vec!["Zed"]);
    }

    #[test]
    fn test_request_text_roster() {
        let request: SaveSettingsRequest =
            serde_json::from_str(r#"{"studentsText": "A, B,"}"#).unwrap();
        let record = request.into_record();

        assert_eq!(record.teacher, "");
        assert_eq!(record.students, vec!["A", "B"]);
    }
}
