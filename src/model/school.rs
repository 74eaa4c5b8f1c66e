//! Schools: used for class and section pickers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Grade {
    #[serde(rename = "class")]
    pub class: String,
    #[serde(default)]
    pub section: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub name: String,
}

impl School {
    pub fn classes(&self) -> Vec<&str> {
        self.grades.iter().map(|g| g.class.as_str()).collect()
    }

    /// Sections offered for a class; empty when the class is unknown
    pub fn sections(&self, class: &str) -> Vec<&str> {
        self.grades
            .iter()
            .find(|g| g.class == class)
            .map(|g| g.section.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_for_class() {
        let school: School = serde_json::from_str(
            r#"{"_id":"sch1","name":"Green Valley","grades":[
                {"class":"5","section":[{"name":"A"},{"name":"B"}]},
                {"class":"6","section":[{"name":"A"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(school.classes(), vec!["5", "6"]);
        assert_eq!(school.sections("5"), vec!["A", "B"]);
        assert!(school.sections("9").is_empty());
    }
}
