//! Study-material (course) document.

use super::{field, Validate, Violations};
use crate::error::{Result, VidlearnError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Structured study materials derived from a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseData {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    pub learning_objectives: Vec<LearningObjective>,
    pub sections: Vec<Section>,
    pub key_takeaways: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningObjective {
    /// Positive, unique within the course.
    pub id: i64,
    pub objective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    /// Id of the [`LearningObjective`] this section addresses.
    pub objective_id: i64,
    pub subsections: Vec<Subsection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_terms: Option<Vec<TechnicalTerm>>,
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_misconceptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practical_applications: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub heading: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalTerm {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    pub explanation: String,
}

impl QuizQuestion {
    /// The text of the correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// How sections pointing at a non-existent objective are handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Reassign the section to the objective at the same position, else the first one.
    #[default]
    Repair,
    /// Fail validation.
    Reject,
}

impl std::str::FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "repair" => Ok(ReferencePolicy::Repair),
            "reject" => Ok(ReferencePolicy::Reject),
            _ => Err(format!("Unknown reference policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferencePolicy::Repair => write!(f, "repair"),
            ReferencePolicy::Reject => write!(f, "reject"),
        }
    }
}

impl CourseData {
    /// Total number of subsections across all sections.
    pub fn subsection_count(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }

    /// Indices of sections whose `objectiveId` matches no learning objective.
    pub fn dangling_sections(&self) -> Vec<usize> {
        let ids: HashSet<i64> = self.learning_objectives.iter().map(|o| o.id).collect();
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| !ids.contains(&s.objective_id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Enforce that every section references an existing objective.
    ///
    /// Returns the number of sections that were reassigned.
    pub fn resolve_references(&mut self, policy: ReferencePolicy) -> Result<usize> {
        let dangling = self.dangling_sections();
        if dangling.is_empty() {
            return Ok(0);
        }

        if policy == ReferencePolicy::Reject || self.learning_objectives.is_empty() {
            return Err(VidlearnError::SchemaValidation(
                dangling
                    .iter()
                    .map(|&i| {
                        format!(
                            "sections[{}].objectiveId: {} does not match any learning objective",
                            i, self.sections[i].objective_id
                        )
                    })
                    .collect(),
            ));
        }

        for &i in &dangling {
            let target = self
                .learning_objectives
                .get(i)
                .or_else(|| self.learning_objectives.first())
                .map(|o| o.id);
            if let Some(target) = target {
                warn!(
                    "Section {} ({:?}) referenced unknown objective {}, reassigned to {}",
                    i, self.sections[i].title, self.sections[i].objective_id, target
                );
                self.sections[i].objective_id = target;
            }
        }

        Ok(dangling.len())
    }
}

impl Validate for CourseData {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        let objectives_path = field(path, "learningObjectives");
        violations.check_len(&objectives_path, self.learning_objectives.len(), 2, Some(6));

        let mut seen = HashSet::new();
        for (i, objective) in self.learning_objectives.iter().enumerate() {
            let id_path = format!("{}[{}].id", objectives_path, i);
            if objective.id < 1 {
                violations.push(&id_path, format!("expected a positive integer, got {}", objective.id));
            }
            if !seen.insert(objective.id) {
                violations.push(&id_path, format!("duplicate id {}", objective.id));
            }
        }

        let sections_path = field(path, "sections");
        violations.check_len(&sections_path, self.sections.len(), 2, None);
        for (i, section) in self.sections.iter().enumerate() {
            section.collect_violations(&format!("{}[{}]", sections_path, i), violations);
        }

        violations.check_len(&field(path, "keyTakeaways"), self.key_takeaways.len(), 3, Some(8));

        let quiz_path = field(path, "quiz");
        violations.check_len(&quiz_path, self.quiz.len(), 3, Some(8));
        for (i, question) in self.quiz.iter().enumerate() {
            question.collect_violations(&format!("{}[{}]", quiz_path, i), violations);
        }
    }
}

impl Validate for Section {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        violations.check_len(&field(path, "subsections"), self.subsections.len(), 1, None);
        violations.check_len(&field(path, "keyPoints"), self.key_points.len(), 2, Some(6));
    }
}

impl Validate for QuizQuestion {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        violations.check_len(&field(path, "options"), self.options.len(), 4, Some(4));
        if !(0..=3).contains(&self.correct_index) {
            violations.push(
                &field(path, "correctIndex"),
                format!("expected 0-3, got {}", self.correct_index),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::course_json;

    fn sample_course() -> CourseData {
        serde_json::from_value(course_json()).unwrap()
    }

    fn violations_of(course: &CourseData) -> Vec<String> {
        match course.validate() {
            Ok(()) => Vec::new(),
            Err(VidlearnError::SchemaValidation(fields)) => fields,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sample_course_is_valid() {
        let course = sample_course();
        assert!(course.validate().is_ok());
        assert_eq!(course.subsection_count(), 2);
        assert!(course.dangling_sections().is_empty());
    }

    #[test]
    fn test_every_section_references_an_objective() {
        let mut course = sample_course();
        course.sections[1].objective_id = 9;
        course.resolve_references(ReferencePolicy::Repair).unwrap();

        let ids: HashSet<i64> = course.learning_objectives.iter().map(|o| o.id).collect();
        for section in &course.sections {
            assert!(ids.contains(&section.objective_id));
        }
    }

    #[test]
    fn test_repair_prefers_objective_at_same_position() {
        let mut course = sample_course();
        course.sections[1].objective_id = 42;
        let repaired = course.resolve_references(ReferencePolicy::Repair).unwrap();
        assert_eq!(repaired, 1);
        assert_eq!(course.sections[1].objective_id, 2);
    }

    #[test]
    fn test_repair_falls_back_to_first_objective() {
        let mut course = sample_course();
        let extra = course.sections[0].clone();
        course.sections.push(Section { objective_id: 7, ..extra });
        course.resolve_references(ReferencePolicy::Repair).unwrap();
        assert_eq!(course.sections[2].objective_id, 1);
    }

    #[test]
    fn test_reject_policy_names_dangling_sections() {
        let mut course = sample_course();
        course.sections[0].objective_id = 5;
        let err = course.resolve_references(ReferencePolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("sections[0].objectiveId: 5"));
        assert_eq!(course.sections[0].objective_id, 5);
    }

    #[test]
    fn test_quiz_constraints() {
        let mut course = sample_course();
        course.quiz[0].options.pop();
        course.quiz[1].correct_index = 4;
        course.quiz[2].correct_index = -1;

        let fields = violations_of(&course);
        assert_eq!(
            fields,
            vec![
                "quiz[0].options: expected exactly 4 items, got 3",
                "quiz[1].correctIndex: expected 0-3, got 4",
                "quiz[2].correctIndex: expected 0-3, got -1",
            ]
        );
    }

    #[test]
    fn test_every_quiz_question_has_four_options_in_range() {
        let course = sample_course();
        for question in &course.quiz {
            assert_eq!(question.options.len(), 4);
            assert!((0..=3).contains(&question.correct_index));
            assert_eq!(question.correct_option(), Some("4"));
        }
    }

    #[test]
    fn test_length_bounds_enumerated() {
        let mut course = sample_course();
        course.learning_objectives.truncate(1);
        course.sections.truncate(1);
        course.sections[0].key_points = vec!["only".to_string()];
        course.sections[0].subsections.clear();
        course.key_takeaways = (0..9).map(|i| i.to_string()).collect();

        let fields = violations_of(&course);
        assert!(fields.contains(&"learningObjectives: expected 2-6 items, got 1".to_string()));
        assert!(fields.contains(&"sections: expected at least 2 items, got 1".to_string()));
        assert!(fields.contains(&"sections[0].subsections: expected at least 1 items, got 0".to_string()));
        assert!(fields.contains(&"sections[0].keyPoints: expected 2-6 items, got 1".to_string()));
        assert!(fields.contains(&"keyTakeaways: expected 3-8 items, got 9".to_string()));
    }

    #[test]
    fn test_objective_ids_positive_and_unique() {
        let mut course = sample_course();
        course.learning_objectives[0].id = 0;
        course.learning_objectives[1].id = 0;

        let fields = violations_of(&course);
        assert!(fields.contains(&"learningObjectives[0].id: expected a positive integer, got 0".to_string()));
        assert!(fields.contains(&"learningObjectives[1].id: duplicate id 0".to_string()));
    }

    #[test]
    fn test_optional_fields_omitted_on_the_wire() {
        let mut course = sample_course();
        course.transcript_summary = None;
        let json = serde_json::to_value(&course).unwrap();
        assert!(json.get("transcriptSummary").is_none());
        assert!(json.get("prerequisites").is_none());
        assert_eq!(json["sections"][0]["objectiveId"], 1);
        assert_eq!(json["quiz"][0]["correctIndex"], 3);
    }

    #[test]
    fn test_reference_policy_from_str() {
        assert_eq!("Repair".parse::<ReferencePolicy>().unwrap(), ReferencePolicy::Repair);
        assert_eq!("reject".parse::<ReferencePolicy>().unwrap(), ReferencePolicy::Reject);
        assert!("ignore".parse::<ReferencePolicy>().is_err());
    }
}
