use serde::{Deserialize, Serialize};

use crate::models::course::{rank_courses, CourseRecommendation};
use crate::models::skills::SkillComparison;

/// Skill-gap analysis of one job posting plus courses covering the gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysisResult {
    pub skill_analysis: SkillComparison,
    pub recommended_courses: Vec<CourseRecommendation>,
    pub missing_skills_count: usize,
    pub match_percentage: f64,
}

impl JobAnalysisResult {
    /// Ranks and bounds the course list by `top_n`. No missing skills means no
    /// courses, whatever the caller passed in.
    pub fn new(
        skill_analysis: SkillComparison,
        courses: Vec<CourseRecommendation>,
        top_n: usize,
    ) -> Self {
        let recommended_courses = if skill_analysis.is_fully_matched() {
            Vec::new()
        } else {
            rank_courses(courses, top_n)
        };

        Self {
            missing_skills_count: skill_analysis.missing_skills.len(),
            match_percentage: skill_analysis.match_percentage,
            skill_analysis,
            recommended_courses,
        }
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.skill_analysis.is_fully_matched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::course;
    use crate::models::skills::SkillSet;

    fn comparison(resume: &[&str], required: &[&str]) -> SkillComparison {
        let resume: SkillSet = resume.iter().collect();
        let required: SkillSet = required.iter().collect();
        SkillComparison::compute(&resume, &required)
    }

    #[test]
    fn test_new_derives_counts_from_comparison() {
        let result = JobAnalysisResult::new(
            comparison(&["Python"], &["Python", "Go", "Docker"]),
            vec![course("a", 0.2, None), course("b", 0.9, None)],
            5,
        );
        assert_eq!(result.missing_skills_count, 2);
        assert!((result.match_percentage - 33.33).abs() < 1e-9);
        assert_eq!(result.recommended_courses[0].course_name, "b");
    }

    #[test]
    fn test_fully_qualified_drops_courses() {
        let result = JobAnalysisResult::new(
            comparison(&["Python", "Go"], &["go"]),
            vec![course("a", 0.7, None)],
            5,
        );
        assert!(result.is_fully_qualified());
        assert!(result.recommended_courses.is_empty());
    }

    #[test]
    fn test_serializes_with_snake_case_wire_names() {
        let result = JobAnalysisResult::new(comparison(&["Python"], &["Python", "Go"]), vec![], 5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["skill_analysis"]["missing_skills"], serde_json::json!(["Go"]));
        assert_eq!(json["missing_skills_count"], 1);
        assert!(json["recommended_courses"].as_array().unwrap().is_empty());
    }
}
