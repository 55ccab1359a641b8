use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A catalog course ranked against a target skill set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub course_name: String,
    pub provider: String,
    /// Comma-joined list, e.g. "Python, Data Analysis, SQL".
    pub skills_gained: String,
    pub rating: Option<f64>,
    pub level_duration: String,
    pub course_url: String,
    pub course_image: String,
    pub provider_image: String,
    pub similarity_score: f64,
    pub match_percentage: f64,
}

impl CourseRecommendation {
    /// Individual skills from `skills_gained`, trimmed, blanks skipped.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.skills_gained
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Ranking order: similarity descending, then rating descending.
/// A course without a rating sorts after any rated course with the same similarity.
pub fn compare_rank(a: &CourseRecommendation, b: &CourseRecommendation) -> Ordering {
    b.similarity_score
        .total_cmp(&a.similarity_score)
        .then_with(|| match (a.rating, b.rating) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Sorts by [`compare_rank`] and keeps at most `top_n` courses.
pub fn rank_courses(mut courses: Vec<CourseRecommendation>, top_n: usize) -> Vec<CourseRecommendation> {
    courses.sort_by(compare_rank);
    courses.truncate(top_n);
    courses
}

#[cfg(test)]
pub(crate) fn course(name: &str, similarity: f64, rating: Option<f64>) -> CourseRecommendation {
    CourseRecommendation {
        course_name: name.to_string(),
        provider: "Coursera".to_string(),
        skills_gained: "Go, Concurrency".to_string(),
        rating,
        level_duration: "Beginner · 1 - 3 Months".to_string(),
        course_url: format!("https://example.com/{name}"),
        course_image: String::new(),
        provider_image: String::new(),
        similarity_score: similarity,
        match_percentage: (similarity * 10_000.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_orders_by_similarity_then_rating() {
        let ranked = rank_courses(
            vec![
                course("low", 0.41, Some(4.9)),
                course("tie-unrated", 0.80, None),
                course("tie-high", 0.80, Some(4.8)),
                course("tie-low", 0.80, Some(4.1)),
                course("best", 0.93, Some(3.0)),
            ],
            10,
        );

        let names: Vec<_> = ranked.iter().map(|c| c.course_name.as_str()).collect();
        assert_eq!(names, vec!["best", "tie-high", "tie-low", "tie-unrated", "low"]);
    }

    #[test]
    fn test_rank_truncates_to_top_n() {
        let courses = (0..8).map(|i| course(&format!("c{i}"), i as f64 / 10.0, None)).collect();
        let ranked = rank_courses(courses, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].course_name, "c7");
        assert!(rank_courses(vec![course("x", 0.5, None)], 0).is_empty());
    }

    #[test]
    fn test_skills_split_comma_joined_list() {
        let mut c = course("x", 0.5, None);
        c.skills_gained = " Python ,, Data Analysis,SQL, ".to_string();
        let skills: Vec<_> = c.skills().collect();
        assert_eq!(skills, vec!["Python", "Data Analysis", "SQL"]);
    }
}
