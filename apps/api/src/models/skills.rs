//! Skill sets and the skill-gap comparison between a resume and a job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Match percentage reported when a job lists no required skills.
/// Nothing is missing, so the candidate is treated as fully matched.
pub const EMPTY_REQUIREMENTS_MATCH: f64 = 100.0;

/// Case-insensitive, deduplicated set of skill names.
///
/// Names are trimmed and keyed by their lowercase form. The first spelling
/// seen is kept for display, so `["Go", "go", " GO "]` collapses to `["Go"]`.
/// Iteration follows the lowercase key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet {
    skills: BTreeMap<String, String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a skill. Returns false for blank names and duplicates.
    pub fn insert(&mut self, skill: &str) -> bool {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            return false;
        }
        let key = trimmed.to_lowercase();
        if self.skills.contains_key(&key) {
            return false;
        }
        self.skills.insert(key, trimmed.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains_key(&skill.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.values().map(String::as_str)
    }

    /// Skills present in both sets, spelled as in `self`.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.filter_keys(|key| other.skills.contains_key(key))
    }

    /// Skills in `self` that are absent from `other`.
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.filter_keys(|key| !other.skills.contains_key(key))
    }

    /// All skills of both sets; spellings from `self` win.
    pub fn union(&self, other: &SkillSet) -> SkillSet {
        let mut merged = self.clone();
        for skill in other.iter() {
            merged.insert(skill);
        }
        merged
    }

    pub fn is_disjoint(&self, other: &SkillSet) -> bool {
        self.skills.keys().all(|key| !other.skills.contains_key(key))
    }

    pub fn is_superset(&self, other: &SkillSet) -> bool {
        other.skills.keys().all(|key| self.skills.contains_key(key))
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.skills.values().cloned().collect()
    }

    fn filter_keys(&self, keep: impl Fn(&str) -> bool) -> SkillSet {
        SkillSet {
            skills: self
                .skills
                .iter()
                .filter(|(key, _)| keep(key))
                .map(|(key, display)| (key.clone(), display.clone()))
                .collect(),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.skills.into_values().collect()
    }
}

/// Result of comparing a resume's skills with a job's required skills.
///
/// Invariants (enforced by every constructor):
/// - `matched_skills` and `missing_skills` are disjoint
/// - `total_required = |matched ∪ missing|`, `total_matched = |matched|`
/// - `match_percentage` lies in [0, 100]; see [`EMPTY_REQUIREMENTS_MATCH`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillComparison {
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    pub extra_skills: SkillSet,
    pub match_percentage: f64,
    pub total_required: usize,
    pub total_matched: usize,
}

impl SkillComparison {
    /// Local set arithmetic: matched = required ∩ resume, missing = required − resume,
    /// extra = resume − required.
    pub fn compute(resume: &SkillSet, required: &SkillSet) -> Self {
        Self::from_parts(
            required.intersection(resume),
            required.difference(resume),
            resume.difference(required),
        )
    }

    /// Builds a comparison from possibly inconsistent parts (e.g. an upstream
    /// response), restoring the invariants and recomputing the totals.
    pub fn from_parts(matched: SkillSet, missing: SkillSet, extra: SkillSet) -> Self {
        let missing = missing.difference(&matched);
        let extra = extra.difference(&matched.union(&missing));
        let total_matched = matched.len();
        let total_required = total_matched + missing.len();

        Self {
            match_percentage: match_percentage(total_matched, total_required),
            matched_skills: matched,
            missing_skills: missing,
            extra_skills: extra,
            total_required,
            total_matched,
        }
    }

    pub fn is_fully_matched(&self) -> bool {
        self.missing_skills.is_empty()
    }
}

/// `matched / required × 100`, rounded to two decimals.
pub fn match_percentage(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return EMPTY_REQUIREMENTS_MATCH;
    }
    let pct = matched.min(required) as f64 / required as f64 * 100.0;
    ((pct * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(skills: &[&str]) -> SkillSet {
        skills.iter().collect()
    }

    #[test]
    fn test_skill_set_dedups_case_insensitively_and_keeps_first_spelling() {
        let skills = set(&["Go", "go", " GO ", "Python", ""]);
        assert_eq!(skills.len(), 2);
        assert_eq!(skills.to_vec(), vec!["Go".to_string(), "Python".to_string()]);
        assert!(skills.contains("gO"));
    }

    #[test]
    fn test_skill_set_deserializes_and_normalizes() {
        let skills: SkillSet = serde_json::from_str(r#"["React", "react", "  ", "SQL"]"#).unwrap();
        assert_eq!(skills.len(), 2);
        let json = serde_json::to_string(&skills).unwrap();
        assert_eq!(json, r#"["React","SQL"]"#);
    }

    #[test]
    fn test_compute_scenario_python_and_go() {
        let resume = set(&["Python"]);
        let required = set(&["Python", "Go"]);

        let comparison = SkillComparison::compute(&resume, &required);

        assert!(comparison.missing_skills.contains("Go"));
        assert!(!comparison.missing_skills.contains("Python"));
        assert!(comparison.matched_skills.contains("python"));
        assert_eq!(comparison.total_required, 2);
        assert_eq!(comparison.total_matched, 1);
        assert!((comparison.match_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_invariants_hold() {
        let resume = set(&["rust", "sql", "docker", "Linux"]);
        let required = set(&["Rust", "Kubernetes", "SQL", "AWS"]);

        let comparison = SkillComparison::compute(&resume, &required);

        assert!(comparison
            .matched_skills
            .is_disjoint(&comparison.missing_skills));
        assert!(comparison
            .matched_skills
            .union(&comparison.missing_skills)
            .is_superset(&required));
        assert_eq!(comparison.extra_skills.to_vec(), vec!["docker", "Linux"]);
        assert!((0.0..=100.0).contains(&comparison.match_percentage));
    }

    #[test]
    fn test_no_required_skills_is_a_full_match() {
        let comparison = SkillComparison::compute(&set(&["Rust"]), &SkillSet::new());
        assert_eq!(comparison.total_required, 0);
        assert!((comparison.match_percentage - EMPTY_REQUIREMENTS_MATCH).abs() < f64::EPSILON);
        assert!(comparison.is_fully_matched());
    }

    #[test]
    fn test_from_parts_repairs_overlapping_upstream_sets() {
        let comparison = SkillComparison::from_parts(
            set(&["python"]),
            set(&["Python", "go"]),
            set(&["go", "bash"]),
        );
        assert_eq!(comparison.missing_skills.to_vec(), vec!["go"]);
        assert_eq!(comparison.extra_skills.to_vec(), vec!["bash"]);
        assert_eq!(comparison.total_required, 2);
        assert_eq!(comparison.total_matched, 1);
    }

    #[test]
    fn test_match_percentage_rounds_to_two_decimals() {
        assert!((match_percentage(1, 3) - 33.33).abs() < 1e-9);
        assert!((match_percentage(2, 3) - 66.67).abs() < 1e-9);
        assert!((match_percentage(5, 3) - 100.0).abs() < 1e-9);
    }
}
