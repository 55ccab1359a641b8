use serde::Serialize;
use serde_json::{json, Value};

use super::course_card::CourseCardView;
use super::skill_gap::SkillGapView;
use crate::models::{CourseRecommendation, JobAnalysisResult, SkillSet};

/// Courses requested per analysis.
pub const ANALYSIS_TOP_N: usize = 12;
/// Courses shown before the "Show N More Courses" toggle.
pub const DISPLAY_THRESHOLD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient toast raised by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn error(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Body for `POST /api/ml/analyze-job`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    pub job_description: String,
    pub resume_skills: SkillSet,
    pub top_n: usize,
}

impl AnalyzeJobRequest {
    pub fn to_body(&self) -> Value {
        json!({
            "jobDescription": self.job_description,
            "resumeSkills": self.resume_skills.to_vec(),
            "topN": self.top_n,
        })
    }
}

/// What the panel renders right now.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// No analysis yet; the trigger is enabled unless loading.
    Prompt { analyzing: bool },
    /// Nothing is missing, so no course list.
    FullyQualified { gap: SkillGapView },
    Courses {
        gap: SkillGapView,
        cards: Vec<CourseCardView>,
        toggle_label: Option<String>,
    },
}

/// Skill-gap analysis panel for one job posting.
///
/// `Idle → Loading → {Success | Error}`. Only one analysis may be in flight;
/// a failed request leaves the last successful analysis on screen.
#[derive(Debug, Clone)]
pub struct AnalysisPanel {
    status: PanelStatus,
    analysis: Option<JobAnalysisResult>,
    show_all: bool,
    notification: Option<Notification>,
}

impl Default for AnalysisPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self {
            status: PanelStatus::Idle,
            analysis: None,
            show_all: false,
            notification: None,
        }
    }

    pub fn status(&self) -> PanelStatus {
        self.status
    }

    pub fn analysis(&self) -> Option<&JobAnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn can_analyze(&self) -> bool {
        self.status != PanelStatus::Loading
    }

    /// Starts an analysis and returns the request to send, or `None` when one
    /// is already running or the description is blank.
    pub fn begin(
        &mut self,
        job_description: &str,
        resume_skills: &SkillSet,
    ) -> Option<AnalyzeJobRequest> {
        if !self.can_analyze() {
            return None;
        }
        if job_description.trim().is_empty() {
            self.notification = Some(Notification::error("Job description is required"));
            return None;
        }

        self.status = PanelStatus::Loading;
        Some(AnalyzeJobRequest {
            job_description: job_description.to_string(),
            resume_skills: resume_skills.clone(),
            top_n: ANALYSIS_TOP_N,
        })
    }

    /// Applies the outcome of the request returned by [`begin`](Self::begin).
    /// Ignored unless an analysis is in flight.
    pub fn complete(&mut self, outcome: Result<JobAnalysisResult, String>) {
        if self.status != PanelStatus::Loading {
            return;
        }

        match outcome {
            Ok(analysis) => {
                self.notification = Some(Notification {
                    kind: NotificationKind::Success,
                    title: "Analysis Complete!".to_string(),
                    description: format!(
                        "Found {} relevant courses",
                        analysis.recommended_courses.len()
                    ),
                });
                self.analysis = Some(analysis);
                self.show_all = false;
                self.status = PanelStatus::Success;
            }
            Err(message) => {
                self.notification = Some(Notification::error(message));
                self.status = PanelStatus::Error;
            }
        }
    }

    pub fn toggle_show_all(&mut self) {
        if self.hidden_count() > 0 {
            self.show_all = !self.show_all;
        }
    }

    /// Courses currently on screen: a slice of the fetched list, never a refetch.
    pub fn visible_courses(&self) -> &[CourseRecommendation] {
        let Some(analysis) = &self.analysis else {
            return &[];
        };
        let courses = analysis.recommended_courses.as_slice();
        if self.show_all {
            courses
        } else {
            &courses[..courses.len().min(DISPLAY_THRESHOLD)]
        }
    }

    pub fn toggle_label(&self) -> Option<String> {
        match self.hidden_count() {
            0 => None,
            _ if self.show_all => Some("Show Less".to_string()),
            hidden => Some(format!("Show {hidden} More Courses")),
        }
    }

    /// Removes and returns the pending notification, if any.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn view(&self) -> PanelView {
        let Some(analysis) = &self.analysis else {
            return PanelView::Prompt {
                analyzing: self.status == PanelStatus::Loading,
            };
        };

        let gap = SkillGapView::from(&analysis.skill_analysis);
        if analysis.is_fully_qualified() {
            return PanelView::FullyQualified { gap };
        }

        PanelView::Courses {
            gap,
            cards: self.visible_courses().iter().map(CourseCardView::from).collect(),
            toggle_label: self.toggle_label(),
        }
    }

    fn hidden_count(&self) -> usize {
        self.analysis
            .as_ref()
            .map_or(0, |a| a.recommended_courses.len().saturating_sub(DISPLAY_THRESHOLD))
    }
}
