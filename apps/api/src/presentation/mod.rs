// Skill-gap presentation: display state for a job analysis. Formats values
// computed upstream and never recomputes them.

pub mod course_card;
pub mod panel;
pub mod skill_gap;

pub use course_card::CourseCardView;
pub use panel::{AnalysisPanel, AnalyzeJobRequest, Notification, PanelStatus, PanelView};
pub use skill_gap::SkillGapView;
