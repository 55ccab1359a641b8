pub mod analysis;
pub mod course;
pub mod resume;
pub mod skills;

pub use analysis::JobAnalysisResult;
pub use course::{rank_courses, CourseRecommendation};
pub use resume::Resume;
pub use skills::{SkillComparison, SkillSet};
