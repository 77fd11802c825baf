pub mod evaluation;

pub use evaluation::evaluate_top;
pub use evaluation::SkillReport;
