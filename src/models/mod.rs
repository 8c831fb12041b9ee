mod coordinate;
mod project;
mod record;

pub use coordinate::Coordinate;
pub use project::{NormalizedProject, ProjectStatus, PLACEHOLDER};
pub use record::BudgetRecord;
