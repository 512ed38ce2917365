pub mod plan;
pub mod snapshot;
pub mod tracker;

pub use plan::{FieldPlan, SelectionPlan, SheetPlan, apply_plan, load_plan};
pub use snapshot::{ProgressSnapshot, ProgressStage, SourcePaths};
pub use tracker::{SelectionTracker, Slot, Stage};
