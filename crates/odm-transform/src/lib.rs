pub mod reshape;

pub use reshape::{collect_subject_ids, reshape};
