//! Document assembly and ODM XML serialization.

pub mod builder;
pub mod odm_xml;

pub use builder::{DocumentBuilder, NEWLINE_MARKER};
pub use odm_xml::write_odm_xml;
