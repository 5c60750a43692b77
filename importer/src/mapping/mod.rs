//! Column-to-field mapping.
//!
//! - `directive`: mapping specs and import plans (what the config says)
//! - `transform`: field transforms (boolean, integer, relation)
//! - `mapper`: apply a spec to a row
//! - `builtin`: the plan for the site's CSV exports

pub mod builtin;
pub mod directive;
pub mod mapper;
pub mod transform;

pub use builtin::builtin_plan;
pub use directive::{FieldDirective, FieldMapping, FileImport, ImportPlan, MappingSpec};
pub use mapper::{map_row, FieldWarning, MappedRow};
pub use transform::{RelationShape, Transform};
