//! Schema-driven transformation of raw social posts into canonical records.
//!
//! [`SchemaRegistry`] loads versioned mapping documents, [`FunctionRegistry`]
//! holds the named preprocessing and computation routines they reference, and
//! [`SchemaTransformer`] runs the field pipeline for one post at a time.
//! [`process_posts`] drives a whole batch.

pub mod batch;
pub mod duration;
pub mod error;
pub mod functions;
pub mod quality;
pub mod registry;
pub mod schema;
pub mod text;
pub mod transform;
pub mod validation;

pub use batch::{process_posts, BatchOutcome, PostFailure};
pub use error::{FieldError, SchemaError, TransformError};
pub use functions::{ComputationFn, FunctionKind, FunctionRegistry, PreprocessingFn};
pub use registry::{load_schema_file, SchemaRegistry};
pub use schema::{ComputedField, FieldMapping, NamedEntries, Schema, UnknownFunction};
pub use transform::{SchemaTransformer, PROCESSING_VERSION, QUALITY_SCORE_FIELD};
