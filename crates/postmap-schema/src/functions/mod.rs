//! Named preprocessing and computation routines referenced by schema documents.
//!
//! The two namespaces are separate maps, so a preprocessing step and a
//! computation may share a name without colliding. The registry is built once
//! at startup and shared read-only by every transformation.

pub mod compute;
pub mod preprocess;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use postmap_core::CanonicalRecord;

use crate::error::FieldError;

/// A `value -> value` step applied to one extracted source field.
pub trait PreprocessingFn: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FieldError`] when the input cannot be processed; the pipeline
    /// then falls back to the field's default.
    fn apply(&self, value: Value) -> Result<Value, FieldError>;
}

impl<F> PreprocessingFn for F
where
    F: Fn(Value) -> Result<Value, FieldError> + Send + Sync,
{
    fn apply(&self, value: Value) -> Result<Value, FieldError> {
        self(value)
    }
}

/// Derives one output field from the raw post and the record built so far.
///
/// Implementations must be pure: no I/O, no interior mutation.
pub trait ComputationFn: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FieldError`] when the field cannot be derived; the pipeline
    /// logs it and leaves the target unset.
    fn compute(&self, raw_post: &Value, record: &CanonicalRecord) -> Result<Value, FieldError>;
}

impl<F> ComputationFn for F
where
    F: Fn(&Value, &CanonicalRecord) -> Result<Value, FieldError> + Send + Sync,
{
    fn compute(&self, raw_post: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
        self(raw_post, record)
    }
}

/// The namespace a function name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Preprocessing,
    Computation,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionKind::Preprocessing => write!(f, "preprocessing"),
            FunctionKind::Computation => write!(f, "computation"),
        }
    }
}

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    preprocessing: HashMap<String, Arc<dyn PreprocessingFn>>,
    computation: HashMap<String, Arc<dyn ComputationFn>>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut preprocessing: Vec<&str> = self.preprocessing.keys().map(String::as_str).collect();
        let mut computation: Vec<&str> = self.computation.keys().map(String::as_str).collect();
        preprocessing.sort_unstable();
        computation.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("preprocessing", &preprocessing)
            .field("computation", &computation)
            .finish()
    }
}

impl FunctionRegistry {
    /// An empty registry. Schemas referencing any function will skip it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin preprocessing and computation function.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        preprocess::register_builtins(&mut registry);
        compute::register_builtins(&mut registry);
        registry
    }

    /// Registers (or replaces) a preprocessing function.
    pub fn register_preprocessing<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: PreprocessingFn + 'static,
    {
        self.preprocessing.insert(name.into(), Arc::new(function));
        self
    }

    /// Registers (or replaces) a computation function.
    pub fn register_computation<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: ComputationFn + 'static,
    {
        self.computation.insert(name.into(), Arc::new(function));
        self
    }

    #[must_use]
    pub fn preprocessing(&self, name: &str) -> Option<&dyn PreprocessingFn> {
        self.preprocessing.get(name).map(|f| f.as_ref())
    }

    #[must_use]
    pub fn computation(&self, name: &str) -> Option<&dyn ComputationFn> {
        self.computation.get(name).map(|f| f.as_ref())
    }

    #[must_use]
    pub fn contains(&self, kind: FunctionKind, name: &str) -> bool {
        match kind {
            FunctionKind::Preprocessing => self.preprocessing.contains_key(name),
            FunctionKind::Computation => self.computation.contains_key(name),
        }
    }

    /// Sorted names registered in `kind`'s namespace.
    #[must_use]
    pub fn names(&self, kind: FunctionKind) -> Vec<&str> {
        let mut names: Vec<&str> = match kind {
            FunctionKind::Preprocessing => self.preprocessing.keys().map(String::as_str).collect(),
            FunctionKind::Computation => self.computation.keys().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }
}
