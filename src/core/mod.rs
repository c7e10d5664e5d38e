// Core matching engine exports
pub mod assembler;
pub mod constraint;
pub mod evaluator;
pub mod matcher;
pub mod schema;

pub use assembler::assemble;
pub use constraint::{compile, sanitize_updates, Constraint, ConstraintError};
pub use evaluator::{evaluate, satisfies, MatchMode};
pub use matcher::{MatchOutcome, Matcher};
pub use schema::{Binding, Descriptor, FieldKind, ListingField, Schema, SchemaError, Slot, TRUTHY_STRINGS};
