//! # portal-id
//!
//! Structured identifier grammars, parsing, and validation for portal
//! resources.
//!
//! ## Design Principles
//!
//! - A [`Context`] declares the grammar of a composite id once: ordered
//!   components, which are required, which may repeat, and the pattern
//!   each value must match
//! - Ids are immutable values validated when they are created
//! - Ids have a canonical string form and parse back to an equal id
//! - Ids can carry a resource kind as a type parameter ([`Identifiable`])
//!
//! ## Id Format
//!
//! Components are joined by the context separator in declared order,
//! optionally with a leading separator:
//!
//! - `local=classic=local/invoker=web/HelloPortlet` (portlet context)
//! - `/site/classic/home/about` (navigation context)
//! - `/platform/administrators` (group context)
//!
//! Separators are not escaped: a component value must not contain its
//! context's separator.

mod component;
mod context;
mod definition;
mod error;
mod id;
mod macros;
mod registry;

pub mod contexts;
pub mod types;

pub use component::Component;
pub use context::{Context, ContextBuilder};
pub use definition::{
    ComponentDefinition, ContextDefinition, GrammarFile, ANY_VALUE_PATTERN, UNTYPED_KIND,
};
pub use error::IdError;
pub use id::{Id, IdSeed, Identifiable, Untyped};
pub use registry::{ContextRegistry, RegistryError};
