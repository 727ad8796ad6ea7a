//! Translation of Cantus API SEARCH queries into Solr queries.
//!
//! A raw query goes through four stages:
//!
//! 1. [`parse`] checks it against the grammar and builds a [`ParseTree`],
//! 2. [`extract`] flattens the tree into an ordered list of [`Component`]s,
//! 3. [`Resolver::resolve`] replaces cross-referenced fields with the ids of the records they refer to,
//! 4. [`assemble`] renders the components back into a single query string.
//!
//! [`Translator`] chains them and adds the resource type filter expected by the API.

mod assemble;
mod error;
mod extract;
mod parsing;
mod prelude;
mod resolve;
mod schema;
mod service;
mod translate;
mod tree;

pub use crate::{
    assemble::assemble,
    error::*,
    extract::*,
    parsing::{parse, MAX_DEPTH},
    resolve::*,
    schema::*,
    service::*,
    translate::*,
    tree::*,
};
