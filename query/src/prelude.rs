pub(crate) use crate::{
    assemble::assemble,
    error::*,
    extract::*,
    parsing::parse,
    resolve::*,
    schema::*,
    service::*,
    tree::*,
};
pub(crate) use async_trait::async_trait;
pub(crate) use log::{debug, trace};
pub(crate) use serde::Deserialize;
pub(crate) use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::Arc,
};
