// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod bulk;
pub mod collection;
pub mod confirm;
pub mod dropdown;
pub mod export;
pub mod filter;
pub mod navigate;
pub mod pager;
pub mod selection;
pub mod table;

pub use bulk::*;
pub use collection::*;
pub use confirm::*;
pub use dropdown::*;
pub use export::*;
pub use filter::*;
pub use navigate::*;
pub use pager::*;
pub use selection::*;
pub use table::*;

use fieldops_app::RecordId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("record {0} already exists -- mint a fresh id and retry")]
    DuplicateId(RecordId),
}
