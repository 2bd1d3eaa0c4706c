//! Common traits and types that are useful for working with `vtu`
#![allow(unused_imports)]

pub use crate::compress::Compression;
pub use crate::traits::{DataSource, Numeric, Precision};
pub use crate::writer::{ArrayBlock, CellType, VtuWriter};
pub use crate::Writer;

pub(crate) use crate::Error;
pub(crate) use std::io::Write;

pub(crate) use derive_more::Constructor;
