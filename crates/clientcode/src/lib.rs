#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod cache;
mod code;
mod config;
mod contingency;
mod error;
mod rand;
mod recent;
mod status;
mod store;
mod time;

pub use crate::allocator::*;
pub use crate::cache::*;
pub use crate::code::*;
pub use crate::config::*;
pub use crate::contingency::*;
pub use crate::error::*;
pub use crate::rand::*;
pub use crate::recent::*;
pub use crate::status::*;
pub use crate::store::*;
pub use crate::time::*;
