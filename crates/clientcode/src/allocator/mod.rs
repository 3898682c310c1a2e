mod basic;
mod interface;
#[cfg(feature = "lock")]
mod lock;
mod next;

pub use basic::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "lock")))]
#[cfg(feature = "lock")]
pub use lock::*;
pub use next::*;
