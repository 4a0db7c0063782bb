mod entry;
mod money;
mod summary;

pub use entry::*;
pub use money::*;
pub use summary::*;
