//! Guards applied while extracting untrusted archives.

pub mod limits;
pub mod path;

pub use limits::DeclaredSize;
pub use limits::SizeBudget;
pub use limits::check_declared_sizes;
pub use path::resolve;
pub use path::within_root;
