//! Entry path safety validation.

pub mod path;

pub use path::sanitize_entry_path;
pub use path::validate_entries;
