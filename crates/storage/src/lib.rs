#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod frontmatter;
pub mod settings;
pub mod vault;

pub use settings::SettingsFile;
pub use vault::{Note, NoteError, Vault};
