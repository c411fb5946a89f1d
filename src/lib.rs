pub mod cli;
pub mod config;
pub mod highlight;
pub mod pipeline;
pub mod present;
pub mod session;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use pipeline::{format, format_html, Document, Link, LinkKind, Segment};
pub use present::{render, Rendered};
pub use session::EditSession;
