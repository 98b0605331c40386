//! Scripture, guidance and certificate content. Every public operation here
//! degrades to built-in tables instead of failing.

pub mod cache;
pub mod certificate;
pub mod guidance;
pub mod providers;
pub mod scripture;
pub mod verses;

pub use certificate::Template;
pub use guidance::{Guidance, InferenceConfig};
pub use providers::{BibleApi, LabsBible, ProviderError, VerseProvider, VerseRequest};
pub use scripture::Scripture;
