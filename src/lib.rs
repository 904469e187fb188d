//! nestmsg: a nested message-template resolver.
//!
//! Templates fetched from a [`MessageCatalog`] may embed expressions such as
//! `$(units.item,$0)` that reference other message codes. Resolution scans a
//! template once, resolves every expression innermost first through a
//! recursive catalog lookup, and substitutes the results back into the
//! surrounding text.
//!
//! ```rust
//! use nestmsg::{Locale, MapCatalog, NestMessageSource, Value};
//!
//! let catalog = MapCatalog::new()
//!     .with_root_message("app.name", "Nest")
//!     .with_root_message("greeting", "Welcome to $(app.name), {0}!");
//! let source = NestMessageSource::new(catalog);
//! let text = source
//!     .get_message("greeting", &[Value::from("Ada")], &Locale::root())
//!     .unwrap();
//! assert_eq!(text, "Welcome to Nest, Ada!");
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod localized;
pub mod resolver;
pub mod source;
pub mod value;

pub use catalog::{FnCatalog, Locale, MapCatalog, MessageCatalog};
pub use config::{Delimiters, ResolverConfig};
pub use errors::{ErrorKind, LoadError, NestError};
pub use localized::LocalizedMessages;
pub use resolver::{Expander, ResolutionContext};
pub use source::{MessageResolvable, NestMessageSource};
pub use value::Value;
