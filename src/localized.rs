//! A message source bound to a locale supplier.
//!
//! Application code usually wants "the message for the current user"
//! without passing a locale around. [`LocalizedMessages`] asks its supplier
//! for the locale on every call, so the supplier can read a request-scoped
//! or user-configurable setting.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{Locale, MessageCatalog};
use crate::errors::NestError;
use crate::source::NestMessageSource;
use crate::value::Value;

type LocaleSupplier = Arc<dyn Fn() -> Locale + Send + Sync>;

pub struct LocalizedMessages<C> {
    source: Arc<NestMessageSource<C>>,
    locale: LocaleSupplier,
}

impl<C: MessageCatalog> LocalizedMessages<C> {
    pub fn new(
        source: Arc<NestMessageSource<C>>,
        locale: impl Fn() -> Locale + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            locale: Arc::new(locale),
        }
    }

    /// Binds the source to a single locale.
    pub fn fixed(source: Arc<NestMessageSource<C>>, locale: Locale) -> Self {
        Self::new(source, move || locale.clone())
    }

    pub fn get(&self, code: &str, args: &[Value]) -> Result<String, NestError> {
        self.source.get_message(code, args, &self.locale())
    }

    pub fn get_or(&self, default: &str, code: &str, args: &[Value]) -> Result<String, NestError> {
        self.source
            .get_message_or(code, args, default, &self.locale())
    }

    /// The locale the supplier currently reports.
    pub fn locale(&self) -> Locale {
        (self.locale)()
    }

    pub fn source(&self) -> &NestMessageSource<C> {
        &self.source
    }
}

impl<C> Clone for LocalizedMessages<C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            locale: Arc::clone(&self.locale),
        }
    }
}

impl<C> fmt::Debug for LocalizedMessages<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizedMessages")
            .field("locale", &(self.locale)())
            .finish_non_exhaustive()
    }
}
