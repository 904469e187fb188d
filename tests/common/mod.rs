//! Shared fixtures for the nestmsg integration suites.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use nestmsg::{ErrorKind, Locale, MapCatalog, MessageCatalog, NestError, NestMessageSource, Value};

/// A catalog covering the common scenarios.
pub fn catalog() -> MapCatalog {
    MapCatalog::new()
        .with_root_message("name", "N")
        .with_root_message("app.name", "Nest")
        .with_root_message("greet2", "Hi, {0}!")
        .with_root_message("wrap", "$(greet2,$0)")
        .with_root_message("wrap2", "<{0}>")
        .with_root_message("pair", "{0}+{1}")
        .with_root_message("c", "c:{0}")
        .with_root_message("b", "b($(c,$0))")
        .with_root_message("a", "a($(b,$0))")
        .with_root_message("loop", "again $(loop)")
        .with_root_message("broken", "$(name")
        .with_root_message("calls.broken", "see $(broken)")
}

pub fn source() -> NestMessageSource<MapCatalog> {
    NestMessageSource::new(catalog())
}

/// Resolves an inline template against the shared catalog.
pub fn resolve(template: &str, args: &[Value]) -> Result<String, NestError> {
    source().resolve_template(template, args, &Locale::root())
}

/// Unwraps the error of `result`, panicking with the produced text otherwise.
pub fn expect_err(result: Result<String, NestError>) -> NestError {
    match result {
        Ok(text) => panic!("expected an error, resolved to {text:?}"),
        Err(e) => e,
    }
}

pub fn expect_kind(result: Result<String, NestError>, expected: ErrorKind) -> NestError {
    let err = expect_err(result);
    assert_eq!(err.kind, expected, "unexpected error: {err}");
    err
}

/// Catalog that records every lookup and answers from an inner map.
#[derive(Default)]
pub struct RecordingCatalog {
    pub inner: MapCatalog,
    pub calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingCatalog {
    pub fn new(inner: MapCatalog) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Arguments of every lookup of `code`, in call order.
    pub fn args_for(&self, code: &str) -> Vec<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == code)
            .map(|(_, args)| args.clone())
            .collect()
    }
}

impl MessageCatalog for RecordingCatalog {
    fn lookup(&self, code: &str, args: &[Value], locale: &Locale) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .push((code.to_string(), args.to_vec()));
        self.inner.lookup(code, args, locale)
    }
}

/// A fresh, empty scratch directory unique to this process and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nestmsg-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
