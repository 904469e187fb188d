// tests/source_tests.rs

mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use common::{catalog, expect_err, expect_kind, source};
use nestmsg::{
    ErrorKind, FnCatalog, Locale, LocalizedMessages, MapCatalog, MessageResolvable,
    NestMessageSource, ResolverConfig, Value,
};

fn root() -> Locale {
    Locale::root()
}

// ---
// get_message
// ---

#[test]
fn message_with_nested_expression_and_argument() {
    let text = source()
        .get_message("wrap", &[Value::from("Alice")], &root())
        .unwrap();
    assert_eq!(text, "Hi, Alice!");
}

#[test]
fn arguments_flow_through_a_chain_of_messages() {
    let text = source()
        .get_message("a", &[Value::from("x")], &root())
        .unwrap();
    assert_eq!(text, "a(b(c:x))");
}

#[test]
fn message_without_expressions_is_only_interpolated() {
    let text = source()
        .get_message("pair", &[Value::Int(1), Value::Float(2.0)], &root())
        .unwrap();
    assert_eq!(text, "1+2.0");
}

#[test]
fn missing_top_level_code() {
    let err = expect_kind(
        source().get_message("nope", &[], &root()),
        ErrorKind::MessageNotFound {
            code: "nope".into(),
            locale: "root".into(),
        },
    );
    assert_eq!(err.offset(), 0);
    assert_eq!(err.source_name(), "message `nope`");
}

#[test]
fn nested_error_points_into_the_failing_message() {
    let err = expect_kind(
        source().get_message("calls.broken", &[], &root()),
        ErrorKind::UnbalancedDelimiters { open: 1 },
    );
    assert_eq!(err.template(), "$(name");
    assert_eq!(err.source_name(), "message `broken`");
}

#[test]
fn self_reference_hits_the_recursion_limit() {
    let err = expect_kind(
        source().get_message("loop", &[], &root()),
        ErrorKind::RecursionLimit {
            code: "loop".into(),
            limit: 32,
        },
    );
    assert_eq!(err.source_name(), "message `loop`");
    assert_eq!(err.offset(), 6);
}

#[test]
fn recursion_limit_is_configurable() {
    let source =
        NestMessageSource::with_config(catalog(), ResolverConfig::default().max_depth(2)).unwrap();
    expect_kind(
        source.get_message("loop", &[], &root()),
        ErrorKind::RecursionLimit {
            code: "loop".into(),
            limit: 2,
        },
    );
    // a -> b -> c needs two nested lookups
    assert_eq!(
        source.get_message("a", &[Value::from("x")], &root()).unwrap(),
        "a(b(c:x))"
    );
}

#[test]
fn mutual_recursion_is_bounded() {
    let catalog = MapCatalog::new()
        .with_root_message("ping", "$(pong)")
        .with_root_message("pong", "$(ping)");
    let err = expect_err(NestMessageSource::new(catalog).get_message("ping", &[], &root()));
    assert!(matches!(err.kind, ErrorKind::RecursionLimit { .. }));
}

// ---
// Defaults and resolvables
// ---

#[test]
fn default_message_is_used_when_code_is_missing() {
    let text = source()
        .get_message_or(
            "missing",
            &[Value::from("Bob")],
            "Hello {0} from $(app.name)",
            &root(),
        )
        .unwrap();
    assert_eq!(text, "Hello Bob from Nest");
}

#[test]
fn default_message_is_ignored_when_code_exists() {
    let text = source()
        .get_message_or("name", &[], "fallback", &root())
        .unwrap();
    assert_eq!(text, "N");
}

#[test]
fn default_message_errors_still_propagate() {
    expect_kind(
        source().get_message_or("missing", &[], "$(nope)", &root()),
        ErrorKind::MessageNotFound {
            code: "nope".into(),
            locale: "root".into(),
        },
    );
}

#[test]
fn resolvable_tries_codes_in_order() {
    let resolvable = MessageResolvable::with_codes(["missing", "greet2", "name"]).arg("Z");
    assert_eq!(source().get_resolvable(&resolvable, &root()).unwrap(), "Hi, Z!");
}

#[test]
fn resolvable_falls_back_to_default_message() {
    let resolvable = MessageResolvable::new("missing")
        .args([1, 2])
        .default_message("$(pair,$1,$0) / {0}");
    assert_eq!(
        source().get_resolvable(&resolvable, &root()).unwrap(),
        "2+1 / 1"
    );
}

#[test]
fn resolvable_without_default_reports_last_code() {
    let resolvable = MessageResolvable::with_codes(["first", "second"]);
    expect_kind(
        source().get_resolvable(&resolvable, &root()),
        ErrorKind::MessageNotFound {
            code: "second".into(),
            locale: "root".into(),
        },
    );
}

// ---
// Locales
// ---

fn localized_catalog() -> MapCatalog {
    MapCatalog::new()
        .with_root_message("hello", "Hello, $(who)!")
        .with_root_message("who", "World")
        .with_message("de", "hello", "Hallo, $(who)!")
        .with_message("de", "who", "Welt")
        .with_message("de-CH", "who", "Schwiiz")
}

#[test]
fn nested_lookups_use_the_requested_locale() {
    let source = NestMessageSource::new(localized_catalog());
    assert_eq!(
        source.get_message("hello", &[], &Locale::new("de")).unwrap(),
        "Hallo, Welt!"
    );
    assert_eq!(
        source.get_message("hello", &[], &Locale::new("de_CH")).unwrap(),
        "Hallo, Schwiiz!"
    );
    assert_eq!(
        source.get_message("hello", &[], &Locale::new("fr")).unwrap(),
        "Hello, World!"
    );
}

#[test]
fn not_found_names_the_requested_locale() {
    let source = NestMessageSource::new(localized_catalog());
    expect_kind(
        source.get_message("bye", &[], &Locale::new("de-CH")),
        ErrorKind::MessageNotFound {
            code: "bye".into(),
            locale: "de-CH".into(),
        },
    );
}

#[test]
fn localized_messages_follow_the_supplier() {
    let current = Arc::new(Mutex::new(Locale::new("de")));
    let supplier = Arc::clone(&current);
    let messages = LocalizedMessages::new(
        Arc::new(NestMessageSource::new(localized_catalog())),
        move || supplier.lock().unwrap().clone(),
    );

    assert_eq!(messages.get("hello", &[]).unwrap(), "Hallo, Welt!");
    *current.lock().unwrap() = Locale::new("en");
    assert_eq!(messages.locale(), Locale::new("en"));
    assert_eq!(messages.get("hello", &[]).unwrap(), "Hello, World!");
}

#[test]
fn fixed_localized_messages() {
    let messages = LocalizedMessages::fixed(
        Arc::new(NestMessageSource::new(localized_catalog())),
        Locale::new("de-CH"),
    );
    let copy = messages.clone();
    assert_eq!(copy.get("hello", &[]).unwrap(), "Hallo, Schwiiz!");
    assert_eq!(
        messages.get_or("Tschüss {0}", "bye", &[Value::from("Ada")]).unwrap(),
        "Tschüss Ada"
    );
}

// ---
// Other catalogs
// ---

#[test]
fn closure_catalog_receives_nested_arguments() {
    let catalog = FnCatalog(|code: &str, args: &[Value], _: &Locale| match code {
        "kinds" => Some(
            args.iter()
                .map(Value::type_name)
                .collect::<Vec<_>>()
                .join(","),
        ),
        "outer" => Some("[$(kinds,1,x,,2.5)]".to_string()),
        _ => None,
    });
    let source = NestMessageSource::new(catalog);
    let text = source.get_message("outer", &[], &root()).unwrap();
    assert_eq!(
        text,
        format!(
            "[{},{},{},{}]",
            Value::Int(1).type_name(),
            Value::from("x").type_name(),
            Value::Nil.type_name(),
            Value::Float(2.5).type_name()
        )
    );
}

#[test]
fn shared_catalogs_work_through_arc() {
    let shared = Arc::new(catalog());
    let source = NestMessageSource::new(Arc::clone(&shared));
    assert_eq!(source.get_message("app.name", &[], &root()).unwrap(), "Nest");
}

#[test]
fn concurrent_resolution_shares_one_source() {
    let source = source();
    thread::scope(|scope| {
        for i in 0..8 {
            let source = &source;
            scope.spawn(move || {
                for j in 0..50 {
                    let arg = Value::Int(i * 100 + j);
                    let text = source.get_message("a", &[arg.clone()], &Locale::root()).unwrap();
                    assert_eq!(text, format!("a(b(c:{arg}))"));
                }
            });
        }
    });
}
