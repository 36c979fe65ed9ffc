//! Shared test support utilities for integration tests

#![allow(dead_code)]

use bender_core::{Alternation, Bender, Format, ListOp, ListOpKind, Result, Switch, Template};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load and parse a JSON fixture
pub fn load_fixture(name: &str) -> Value {
    let path = fixture_path(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Required single-key selector
pub fn s(key: &str) -> Bender {
    Bender::select([key]).expect("non-empty path")
}

/// Length of an array or string
pub fn len() -> Bender {
    Bender::func("len", |v| match v {
        Value::Array(items) => Ok(json!(items.len())),
        Value::String(text) => Ok(json!(text.chars().count())),
        other => anyhow::bail!("{} has no length", other),
    })
}

/// Left fold summing numbers
pub fn sum() -> ListOp {
    ListOp::fold("sum", |acc, v| bender_core::value::add(&acc, v).map_err(Into::into))
}

/// Template turning the `people.json` fixture into `people_expected.json`
///
/// Expects a context with the reference `year`.
pub fn people_template() -> Result<Template> {
    let person = Template::object([
        ("name", Template::from(Format::new("{} {}", [s("first"), s("last")])?)),
        (
            "age",
            Template::from(Bender::context().then(s("year")) - s("born")),
        ),
        ("alias", Template::from(Alternation::new([s("nickname"), s("first")])?)),
        (
            "reach",
            Template::from(
                Switch::new(
                    Bender::select(["contact", "service"])?,
                    [
                        ("email", Bender::select(["contact", "address"])?),
                        (
                            "mastodon",
                            Format::new(
                                "@{}@{}",
                                [
                                    Bender::select(["contact", "handle"])?,
                                    Bender::select(["contact", "server"])?,
                                ],
                            )?
                            .into(),
                        ),
                    ],
                )
                .with_default(Bender::constant(Value::Null)),
            ),
        ),
    ]);

    Ok(Template::object([
        ("count", Template::from(s("people").then(len()))),
        (
            "people",
            Template::from(s("people").then(ListOpKind::Map.bend_each(person, None))),
        ),
        (
            "bornBefore1900",
            Template::from(
                s("people")
                    .then(ListOpKind::Filter.bend_each(s("born").less_than(Bender::constant(1900)), None))
                    .then(ListOpKind::Map.bend_each(s("first"), None)),
            ),
        ),
        (
            "totalBirthYears",
            Template::from(
                s("people")
                    .then(ListOpKind::Map.bend_each(s("born"), None))
                    .then(sum()),
            ),
        ),
        ("source", Template::from(json!("census"))),
    ]))
}
