#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};
use yamlfmt_formatters::FormatterRegistry;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    indent: u8,
    retain_line_breaks: bool,
    text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let mut config = Map::new();
    config.insert("indent".into(), Value::from(1 + input.indent % 8));
    config.insert(
        "retain_line_breaks".into(),
        Value::Bool(input.retain_line_breaks),
    );
    let Ok(formatter) = FormatterRegistry::builtin().create("basic", &config) else {
        return;
    };

    // Any UTF-8 input formats; a second pass must change nothing.
    let once = formatter.format(input.text.as_bytes()).expect("utf-8 input formats");
    let twice = formatter.format(&once).expect("formatted output formats");
    assert_eq!(once, twice);
});
