#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Map;
use yamlfmt_formatters::FormatterRegistry;

fuzz_target!(|data: &[u8]| {
    let Ok(formatter) = FormatterRegistry::builtin().create("experimental", &Map::new()) else {
        return;
    };
    // Unparseable input is rejected, not reformatted.
    let Ok(once) = formatter.format(data) else {
        return;
    };
    let twice = formatter.format(&once).expect("emitted YAML parses");
    assert_eq!(once, twice);
});
