#![no_main]

use libfuzzer_sys::fuzz_target;
use yamlfmt_diff::multiline_diff;

fuzz_target!(|pair: (&str, &str, bool)| {
    let (original, formatted, crlf) = pair;
    let sep = if crlf { "\r\n" } else { "" };
    let (text, changed) = multiline_diff(original, formatted, sep);

    let same = original.replace("\r\n", "\n") == formatted.replace("\r\n", "\n");
    assert_eq!(same, changed == 0);
    assert_eq!(original == formatted, text.is_empty());
});
