use yamlfmt_feature::Feature;

/// Before hook: strip spaces and tabs at the end of every line.
pub fn trim_trailing_whitespace() -> Feature {
    Feature::new("trim_trailing_whitespace").with_before(|_ctx, buf| {
        let mut out = Vec::with_capacity(buf.len());
        for (i, line) in buf.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            let (body, cr) = match line.strip_suffix(b"\r") {
                Some(body) => (body, true),
                None => (line, false),
            };
            let end = body
                .iter()
                .rposition(|&b| b != b' ' && b != b'\t')
                .map_or(0, |p| p + 1);
            out.extend_from_slice(&body[..end]);
            if cr {
                out.push(b'\r');
            }
        }
        Ok(out)
    })
}

/// After hook: make sure the output opens with a `---` marker.
pub fn include_document_start() -> Feature {
    Feature::new("include_document_start").with_after(|_ctx, buf| {
        if buf.is_empty() || starts_document(&buf) {
            return Ok(buf);
        }
        let mut out = b"---\n".to_vec();
        out.extend_from_slice(&buf);
        Ok(out)
    })
}

/// First line that is not blank or a comment is a marker or a directive.
fn starts_document(buf: &[u8]) -> bool {
    buf.split(|&b| b == b'\n')
        .map(|line| line.trim_ascii())
        .find(|line| !line.is_empty() && !line.starts_with(b"#"))
        .is_some_and(|line| line.starts_with(b"---") || line.starts_with(b"%"))
}
