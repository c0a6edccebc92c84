use yamlfmt_feature::Feature;

/// Context key holding the stashed header between the two hooks.
pub const HEADER_COMMENTS_KEY: &str = "experimental.header_comments";

/// Lift the leading comment block off before formatting and put it back after.
pub fn retain_header_comments() -> Feature {
    Feature::new("retain_header_comments")
        .with_before(|ctx, buf| {
            let split = header_len(&buf);
            let header = String::from_utf8_lossy(&buf[..split]).into_owned();
            ctx.insert(HEADER_COMMENTS_KEY, header);
            Ok(buf[split..].to_vec())
        })
        .with_after(|ctx, buf| match ctx.remove(HEADER_COMMENTS_KEY) {
            Some(header) if !header.is_empty() => {
                let mut out = header.into_bytes();
                out.extend_from_slice(&buf);
                Ok(out)
            }
            _ => Ok(buf),
        })
}

/// Byte length of the leading run of comment and blank lines.
fn header_len(buf: &[u8]) -> usize {
    let mut offset = 0;
    while offset < buf.len() {
        let end = buf[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(buf.len(), |p| offset + p + 1);
        let line = buf[offset..end].trim_ascii();
        if !line.is_empty() && !line.starts_with(b"#") {
            break;
        }
        offset = end;
    }
    offset
}
