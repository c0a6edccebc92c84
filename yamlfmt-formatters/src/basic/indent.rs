//! Line-oriented re-indentation of block YAML.
//!
//! Every block level found in the input is mapped to a normalized column:
//! nested nodes sit `indent` columns right of their parent and the content
//! of a sequence entry sits two columns right of its dash. Comments keep the
//! level they were written at. Block scalar bodies move with their parent
//! but keep their own relative indentation and trailing whitespace.
//! Continuation lines of multi-line plain and quoted scalars are copied
//! verbatim after their indentation, blank lines included.

use super::BasicConfig;

/// An open block level: where it starts in the input and where it goes in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Level {
    orig: usize,
    new: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    /// `key: |`
    Key,
    /// `- |`, `--- |` or an indicator on a line of its own.
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockHeader {
    kind: HeaderKind,
    explicit: Option<usize>,
    keep: bool,
}

#[derive(Debug)]
struct BlockScalar {
    /// Node the scalar belongs to; `None` at document root.
    anchor: Option<Level>,
    explicit: Option<usize>,
    /// Content indentation, resolved from the first non-blank line.
    content: Option<Level>,
    keep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarStyle {
    Plain,
    Single,
    Double,
}

/// A plain or quoted scalar that may continue on the following lines.
#[derive(Debug)]
struct FlowScalar {
    style: ScalarStyle,
    /// Continuation lines must be indented past this input column; `None` at document root.
    owner: Option<usize>,
    /// Output column of continuation lines.
    new: usize,
    /// Blank lines seen since the last continuation line.
    blanks: usize,
}

enum Out {
    Text(String),
    Comment { ind: usize, text: String },
}

struct Reindenter<'a> {
    config: &'a BasicConfig,
    stack: Vec<Level>,
    block: Option<BlockScalar>,
    scalar: Option<FlowScalar>,
    out: Vec<Out>,
    pending: Vec<usize>,
}

pub(crate) fn reindent(input: &str, config: &BasicConfig) -> String {
    let mut r = Reindenter {
        config,
        stack: Vec::new(),
        block: None,
        scalar: None,
        out: Vec::new(),
        pending: Vec::new(),
    };
    for line in input.lines() {
        r.line(line);
    }
    r.finish()
}

impl Reindenter<'_> {
    fn line(&mut self, line: &str) {
        if self.block.is_some() && self.block_line(line) {
            return;
        }
        if self.scalar.is_some() && self.scalar_line(line) {
            return;
        }

        let ind = leading_spaces(line);
        let content = line[ind..].trim_end();
        if content.is_empty() {
            self.blank();
        } else if ind == 0 && is_document_marker(content) {
            self.document_marker(content);
        } else if ind == 0 && content.starts_with('%') {
            self.push_text(content.to_string());
        } else if content.starts_with('#') {
            self.comment(ind, content);
        } else {
            self.content(ind, content);
        }
    }

    /// Handle a line while a block scalar is open. Returns false once the
    /// scalar has ended and the line still needs regular processing.
    fn block_line(&mut self, line: &str) -> bool {
        let ind = leading_spaces(line);
        let blank = line.trim().is_empty();
        if !blank && ind == 0 && is_document_marker(line.trim_end()) {
            self.block = None;
            return false;
        }
        let indent = self.config.indent;
        let Some(block) = self.block.as_mut() else {
            return false;
        };

        let content = match block.content {
            Some(content) => content,
            None => {
                if blank {
                    self.out.push(Out::Text(String::new()));
                    return true;
                }
                let orig = match (block.explicit, block.anchor) {
                    (Some(d), Some(anchor)) => anchor.orig + d,
                    (Some(d), None) => d.saturating_sub(1),
                    (None, Some(anchor)) if ind > anchor.orig => ind,
                    (None, Some(_)) => {
                        self.block = None;
                        return false;
                    }
                    (None, None) => ind,
                };
                let new = match (block.explicit, block.anchor) {
                    (Some(d), Some(anchor)) => anchor.new + d,
                    (None, Some(anchor)) => anchor.new + indent,
                    (_, None) => orig,
                };
                let level = Level { orig, new };
                block.content = Some(level);
                level
            }
        };

        if blank {
            let text = if ind >= content.orig && line.len() > content.orig {
                format!("{}{}", spaces(content.new), &line[content.orig..])
            } else {
                String::new()
            };
            self.out.push(Out::Text(text));
            return true;
        }
        if ind < content.orig {
            self.block = None;
            return false;
        }
        self.out.push(Out::Text(format!(
            "{}{}",
            spaces(content.new),
            &line[content.orig..]
        )));
        true
    }

    /// Handle a line while a flow scalar is open. Returns false once the
    /// scalar has ended and the line still needs regular processing.
    fn scalar_line(&mut self, line: &str) -> bool {
        let ind = leading_spaces(line);
        let content = line[ind..].trim_end();
        let Some(scalar) = self.scalar.as_mut() else {
            return false;
        };
        if content.is_empty() {
            scalar.blanks += 1;
            return true;
        }

        let ends_before = (ind == 0 && is_document_marker(content))
            || (scalar.style == ScalarStyle::Plain
                && (content.starts_with('#') || scalar.owner.is_some_and(|owner| ind <= owner)));
        if ends_before {
            self.end_scalar();
            return false;
        }

        let closes = match scalar.style {
            ScalarStyle::Plain => strip_comment(content).len() != content.len(),
            style => quote_end(content, style).is_some(),
        };
        let new = scalar.new;
        let blanks = std::mem::take(&mut scalar.blanks);
        if closes {
            self.scalar = None;
        }
        for _ in 0..blanks {
            self.out.push(Out::Text(String::new()));
        }
        self.out.push(Out::Text(format!("{}{}", spaces(new), content)));
        true
    }

    /// Close the open flow scalar. Blank lines after its last line belong to
    /// the surrounding structure again.
    fn end_scalar(&mut self) {
        if let Some(scalar) = self.scalar.take() {
            for _ in 0..scalar.blanks {
                self.blank();
            }
        }
    }

    fn blank(&mut self) {
        if !self.config.retain_line_breaks {
            return;
        }
        match self.out.last() {
            None => {}
            Some(Out::Text(last)) if last.is_empty() => {}
            Some(_) => self.out.push(Out::Text(String::new())),
        }
    }

    fn document_marker(&mut self, content: &str) {
        self.resolve_pending();
        self.stack.clear();
        self.block = None;
        self.scalar = None;
        self.push_text(content.to_string());

        if content.starts_with("---")
            && let Some(header) = block_header(content[3..].trim_start())
            && header.kind == HeaderKind::Bare
        {
            self.block = Some(BlockScalar {
                anchor: None,
                explicit: header.explicit,
                content: None,
                keep: header.keep,
            });
        }
    }

    fn comment(&mut self, ind: usize, text: &str) {
        if let Some(level) = self.stack.iter().find(|l| l.orig == ind) {
            let line = format!("{}{}", spaces(level.new), text);
            self.push_text(line);
            return;
        }
        // Placed once the next content line shows which level it belongs to.
        self.pending.push(self.out.len());
        self.out.push(Out::Comment {
            ind,
            text: text.to_string(),
        });
    }

    fn content(&mut self, ind: usize, content: &str) {
        let new = self.map_level(ind);
        let mut line = spaces(new);
        let mut col = Level { orig: ind, new };
        let mut last_dash = None;
        let mut rest = content;

        while let Some(after) = seq_entry(rest) {
            line.push('-');
            last_dash = Some(col);
            let trimmed = after.trim_start_matches(' ');
            if trimmed.is_empty() {
                rest = "";
                break;
            }
            line.push(' ');
            if trimmed.starts_with('#') {
                line.push_str(trimmed);
                rest = "";
                break;
            }
            let gap = after.len() - trimmed.len();
            col = Level {
                orig: col.orig + 1 + gap,
                new: col.new + 2,
            };
            self.stack.push(col);
            rest = trimmed;
        }
        line.push_str(rest);
        self.push_text(line);
        self.resolve_pending();

        let Some(header) = block_header(rest) else {
            self.scalar = self.flow_scalar(rest, col, last_dash);
            return;
        };
        // A bare indicator opens no level of its own. Dropping it keeps later
        // comments shallower than the scalar body.
        let anchor = match header.kind {
            HeaderKind::Key => Some(col),
            HeaderKind::Bare if last_dash.is_some() => {
                self.stack.pop();
                last_dash
            }
            HeaderKind::Bare if self.stack.len() >= 2 => {
                self.stack.pop();
                self.stack.last().copied()
            }
            HeaderKind::Bare => None,
        };
        self.block = Some(BlockScalar {
            anchor,
            explicit: header.explicit,
            content: None,
            keep: header.keep,
        });
    }

    /// The scalar `rest` leaves open, if its value may continue below.
    fn flow_scalar(&self, rest: &str, col: Level, last_dash: Option<Level>) -> Option<FlowScalar> {
        let (value, owner, new) = match mapping_value(rest) {
            Some(value) => (value, Some(col.orig), col.new + self.config.indent),
            None => {
                let owner = match last_dash {
                    Some(dash) => Some(dash.orig),
                    None => self.stack.iter().rev().nth(1).map(|l| l.orig),
                };
                (rest, owner, col.new)
            }
        };
        let value = strip_properties(value);

        let style = match value.chars().next()? {
            '"' => ScalarStyle::Double,
            '\'' => ScalarStyle::Single,
            '[' | '{' | '*' | '#' | '|' | '>' => return None,
            '?' if value.len() == 1 || value[1..].starts_with(' ') => return None,
            _ => ScalarStyle::Plain,
        };
        let open = match style {
            ScalarStyle::Plain => strip_comment(value).len() == value.len(),
            quoted => quote_end(&value[1..], quoted).is_none(),
        };
        open.then_some(FlowScalar {
            style,
            owner,
            new,
            blanks: 0,
        })
    }

    /// Output column for a node starting at input column `ind`.
    fn map_level(&mut self, ind: usize) -> usize {
        let mut popped = None;
        while let Some(top) = self.stack.last() {
            if top.orig <= ind {
                break;
            }
            popped = Some(top.new);
            self.stack.pop();
        }

        match self.stack.last().copied() {
            Some(top) if top.orig == ind => top.new,
            Some(top) => {
                // Never place a line past a sibling level it was shallower than.
                let mut new = top.new + self.config.indent;
                if let Some(limit) = popped {
                    new = new.min(limit);
                }
                self.stack.push(Level { orig: ind, new });
                new
            }
            None => {
                self.stack.push(Level { orig: ind, new: 0 });
                0
            }
        }
    }

    fn resolve_pending(&mut self) {
        for idx in std::mem::take(&mut self.pending) {
            let Out::Comment { ind, text } = &self.out[idx] else {
                continue;
            };
            let new = self
                .stack
                .iter()
                .rev()
                .find(|l| l.orig <= *ind)
                .map_or(0, |l| l.new);
            self.out[idx] = Out::Text(format!("{}{}", spaces(new), text));
        }
    }

    fn push_text(&mut self, text: String) {
        self.out.push(Out::Text(text));
    }

    fn finish(mut self) -> String {
        self.end_scalar();
        self.resolve_pending();
        let keep_tail = self.block.as_ref().is_some_and(|b| b.keep);

        let mut lines: Vec<String> = self
            .out
            .into_iter()
            .map(|out| match out {
                Out::Text(text) => text,
                Out::Comment { text, .. } => text,
            })
            .collect();
        if !keep_tail {
            while lines.last().is_some_and(|l| l.trim().is_empty()) {
                lines.pop();
            }
        }

        if lines.is_empty() {
            return String::new();
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}

fn is_document_marker(content: &str) -> bool {
    ["---", "..."].iter().any(|marker| {
        content == *marker
            || content
                .strip_prefix(marker)
                .is_some_and(|rest| rest.starts_with([' ', '\t']))
    })
}

/// Text after the dash of a block sequence entry.
fn seq_entry(s: &str) -> Option<&str> {
    match s.strip_prefix('-') {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => Some(rest),
        _ => None,
    }
}

/// `s` without a trailing `# comment`, ignoring `#` inside quotes.
fn strip_comment(s: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => {
                let at_token_start = prev.is_none_or(|p| p.is_whitespace() || "[{,".contains(p));
                if c == '#' && prev.is_none_or(char::is_whitespace) {
                    return s[..i].trim_end();
                }
                if (c == '"' || c == '\'') && at_token_start {
                    quote = Some(c);
                }
            }
        }
        prev = Some(c);
    }
    s
}

/// Value of a `key: value` line, empty when the value is on later lines.
/// `None` when `s` is not a mapping entry.
fn mapping_value(s: &str) -> Option<&str> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut prev: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '#' if prev.is_none_or(char::is_whitespace) => return None,
                '"' | '\'' if prev.is_none_or(|p| p.is_whitespace() || "[{,".contains(p)) => {
                    quote = Some(c)
                }
                '[' | '{' => depth += 1,
                ']' | '}' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => {
                    let after = &s[i + 1..];
                    if after.is_empty() || after.starts_with([' ', '\t']) {
                        return Some(after.trim_start());
                    }
                }
                _ => {}
            },
        }
        prev = Some(c);
    }
    None
}

/// `value` without leading `!tag` and `&anchor` properties.
fn strip_properties(mut value: &str) -> &str {
    while is_property(value) {
        value = match value.split_once(char::is_whitespace) {
            Some((_, rest)) => rest.trim_start(),
            None => "",
        };
    }
    value
}

/// Byte offset of the quote closing a scalar whose body starts at `s`.
fn quote_end(s: &str, style: ScalarStyle) -> Option<usize> {
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (style, c) {
            (ScalarStyle::Double, '\\') => {
                chars.next();
            }
            (ScalarStyle::Double, '"') => return Some(i),
            (ScalarStyle::Single, '\'') if chars.peek().is_some_and(|&(_, n)| n == '\'') => {
                chars.next();
            }
            (ScalarStyle::Single, '\'') => return Some(i),
            _ => {}
        }
    }
    None
}

fn block_header(rest: &str) -> Option<BlockHeader> {
    let s = strip_comment(rest).trim_end();
    let (mut prefix, token) = match s.rsplit_once(char::is_whitespace) {
        Some((head, token)) => (head.trim_end(), token),
        None => ("", s),
    };
    let (explicit, keep) = parse_indicator(token)?;

    loop {
        match prefix.rsplit_once(char::is_whitespace) {
            Some((head, last)) if is_property(last) => prefix = head.trim_end(),
            None if is_property(prefix) => prefix = "",
            _ => break,
        }
    }

    let kind = if prefix.is_empty() {
        HeaderKind::Bare
    } else if prefix.ends_with(':') {
        HeaderKind::Key
    } else {
        return None;
    };
    Some(BlockHeader {
        kind,
        explicit,
        keep,
    })
}

fn is_property(token: &str) -> bool {
    token.starts_with('!') || token.starts_with('&')
}

/// Parse `|`, `>-`, `|2+` and friends into (indentation indicator, keep).
fn parse_indicator(token: &str) -> Option<(Option<usize>, bool)> {
    let mut chars = token.chars();
    if !matches!(chars.next(), Some('|' | '>')) {
        return None;
    }
    let mut explicit = None;
    let mut chomp = None;
    for c in chars {
        match c {
            '1'..='9' if explicit.is_none() => explicit = c.to_digit(10).map(|d| d as usize),
            '+' | '-' if chomp.is_none() => chomp = Some(c),
            _ => return None,
        }
    }
    Some((explicit, chomp == Some('+')))
}
