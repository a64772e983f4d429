//! LaTeX math compiler
//!
//! Recursive-descent compiler from a LaTeX math string to a [`MathNode`]
//! tree. The grammar is ambiguous and context-sensitive (implicit grouping,
//! postfix script binding, stateful symbol tables), so the compiler works as
//! an ordered list of matchers evaluated top-to-bottom against the remaining
//! input, first match wins.
//!
//! The compiler is total: it never fails and never loops. Unsupported
//! control sequences are discarded and unrecognized characters skipped one at
//! a time, so every iteration strictly shrinks the remaining input. An input
//! that produces no nodes at all yields a single run holding the original
//! string verbatim, keeping the content visible to the reader.

use crate::core::node::{BarPosition, MathNode};
use crate::data::symbols;

/// Compile a LaTeX math string into an equation tree.
///
/// # Arguments
/// * `latex` - raw text between math delimiters, without the delimiters
///
/// # Returns
/// A non-empty node sequence. On total parse failure the sequence is a
/// single [`MathNode::Run`] wrapping `latex` unchanged.
pub fn compile(latex: &str) -> Vec<MathNode> {
    let mut nodes = Vec::new();
    let mut rest = latex.trim();

    while !rest.is_empty() {
        rest = step(rest, &mut nodes);
    }

    if nodes.is_empty() {
        nodes.push(MathNode::Run(latex.to_string()));
    }
    nodes
}

/// Consume one construct from the head of `rest`. Always consumes at least
/// one byte.
fn step<'a>(rest: &'a str, nodes: &mut Vec<MathNode>) -> &'a str {
    if let Some(after) = rest.strip_prefix('\\') {
        return command(rest, after, nodes);
    }
    if let Some(consumed) = sub_super_with_base(rest, nodes) {
        return &rest[consumed..];
    }
    if let Some(consumed) = standalone_script(rest, nodes) {
        return &rest[consumed..];
    }
    if let Some(consumed) = script_with_base(rest, nodes) {
        return &rest[consumed..];
    }
    if let Some(consumed) = plain_run(rest, nodes) {
        return &rest[consumed..];
    }
    // Unrecognized character: drop it and move on.
    let mut chars = rest.chars();
    chars.next();
    chars.as_str()
}

/// Dispatch a control sequence. `after` is `rest` without the leading
/// backslash.
fn command<'a>(rest: &'a str, after: &'a str, nodes: &mut Vec<MathNode>) -> &'a str {
    let word = command_word(after);

    if word.is_empty() {
        // Non-letter control sequence: spacing command or escaped character.
        if let Some(c) = after.chars().next() {
            let len = 1 + c.len_utf8();
            if let Some(glyph) = symbols::lookup(&rest[..len]) {
                if !glyph.is_empty() {
                    nodes.push(MathNode::run(glyph));
                }
                return &rest[len..];
            }
        }
        // Lone or unrecognized backslash.
        return &rest[1..];
    }

    let body = &after[word.len()..];
    let word_len = 1 + word.len();

    match word {
        "frac" | "dfrac" => {
            if let Some((num, den, len)) = two_brace_groups(body) {
                nodes.push(MathNode::Fraction {
                    numerator: compile(num),
                    denominator: compile(den),
                });
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        // No binomial primitive exists in the target model; a parenthesized
        // fraction is the visual approximation.
        "binom" => {
            if let Some((n, k, len)) = two_brace_groups(body) {
                nodes.push(MathNode::run("("));
                nodes.push(MathNode::Fraction {
                    numerator: compile(n),
                    denominator: compile(k),
                });
                nodes.push(MathNode::run(")"));
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        "sqrt" => {
            let (degree, deg_len) = match bracket_group(body) {
                Some((deg, len)) if !deg.is_empty() => (Some(deg), len),
                Some((_, len)) => (None, len),
                None => (None, 0),
            };
            let tail = &body[deg_len..];
            let trimmed = tail.trim_start();
            let ws = tail.len() - trimmed.len();
            if let Some((content, len)) = brace_group(trimmed) {
                nodes.push(MathNode::Radical {
                    content: compile(content),
                    degree: degree.map(compile),
                });
                return &rest[word_len + deg_len + ws + len..];
            }
            &rest[word_len..]
        }

        "int" | "sum" | "prod" => {
            let glyph = match word {
                "int" => "∫",
                "sum" => "∑",
                _ => "∏",
            };
            big_operator(rest, body, word_len, glyph, nodes)
        }

        "lim" => {
            if let Some(after_score) = body.strip_prefix('_') {
                if let Some((lower, len)) = brace_group(after_score) {
                    nodes.push(MathNode::SubScript {
                        base: vec![MathNode::run("lim")],
                        subscript: compile(lower),
                    });
                    return &rest[word_len + 1 + len..];
                }
            }
            nodes.push(MathNode::run("lim"));
            &rest[word_len..]
        }

        w if symbols::is_function_name(w) => {
            nodes.push(MathNode::run(w));
            &rest[word_len..]
        }

        "overline" | "bar" | "underline" | "hat" => {
            if let Some((inner, len)) = brace_group(body) {
                let position = if word == "underline" {
                    BarPosition::Bottom
                } else {
                    BarPosition::Top
                };
                nodes.push(MathNode::Bar {
                    position,
                    content: compile(inner),
                });
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        "tilde" | "dot" | "ddot" | "vec" => {
            if let Some((inner, len)) = brace_group(body) {
                let combining = match word {
                    "tilde" => '\u{0303}',
                    "dot" => '\u{0307}',
                    "ddot" => '\u{0308}',
                    _ => '\u{20D7}',
                };
                let mut text = String::new();
                for c in inner.chars() {
                    text.push(c);
                    text.push(combining);
                }
                nodes.push(MathNode::Run(text));
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        // The command word is dropped, the delimiter itself kept verbatim.
        "left" | "right" => {
            if let Some(c) = body.chars().next() {
                nodes.push(MathNode::run(c.to_string()));
                return &rest[word_len + c.len_utf8()..];
            }
            &rest[word_len..]
        }

        // Text-mode commands take their content verbatim, with no further
        // LaTeX expansion.
        "text" | "mathrm" | "mathit" => {
            if let Some((inner, len)) = simple_group(body) {
                nodes.push(MathNode::run(inner));
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        // Bold math commonly wraps further math tokens, so its content is
        // compiled; the bold attribute itself is not modeled.
        "mathbf" => {
            if let Some((inner, len)) = brace_group(body) {
                nodes.extend(compile(inner));
                return &rest[word_len + len..];
            }
            &rest[word_len..]
        }

        _ => {
            if let Some(glyph) = symbols::lookup(&rest[..word_len]) {
                if !glyph.is_empty() {
                    nodes.push(MathNode::run(glyph));
                }
                return &rest[word_len..];
            }
            // Unknown command: discard the word, keep going.
            &rest[word_len..]
        }
    }
}

/// Big operator with optional `_{lower}` and `^{upper}` limits.
fn big_operator<'a>(
    rest: &'a str,
    body: &'a str,
    word_len: usize,
    glyph: &str,
    nodes: &mut Vec<MathNode>,
) -> &'a str {
    let mut consumed = word_len;
    let mut tail = body;
    let mut lower = None;
    let mut upper = None;

    if let Some(after_score) = tail.strip_prefix('_') {
        if let Some((low, len)) = brace_group(after_score) {
            lower = Some(low);
            tail = &after_score[len..];
            consumed += 1 + len;
        }
    }
    let trimmed = tail.trim_start();
    consumed += tail.len() - trimmed.len();
    if let Some(after_hat) = trimmed.strip_prefix('^') {
        if let Some((up, len)) = brace_group(after_hat) {
            upper = Some(up);
            consumed += 1 + len;
        }
    }

    let base = vec![MathNode::run(glyph)];
    nodes.push(match (lower, upper) {
        (Some(low), Some(up)) => MathNode::SubSuperScript {
            base,
            subscript: compile(low),
            superscript: compile(up),
        },
        (Some(low), None) => MathNode::SubScript {
            base,
            subscript: compile(low),
        },
        (None, Some(up)) => MathNode::SuperScript {
            base,
            superscript: compile(up),
        },
        (None, None) => MathNode::Run(glyph.to_string()),
    });
    &rest[consumed..]
}

/// Combined `x_{a}^{b}` on a single-character base.
fn sub_super_with_base(rest: &str, nodes: &mut Vec<MathNode>) -> Option<usize> {
    let base = rest.chars().next()?;
    if !base.is_ascii_alphanumeric() {
        return None;
    }
    let after_score = rest[1..].strip_prefix('_')?;
    let (sub, sub_len) = brace_group(after_score)?;
    let mid = &after_score[sub_len..];
    let trimmed = mid.trim_start();
    let ws = mid.len() - trimmed.len();
    let after_hat = trimmed.strip_prefix('^')?;
    let (sup, sup_len) = brace_group(after_hat)?;

    nodes.push(MathNode::SubSuperScript {
        base: vec![MathNode::run(base.to_string())],
        subscript: compile(sub),
        superscript: compile(sup),
    });
    Some(2 + sub_len + ws + 1 + sup_len)
}

/// `^{...}`, `^c`, `_{...}` or `_c` with no explicit base: the previously
/// emitted node becomes the base. This is what binds `m^2` after `m` was
/// already emitted as a plain run, and `\right)^2` after the bracket run.
fn standalone_script(rest: &str, nodes: &mut Vec<MathNode>) -> Option<usize> {
    let (is_super, after) = if let Some(a) = rest.strip_prefix('^') {
        (true, a)
    } else if let Some(a) = rest.strip_prefix('_') {
        (false, a)
    } else {
        return None;
    };
    if nodes.is_empty() {
        return None;
    }

    let (script, consumed) = if let Some((inner, len)) = brace_group(after) {
        (compile(inner), 1 + len)
    } else {
        let c = after.chars().next()?;
        if !c.is_ascii_alphanumeric() {
            return None;
        }
        (vec![MathNode::run(c.to_string())], 2)
    };

    let base = nodes.pop()?;
    nodes.push(if is_super {
        MathNode::SuperScript {
            base: vec![base],
            superscript: script,
        }
    } else {
        MathNode::SubScript {
            base: vec![base],
            subscript: script,
        }
    });
    Some(consumed)
}

/// `x^{...}`, `x^c`, `x_{...}` or `x_c` with an explicit adjacent base
/// character. Superscripts also accept closing brackets as base.
fn script_with_base(rest: &str, nodes: &mut Vec<MathNode>) -> Option<usize> {
    let base = rest.chars().next()?;
    let after_base = rest.get(1..)?;

    if let Some(after) = after_base.strip_prefix('^') {
        if !(base.is_ascii_alphanumeric() || base == ')' || base == ']') {
            return None;
        }
        let (script, len) = script_argument(after)?;
        nodes.push(MathNode::SuperScript {
            base: vec![MathNode::run(base.to_string())],
            superscript: script,
        });
        Some(2 + len)
    } else if let Some(after) = after_base.strip_prefix('_') {
        if !base.is_ascii_alphanumeric() {
            return None;
        }
        let (script, len) = script_argument(after)?;
        nodes.push(MathNode::SubScript {
            base: vec![MathNode::run(base.to_string())],
            subscript: script,
        });
        Some(2 + len)
    } else {
        None
    }
}

/// Script argument: a balanced brace group or a single alphanumeric char.
fn script_argument(s: &str) -> Option<(Vec<MathNode>, usize)> {
    if let Some((inner, len)) = brace_group(s) {
        return Some((compile(inner), len));
    }
    let c = s.chars().next()?;
    if c.is_ascii_alphanumeric() {
        Some((vec![MathNode::run(c.to_string())], 1))
    } else {
        None
    }
}

/// Maximal run of literal characters, emitted one run per character.
///
/// The scan stops one character early when the next character is itself
/// followed by `^` or `_` and could serve as a script base, leaving it for
/// the script-binding rules.
fn plain_run(rest: &str, nodes: &mut Vec<MathNode>) -> Option<usize> {
    let mut consumed = 0;
    let mut iter = rest.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        let next = iter.peek().map(|&(_, n)| n);
        if matches!(next, Some('^') | Some('_'))
            && (c.is_ascii_alphanumeric() || c == ')' || c == ']')
        {
            break;
        }
        if !is_plain_char(c) {
            break;
        }
        consumed = i + c.len_utf8();
    }
    if consumed == 0 {
        return None;
    }
    for c in rest[..consumed].chars() {
        nodes.push(MathNode::run(c.to_string()));
    }
    Some(consumed)
}

fn is_plain_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '+' | '-'
                | '='
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
                | '<'
                | '>'
                | '|'
                | ','
                | '.'
                | ':'
                | ';'
                | '!'
                | '?'
                | '\''
                | '"'
                | '/'
        )
}

/// Maximal ASCII letter run at the head of `s` (the command word after `\`).
fn command_word(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    &s[..end]
}

/// Balanced `{...}` group at the head of `s`, counting nested braces.
/// Returns the inner content and the total length including both braces.
fn brace_group(s: &str) -> Option<(&str, usize)> {
    let mut chars = s.char_indices();
    if !matches!(chars.next(), Some((_, '{'))) {
        return None;
    }
    let mut depth = 1usize;
    for (i, c) in chars {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// `{...}` group closed at the first `}`, content taken verbatim. Rejects
/// nested opening braces, mirroring the text-mode argument grammar.
fn simple_group(s: &str) -> Option<(&str, usize)> {
    let body = s.strip_prefix('{')?;
    let end = body.find('}')?;
    let inner = &body[..end];
    if inner.contains('{') {
        return None;
    }
    Some((inner, end + 2))
}

/// `[...]` optional argument, closed at the first `]`.
fn bracket_group(s: &str) -> Option<(&str, usize)> {
    let body = s.strip_prefix('[')?;
    let end = body.find(']')?;
    Some((&body[..end], end + 2))
}

/// Two consecutive balanced brace groups, with optional whitespace before
/// each. Returns both inner contents and the total consumed length.
fn two_brace_groups(s: &str) -> Option<(&str, &str, usize)> {
    let first = s.trim_start();
    let ws1 = s.len() - first.len();
    let (a, a_len) = brace_group(first)?;
    let second = first[a_len..].trim_start();
    let ws2 = first[a_len..].len() - second.len();
    let (b, b_len) = brace_group(second)?;
    Some((a, b, ws1 + a_len + ws2 + b_len))
}
