//! List normalization
//!
//! Copied assistant output frequently breaks numbered lists: nested content
//! (sub-bullets, equations) splits the list, and the numbering restarts at 1
//! even though the author meant to continue. Markdown parsers then see two
//! lists. This pass tracks the expected sequence per indentation level and
//! renumbers items that incorrectly restart, while preserving intentional
//! new lists. Markers are normalized to `-` so mixed `*`/`+` bullets parse
//! as one list.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORDERED_ITEM: Regex = Regex::new(r"^(\s*)(\d+)([.)]\s)(.*)$").unwrap();
    static ref UNORDERED_ITEM: Regex = Regex::new(r"^(\s*)([-*+])\s(.*)$").unwrap();
    static ref INDENTED: Regex = Regex::new(r"^\s+").unwrap();
}

struct ListLine<'a> {
    ordered: bool,
    indent: usize,
    number: u64,
    content: &'a str,
}

fn parse_list_line(line: &str) -> Option<ListLine<'_>> {
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        return Some(ListLine {
            ordered: true,
            indent: caps.get(1).map(|m| m.as_str().len()).unwrap_or(0),
            number: caps[2].parse().unwrap_or(0),
            content: caps.get(4).map(|m| m.as_str()).unwrap_or(""),
        });
    }
    if let Some(caps) = UNORDERED_ITEM.captures(line) {
        return Some(ListLine {
            ordered: false,
            indent: caps.get(1).map(|m| m.as_str().len()).unwrap_or(0),
            number: 0,
            content: caps.get(3).map(|m| m.as_str()).unwrap_or(""),
        });
    }
    None
}

/// Sequence tracking for one indentation level.
struct LevelState {
    current_number: u64,
    last_index: usize,
}

/// Fix ordered-list numbering that restarts after nested content.
pub fn renumber_lists(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());

    let mut levels: HashMap<usize, LevelState> = HashMap::new();
    let mut consecutive_non_list = 0usize;
    let mut in_nested_content = false;

    for (i, line) in lines.iter().enumerate() {
        let parsed = match parse_list_line(line) {
            Some(p) => p,
            None => {
                if line.trim().is_empty() {
                    consecutive_non_list += 1;
                } else if INDENTED.is_match(line) {
                    // Indented non-list content: continuation of an item.
                    in_nested_content = true;
                    consecutive_non_list = 0;
                } else {
                    // Unindented prose ends the list context, but a heading
                    // mid-list does not reset tracking.
                    if !line.trim_start().starts_with('#')
                        && (consecutive_non_list > 1 || !in_nested_content)
                    {
                        levels.clear();
                    }
                    consecutive_non_list += 1;
                    in_nested_content = false;
                }
                result.push((*line).to_string());
                continue;
            }
        };

        consecutive_non_list = 0;

        if !parsed.ordered {
            // Bullets do not advance numbering but mark nested context.
            if parsed.indent > 0 {
                in_nested_content = true;
            }
            result.push((*line).to_string());
            continue;
        }

        let number = parsed.number;
        let state = match levels.entry(parsed.indent) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(LevelState {
                    current_number: number,
                    last_index: i,
                });
                in_nested_content = false;
                result.push((*line).to_string());
                continue;
            }
        };

        let expected = state.current_number + 1;

        if number == expected {
            state.current_number = number;
            state.last_index = i;
            in_nested_content = false;
            result.push((*line).to_string());
        } else if number == 1 && state.current_number > 1 && in_nested_content {
            // The restart-after-nested-content bug: continue the sequence.
            result.push(renumbered_line(parsed.indent, expected, parsed.content));
            state.current_number = expected;
            state.last_index = i;
            in_nested_content = false;
        } else if number > expected && number <= expected + 5 {
            // Small gap, probably intentional.
            state.current_number = number;
            state.last_index = i;
            in_nested_content = false;
            result.push((*line).to_string());
        } else if number == 1 && number < expected {
            if in_nested_content || i - state.last_index <= 5 {
                // Close to the previous item: still the restart bug.
                result.push(renumbered_line(parsed.indent, expected, parsed.content));
                state.current_number = expected;
            } else {
                // Far away: intentional new list.
                state.current_number = 1;
                result.push((*line).to_string());
            }
            state.last_index = i;
            in_nested_content = false;
        } else {
            // Anything else: accept the number and resynchronize.
            state.current_number = number;
            state.last_index = i;
            in_nested_content = false;
            result.push((*line).to_string());
        }
    }

    result.join("\n")
}

fn renumbered_line(indent: usize, number: u64, content: &str) -> String {
    format!("{}{}. {}", " ".repeat(indent), number, content)
}

/// Normalize `*` and `+` bullet markers to `-` for consistent parsing.
pub fn normalize_markers(markdown: &str) -> String {
    let lines: Vec<String> = markdown
        .split('\n')
        .map(|line| {
            if let Some(caps) = UNORDERED_ITEM.captures(line) {
                if &caps[2] != "-" {
                    return format!("{}- {}", &caps[1], &caps[3]);
                }
            }
            line.to_string()
        })
        .collect();
    lines.join("\n")
}

/// Complete list preprocessing pipeline: marker normalization, then
/// renumbering.
pub fn preprocess_lists(markdown: &str) -> String {
    renumber_lists(&normalize_markers(markdown))
}
