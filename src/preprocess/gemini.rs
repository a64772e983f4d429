//! Gemini source normalization
//!
//! Gemini's table output breaks GFM parsing in two observed ways: blank
//! lines inserted between table rows, and two tables concatenated without a
//! separating blank line. Both repairs are best-effort pattern fixes tuned
//! against observed output, and both are no-ops on well-formed input.
//!
//! An opt-in pass additionally converts runs of CSV/TSV-looking lines into
//! pipe tables, for answers that paste tabular data without any pipes.

/// Full Gemini pipeline.
pub fn preprocess_gemini(markdown: &str, csv_tables: bool) -> String {
    let processed = repair_tables(markdown);
    let processed = split_concatenated_tables(&processed);
    if csv_tables {
        csv_to_tables(&processed)
    } else {
        processed
    }
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// A `|---|:--:|` delimiter row.
fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return false;
    }
    let mut has_dash = false;
    for c in trimmed.chars() {
        match c {
            '-' => has_dash = true,
            '|' | ':' | ' ' => {}
            _ => return false,
        }
    }
    has_dash
}

/// Remove blank lines Gemini inserts between the rows of one table.
pub fn repair_tables(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut pending_blanks = 0usize;
    let mut last_was_row = false;

    for line in markdown.split('\n') {
        if line.trim().is_empty() {
            if last_was_row {
                pending_blanks += 1;
            } else {
                out.push(line);
            }
            continue;
        }

        if is_table_row(line) && last_was_row {
            // Swallow the blank lines that split the table.
            pending_blanks = 0;
        } else {
            for _ in 0..pending_blanks {
                out.push("");
            }
            pending_blanks = 0;
        }
        last_was_row = is_table_row(line);
        out.push(line);
    }
    for _ in 0..pending_blanks {
        out.push("");
    }

    out.join("\n")
}

/// Split two tables that Gemini emitted back to back. A second separator
/// row inside one uninterrupted run of pipe rows means a new table started
/// at the preceding header line; a blank line is inserted before it.
pub fn split_concatenated_tables(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut separators_in_run = 0usize;

    for line in markdown.split('\n') {
        if is_table_row(line) {
            if is_separator_row(line) {
                separators_in_run += 1;
                if separators_in_run > 1 {
                    // The previous line is the next table's header row.
                    if let Some(header) = out.pop() {
                        if is_table_row(&header) {
                            out.push(String::new());
                        }
                        out.push(header);
                    }
                    separators_in_run = 1;
                }
            }
        } else {
            separators_in_run = 0;
        }
        out.push(line.to_string());
    }

    out.join("\n")
}

/// Convert runs of delimiter-separated lines into pipe tables. Requires at
/// least two consecutive lines with the same delimiter and the same field
/// count; tabs win over commas. Existing pipe rows, headings and blank
/// lines never match, so the pass is idempotent.
pub fn csv_to_tables(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if let Some(delimiter) = csv_delimiter(line) {
            let fields = field_count(line, delimiter);
            let mut j = i + 1;
            while j < lines.len()
                && csv_delimiter(lines[j]) == Some(delimiter)
                && field_count(lines[j], delimiter) == fields
            {
                j += 1;
            }
            if j - i >= 2 && fields >= 2 {
                for (k, row) in lines[i..j].iter().enumerate() {
                    out.push(pipe_row(row, delimiter));
                    if k == 0 {
                        out.push(separator_row(fields));
                    }
                }
                i = j;
                continue;
            }
        }
        out.push(line.to_string());
        i += 1;
    }

    out.join("\n")
}

fn csv_delimiter(line: &str) -> Option<char> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('|') || trimmed.starts_with('#') {
        return None;
    }
    if line.contains('\t') {
        Some('\t')
    } else if line.contains(',') {
        Some(',')
    } else {
        None
    }
}

fn field_count(line: &str, delimiter: char) -> usize {
    line.split(delimiter).count()
}

fn pipe_row(line: &str, delimiter: char) -> String {
    let cells: Vec<&str> = line.split(delimiter).map(str::trim).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator_row(fields: usize) -> String {
    format!("|{}", " --- |".repeat(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_between_rows_removed() {
        let input = "| a | b |\n\n|---|---|\n\n| 1 | 2 |\n";
        let output = preprocess_gemini(input, false);
        assert_eq!(output, "| a | b |\n|---|---|\n| 1 | 2 |\n");
    }

    #[test]
    fn test_blank_lines_around_table_kept() {
        let input = "text\n\n| a |\n|---|\n| 1 |\n\nmore\n";
        assert_eq!(preprocess_gemini(input, false), input);
    }

    #[test]
    fn test_concatenated_tables_split() {
        let input = "| a | b |\n|---|---|\n| 1 | 2 |\n| x | y |\n|---|---|\n| 3 | 4 |\n";
        let output = preprocess_gemini(input, false);
        assert_eq!(
            output,
            "| a | b |\n|---|---|\n| 1 | 2 |\n\n| x | y |\n|---|---|\n| 3 | 4 |\n"
        );
    }

    #[test]
    fn test_csv_conversion_opt_in() {
        let input = "name, age\nana, 30\nluis, 28\n";
        let without = preprocess_gemini(input, false);
        assert_eq!(without, input);

        let with = preprocess_gemini(input, true);
        assert!(with.contains("| name | age |"));
        assert!(with.contains("| --- | --- |"));
        assert!(with.contains("| ana | 30 |"));
    }

    #[test]
    fn test_csv_single_line_not_converted() {
        let input = "Hello, world\n\nplain text\n";
        assert_eq!(preprocess_gemini(input, true), input);
    }

    #[test]
    fn test_tsv_preferred_over_comma() {
        let input = "a\tb, c\n1\t2, 3\n";
        let output = preprocess_gemini(input, true);
        assert!(output.contains("| a | b, c |"));
    }

    #[test]
    fn test_idempotent() {
        let input = "| a | b |\n\n|---|---|\n| 1 | 2 |\n| x | y |\n|---|---|\n| 3 | 4 |\n\nname, age\nana, 30\n";
        let once = preprocess_gemini(input, true);
        let twice = preprocess_gemini(&once, true);
        assert_eq!(once, twice);
    }
}
