/// Directives applied when the configuration does not override them.
pub const DEFAULT_DIRECTIVES: [(&str, &str); 5] = [
    ("PermitRootLogin", "no"),
    ("PasswordAuthentication", "no"),
    ("PubkeyAuthentication", "yes"),
    ("KbdInteractiveAuthentication", "no"),
    ("AuthorizedKeysFile", ".ssh/authorized_keys"),
];

/// First token of a line once leading `#` markers are stripped.
fn directive_name(line: &str) -> Option<&str> {
    line.trim()
        .trim_start_matches('#')
        .split_whitespace()
        .next()
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// `Match` blocks run to the end of the file, so global directives must
/// stay above the first one.
fn is_match_block(line: &str) -> bool {
    !is_comment(line)
        && directive_name(line).is_some_and(|name| name.eq_ignore_ascii_case("Match"))
}

/// Set `option` to `value` in sshd_config `content`.
///
/// - The first line (commented or not) whose first token matches `option`
///   case-insensitively is replaced by `option value`
/// - Later uncommented lines for the same option are commented out, since
///   sshd honours the first occurrence
/// - Without any match, `option value` is inserted before the first
///   `Match` block, or appended at the end
///
/// Applying the same directive twice yields the same text.
pub fn upsert(content: &str, option: &str, value: &str) -> String {
    let wanted = format!("{option} {value}");
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let global_end = lines
        .iter()
        .position(|l| is_match_block(l))
        .unwrap_or(lines.len());

    let mut replaced = false;
    for line in lines.iter_mut().take(global_end) {
        let matches = directive_name(line).is_some_and(|name| name.eq_ignore_ascii_case(option));
        if !matches {
            continue;
        }
        if !replaced {
            *line = wanted.clone();
            replaced = true;
        } else if !is_comment(line) {
            *line = format!("#{line}");
        }
    }

    if !replaced {
        lines.insert(global_end, wanted);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Apply every directive in order.
pub fn apply_all(content: &str, directives: &[(String, String)]) -> String {
    directives
        .iter()
        .fold(content.to_string(), |acc, (option, value)| {
            upsert(&acc, option, value)
        })
}
