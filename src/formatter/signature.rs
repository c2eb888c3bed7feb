/// Parameter names declared on a one-line `def` header.
///
/// `self` and `cls` are skipped, as are the bare `*` and `/` markers.
/// Star prefixes, annotations and defaults are stripped. Class headers and
/// headers without a parameter list yield nothing.
pub fn signature_params(header: &str) -> Vec<String> {
    let header = header.trim();
    if !header.starts_with("def ") {
        return Vec::new();
    }
    let Some(open) = header.find('(') else {
        return Vec::new();
    };
    let Some(close) = header.rfind(')') else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }

    split_top_level(&header[open + 1..close])
        .into_iter()
        .filter_map(|arg| {
            let name = arg
                .split(['=', ':'])
                .next()
                .unwrap_or("")
                .trim()
                .trim_start_matches('*')
                .trim();
            match name {
                "" | "self" | "cls" | "/" => None,
                name => Some(name.to_string()),
            }
        })
        .collect()
}

/// Split on commas that are not nested inside brackets or string literals.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in args.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&args[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&args[start..]);
    parts
}
