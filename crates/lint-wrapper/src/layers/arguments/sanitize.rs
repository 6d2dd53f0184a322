use protocol::flags::LONG_FLAG_PREFIX;

/// Removes every `excluded` flag from `args`, together with the token that
/// follows it unless that token looks like another flag.
///
/// A value that itself starts with `--` is therefore never consumed; such a
/// value is left in place and forwarded to the tool.
pub(crate) fn sanitize(args: &[String], excluded: &[&str]) -> Vec<String> {
    let mut sanitized = Vec::with_capacity(args.len());
    let mut index = 0;
    while index < args.len() {
        let arg = &args[index];
        if !excluded.contains(&arg.as_str()) {
            sanitized.push(arg.clone());
        } else if args
            .get(index + 1)
            .is_some_and(|next| !next.starts_with(LONG_FLAG_PREFIX))
        {
            index += 1;
        }
        index += 1;
    }
    sanitized
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Value following the first occurrence of `flag`, using the same lookahead
/// rule as [`sanitize`].
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let index = args.iter().position(|arg| arg == flag)?;
    args.get(index + 1)
        .map(String::as_str)
        .filter(|value| !value.starts_with(LONG_FLAG_PREFIX))
}
