const TRUNCATED_MARKER: &str = "\n[output truncated]";

/// Joins the captured streams into the single diagnostic the build system
/// shows for a failed action, keeping at most `max_bytes` of each stream.
pub(crate) fn combine_output(stdout: &[u8], stderr: &[u8], max_bytes: usize) -> String {
    let mut combined = String::new();
    append_output(&mut combined, stdout, max_bytes);
    append_output(&mut combined, stderr, max_bytes);
    combined
}

fn append_output(target: &mut String, bytes: &[u8], max_bytes: usize) {
    if bytes.is_empty() {
        return;
    }
    if !target.is_empty() && !target.ends_with('\n') {
        target.push('\n');
    }
    let truncated = bytes.len() > max_bytes;
    let kept = if truncated { &bytes[..max_bytes] } else { bytes };
    target.push_str(&String::from_utf8_lossy(kept));
    if truncated {
        target.push_str(TRUNCATED_MARKER);
    }
}
