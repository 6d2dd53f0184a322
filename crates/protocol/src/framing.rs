/// Upper bound for one JSON line on the worker channel.
///
/// Requests carry the full argument list of an action, including every input
/// path, so the bound is generous. Both directions use the same limit.
pub const MAX_LINE_LENGTH: usize = 64 * 1024 * 1024;
