//! Size-argument parsing shared by the numeric CLI flags.

/// Parse a byte count with an optional binary suffix.
///
/// Recognised suffixes (case-sensitive):
///   `K` / `KB` / `KiB`  → × 1 024
///   `M` / `MB` / `MiB`  → × 1 048 576
///   `G` / `GB` / `GiB`  → × 1 073 741 824
///
/// Returns an error message suitable for clap's `value_parser` on an empty
/// string, trailing garbage, or overflow.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let digits_end = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits_end == 0 {
        return Err(format!("`{s}` is not a number"));
    }
    let (digits, suffix) = s.split_at(digits_end);
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("`{s}` is too large"))?;

    let shift = match suffix.as_bytes().first() {
        None => return Ok(value),
        Some(b'K') => 10,
        Some(b'M') => 20,
        Some(b'G') => 30,
        Some(_) => return Err(format!("`{s}` has an unknown size suffix")),
    };
    if !matches!(&suffix[1..], "" | "B" | "iB") {
        return Err(format!("`{s}` has an unknown size suffix"));
    }
    value
        .checked_mul(1u64 << shift)
        .ok_or_else(|| format!("`{s}` is too large"))
}

/// [`parse_size`] narrowed to `usize`, for in-memory buffer sizes.
pub fn parse_buffer_size(s: &str) -> Result<usize, String> {
    let v = parse_size(s)?;
    if v == 0 {
        return Err("size must be at least 1".to_string());
    }
    usize::try_from(v).map_err(|_| format!("`{s}` does not fit in memory"))
}
