use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `-c1`: report tree statistics
    Statistics,

    /// `-c2`: write the compressed stream
    Compress,

    /// `-d`: restore a picture from a compressed stream
    Decompress,
}

pub fn mode(s: &str) -> Result<Mode, String> {
    Ok(match s {
        "-c1" => Mode::Statistics,
        "-c2" => Mode::Compress,
        "-d" => Mode::Decompress,
        _ => return Err(format!("Invalid mode {s} (expected -c1, -c2 or -d)")),
    })
}

/// Parse a threshold. Any non-negative real number is accepted, and the
/// fractional part is dropped.
pub fn threshold(s: &str) -> Result<u64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Threshold {s:?} is not a number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("Threshold {s:?} must be a non-negative number"));
    }

    // Saturates for values beyond u64::MAX
    Ok(value.trunc() as u64)
}

/// Write the `-c1` report: tree height, leaf count and largest merged block,
/// one per line.
pub fn write_statistics<W: Write>(
    mut output: W,
    height: u32,
    leaves: u64,
    largest_merged: u32,
) -> std::io::Result<()> {
    writeln!(output, "{height}")?;
    writeln!(output, "{leaves}")?;
    writeln!(output, "{largest_merged}")?;

    Ok(())
}
