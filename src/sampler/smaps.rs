use std::fs;
use std::io;

/// Added per `Pss:` line to offset the kernel truncating to whole kB.
const PSS_TRUNCATION_ADJUST_BYTES: u64 = 512;

/// Sums the `Pss:` lines of an smaps or smaps_rollup file, in bytes.
pub fn parse_pss(contents: &str) -> u64 {
    contents
        .lines()
        .filter_map(|line| line.strip_prefix("Pss:"))
        .filter_map(|rest| rest.split_whitespace().next()?.parse::<u64>().ok())
        .map(|kb| kb * 1024 + PSS_TRUNCATION_ADJUST_BYTES)
        .sum()
}

/// Proportional set size of `pid`, preferring `smaps_rollup` over the full `smaps`.
pub fn read_pss(pid: u32) -> io::Result<u64> {
    let rollup = format!("/proc/{pid}/smaps_rollup");
    let contents = match fs::read_to_string(&rollup) {
        Ok(contents) => contents,
        Err(_) => fs::read_to_string(format!("/proc/{pid}/smaps"))?,
    };
    Ok(parse_pss(&contents))
}
