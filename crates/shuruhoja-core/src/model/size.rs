/// Size formatting utilities — human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count into a human-readable string with one decimal place.
///
/// Uses binary units (KiB = 1024) but labels them with the short forms
/// users expect (KB, MB, GB, TB, PB, EB). Counts below 1 KB are printed
/// as whole bytes.
pub fn format_size(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0usize;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Format a byte count as gigabytes with two decimals, for summary lines.
pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / (UNIT * UNIT * UNIT) as f64)
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
