//! File size reports

use serde::Serialize;
use std::fmt;

const KILOBYTE: u64 = 1024;

/// A file's byte length, reported in whole kilobytes
///
/// Kilobytes are rounded half to even: 512 bytes is `0 KB`, 1536 bytes is
/// `2 KB` and 2560 bytes is also `2 KB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SizeReport {
    bytes: u64,
}

impl SizeReport {
    pub fn from_bytes(bytes: u64) -> Self {
        SizeReport { bytes }
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Size in kilobytes, rounded half to even
    pub fn kilobytes(&self) -> u64 {
        let whole = self.bytes / KILOBYTE;
        let rem = self.bytes % KILOBYTE;
        match rem.cmp(&(KILOBYTE / 2)) {
            std::cmp::Ordering::Less => whole,
            std::cmp::Ordering::Greater => whole + 1,
            std::cmp::Ordering::Equal => whole + (whole & 1),
        }
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} KB", self.kilobytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(bytes: u64) -> String {
        SizeReport::from_bytes(bytes).to_string()
    }

    #[test]
    fn test_exact_kilobytes() {
        assert_eq!(kb(0), "0 KB");
        assert_eq!(kb(1024), "1 KB");
        assert_eq!(kb(10 * 1024), "10 KB");
    }

    #[test]
    fn test_half_rounds_to_even() {
        assert_eq!(kb(512), "0 KB");
        assert_eq!(kb(1536), "2 KB");
        assert_eq!(kb(2560), "2 KB");
        assert_eq!(kb(3584), "4 KB");
    }

    #[test]
    fn test_off_half_rounds_to_nearest() {
        assert_eq!(kb(511), "0 KB");
        assert_eq!(kb(513), "1 KB");
        assert_eq!(kb(2559), "2 KB");
        assert_eq!(kb(2561), "3 KB");
    }
}
