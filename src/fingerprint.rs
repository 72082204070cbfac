// src/fingerprint.rs
use sha2::{Digest, Sha256};

/// Stable identity of one announcement instance on one calendar day.
///
/// The UTC fetch date (`YYYY-MM-DD`) is folded into the digest so a recurring
/// notice that reappears on a later day counts as a new event, while repeats
/// seen within the same day collapse to one.
pub fn fingerprint(raw_text: &str, fetch_date: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    hasher.update(fetch_date.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_across_calls() {
        let a = fingerprint("School closed due to weather", "2025-01-15");
        let b = fingerprint("School closed due to weather", "2025-01-15");
        assert_eq!(a, b);
    }

    #[test]
    fn same_text_on_different_days_differs() {
        let mon = fingerprint("Buses cancelled", "2025-01-13");
        let tue = fingerprint("Buses cancelled", "2025-01-14");
        assert_ne!(mon, tue);
    }

    #[test]
    fn renders_full_sha256_as_lowercase_hex() {
        let fp = fingerprint("", "");
        // sha256 of empty input
        assert_eq!(
            fp,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_text_still_hashes_with_date() {
        assert_ne!(fingerprint("", "2025-01-13"), fingerprint("", "2025-01-14"));
    }
}
