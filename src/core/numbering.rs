use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Characters used in reference suffixes; excludes 0/O, 1/I/L.
pub const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Fixed prefix of every generated reference.
pub const REFERENCE_PREFIX: &str = "AP";

/// Vendor-id prefix removed when building invoice numbers.
pub const VENDOR_ID_PREFIX: &str = "VEND-";

const RUN_FRAGMENT_LEN: usize = 6;
const SLUG_LEN: usize = 10;
const SUFFIX_LEN: usize = 4;

/// Lowercase ASCII slug: alphanumeric runs joined by single hyphens.
///
/// Non-ASCII text is transliterated first, so "Müller & Co." becomes
/// "muller-co".
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Uppercase vendor slug used inside references, at most ten characters
/// with trailing hyphens stripped.
pub fn vendor_slug(name: &str) -> String {
    let slug: String = slugify(name).chars().take(SLUG_LEN).collect();
    slug.trim_end_matches('-').to_ascii_uppercase()
}

/// Derive a run id from the run date and seed, e.g. "2024-03-01-42".
pub fn run_id_for(date: NaiveDate, seed: u64) -> String {
    slugify(&format!("{}-{}", date.format("%Y-%m-%d"), seed))
        .chars()
        .take(24)
        .collect()
}

/// Builds batch-unique bill references.
///
/// Format: `AP-{run}-{VENDOR}-{seq:04}-{suffix}`, where `run` is the first
/// six characters of the run id and `suffix` is four characters drawn from
/// [`REFERENCE_ALPHABET`]. The running sequence keeps references unique
/// even when suffixes collide.
#[derive(Debug, Clone)]
pub struct ReferenceBuilder {
    run_fragment: String,
    seq: u64,
}

impl ReferenceBuilder {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_fragment: run_id.chars().take(RUN_FRAGMENT_LEN).collect(),
            seq: 0,
        }
    }

    /// Sequence number of the last issued reference.
    pub fn issued(&self) -> u64 {
        self.seq
    }

    /// Issue the next reference, drawing the suffix from `rng`.
    pub fn next_reference<R: Rng + ?Sized>(&mut self, vendor_name: &str, rng: &mut R) -> String {
        self.seq += 1;
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())]))
            .collect();
        format!(
            "{}-{}-{}-{:04}-{}",
            REFERENCE_PREFIX,
            self.run_fragment,
            vendor_slug(vendor_name),
            self.seq,
            suffix
        )
    }
}

/// Per-vendor invoice number sequences.
///
/// Numbers look like `{vendor}-{YYYYMM}-{seq:04}` with the `VEND-` prefix
/// stripped from the vendor id. Each vendor's counter starts at a random
/// value in 1000–9999 on first use and increments before every issue, so
/// the first number is at least 1001.
#[derive(Debug, Clone, Default)]
pub struct VendorInvoiceNumbers {
    last_issued: HashMap<String, u32>,
}

impl VendorInvoiceNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last counter value issued for `vendor_id`, if any.
    pub fn last(&self, vendor_id: &str) -> Option<u32> {
        self.last_issued.get(vendor_id).copied()
    }

    /// Issue the next number for `vendor_id` on `issue_date`.
    pub fn next_number<R: Rng + ?Sized>(
        &mut self,
        vendor_id: &str,
        issue_date: NaiveDate,
        rng: &mut R,
    ) -> String {
        let start = match self.last_issued.get(vendor_id) {
            Some(n) => *n,
            None => rng.gen_range(1000..=9999),
        };
        let seq = start + 1;
        self.last_issued.insert(vendor_id.to_string(), seq);
        let prefix = vendor_id.replace(VENDOR_ID_PREFIX, "");
        format!(
            "{}-{}{:02}-{:04}",
            prefix,
            issue_date.year(),
            issue_date.month(),
            seq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify("ACME & Sons Co."), "acme-sons-co");
        assert_eq!(slugify("  --Bob's  Pumps--"), "bob-s-pumps");
    }

    #[test]
    fn vendor_slug_trims_trailing_separator() {
        // "acme-sons-co" truncates to "acme-sons-"
        assert_eq!(vendor_slug("ACME & Sons Co."), "ACME-SONS");
        assert_eq!(vendor_slug("BuildRight Cement"), "BUILDRIGHT");
    }

    #[test]
    fn non_ascii_names_are_transliterated() {
        assert_eq!(slugify("Müller & Co."), "muller-co");
        assert_eq!(slugify("Café Säge GmbH"), "cafe-sage-gmbh");
        assert_eq!(vendor_slug("Müller Plumbing"), "MULLER-PLU");
    }

    #[test]
    fn run_id_from_date_and_seed() {
        assert_eq!(run_id_for(date(2024, 3, 1), 42), "2024-03-01-42");
        assert_eq!(
            run_id_for(date(2024, 3, 1), u64::MAX),
            "2024-03-01-1844674407370"
        );
    }

    #[test]
    fn references_are_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut refs = ReferenceBuilder::new("RUN123456");
        let a = refs.next_reference("ACME & Sons Co.", &mut rng);
        let b = refs.next_reference("ACME & Sons Co.", &mut rng);
        assert!(a.starts_with("AP-RUN123-ACME-SONS-0001-"));
        assert!(b.starts_with("AP-RUN123-ACME-SONS-0002-"));
        assert!(!a.contains("--"));
        assert_eq!(refs.issued(), 2);
    }

    #[test]
    fn reference_suffix_uses_unambiguous_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut refs = ReferenceBuilder::new("R");
        for _ in 0..50 {
            let r = refs.next_reference("V", &mut rng);
            let suffix = r.rsplit('-').next().unwrap();
            assert_eq!(suffix.len(), 4);
            assert!(suffix.bytes().all(|b| REFERENCE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn vendor_numbers_increment_per_vendor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut nums = VendorInvoiceNumbers::new();
        let first = nums.next_number("VEND-ACME", date(2024, 3, 5), &mut rng);
        let start = nums.last("VEND-ACME").unwrap();
        assert!((1001..=10000).contains(&start));
        assert_eq!(first, format!("ACME-202403-{start:04}"));

        let second = nums.next_number("VEND-ACME", date(2024, 4, 1), &mut rng);
        assert_eq!(second, format!("ACME-202404-{:04}", start + 1));

        nums.next_number("VEND-OTHER", date(2024, 4, 1), &mut rng);
        assert_eq!(nums.last("VEND-ACME"), Some(start + 1));
    }
}
