use rand::Rng;
use rand::seq::index;

/// Choose which generated bills to pay.
///
/// * `pay_all` returns every reference and ignores `pay_count`.
/// * A `pay_count` is clamped to the number of references and that many are
///   drawn without replacement.
/// * With neither, nothing is paid unless `pay_when_unspecified` is set, in
///   which case a random non-zero count is drawn first.
///
/// The result keeps the input order.
pub fn select_to_pay<R: Rng + ?Sized>(
    references: &[String],
    pay_count: Option<usize>,
    pay_all: bool,
    pay_when_unspecified: bool,
    rng: &mut R,
) -> Vec<String> {
    if pay_all {
        return references.to_vec();
    }
    if references.is_empty() {
        return Vec::new();
    }
    let count = match pay_count {
        Some(n) => n.min(references.len()),
        None if pay_when_unspecified => rng.gen_range(1..=references.len()),
        None => return Vec::new(),
    };
    sample_in_order(rng, references.len(), count)
        .into_iter()
        .map(|i| references[i].clone())
        .collect()
}

/// `amount` distinct indices below `length`, ascending.
pub(crate) fn sample_in_order<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    amount: usize,
) -> Vec<usize> {
    let mut picked = index::sample(rng, length, amount).into_vec();
    picked.sort_unstable();
    picked
}
