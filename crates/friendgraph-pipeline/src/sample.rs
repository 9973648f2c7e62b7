//! Class balancing by stratified subsampling
//!
//! Social-graph labels are heavily skewed (most users never write a tip, for
//! example). [`stratified_boolean_sample`] keeps the minority class whole and
//! draws an equally sized random subset of the majority class.
//!
//! # Randomness
//!
//! The random source is always passed in. Seed it (e.g. with
//! `rand_pcg::Pcg64::seed_from_u64`) to make a run reproducible.

use rand::{Rng, seq::index};

use crate::{PipelineError, record::UserRecord};

/// Returns a maximal sample of `records` in which labels 0 and 1 are equally common.
///
/// Let `p` and `n` be the number of positive and negative records. The result
/// holds `2 * min(p, n)` records:
///
/// - if `p < n`: every positive record, then `p` negatives drawn uniformly
///   without replacement
/// - otherwise: `n` positives drawn uniformly without replacement, then every
///   negative record
///
/// The result is empty when either class is empty. Records are moved into the
/// result unmodified; unselected records are dropped.
///
/// Every label is checked before anything is drawn, so an invalid label
/// fails the whole call.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::{record::{LABEL_KEY, UserRecord}, sample};
/// use rand::SeedableRng as _;
///
/// let records = vec![
///     UserRecord::from_iter([("a", 1.0), ("label", 1.0)]),
///     UserRecord::from_iter([("a", 0.0), ("label", 0.0)]),
///     UserRecord::from_iter([("a", 1.0), ("label", 0.0)]),
/// ];
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let balanced = sample::stratified_boolean_sample(records, LABEL_KEY, &mut rng).unwrap();
/// assert_eq!(balanced.len(), 2);
/// ```
pub fn stratified_boolean_sample<R>(
    records: Vec<UserRecord>,
    label_key: &str,
    rng: &mut R,
) -> Result<Vec<UserRecord>, PipelineError>
where
    R: Rng + ?Sized,
{
    let labels = records
        .iter()
        .enumerate()
        .map(|(index, record)| record.label(label_key, index))
        .collect::<Result<Vec<_>, _>>()?;

    let (positives, negatives): (Vec<_>, Vec<_>) = records
        .into_iter()
        .zip(labels)
        .partition(|(_, label)| *label == 1);
    let positives = positives.into_iter().map(|(record, _)| record).collect::<Vec<_>>();
    let negatives = negatives.into_iter().map(|(record, _)| record).collect::<Vec<_>>();

    log::debug!(
        "stratified sample: {} positive, {} negative",
        positives.len(),
        negatives.len()
    );

    let sample = if positives.len() < negatives.len() {
        let amount = positives.len();
        let mut sample = positives;
        sample.extend(choose_without_replacement(negatives, amount, rng));
        sample
    } else {
        let amount = negatives.len();
        let mut sample = choose_without_replacement(positives, amount, rng);
        sample.extend(negatives);
        sample
    };
    Ok(sample)
}

/// Moves `amount` uniformly chosen elements out of `items`.
fn choose_without_replacement<T, R>(items: Vec<T>, amount: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let indices = index::sample(rng, items.len(), amount).into_vec();
    let mut slots = items.into_iter().map(Some).collect::<Vec<_>>();
    indices
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::record::{AttributeValue, LABEL_KEY};

    fn labeled(id: u32, label: f64) -> UserRecord {
        UserRecord::from_iter([("id", f64::from(id)), (LABEL_KEY, label)])
    }

    fn count_label(records: &[UserRecord], label: f64) -> usize {
        records
            .iter()
            .filter(|r| r.get(LABEL_KEY) == Some(&AttributeValue::Number(label)))
            .count()
    }

    #[test]
    fn test_single_positive_scenario() {
        let records = vec![
            UserRecord::from_iter([("a", 1.0), (LABEL_KEY, 1.0)]),
            UserRecord::from_iter([("a", 0.0), (LABEL_KEY, 0.0)]),
            UserRecord::from_iter([("a", 1.0), (LABEL_KEY, 0.0)]),
            UserRecord::from_iter([("a", 0.0), (LABEL_KEY, 0.0)]),
        ];
        for seed in 0..20 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let sample = stratified_boolean_sample(records.clone(), LABEL_KEY, &mut rng).unwrap();
            assert_eq!(sample.len(), 2);
            assert_eq!(sample[0], records[0]);
            assert!(records[1..].contains(&sample[1]));
        }
    }

    #[test]
    fn test_balance_and_subset() {
        let records = (0..50)
            .map(|i| labeled(i, if i % 7 == 0 { 1.0 } else { 0.0 }))
            .collect::<Vec<_>>();
        let positives = count_label(&records, 1.0);
        let mut rng = Pcg64::seed_from_u64(42);
        let sample = stratified_boolean_sample(records.clone(), LABEL_KEY, &mut rng).unwrap();

        assert_eq!(count_label(&sample, 1.0), positives);
        assert_eq!(count_label(&sample, 0.0), positives);

        let mut ids = sample
            .iter()
            .map(|r| r.get("id").and_then(AttributeValue::as_f64).unwrap().to_bits())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), sample.len());
        assert!(sample.iter().all(|r| records.contains(r)));
    }

    #[test]
    fn test_majority_positive() {
        let records = (0..9)
            .map(|i| labeled(i, if i < 6 { 1.0 } else { 0.0 }))
            .collect::<Vec<_>>();
        let mut rng = Pcg64::seed_from_u64(1);
        let sample = stratified_boolean_sample(records.clone(), LABEL_KEY, &mut rng).unwrap();
        assert_eq!(sample.len(), 6);
        // all negatives come last, in input order
        assert_eq!(&sample[3..], &records[6..]);
    }

    #[test]
    fn test_same_seed_same_sample() {
        let records = (0..30)
            .map(|i| labeled(i, if i % 4 == 0 { 1.0 } else { 0.0 }))
            .collect::<Vec<_>>();
        let a = stratified_boolean_sample(records.clone(), LABEL_KEY, &mut Pcg64::seed_from_u64(9))
            .unwrap();
        let b = stratified_boolean_sample(records, LABEL_KEY, &mut Pcg64::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_class() {
        let records = (0..5).map(|i| labeled(i, 0.0)).collect::<Vec<_>>();
        let mut rng = Pcg64::seed_from_u64(0);
        assert!(
            stratified_boolean_sample(records, LABEL_KEY, &mut rng)
                .unwrap()
                .is_empty()
        );
        assert!(
            stratified_boolean_sample(vec![], LABEL_KEY, &mut rng)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_invalid_label() {
        let records = vec![labeled(0, 1.0), labeled(1, 2.0)];
        let mut rng = Pcg64::seed_from_u64(0);
        assert_eq!(
            stratified_boolean_sample(records, LABEL_KEY, &mut rng).unwrap_err(),
            PipelineError::InvalidLabel {
                record: 1,
                value: "2".into()
            }
        );
    }

    #[test]
    fn test_missing_label() {
        let records = vec![labeled(0, 1.0), UserRecord::from_iter([("id", 1.0)])];
        let mut rng = Pcg64::seed_from_u64(0);
        assert!(matches!(
            stratified_boolean_sample(records, LABEL_KEY, &mut rng),
            Err(PipelineError::MissingAttribute { record: 1, .. })
        ));
    }
}
