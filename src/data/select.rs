use crate::error::SelectError;

use super::model::{MetadataRecord, Sample, SampleId};

/// Number of OTUs shown in the bar chart unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Checked lookup
// ---------------------------------------------------------------------------

/// Result of looking a subject up by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn ok_or_not_found(self, id: &SampleId) -> Result<T, SelectError> {
        match self {
            Lookup::Found(item) => Ok(item),
            Lookup::NotFound => Err(SelectError::NotFound(id.clone())),
        }
    }
}

/// Anything keyed by a subject id.
pub trait Keyed {
    fn key(&self) -> &SampleId;
}

impl Keyed for Sample {
    fn key(&self) -> &SampleId {
        &self.id
    }
}

impl Keyed for MetadataRecord {
    fn key(&self) -> &SampleId {
        &self.id
    }
}

/// First item whose id equals `id` after coercion.
pub fn lookup<'a, T: Keyed>(items: &'a [T], id: &SampleId) -> Lookup<&'a T> {
    match items.iter().find(|item| item.key() == id) {
        Some(item) => Lookup::Found(item),
        None => Lookup::NotFound,
    }
}

// ---------------------------------------------------------------------------
// Top-N extraction
// ---------------------------------------------------------------------------

/// The top OTUs of a subject, ordered smallest to largest so a horizontal
/// bar chart draws the largest bar on top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopUnits {
    pub ids: Vec<i64>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl TopUnits {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// First `n` readings of `sample`, each sequence reversed.
///
/// The readings must already be sorted by value, largest first; nothing is
/// re-sorted here (see [`is_descending`]).
pub fn top_units(sample: &Sample, n: usize) -> TopUnits {
    fn head_reversed<T: Clone>(items: &[T], n: usize) -> Vec<T> {
        items.iter().take(n).rev().cloned().collect()
    }

    TopUnits {
        ids: head_reversed(&sample.otu_ids, n),
        labels: head_reversed(&sample.otu_labels, n),
        values: head_reversed(&sample.sample_values, n),
    }
}

/// Look up the sample for `id`.
pub fn select_sample<'a>(
    samples: &'a [Sample],
    id: &SampleId,
) -> Result<&'a Sample, SelectError> {
    lookup(samples, id).ok_or_not_found(id)
}

/// Look up `id` in `samples` and extract its top `n` readings.
pub fn select_top_units(
    samples: &[Sample],
    id: &SampleId,
    n: usize,
) -> Result<TopUnits, SelectError> {
    select_sample(samples, id).map(|sample| top_units(sample, n))
}

/// Look up the metadata record for `id`.
pub fn select_metadata<'a>(
    metadata: &'a [MetadataRecord],
    id: &SampleId,
) -> Result<&'a MetadataRecord, SelectError> {
    lookup(metadata, id).ok_or_not_found(id)
}

/// Whether `values` never increases. NaN breaks the ordering.
pub fn is_descending(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] >= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetadataValue;
    use proptest::prelude::*;

    fn sample(id: i64, n: usize) -> Sample {
        Sample {
            id: SampleId::from(id),
            otu_ids: (0..n as i64).map(|i| 1000 + i).collect(),
            otu_labels: (0..n).map(|i| format!("Bacteria;{i}")).collect(),
            sample_values: (0..n).map(|i| (n - i) as f64 * 3.0).collect(),
        }
    }

    #[test]
    fn test_top_units_end_to_end() {
        let samples = vec![Sample {
            id: SampleId::from(1),
            otu_ids: vec![1, 2, 3],
            otu_labels: vec!["a".into(), "b".into(), "c".into()],
            sample_values: vec![30.0, 20.0, 10.0],
        }];
        let top = select_top_units(&samples, &SampleId::from(1), DEFAULT_TOP_N).unwrap();
        assert_eq!(top.ids, vec![3, 2, 1]);
        assert_eq!(top.labels, vec!["c", "b", "a"]);
        assert_eq!(top.values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_top_units_truncates_to_ten() {
        let samples = vec![sample(940, 25)];
        let top = select_top_units(&samples, &SampleId::from("940"), DEFAULT_TOP_N).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top.ids.first(), Some(&1009));
        assert_eq!(top.ids.last(), Some(&1000));
        assert_eq!(top.labels.len(), 10);
        assert_eq!(top.values.len(), 10);
    }

    #[test]
    fn test_top_units_short_sample_is_not_padded() {
        let top = top_units(&sample(7, 3), DEFAULT_TOP_N);
        assert_eq!(top.ids, vec![1002, 1001, 1000]);
        assert_eq!(top.values, vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_top_units_empty_sample() {
        assert!(top_units(&sample(7, 0), DEFAULT_TOP_N).is_empty());
    }

    #[test]
    fn test_select_top_units_not_found() {
        let samples = vec![sample(940, 5)];
        let err = select_top_units(&samples, &SampleId::from(941), DEFAULT_TOP_N).unwrap_err();
        assert_eq!(err, SelectError::NotFound(SampleId::from(941)));
    }

    #[test]
    fn test_select_metadata_coerces_ids() {
        let metadata = vec![
            MetadataRecord {
                id: SampleId::from(4),
                fields: vec![("id".into(), MetadataValue::Integer(4))],
            },
            MetadataRecord {
                id: SampleId::from(5),
                fields: vec![("id".into(), MetadataValue::Integer(5))],
            },
        ];
        let by_text = select_metadata(&metadata, &SampleId::from("5")).unwrap();
        let by_number = select_metadata(&metadata, &SampleId::from(5)).unwrap();
        assert_eq!(by_text, by_number);
        assert_eq!(by_text.lines(), vec!["id: 5"]);
        assert!(select_metadata(&metadata, &SampleId::from("6")).is_err());
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let mut second = sample(3, 1);
        second.otu_ids = vec![42];
        let samples = vec![sample(3, 2), second];
        match lookup(&samples, &SampleId::from(3)) {
            Lookup::Found(found) => assert_eq!(found.len(), 2),
            Lookup::NotFound => panic!("expected a match"),
        }
        assert_eq!(lookup(&samples, &SampleId::from(4)), Lookup::NotFound);
    }

    #[test]
    fn test_is_descending() {
        assert!(is_descending(&[3.0, 3.0, 1.0]));
        assert!(is_descending(&[]));
        assert!(!is_descending(&[1.0, 2.0]));
    }

    proptest! {
        #[test]
        fn prop_top_units_reverse_the_head(
            values in prop::collection::vec(0.0f64..500.0, 0..40),
            n in 1usize..15,
        ) {
            let len = values.len();
            let s = Sample {
                id: SampleId::from(1),
                otu_ids: (0..len as i64).collect(),
                otu_labels: (0..len).map(|i| i.to_string()).collect(),
                sample_values: values.clone(),
            };
            let top = top_units(&s, n);
            let expected: Vec<f64> = values.iter().take(n).rev().cloned().collect();
            prop_assert_eq!(top.len(), len.min(n));
            prop_assert_eq!(&top.values, &expected);
            // Index alignment survives the reversal.
            for (i, id) in top.ids.iter().enumerate() {
                prop_assert_eq!(top.labels[i].clone(), id.to_string());
                prop_assert_eq!(top.values[i], values[*id as usize]);
            }
        }

        #[test]
        fn prop_descending_input_gives_ascending_top(
            mut values in prop::collection::vec(0.0f64..500.0, 1..40),
        ) {
            values.sort_by(|a, b| b.total_cmp(a));
            let len = values.len();
            let s = Sample {
                id: SampleId::from(1),
                otu_ids: (0..len as i64).collect(),
                otu_labels: vec![String::new(); len],
                sample_values: values,
            };
            let top = top_units(&s, DEFAULT_TOP_N);
            prop_assert!(top.values.windows(2).all(|p| p[0] <= p[1]));
        }
    }
}
