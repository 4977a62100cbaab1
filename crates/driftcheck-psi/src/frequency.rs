use std::collections::{BTreeMap, BTreeSet};

/// Reference and current relative frequencies over one shared bucket set.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrequencies {
    pub labels: Vec<String>,
    pub reference: Vec<f64>,
    pub current: Vec<f64>,
}

impl AlignedFrequencies {
    /// Count distinct labels in each sample and reindex both over their union.
    ///
    /// Labels seen in only one sample get a mass of 0 on the other side. The
    /// union is ordered by label.
    pub fn from_categories(reference: &[String], current: &[String]) -> Self {
        let reference_counts = value_counts(reference);
        let current_counts = value_counts(current);

        let labels = reference_counts
            .keys()
            .chain(current_counts.keys())
            .copied()
            .collect::<BTreeSet<_>>();

        let reference_total = reference.len() as f64;
        let current_total = current.len() as f64;

        let mut aligned = Self {
            labels: Vec::with_capacity(labels.len()),
            reference: Vec::with_capacity(labels.len()),
            current: Vec::with_capacity(labels.len()),
        };
        for label in labels {
            let reference_count = reference_counts.get(label).copied().unwrap_or(0);
            let current_count = current_counts.get(label).copied().unwrap_or(0);
            aligned.labels.push(label.to_string());
            aligned.reference.push(reference_count as f64 / reference_total);
            aligned.current.push(current_count as f64 / current_total);
        }
        aligned
    }

    /// Turn per-bucket counts into masses over the full sample sizes.
    pub fn from_histograms(
        labels: Vec<String>,
        reference_counts: &[usize],
        reference_total: usize,
        current_counts: &[usize],
        current_total: usize,
    ) -> Self {
        Self {
            labels,
            reference: relative(reference_counts, reference_total),
            current: relative(current_counts, current_total),
        }
    }

}

fn value_counts(values: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_insert(0usize) += 1;
    }
    counts
}

fn relative(counts: &[usize], total: usize) -> Vec<f64> {
    let total = total as f64;
    counts.iter().map(|count| *count as f64 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn aligns_categories_over_union() {
        let aligned = AlignedFrequencies::from_categories(
            &labels(&["A", "A", "B"]),
            &labels(&["A", "C", "C", "C"]),
        );

        assert_eq!(aligned.labels, labels(&["A", "B", "C"]));
        assert_eq!(aligned.reference, vec![2.0 / 3.0, 1.0 / 3.0, 0.0]);
        assert_eq!(aligned.current, vec![0.25, 0.0, 0.75]);
    }

    #[test]
    fn histogram_masses_include_empty_buckets() {
        let aligned = AlignedFrequencies::from_histograms(
            labels(&["low", "mid", "high"]),
            &[2, 2, 0],
            4,
            &[0, 1, 3],
            4,
        );
        assert_eq!(aligned.reference, vec![0.5, 0.5, 0.0]);
        assert_eq!(aligned.current, vec![0.0, 0.25, 0.75]);
        assert_eq!(aligned.labels.len(), 3);
    }
}
