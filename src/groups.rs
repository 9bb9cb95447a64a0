use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::Sub;

use num_traits::{ToPrimitive, Zero};


pub trait GroupKey: Ord + Clone + Debug {}
impl<T: Ord + Clone + Debug> GroupKey for T {}


/// Rows partitioned by a key. Every per-country computation goes through
/// this type so that no derived value can see rows of another group.
///
/// Groups are iterated in key order; rows keep their insertion order until
/// [`Grouped::sorted_by_key`] is applied.
#[derive(Debug, Clone)]
pub struct Grouped<K: GroupKey, R> {
	groups: BTreeMap<K, Vec<R>>,
}

impl<K: GroupKey, R> Grouped<K, R> {
	pub fn by_key<I: IntoIterator<Item = R>, F: Fn(&R) -> K>(rows: I, f: F) -> Self {
		let mut groups: BTreeMap<K, Vec<R>> = BTreeMap::new();
		for row in rows {
			groups.entry(f(&row)).or_insert_with(Vec::new).push(row);
		}
		Self{groups}
	}

	/// Stable sort of the rows within each group.
	pub fn sorted_by_key<O: Ord, F: Fn(&R) -> O>(mut self, f: F) -> Self {
		for rows in self.groups.values_mut() {
			rows.sort_by_key(|r| f(r));
		}
		self
	}

	pub fn map_groups<U, F: FnMut(&K, Vec<R>) -> Vec<U>>(self, mut f: F) -> Grouped<K, U> {
		let mut groups = BTreeMap::new();
		for (k, rows) in self.groups.into_iter() {
			let mapped = f(&k, rows);
			groups.insert(k, mapped);
		}
		Grouped{groups}
	}

	pub fn get(&self, k: &K) -> Option<&[R]> {
		Some(&self.groups.get(k)?[..])
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, &[R])> + '_ {
		self.groups.iter().map(|(k, rows)| (k, &rows[..]))
	}

	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Concatenate all groups in key order.
	pub fn into_rows(self) -> Vec<R> {
		let mut result = Vec::with_capacity(self.groups.values().map(Vec::len).sum());
		for (_, rows) in self.groups.into_iter() {
			result.extend(rows);
		}
		result
	}
}


/// First difference of a cumulative series. The first element has no
/// predecessor and is defined as zero. Decreases are kept as negative values.
pub fn first_difference<V: Copy + Zero + Sub<Output = V>>(values: &[V]) -> Vec<V> {
	let mut result = Vec::with_capacity(values.len());
	let mut prev: Option<V> = None;
	for v in values.iter() {
		result.push(match prev {
			Some(p) => *v - p,
			None => V::zero(),
		});
		prev = Some(*v);
	}
	result
}

pub fn group_max<V: Copy + PartialOrd>(values: &[V]) -> Option<V> {
	let mut result: Option<V> = None;
	for v in values.iter() {
		result = match result {
			Some(m) if m >= *v => Some(m),
			_ => Some(*v),
		};
	}
	result
}

/// Divide every value by the maximum of the slice. If that maximum is not
/// strictly positive, no value is defined and all results are `None`.
pub fn rescale_by_max<V: Copy + PartialOrd + Zero + ToPrimitive>(values: &[V]) -> Vec<Option<f64>> {
	let max = match group_max(values) {
		Some(m) if m > V::zero() => m.to_f64(),
		_ => None,
	};
	values.iter().map(|v| {
		let max = max?;
		Some(v.to_f64()? / max)
	}).collect()
}

/// `v / (population / 1e6)`.
pub fn per_million<V: ToPrimitive>(v: V, population: u64) -> f64 {
	let v = v.to_f64().unwrap_or(f64::NAN);
	v / (population as f64 / 1e6)
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grouping_keeps_rows_of_each_key_together() {
		let rows = vec![("b", 2), ("a", 1), ("b", 1), ("a", 3)];
		let g = Grouped::by_key(rows, |r| r.0);
		assert_eq!(g.len(), 2);
		assert_eq!(g.get(&"a").unwrap(), &[("a", 1), ("a", 3)][..]);
		assert_eq!(g.get(&"b").unwrap(), &[("b", 2), ("b", 1)][..]);
		assert!(g.get(&"c").is_none());
	}

	#[test]
	fn sorting_is_applied_per_group() {
		let rows = vec![("b", 2), ("a", 3), ("b", 1), ("a", 1)];
		let g = Grouped::by_key(rows, |r| r.0).sorted_by_key(|r| r.1);
		assert_eq!(g.into_rows(), vec![("a", 1), ("a", 3), ("b", 1), ("b", 2)]);
	}

	#[test]
	fn map_groups_sees_only_its_own_rows() {
		let rows = vec![("a", 1), ("b", 10), ("a", 2), ("b", 20)];
		let g = Grouped::by_key(rows, |r| r.0).map_groups(|k, rows| {
			let sum: i32 = rows.iter().map(|r| r.1).sum();
			vec![(*k, sum)]
		});
		assert_eq!(g.into_rows(), vec![("a", 3), ("b", 30)]);
	}

	#[test]
	fn first_difference_starts_at_zero() {
		assert_eq!(first_difference(&[10i64, 15, 15, 12]), vec![0, 5, 0, -3]);
		assert_eq!(first_difference(&[7i64]), vec![0]);
		assert!(first_difference::<i64>(&[]).is_empty());
	}

	#[test]
	fn group_max_of_empty_slice_is_none() {
		assert_eq!(group_max::<i64>(&[]), None);
		assert_eq!(group_max(&[3i64, -1, 7, 2]), Some(7));
	}

	#[test]
	fn rescale_divides_by_group_max() {
		assert_eq!(rescale_by_max(&[0i64, 5, 0]), vec![Some(0.0), Some(1.0), Some(0.0)]);
		assert_eq!(rescale_by_max(&[2i64, 4, -2]), vec![Some(0.5), Some(1.0), Some(-0.5)]);
	}

	#[test]
	fn rescale_is_undefined_without_positive_max() {
		assert_eq!(rescale_by_max(&[0i64, 0, 0]), vec![None, None, None]);
		assert_eq!(rescale_by_max(&[0i64, -3, -1]), vec![None, None, None]);
		assert!(rescale_by_max::<i64>(&[]).is_empty());
	}

	#[test]
	fn per_million_normalizes_by_population() {
		assert_eq!(per_million(5i64, 1_000_000), 5.0);
		assert_eq!(per_million(-4i64, 2_000_000), -2.0);
		assert_eq!(per_million(0i64, 83_000_000), 0.0);
	}
}
