//! Cartesian-product enumeration of a validated sweep.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::contract::ValidatedSweep;

/// One grid point: axis name to value, in declared axis order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    values: Vec<(String, i64)>,
}

impl ParameterSet {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|(axis, _)| axis == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Restartable view over every grid point of a sweep.
///
/// The first declared axis varies slowest and the last declared axis
/// fastest, so a resumed sweep revisits points in the same order.
#[derive(Debug, Clone, Copy)]
pub struct GridEnumerator<'a> {
    sweep: &'a ValidatedSweep,
}

impl<'a> GridEnumerator<'a> {
    pub(crate) fn new(sweep: &'a ValidatedSweep) -> Self {
        Self { sweep }
    }

    /// Product of the independent axis sizes.
    pub fn len(&self) -> usize {
        self.sweep.total_points()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> GridIter<'a> {
        GridIter {
            sweep: self.sweep,
            sizes: self
                .sweep
                .spec()
                .axes
                .iter()
                .map(|axis| axis.len() as usize)
                .collect(),
            cursor: vec![0; self.sweep.spec().axes.len()],
            remaining: self.len(),
        }
    }
}

impl<'a> IntoIterator for &GridEnumerator<'a> {
    type Item = ParameterSet;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over independent axis indices.
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    sweep: &'a ValidatedSweep,
    sizes: Vec<usize>,
    cursor: Vec<usize>,
    remaining: usize,
}

impl GridIter<'_> {
    fn current(&self) -> ParameterSet {
        let spec = self.sweep.spec();
        let independent: Vec<i64> = spec
            .axes
            .iter()
            .zip(&self.cursor)
            .map(|(axis, &index)| axis.value_at(index))
            .collect();

        let derived = spec
            .derived
            .iter()
            .zip(&self.sweep.derived_sources)
            .map(|(axis, &source)| (axis.name.clone(), axis.total - independent[source]));

        ParameterSet::from_pairs(
            spec.axes
                .iter()
                .zip(&independent)
                .map(|(axis, &value)| (axis.name.clone(), value))
                .chain(derived),
        )
    }

    fn advance(&mut self) {
        for position in (0..self.cursor.len()).rev() {
            self.cursor[position] += 1;
            if self.cursor[position] < self.sizes[position] {
                return;
            }
            self.cursor[position] = 0;
        }
    }
}

impl Iterator for GridIter<'_> {
    type Item = ParameterSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let set = self.current();
        self.remaining -= 1;
        self.advance();
        Some(set)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}
