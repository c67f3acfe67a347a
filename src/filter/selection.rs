//! Predicate selection emitted by a filter UI

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::pipeline::Col;

/// Inclusive age range in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

impl AgeRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends. An inverted range contains nothing.
    pub fn contains(&self, age: f64) -> bool {
        age >= self.min as f64 && age <= self.max as f64
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.min, self.max)
    }
}

/// User-selected predicates for one filter application.
///
/// An empty categorical set means "no constraint". `age_range` and
/// `income_brackets` are `None` when the UI left them untouched; the
/// persisted [`FilterState`](super::FilterState) value is used instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredicateSelection {
    pub gender: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub family_status: BTreeSet<String>,
    pub housing: BTreeSet<String>,
    pub age_range: Option<AgeRange>,
    pub income_brackets: Option<BTreeSet<String>>,
}

impl PredicateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gender<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gender = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_education<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.education = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_family_status<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.family_status = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_housing<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.housing = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_age_range(mut self, min: i64, max: i64) -> Self {
        self.age_range = Some(AgeRange::new(min, max));
        self
    }

    pub fn with_income_brackets<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.income_brackets = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Categorical selections paired with the column each one constrains
    pub fn categorical(&self) -> [(Col, &BTreeSet<String>); 4] {
        [
            (Col::Gender, &self.gender),
            (Col::Education, &self.education),
            (Col::FamilyStatus, &self.family_status),
            (Col::Housing, &self.housing),
        ]
    }

    /// Mutable access to the set for one filterable column
    pub fn categorical_mut(&mut self, col: Col) -> Option<&mut BTreeSet<String>> {
        match col {
            Col::Gender => Some(&mut self.gender),
            Col::Education => Some(&mut self.education),
            Col::FamilyStatus => Some(&mut self.family_status),
            Col::Housing => Some(&mut self.housing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_range_inclusive() {
        let r = AgeRange::new(25, 40);
        assert!(r.contains(25.0));
        assert!(r.contains(40.0));
        assert!(!r.contains(24.9));
        assert!(!r.contains(40.5));
        assert!(!r.contains(f64::NAN));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(!AgeRange::new(40, 25).contains(30.0));
    }

    #[test]
    fn test_categorical_pairs_cover_filterable_columns() {
        let sel = PredicateSelection::new().with_gender(["F"]);
        let cols: Vec<Col> = sel.categorical().iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, Col::FILTERABLE.to_vec());
        assert!(sel.categorical()[0].1.contains("F"));
    }
}
