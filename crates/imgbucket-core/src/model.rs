use std::collections::BTreeSet;

use thiserror::Error;

use crate::buckets::BucketNames;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bucket '{bucket}' is not part of the current configuration")]
pub struct UnknownBucket {
    pub bucket: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bucket {
    name: String,
    members: BTreeSet<String>,
}

/// Bucket name to assigned item names. An item may sit in several buckets at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketModel {
    buckets: Vec<Bucket>,
}

impl BucketModel {
    pub fn new(names: &BucketNames) -> Self {
        let buckets = names
            .iter()
            .map(|name| Bucket {
                name: name.to_string(),
                members: BTreeSet::new(),
            })
            .collect();
        Self { buckets }
    }

    /// Returns `true` when the item was not yet a member of the bucket.
    pub fn assign(&mut self, bucket: &str, item: &str) -> Result<bool, UnknownBucket> {
        let entry = self
            .buckets
            .iter_mut()
            .find(|entry| entry.name == bucket)
            .ok_or_else(|| UnknownBucket {
                bucket: bucket.to_string(),
            })?;

        Ok(entry.members.insert(item.to_string()))
    }

    pub fn members(&self, bucket: &str) -> Option<&BTreeSet<String>> {
        self.buckets
            .iter()
            .find(|entry| entry.name == bucket)
            .map(|entry| &entry.members)
    }

    /// Buckets in definition order.
    pub fn all_buckets(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.buckets
            .iter()
            .map(|entry| (entry.name.as_str(), &entry.members))
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|entry| entry.name.as_str())
    }

    pub fn assignment_count(&self) -> usize {
        self.buckets.iter().map(|entry| entry.members.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(names: &[&str]) -> BucketModel {
        BucketModel::new(&BucketNames::validate(names.iter().copied()).expect("valid names"))
    }

    #[test]
    fn new_model_starts_with_empty_buckets() {
        let model = model(&["cats", "dogs"]);
        assert!(model.members("cats").expect("cats").is_empty());
        assert!(model.members("dogs").expect("dogs").is_empty());
        assert_eq!(model.assignment_count(), 0);
    }

    #[test]
    fn assign_is_idempotent() {
        let mut once = model(&["cats", "dogs"]);
        assert!(once.assign("cats", "a.png").expect("assign"));

        let mut twice = model(&["cats", "dogs"]);
        assert!(twice.assign("cats", "a.png").expect("assign"));
        assert!(!twice.assign("cats", "a.png").expect("assign again"));

        assert_eq!(once, twice);
        assert_eq!(twice.members("cats").expect("cats").len(), 1);
    }

    #[test]
    fn item_may_belong_to_several_buckets() {
        let mut model = model(&["cats", "dogs", "birds"]);
        model.assign("cats", "b.png").expect("cats");
        model.assign("dogs", "b.png").expect("dogs");

        assert!(model.members("cats").expect("cats").contains("b.png"));
        assert!(model.members("dogs").expect("dogs").contains("b.png"));
        assert!(!model.members("birds").expect("birds").contains("b.png"));
        assert_eq!(model.assignment_count(), 2);
    }

    #[test]
    fn assign_to_unknown_bucket_fails() {
        let mut model = model(&["cats", "dogs"]);
        let error = model.assign("fish", "a.png").expect_err("unknown bucket");
        assert_eq!(error.bucket, "fish");
        assert!(error.to_string().contains("'fish'"));
        assert_eq!(model.assignment_count(), 0);
    }

    #[test]
    fn all_buckets_iterates_in_definition_order() {
        let model = model(&["zeta", "alpha", "mid"]);
        let order: Vec<&str> = model.all_buckets().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }
}
