use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

pub const MIN_BUCKETS: usize = 2;
pub const MAX_BUCKETS: usize = 9;
pub const DEFAULT_BUCKET_COUNT: usize = 3;

pub const AMOUNT_INSTRUCTION: &str = "Amount of Buckets (2 to 9)";
pub const NAMING_INSTRUCTION: &str = "Unique Names (only ascii, numbers and underscores)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketConfigError {
    #[error(
        "bucket count must be between {min} and {max}, got {count}",
        min = MIN_BUCKETS,
        max = MAX_BUCKETS
    )]
    InvalidCount { count: usize },
    #[error("bucket name #{position} is empty")]
    EmptyName { position: usize },
    #[error("bucket name '{name}' contains invalid character '{character}'")]
    InvalidCharacter { name: String, character: char },
    #[error("bucket name '{name}' is used more than once")]
    DuplicateName { name: String },
}

/// An ordered, validated set of bucket names. Order decides key assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNames(Vec<String>);

impl BucketNames {
    pub fn validate<I, S>(names: I) -> Result<Self, BucketConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        validate_bucket_names(&names)?;
        Ok(Self(names))
    }

    pub fn defaults(count: usize) -> Result<Self, BucketConfigError> {
        Self::validate((1..=count).map(default_bucket_name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

pub fn default_bucket_name(position: usize) -> String {
    format!("bucket_{position}")
}

pub fn validate_bucket_count(count: usize) -> Result<(), BucketConfigError> {
    if (MIN_BUCKETS..=MAX_BUCKETS).contains(&count) {
        Ok(())
    } else {
        Err(BucketConfigError::InvalidCount { count })
    }
}

pub fn validate_bucket_names(names: &[String]) -> Result<(), BucketConfigError> {
    validate_bucket_count(names.len())?;

    let mut seen = BTreeSet::new();
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(BucketConfigError::EmptyName {
                position: index + 1,
            });
        }

        if let Some(character) = name.chars().find(|character| !is_bucket_character(*character)) {
            return Err(BucketConfigError::InvalidCharacter {
                name: name.clone(),
                character,
            });
        }

        if !seen.insert(name.as_str()) {
            return Err(BucketConfigError::DuplicateName { name: name.clone() });
        }
    }

    Ok(())
}

fn is_bucket_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// Parses the amount entry. Empty input means "use the default count".
pub fn parse_bucket_amount(input: &str) -> AmountInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return AmountInput::Default;
    }

    if !trimmed.chars().all(|character| character.is_ascii_digit()) {
        return AmountInput::Invalid(format!("'{trimmed}' is not a number"));
    }

    match trimmed.parse::<usize>() {
        Ok(count) if validate_bucket_count(count).is_ok() => AmountInput::Count(count),
        Ok(count) => AmountInput::Invalid(BucketConfigError::InvalidCount { count }.to_string()),
        Err(_) => AmountInput::Invalid(format!("'{trimmed}' is out of range")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Default,
    Count(usize),
    Invalid(String),
}

/// Digit key to bucket name, assigned in definition order starting at '1'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapping {
    keys: BTreeMap<char, String>,
}

impl KeyMapping {
    pub fn from_names(names: &BucketNames) -> Self {
        let keys = names
            .iter()
            .zip('1'..='9')
            .map(|(name, key)| (key, name.to_string()))
            .collect();
        Self { keys }
    }

    pub fn bucket_for(&self, key: char) -> Option<&str> {
        self.keys.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.keys.iter().map(|(key, name)| (*key, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn legend(&self) -> String {
        self.iter()
            .map(|(key, name)| format!("{key}: {name}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
