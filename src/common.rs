use std::ops::Deref;

/// Number of consecutive attempts a stage admits before its delay applies again.
///
/// Must be at least 1. A batch size of zero would give the stage no width, so it is
/// refused at construction time rather than tolerated by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BatchSize(u64);

impl Deref for BatchSize {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for BatchSize {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Batch size must be greater than 0");
        }

        Ok(Self(value))
    }
}

impl From<BatchSize> for u64 {
    fn from(value: BatchSize) -> Self {
        value.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(1)
    }
}

/// Number of batch cycles a stage runs before the schedule moves to the next stage.
///
/// Must be at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Repetitions(u64);

impl Deref for Repetitions {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for Repetitions {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Repetitions must be greater than 0");
        }

        Ok(Self(value))
    }
}

impl From<Repetitions> for u64 {
    fn from(value: Repetitions) -> Self {
        value.0
    }
}

impl Default for Repetitions {
    fn default() -> Self {
        Self(1)
    }
}

/// Upper bound on the number of stages a domain may declare.
///
/// Stage lookup walks the schedule on every evaluation, so the local provider refuses
/// domains with more stages than this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxStages(usize);

impl Deref for MaxStages {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<usize> for MaxStages {
    type Error = &'static str;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Max stages must be at least 1");
        }

        Ok(Self(value))
    }
}

impl Default for MaxStages {
    fn default() -> Self {
        Self(64)
    }
}

/// Serde adapter for the `{ "defined": bool, "value": T }` optional wire shape.
///
/// Domains are signed over this shape, so an unset field is written as
/// `{ "defined": false }` rather than being dropped or nulled.
pub(crate) mod defined_optional {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Out<'a, T> {
        defined: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<&'a T>,
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct In<T> {
        defined: bool,
        value: Option<T>,
    }

    pub(crate) fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        Out {
            defined: value.is_some(),
            value: value.as_ref(),
        }
        .serialize(serializer)
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = In::<T>::deserialize(deserializer)?;

        match (raw.defined, raw.value) {
            (false, _) => Ok(None),
            (true, Some(value)) => Ok(Some(value)),
            (true, None) => Err(serde::de::Error::custom(
                "optional field is marked defined but has no value",
            )),
        }
    }
}
