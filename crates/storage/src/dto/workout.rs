use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};

/// One demultiplexed `weight-N` / `reps-N` pair from a set form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetEntry {
    pub weight: i32,
    pub reps: i32,
}

/// New values for an existing logged set, keyed by its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetUpdate {
    pub id: i32,
    pub weight: i32,
    pub reps: i32,
    pub sets: i32,
}

/// Typed form of the insert-data submission.
///
/// The browser posts a flat bag: `exerciseId`, `sets`, `isUpperBody` and one
/// `weight-N`/`reps-N` pair per set. Pairs are ordered by their numeric index,
/// so `weight-10` sorts after `weight-2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertSetsForm {
    pub exercise_id: i32,
    pub set_count: i32,
    pub is_upper_body: bool,
    pub entries: Vec<SetEntry>,
}

impl InsertSetsForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        let exercise_id = required_int(fields, "exerciseId", "Exercise ID is required")?;
        let set_count = required_int(fields, "sets", "Number of sets is required")?;
        if set_count < 1 {
            return Err(StorageError::validation("Number of sets must be at least 1"));
        }

        let is_upper_body = fields
            .get("isUpperBody")
            .is_some_and(|value| value.trim() == "true");

        let weights = indexed_ints(fields, "weight-")?;
        let mut reps = indexed_ints(fields, "reps-")?;

        let mut entries = Vec::with_capacity(weights.len());
        for (index, weight) in weights {
            let reps = reps.remove(&index).ok_or_else(|| {
                StorageError::Validation(format!("Missing reps for set {index}"))
            })?;
            entries.push(SetEntry { weight, reps });
        }

        if let Some(index) = reps.keys().next() {
            return Err(StorageError::Validation(format!(
                "Missing weight for set {index}"
            )));
        }

        let expected = set_count as usize;
        if entries.len() < expected {
            return Err(StorageError::Validation(format!(
                "Expected {expected} set entries but received {}",
                entries.len()
            )));
        }
        entries.truncate(expected);

        Ok(Self {
            exercise_id,
            set_count,
            is_upper_body,
            entries,
        })
    }
}

/// Typed form of the edit-exercise submission: `id-N`, `weight-N`, `reps-N`
/// and `sets-N` for every row being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSetsForm {
    pub updates: Vec<SetUpdate>,
}

impl EditSetsForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        let ids = indexed_ints(fields, "id-")?;
        let mut weights = indexed_ints(fields, "weight-")?;
        let mut reps = indexed_ints(fields, "reps-")?;
        let mut sets = indexed_ints(fields, "sets-")?;

        if ids.is_empty() {
            return Err(StorageError::validation("No sets submitted"));
        }

        let mut updates = Vec::with_capacity(ids.len());
        for (index, id) in ids {
            let missing =
                |field: &str| StorageError::Validation(format!("Missing {field} for row {index}"));

            updates.push(SetUpdate {
                id,
                weight: weights.remove(&index).ok_or_else(|| missing("weight"))?,
                reps: reps.remove(&index).ok_or_else(|| missing("reps"))?,
                sets: sets.remove(&index).ok_or_else(|| missing("sets"))?,
            });
        }

        Ok(Self { updates })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DeleteSetsForm {
    #[serde(default, rename = "id")]
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RunForm {
    pub duration: String,
    pub distance: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EditRunForm {
    pub id: i32,
    pub duration: String,
    pub distance: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteRunForm {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InsertSetsResponse {
    pub ids: Vec<i32>,
    pub is_upper_body: bool,
}

fn required_int(fields: &HashMap<String, String>, name: &str, missing: &str) -> Result<i32> {
    let value = fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| StorageError::validation(missing))?;

    parse_int(name, value)
}

fn indexed_ints(fields: &HashMap<String, String>, prefix: &str) -> Result<BTreeMap<u32, i32>> {
    let mut values = BTreeMap::new();

    for (key, value) in fields {
        let Some(index) = key.strip_prefix(prefix) else {
            continue;
        };
        let index: u32 = index
            .parse()
            .map_err(|_| StorageError::Validation(format!("Invalid field name: {key}")))?;

        values.insert(index, parse_int(key, value.trim())?);
    }

    Ok(values)
}

fn parse_int(name: &str, value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| StorageError::Validation(format!("{name} must be a whole number")))
}
