//! Comma-joined genre id lists as stored in `movies.genre_id`.

use sea_orm::{ColumnTrait, Condition};

/// Parses `"1, 4,,12,4"` into `[1, 4, 12]`.
///
/// Blank and non-numeric entries are dropped and duplicates keep their
/// first position.
#[must_use]
pub fn parse_genre_ids(csv: &str) -> Vec<i32> {
    let mut ids = Vec::new();
    for id in csv
        .split(',')
        .filter_map(|part| part.trim().parse::<i32>().ok())
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[must_use]
pub fn join_genre_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Exact list membership: `"12"` does not contain genre `1`.
#[must_use]
pub fn contains_genre(csv: &str, id: i32) -> bool {
    parse_genre_ids(csv).contains(&id)
}

/// SQL counterpart of [`contains_genre`] for a comma-joined column.
pub fn genre_condition<C: ColumnTrait>(column: C, id: i32) -> Condition {
    Condition::any()
        .add(column.eq(id.to_string()))
        .add(column.like(format!("{id},%")))
        .add(column.like(format!("%,{id},%")))
        .add(column.like(format!("%,{id}")))
}

/// Matches rows sharing at least one of `ids`.
pub fn any_genre_condition<C: ColumnTrait + Copy>(column: C, ids: &[i32]) -> Condition {
    ids.iter()
        .fold(Condition::any(), |cond, id| cond.add(genre_condition(column, *id)))
}
