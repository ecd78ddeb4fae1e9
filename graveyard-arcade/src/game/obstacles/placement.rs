use std::collections::HashSet;

use bevy::prelude::*;
use constants::gameplay::PLACEMENT_ATTEMPTS_PER_CELL;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::game::grid::{FieldSize, GridPosition};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(
        "cannot place {requested} items: only {available} free cells in a {rows}x{columns} field"
    )]
    InsufficientCells {
        requested: usize,
        available: usize,
        rows: usize,
        columns: usize,
    },
}

/// Pick `count` distinct random cells inside `field`, avoiding `excluded`.
pub fn random_positions<R: Rng + ?Sized>(
    field: FieldSize,
    count: usize,
    excluded: &[GridPosition],
    rng: &mut R,
) -> Result<Vec<GridPosition>, PlacementError> {
    let max_attempts = count.saturating_mul(PLACEMENT_ATTEMPTS_PER_CELL);
    random_positions_with_limit(field, count, excluded, rng, max_attempts)
}

/// Rejection sampling with an explicit sample budget. Once the budget is spent
/// the remaining items are drawn from an enumeration of the free cells, so the
/// only failure is a field with too few of them.
pub fn random_positions_with_limit<R: Rng + ?Sized>(
    field: FieldSize,
    count: usize,
    excluded: &[GridPosition],
    rng: &mut R,
    max_attempts: usize,
) -> Result<Vec<GridPosition>, PlacementError> {
    let blocked: HashSet<GridPosition> = excluded
        .iter()
        .copied()
        .filter(|position| field.contains(*position))
        .collect();

    let available = field.cell_count() - blocked.len();
    if count > available {
        return Err(PlacementError::InsufficientCells {
            requested: count,
            available,
            rows: field.rows,
            columns: field.columns,
        });
    }

    let mut chosen = Vec::with_capacity(count);
    let mut taken = HashSet::with_capacity(count);
    let mut attempts = 0;

    while chosen.len() < count && attempts < max_attempts {
        attempts += 1;

        let position = GridPosition::new(
            rng.gen_range(0..field.rows),
            rng.gen_range(0..field.columns),
        );

        if blocked.contains(&position) || !taken.insert(position) {
            continue;
        }
        chosen.push(position);
    }

    let missing = count - chosen.len();
    if missing > 0 {
        debug!(
            "Sampling budget of {} spent with {} of {} placed, drawing from free cells",
            max_attempts,
            chosen.len(),
            count
        );
        let free: Vec<GridPosition> = field
            .cells()
            .filter(|position| !blocked.contains(position) && !taken.contains(position))
            .collect();
        chosen.extend(free.choose_multiple(rng, missing).copied());
    }

    Ok(chosen)
}
