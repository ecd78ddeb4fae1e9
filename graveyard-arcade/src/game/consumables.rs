use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::game::grid::{EntityId, GridPosition};
use crate::game::level::ConsumablesConfig;
use crate::game::obstacles::placement::{PlacementError, random_positions};
use crate::game::session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableType {
    /// Worth one point.
    Candy,
    /// Starts an invulnerability booster.
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumable {
    pub id: EntityId,
    pub kind: ConsumableType,
    pub position: GridPosition,
}

/// Collectibles of the current round.
#[derive(Debug, Default)]
pub struct ConsumablesController {
    items: Vec<Consumable>,
    spawned_candies: usize,
}

impl ConsumablesController {
    /// Scatter a fresh set of consumables on free cells, away from obstacles and `player`.
    /// Shrinks the set when the field has fewer free cells than requested.
    pub fn spawn_round<R: Rng + ?Sized>(
        &mut self,
        session: &mut GameSession,
        config: &ConsumablesConfig,
        player: GridPosition,
        rng: &mut R,
    ) -> Result<usize, PlacementError> {
        self.reset(session);

        let field = session.field();
        let mut excluded: Vec<GridPosition> = session
            .maps
            .obstacles
            .occupied()
            .map(|(position, _)| position)
            .collect();
        excluded.push(player);

        let free = field.cell_count().saturating_sub(excluded.len());
        let requested = config.candies + config.shields;
        let total = requested.min(free);
        if total < requested {
            warn!(
                "Only {} free cells for {} consumables, spawning fewer",
                free, requested
            );
        }

        let positions = random_positions(field, total, &excluded, rng)?;
        let candies = config.candies.min(total);

        for (index, position) in positions.into_iter().enumerate() {
            let kind = if index < candies {
                ConsumableType::Candy
            } else {
                ConsumableType::Shield
            };
            let id = session.allocate_id();

            session.maps.consumables.set(position, id);
            self.items.push(Consumable { id, kind, position });
        }

        self.spawned_candies = candies;
        Ok(self.items.len())
    }

    /// Remove and return whatever lies on `position`.
    pub fn collect(&mut self, session: &mut GameSession, position: GridPosition) -> Option<Consumable> {
        let id = session.maps.consumables.remove(position)?;
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.swap_remove(index))
    }

    pub fn remaining_candies(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind == ConsumableType::Candy)
            .count()
    }

    /// True once every candy spawned this round has been picked up.
    pub fn is_round_cleared(&self) -> bool {
        self.spawned_candies > 0 && self.remaining_candies() == 0
    }

    pub fn items(&self) -> &[Consumable] {
        &self.items
    }

    pub fn reset(&mut self, session: &mut GameSession) {
        self.items.clear();
        self.spawned_candies = 0;
        session.maps.consumables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::FieldSize;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(candies: usize, shields: usize) -> ConsumablesConfig {
        ConsumablesConfig { candies, shields }
    }

    #[test]
    fn avoids_obstacles_and_player() {
        let mut session = GameSession::new(0, FieldSize::new(3, 3), 3);
        let obstacle = session.allocate_id();
        session.maps.obstacles.set(GridPosition::new(1, 1), obstacle);

        let mut consumables = ConsumablesController::default();
        let mut rng = StdRng::seed_from_u64(9);
        let player = GridPosition::new(0, 0);

        let spawned = consumables
            .spawn_round(&mut session, &config(5, 2), player, &mut rng)
            .unwrap();

        assert_eq!(spawned, 7);
        assert_eq!(consumables.remaining_candies(), 5);
        for item in consumables.items() {
            assert_ne!(item.position, player);
            assert_ne!(item.position, GridPosition::new(1, 1));
            assert_eq!(session.maps.consumables.get(item.position), Some(item.id));
        }
    }

    #[test]
    fn shrinks_when_field_is_crowded() {
        let mut session = GameSession::new(0, FieldSize::new(2, 2), 3);
        let mut consumables = ConsumablesController::default();
        let mut rng = StdRng::seed_from_u64(2);

        let spawned = consumables
            .spawn_round(&mut session, &config(5, 1), GridPosition::new(0, 0), &mut rng)
            .unwrap();

        assert_eq!(spawned, 3);
        assert_eq!(consumables.remaining_candies(), 3);
    }

    #[test]
    fn collecting_clears_the_round() {
        let mut session = GameSession::new(0, FieldSize::new(4, 4), 3);
        let mut consumables = ConsumablesController::default();
        let mut rng = StdRng::seed_from_u64(4);

        consumables
            .spawn_round(&mut session, &config(2, 0), GridPosition::new(0, 0), &mut rng)
            .unwrap();
        assert!(!consumables.is_round_cleared());

        let positions: Vec<_> = consumables.items().iter().map(|c| c.position).collect();
        for position in positions {
            let item = consumables.collect(&mut session, position).unwrap();
            assert_eq!(item.kind, ConsumableType::Candy);
        }

        assert!(consumables.is_round_cleared());
        assert_eq!(session.maps.consumables.occupied_count(), 0);
        assert!(consumables.collect(&mut session, GridPosition::new(3, 3)).is_none());
    }
}
