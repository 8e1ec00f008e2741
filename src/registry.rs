use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimError};
use crate::grid::Cell;

/// The two mobile entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pursuer,
    Evader,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Pursuer => "pursuer",
            EntityKind::Evader => "evader",
        }
    }

    pub fn opponent(self) -> EntityKind {
        match self {
            EntityKind::Pursuer => EntityKind::Evader,
            EntityKind::Evader => EntityKind::Pursuer,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pursuer" | "zombie" => Ok(EntityKind::Pursuer),
            "evader" | "human" => Ok(EntityKind::Evader),
            _ => Err(SimError::InvalidEntityType(s.to_string())),
        }
    }
}

/// Ordered pursuer and evader positions.
///
/// Several entities may share a cell. Order is insertion order and is kept
/// through moves, since a move replaces a whole list at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRegistry {
    pursuers: Vec<Cell>,
    evaders: Vec<Cell>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, kind: EntityKind) -> &Vec<Cell> {
        match kind {
            EntityKind::Pursuer => &self.pursuers,
            EntityKind::Evader => &self.evaders,
        }
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<Cell> {
        match kind {
            EntityKind::Pursuer => &mut self.pursuers,
            EntityKind::Evader => &mut self.evaders,
        }
    }

    pub fn add(&mut self, kind: EntityKind, cell: Cell) {
        self.list_mut(kind).push(cell);
    }

    /// Remove the first entity of `kind` standing on `cell`
    pub fn remove(&mut self, kind: EntityKind, cell: Cell) -> Result<()> {
        let list = self.list_mut(kind);
        let position = list
            .iter()
            .position(|c| *c == cell)
            .ok_or(SimError::NotFound {
                kind: kind.name(),
                cell,
            })?;
        list.remove(position);
        Ok(())
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.list(kind).len()
    }

    /// Positions in insertion order. Call again to restart.
    pub fn iter(&self, kind: EntityKind) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.list(kind).iter().copied()
    }

    pub fn positions(&self, kind: EntityKind) -> &[Cell] {
        self.list(kind)
    }

    /// Swap in a whole new list for `kind`
    pub fn replace(&mut self, kind: EntityKind, positions: Vec<Cell>) {
        *self.list_mut(kind) = positions;
    }

    pub fn clear(&mut self) {
        self.pursuers.clear();
        self.evaders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_kind() {
        assert_eq!("zombie".parse::<EntityKind>().unwrap(), EntityKind::Pursuer);
        assert_eq!("Human".parse::<EntityKind>().unwrap(), EntityKind::Evader);
        assert_eq!(" evader ".parse::<EntityKind>().unwrap(), EntityKind::Evader);
        assert!(matches!(
            "obstacle".parse::<EntityKind>(),
            Err(SimError::InvalidEntityType(name)) if name == "obstacle"
        ));
    }

    #[test]
    fn test_enumeration_keeps_insertion_order() {
        let mut registry = EntityRegistry::new();
        registry.add(EntityKind::Evader, Cell::new(2, 2));
        registry.add(EntityKind::Evader, Cell::new(0, 1));
        registry.add(EntityKind::Evader, Cell::new(2, 2));

        let iter = registry.iter(EntityKind::Evader);
        let first: Vec<Cell> = iter.clone().collect();
        let second: Vec<Cell> = iter.collect();
        assert_eq!(first, vec![Cell::new(2, 2), Cell::new(0, 1), Cell::new(2, 2)]);
        assert_eq!(first, second);
        assert_eq!(registry.count(EntityKind::Evader), 3);
        assert_eq!(registry.count(EntityKind::Pursuer), 0);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut registry = EntityRegistry::new();
        registry.add(EntityKind::Pursuer, Cell::new(1, 1));
        registry.add(EntityKind::Pursuer, Cell::new(0, 0));
        registry.add(EntityKind::Pursuer, Cell::new(1, 1));

        registry.remove(EntityKind::Pursuer, Cell::new(1, 1)).unwrap();
        assert_eq!(
            registry.positions(EntityKind::Pursuer),
            &[Cell::new(0, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut registry = EntityRegistry::new();
        registry.add(EntityKind::Pursuer, Cell::new(1, 1));

        let err = registry.remove(EntityKind::Evader, Cell::new(1, 1)).unwrap_err();
        assert!(matches!(err, SimError::NotFound { kind: "evader", .. }));
        assert_eq!(registry.count(EntityKind::Pursuer), 1);
    }

    #[test]
    fn test_clear_empties_both_lists() {
        let mut registry = EntityRegistry::new();
        registry.add(EntityKind::Pursuer, Cell::new(1, 1));
        registry.add(EntityKind::Evader, Cell::new(0, 0));
        registry.clear();
        assert_eq!(registry, EntityRegistry::new());
    }
}
