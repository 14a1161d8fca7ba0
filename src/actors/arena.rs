//! Actor storage with stable ids and a spatial index

use ahash::AHashMap;

use crate::actors::actor::ActorState;
use crate::core::types::{ActorId, Coord};

/// Dense slot storage; removed actors leave a hole so ids stay valid
#[derive(Debug, Clone, Default)]
pub struct ActorArena {
    slots: Vec<Option<ActorState>>,
    index: AHashMap<Coord, ActorId>,
    live: usize,
}

impl ActorArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, actor: ActorState) -> ActorId {
        let id = ActorId(self.slots.len() as u32);
        self.index.insert(actor.position, id);
        self.slots.push(Some(actor));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&ActorState> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Snapshot of live ids in arena order
    pub fn ids(&self) -> Vec<ActorId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &ActorState)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|actor| (ActorId(i as u32), actor)))
    }

    /// Live (not dying) actor standing on `coord`
    pub fn occupant_at(&self, coord: Coord) -> Option<ActorId> {
        let id = *self.index.get(&coord)?;
        self.get(id).filter(|actor| !actor.is_dead()).map(|_| id)
    }

    /// Move an actor, keeping the index in step. Refuses tiles held by
    /// another live actor.
    pub fn move_actor(&mut self, id: ActorId, to: Coord) -> bool {
        if let Some(other) = self.occupant_at(to) {
            if other != id {
                return false;
            }
        }
        let Some(actor) = self.slots.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return false;
        };

        let from = actor.position;
        actor.position = to;
        if self.index.get(&from) == Some(&id) {
            self.index.remove(&from);
        }
        self.index.insert(to, id);
        true
    }

    pub fn remove(&mut self, id: ActorId) -> Option<ActorState> {
        let actor = self.slots.get_mut(id.0 as usize)?.take()?;
        if self.index.get(&actor.position) == Some(&id) {
            self.index.remove(&actor.position);
        }
        self.live -= 1;
        Some(actor)
    }

    /// Living actors spawned from `template_id`
    pub fn count_living(&self, template_id: &str) -> usize {
        self.iter()
            .filter(|(_, a)| a.template_id == template_id && !a.is_dead())
            .count()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::template::ActorTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn actor_at(x: i32, y: i32) -> ActorState {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut template = ActorTemplate::new("RAT");
        template.hp_base = 5;
        ActorState::spawn(&template, 1, Coord::new(x, y), 2, &mut rng)
    }

    #[test]
    fn test_spawn_and_lookup() {
        let mut arena = ActorArena::new();
        let a = arena.spawn(actor_at(1, 1));
        let b = arena.spawn(actor_at(2, 1));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.occupant_at(Coord::new(1, 1)), Some(a));
        assert_eq!(arena.occupant_at(Coord::new(2, 1)), Some(b));
        assert_eq!(arena.ids(), vec![a, b]);
        assert_eq!(arena.count_living("RAT"), 2);
    }

    #[test]
    fn test_move_updates_index() {
        let mut arena = ActorArena::new();
        let a = arena.spawn(actor_at(1, 1));
        let b = arena.spawn(actor_at(3, 1));

        assert!(arena.move_actor(a, Coord::new(2, 1)));
        assert_eq!(arena.occupant_at(Coord::new(1, 1)), None);
        assert_eq!(arena.occupant_at(Coord::new(2, 1)), Some(a));

        assert!(!arena.move_actor(b, Coord::new(2, 1)));
        assert_eq!(arena.get(b).map(|x| x.position), Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_dying_actor_does_not_occupy() {
        let mut arena = ActorArena::new();
        let a = arena.spawn(actor_at(1, 1));
        let b = arena.spawn(actor_at(2, 1));
        if let Some(actor) = arena.get_mut(a) {
            actor.take_damage(100);
        }
        assert_eq!(arena.occupant_at(Coord::new(1, 1)), None);
        assert!(arena.move_actor(b, Coord::new(1, 1)));

        // Removing the corpse must not clear the live actor's entry
        arena.remove(a);
        assert_eq!(arena.occupant_at(Coord::new(1, 1)), Some(b));
        assert_eq!(arena.ids(), vec![b]);
        assert!(arena.get(a).is_none());
    }
}
