use std::collections::HashMap;

use crate::body::BodyId;
use crate::items::ItemType;

/// Semantic metadata the simulation attaches to a physics body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityTag {
    Agent,
    Item(ItemType),
    Particle { opacity: f32 },
}

/// Live entities keyed by body handle. Iteration order is unspecified.
#[derive(Default)]
pub struct EntityRegistry {
    records: HashMap<BodyId, EntityTag>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: BodyId, tag: EntityTag) {
        self.records.insert(id, tag);
    }

    /// Returns the removed tag, or `None` if `id` was not registered.
    pub fn remove(&mut self, id: BodyId) -> Option<EntityTag> {
        self.records.remove(&id)
    }

    pub fn get(&self, id: BodyId) -> Option<&EntityTag> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut EntityTag> {
        self.records.get_mut(&id)
    }

    pub fn item_type(&self, id: BodyId) -> Option<ItemType> {
        match self.records.get(&id) {
            Some(EntityTag::Item(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = (BodyId, ItemType)> + '_ {
        self.records.iter().filter_map(|(id, tag)| match tag {
            EntityTag::Item(kind) => Some((*id, *kind)),
            _ => None,
        })
    }

    pub fn particles(&self) -> impl Iterator<Item = (BodyId, f32)> + '_ {
        self.records.iter().filter_map(|(id, tag)| match tag {
            EntityTag::Particle { opacity } => Some((*id, *opacity)),
            _ => None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn particle_count(&self) -> usize {
        self.particles().count()
    }
}

#[cfg(test)]
impl EntityRegistry {
    pub fn contains(&self, id: BodyId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &EntityTag)> {
        self.records.iter().map(|(id, tag)| (*id, tag))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
