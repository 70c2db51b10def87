use macroquad::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::body::{BodyDesc, BodyId};
use crate::config;
use crate::physics::PhysicsWorld;
use crate::registry::{EntityRegistry, EntityTag};
use crate::vitals::Consumable;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Broom,
    Stick,
    Ruler,
    Sword,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Orb,
    Med,
    Weapon(WeaponKind),
}

impl ItemType {
    pub fn is_weapon(self) -> bool {
        matches!(self, ItemType::Weapon(_))
    }

    /// Weapons are not consumable; they stay in the world after a hit.
    pub fn consumable(self) -> Option<Consumable> {
        match self {
            ItemType::Orb => Some(Consumable::Orb),
            ItemType::Med => Some(Consumable::Med),
            ItemType::Weapon(_) => None,
        }
    }

    pub fn color(self) -> Color {
        match self {
            ItemType::Orb => LIME,
            ItemType::Med => RED,
            ItemType::Weapon(WeaponKind::Broom) => Color::from_rgba(0xb5, 0x8c, 0x4a, 255),
            ItemType::Weapon(WeaponKind::Stick) => Color::from_rgba(0x8b, 0x5a, 0x2b, 255),
            ItemType::Weapon(WeaponKind::Ruler) => Color::from_rgba(0xdd, 0xdd, 0xdd, 255),
            ItemType::Weapon(WeaponKind::Sword) => Color::from_rgba(0xaa, 0xaa, 0xaa, 255),
        }
    }
}

/// The fixed spawn catalog behind the inventory buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemPreset {
    Orb,
    Med,
    Broom,
    Stick,
    Ruler,
    Sword,
}

impl ItemPreset {
    pub const ALL: [ItemPreset; 6] = [
        ItemPreset::Orb,
        ItemPreset::Med,
        ItemPreset::Broom,
        ItemPreset::Stick,
        ItemPreset::Ruler,
        ItemPreset::Sword,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemPreset::Orb => "Orb",
            ItemPreset::Med => "Med",
            ItemPreset::Broom => "Broom",
            ItemPreset::Stick => "Stick",
            ItemPreset::Ruler => "Ruler",
            ItemPreset::Sword => "Sword",
        }
    }

    pub fn item_type(self) -> ItemType {
        match self {
            ItemPreset::Orb => ItemType::Orb,
            ItemPreset::Med => ItemType::Med,
            ItemPreset::Broom => ItemType::Weapon(WeaponKind::Broom),
            ItemPreset::Stick => ItemType::Weapon(WeaponKind::Stick),
            ItemPreset::Ruler => ItemType::Weapon(WeaponKind::Ruler),
            ItemPreset::Sword => ItemType::Weapon(WeaponKind::Sword),
        }
    }

    pub fn body(self) -> BodyDesc {
        let rect = |w: f32, h: f32| {
            BodyDesc::rect(w, h)
                .restitution(config::RECT_ITEM_RESTITUTION)
                .density(config::RECT_ITEM_DENSITY)
                .linear_drag(config::RECT_ITEM_DRAG)
        };
        match self {
            ItemPreset::Orb => {
                BodyDesc::circle(config::ORB_RADIUS).restitution(config::ORB_RESTITUTION)
            }
            ItemPreset::Med => rect(24.0, 24.0),
            ItemPreset::Broom => rect(120.0, 10.0),
            ItemPreset::Stick => rect(90.0, 8.0),
            ItemPreset::Ruler => rect(100.0, 6.0),
            ItemPreset::Sword => rect(140.0, 10.0),
        }
    }
}

/// Create an item at the world's item spawn point and register it.
pub fn spawn(
    physics: &mut impl PhysicsWorld,
    registry: &mut EntityRegistry,
    world: &World,
    desc: BodyDesc,
    item_type: ItemType,
) -> BodyId {
    let id = physics.add_body(desc, world.item_spawn());
    registry.insert(id, EntityTag::Item(item_type));
    debug!(?id, ?item_type, "item spawned");
    id
}

pub fn spawn_preset(
    physics: &mut impl PhysicsWorld,
    registry: &mut EntityRegistry,
    world: &World,
    preset: ItemPreset,
) -> BodyId {
    spawn(physics, registry, world, preset.body(), preset.item_type())
}

/// Remove an item from both the physics world and the registry.
///
/// Returns the item's type when it was live; a second call on the same handle
/// returns `None` and changes nothing.
pub fn consume(
    physics: &mut impl PhysicsWorld,
    registry: &mut EntityRegistry,
    id: BodyId,
) -> Option<ItemType> {
    let item_type = registry.item_type(id)?;
    registry.remove(id);
    physics.remove_body(id);
    debug!(?id, ?item_type, "item consumed");
    Some(item_type)
}
