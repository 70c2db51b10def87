use crate::agent::Agent;
use crate::body::BodyId;
use crate::config;
use crate::items::{self, ItemType};
use crate::physics::{ContactPair, PhysicsWorld};
use crate::registry::EntityRegistry;
use crate::vitals::ImpactSource;

/// What one batch of contact-start pairs did to the agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub impacts: usize,
    pub consumed: Vec<(BodyId, ItemType)>,
    /// Energy ran out during this batch. The caller enters the death sequence once.
    pub lethal: bool,
}

/// Turn contact-start pairs into vitals changes and item pickups.
///
/// Pairs that do not involve the agent are ignored, and nothing happens while
/// the agent is dead. Once a lethal impact has been seen, later impacts in the
/// same batch are skipped; pickups are still honoured.
pub fn interpret_batch(
    pairs: &[ContactPair],
    agent: &mut Agent,
    physics: &mut impl PhysicsWorld,
    registry: &mut EntityRegistry,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    if !agent.is_alive() {
        return outcome;
    }
    let Some(agent_id) = agent.body else {
        return outcome;
    };

    for pair in pairs {
        let Some(other) = pair.other(agent_id) else {
            continue;
        };
        let other_type = registry.item_type(other);

        if !outcome.lethal {
            // Untagged bodies (walls, particles) count as plain collisions.
            let source = if other_type.is_some_and(ItemType::is_weapon) {
                ImpactSource::Weapon
            } else {
                ImpactSource::Other
            };
            outcome.impacts += 1;
            if agent
                .vitals
                .apply_impact(pair.depth * config::IMPACT_SCALE, source)
            {
                outcome.lethal = true;
            }
        }

        if let Some(consumable) = other_type.and_then(ItemType::consumable) {
            if let Some(item_type) = items::consume(physics, registry, other) {
                agent.vitals.apply_consumable(consumable);
                outcome.consumed.push((other, item_type));
            }
        }
    }

    outcome
}
