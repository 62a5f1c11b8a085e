//! Raw numeric inputs shared across dimensions.

use super::Collections;
use crate::locations::LocationTree;
use crate::models::ProcessEntity;

/// Location and user counts for one entity and its same-location peers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerInputs {
    /// Concrete locations reachable under the entity's location.
    pub total_locations: usize,
    /// Locations where the entity is implemented.
    pub locations_linked: u32,
    pub number_of_users_linked: u32,
    pub total_number_of_users: u64,
    /// Mean user count across same-type entities at the same location.
    /// `None` when the peer set is empty.
    pub avg_number_of_users: Option<f64>,
}

/// Compute the peer inputs of `entity`.
pub fn aggregate(
    entity: &ProcessEntity,
    collections: &Collections<'_>,
    tree: &LocationTree<'_>,
) -> PeerInputs {
    let total_locations = tree.leaf_locations_under(entity.location_id).len();

    let peers: Vec<&ProcessEntity> = collections
        .of_type(entity.entity_type)
        .iter()
        .filter(|peer| peer.location_id == entity.location_id)
        .collect();

    let total_number_of_users: u64 = peers.iter().map(|p| u64::from(p.number_of_users)).sum();
    let avg_number_of_users = if peers.is_empty() {
        None
    } else {
        Some(total_number_of_users as f64 / peers.len() as f64)
    };

    PeerInputs {
        total_locations,
        locations_linked: entity.number_of_locations,
        number_of_users_linked: entity.number_of_users,
        total_number_of_users,
        avg_number_of_users,
    }
}
