//! Lists friends and implicit relationships after each refresh

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use dgs_core::{Discord, Relationship, RelationshipManager, RelationshipType, Result};
use rand::seq::IndexedRandom;
use tracing::info;

fn filtered(relationships: &RelationshipManager<'_>, kind: RelationshipType) -> Result<Vec<Relationship>> {
    relationships.filter(|relationship| relationship.kind() == Ok(kind))?;
    (0..relationships.count()?).map(|i| relationships.get_at(i)).collect()
}

fn list(relationships: &RelationshipManager<'_>) -> Result<()> {
    let friends = filtered(relationships, RelationshipType::Friend)?;
    info!("you have {} friends", friends.len());
    for friend in &friends {
        info!("  {}#{}", friend.user().username(), friend.user().discriminator());
    }

    if let Some(friend) = friends.choose(&mut rand::rng()) {
        let user_id = friend.user().id();
        info!("fetching {}", user_id);
        let found = relationships.get(user_id)?;
        info!("found {}", found.user().username());
    }

    info!("implicit relationships:");
    for relationship in filtered(relationships, RelationshipType::Implicit)? {
        info!("  {}#{}", relationship.user().username(), relationship.user().discriminator());
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let discord = Discord::from_config(&config)?;
    let relationships = discord.relationships()?;

    let refreshed = Rc::new(Cell::new(false));
    let flag = refreshed.clone();
    relationships.on_refresh(move || flag.set(true));
    relationships.on_relationship_update(|relationship| {
        info!("relationship with {} changed", relationship.user().username());
    });

    dgs_demos::pump(&[&discord], Duration::from_millis(100), |_| {
        if refreshed.replace(false) {
            list(&relationships)?;
        }
        Ok(ControlFlow::Continue(()))
    })
}
