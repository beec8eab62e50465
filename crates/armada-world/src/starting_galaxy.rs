//! Default starting galaxy for the Armada engine.
//!
//! Creates three AI factions, each with a developed home world, a scout and
//! a warfleet, plus a field of unowned planets scattered deterministically
//! from the world seed. The first two factions start at war.

use armada_types::{FactionId, FactionTraits, FleetRole, GalaxyBounds, Position};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::WorldError;
use crate::faction::Faction;
use crate::fleet::Fleet;
use crate::galaxy::Galaxy;
use crate::planet::Planet;
use crate::rules::EconomyRules;

/// Number of unowned planets scattered across the galaxy.
const FRONTIER_PLANETS: usize = 18;

/// Production of a home world.
const HOME_PRODUCTION: u32 = 25;

/// Starting treasury of every faction.
const STARTING_TREASURY: u64 = 150;

/// Technologies available to research, in order.
const TECH_LIST: &[&str] = &[
    "long-range radar",
    "deflector shields",
    "fusion drives",
    "orbital shipyards",
    "planetary shields",
];

/// IDs of the factions created by [`create_starting_galaxy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingFactions {
    /// Aggressive faction, at war with `rigel`.
    pub vega: FactionId,
    /// Balanced faction, at war with `vega`.
    pub rigel: FactionId,
    /// Cautious faction at peace with everyone.
    pub altair: FactionId,
}

/// Build the default starting galaxy.
///
/// # Errors
///
/// Returns a [`WorldError`] if faction registration fails.
pub fn create_starting_galaxy(
    seed: u64,
    rules: EconomyRules,
) -> Result<(Galaxy, StartingFactions), WorldError> {
    let bounds = GalaxyBounds {
        width: 400.0,
        height: 300.0,
    };
    let tech_list = TECH_LIST.iter().map(|t| (*t).to_owned()).collect();
    let mut galaxy = Galaxy::new(bounds, tech_list, rules);

    let vega = add_home(
        &mut galaxy,
        "Vega Dominion",
        FactionTraits {
            social_ratio: 0.3,
            offensive_ratio: 2.0,
            defensive_ratio: 1.0,
        },
        Position::new(50.0, 50.0),
    )?;
    let rigel = add_home(
        &mut galaxy,
        "Rigel Compact",
        FactionTraits::default(),
        Position::new(350.0, 250.0),
    )?;
    let altair = add_home(
        &mut galaxy,
        "Altair League",
        FactionTraits {
            social_ratio: 0.8,
            offensive_ratio: 1.0,
            defensive_ratio: 3.0,
        },
        Position::new(200.0, 150.0),
    )?;
    galaxy.declare_war(vega, rigel)?;

    let mut rng = SmallRng::seed_from_u64(seed);
    for index in 0..FRONTIER_PLANETS {
        let position = Position::new(
            rng.random_range(0.0..bounds.width),
            rng.random_range(0.0..bounds.height),
        );
        let habitable = rng.random_bool(0.7);
        galaxy.add_planet(Planet::unowned(&format!("Frontier-{index}"), position, habitable));
    }

    Ok((
        galaxy,
        StartingFactions {
            vega,
            rigel,
            altair,
        },
    ))
}

/// Register a faction with a home world, a scout and a warfleet.
fn add_home(
    galaxy: &mut Galaxy,
    name: &str,
    traits: FactionTraits,
    home: Position,
) -> Result<FactionId, WorldError> {
    let mut faction = Faction::new(name, traits);
    faction.treasury = STARTING_TREASURY;
    let faction = galaxy.add_faction(faction)?;

    let planet = galaxy.add_planet(Planet::unowned(&format!("{name} Prime"), home, true));
    galaxy.settle(planet, faction, HOME_PRODUCTION)?;

    let rules = galaxy.rules().clone();
    galaxy.add_fleet(Fleet::new(faction, FleetRole::Scout, home, &rules));
    galaxy.add_fleet(Fleet::new(faction, FleetRole::Warfleet, home, &rules));
    Ok(faction)
}
