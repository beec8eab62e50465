//! The galaxy: authoritative, mutable world state.
//!
//! The [`Galaxy`] stores every planet, fleet and faction. It is owned by
//! the mutation context: the scheduler advances it once per tick and
//! applies committed AI actions to it. Snapshot tasks only ever read it.
//!
//! # Per-tick advance
//!
//! 1. Credit owned-planet production to owner treasuries.
//! 2. Progress research by `research_per_planet` per owned planet.
//! 3. Count down build queues and deliver finished items.
//! 4. Move fleets toward their destinations.
//! 5. Resolve arrivals (colonization, planet assaults).

use std::collections::BTreeMap;

use armada_types::{
    Action, FactionId, FleetId, FleetRole, GalaxyBounds, PlanetId, Position, ProductionItem,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::WorldError;
use crate::faction::Faction;
use crate::fleet::Fleet;
use crate::planet::{BuildOrder, Planet};
use crate::rules::EconomyRules;

/// Outcome of a warfleet reaching a hostile planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssaultReport {
    /// Faction that attacked.
    pub attacker: FactionId,
    /// Faction that held the planet.
    pub defender: FactionId,
    /// Planet under assault.
    pub planet: PlanetId,
    /// Attack strength of the assaulting fleet.
    pub attack: u32,
    /// Planet defense before the assault.
    pub defense: u32,
    /// Whether the planet changed hands.
    pub captured: bool,
}

/// Notable events produced by one [`Galaxy::advance`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceSummary {
    /// Planets settled this tick, with their new owner.
    pub colonized: Vec<(PlanetId, FactionId)>,
    /// Planets captured this tick, with their new owner.
    pub captured: Vec<(PlanetId, FactionId)>,
    /// Fleets destroyed this tick.
    pub fleets_lost: Vec<FleetId>,
    /// Technologies completed this tick, with the researching faction.
    pub research_completed: Vec<(FactionId, String)>,
    /// Planet assaults resolved this tick.
    pub assaults: Vec<AssaultReport>,
}

/// The galaxy holding all planets, fleets and factions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Galaxy {
    /// Playable extent.
    bounds: GalaxyBounds,
    /// All planets indexed by ID.
    planets: BTreeMap<PlanetId, Planet>,
    /// All fleets indexed by ID.
    fleets: BTreeMap<FleetId, Fleet>,
    /// All factions indexed by ID.
    factions: BTreeMap<FactionId, Faction>,
    /// Researchable technologies in research order.
    tech_list: Vec<String>,
    /// Economy and unit parameters.
    rules: EconomyRules,
}

impl Galaxy {
    /// Create an empty galaxy.
    pub const fn new(bounds: GalaxyBounds, tech_list: Vec<String>, rules: EconomyRules) -> Self {
        Self {
            bounds,
            planets: BTreeMap::new(),
            fleets: BTreeMap::new(),
            factions: BTreeMap::new(),
            tech_list,
            rules,
        }
    }

    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    /// Add a faction.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateFaction`] if the ID already exists.
    pub fn add_faction(&mut self, faction: Faction) -> Result<FactionId, WorldError> {
        let id = faction.id;
        if self.factions.contains_key(&id) {
            return Err(WorldError::DuplicateFaction(id));
        }
        self.factions.insert(id, faction);
        Ok(id)
    }

    /// Add a planet and return its ID.
    pub fn add_planet(&mut self, planet: Planet) -> PlanetId {
        let id = planet.id;
        self.planets.insert(id, planet);
        id
    }

    /// Add a fleet and return its ID.
    pub fn add_fleet(&mut self, fleet: Fleet) -> FleetId {
        let id = fleet.id;
        self.fleets.insert(id, fleet);
        id
    }

    /// Give an unowned planet to a faction as a developed colony.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PlanetNotFound`] or
    /// [`WorldError::FactionNotFound`] for unknown IDs.
    pub fn settle(
        &mut self,
        planet: PlanetId,
        faction: FactionId,
        production: u32,
    ) -> Result<(), WorldError> {
        if !self.factions.contains_key(&faction) {
            return Err(WorldError::FactionNotFound(faction));
        }
        let radar = self.rules.planet_radar;
        let planet = self
            .planets
            .get_mut(&planet)
            .ok_or(WorldError::PlanetNotFound(planet))?;
        planet.owner = Some(faction);
        planet.production = production;
        planet.radar_radius = radar;
        Ok(())
    }

    /// Declare mutual war between two factions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::FactionNotFound`] if either faction is unknown.
    pub fn declare_war(&mut self, a: FactionId, b: FactionId) -> Result<(), WorldError> {
        if !self.factions.contains_key(&b) {
            return Err(WorldError::FactionNotFound(b));
        }
        self.factions
            .get_mut(&a)
            .ok_or(WorldError::FactionNotFound(a))?
            .at_war_with
            .insert(b);
        if let Some(other) = self.factions.get_mut(&b) {
            other.at_war_with.insert(a);
        }
        Ok(())
    }

    /// Add production points to a faction treasury.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::FactionNotFound`] if the faction is unknown.
    pub fn credit(&mut self, faction: FactionId, amount: u64) -> Result<(), WorldError> {
        let record = self
            .factions
            .get_mut(&faction)
            .ok_or(WorldError::FactionNotFound(faction))?;
        record.treasury = record.treasury.saturating_add(amount);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Galaxy extent.
    pub const fn bounds(&self) -> GalaxyBounds {
        self.bounds
    }

    /// Economy rules in force.
    pub const fn rules(&self) -> &EconomyRules {
        &self.rules
    }

    /// Researchable technologies in research order.
    pub fn tech_list(&self) -> &[String] {
        &self.tech_list
    }

    /// Look up a faction.
    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    /// Iterate over all factions.
    pub fn factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    /// Look up a planet.
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(&id)
    }

    /// Iterate over all planets.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    /// Look up a fleet.
    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.get(&id)
    }

    /// Iterate over all fleets.
    pub fn fleets(&self) -> impl Iterator<Item = &Fleet> {
        self.fleets.values()
    }

    /// Radar sources (position, radius) of everything a faction owns.
    pub fn radar_sources(&self, faction: FactionId) -> Vec<(Position, f64)> {
        let planets = self
            .planets
            .values()
            .filter(|p| p.owner == Some(faction))
            .map(|p| (p.position, p.radar_radius));
        let fleets = self
            .fleets
            .values()
            .filter(|f| f.owner == faction)
            .map(|f| (f.position, f.radar_radius));
        planets.chain(fleets).collect()
    }

    // -------------------------------------------------------------------
    // Per-tick simulation
    // -------------------------------------------------------------------

    /// Advance economy, research, production and fleet movement by one tick.
    pub fn advance(&mut self) -> AdvanceSummary {
        let mut summary = AdvanceSummary::default();
        self.collect_production();
        self.progress_research(&mut summary);
        self.progress_build_queues();
        self.move_fleets(&mut summary);
        summary
    }

    /// Credit each owned planet's production to its owner.
    fn collect_production(&mut self) {
        for planet in self.planets.values() {
            let Some(owner) = planet.owner else { continue };
            if let Some(faction) = self.factions.get_mut(&owner) {
                faction.treasury = faction.treasury.saturating_add(u64::from(planet.production));
            }
        }
    }

    /// Add research points and complete technologies.
    fn progress_research(&mut self, summary: &mut AdvanceSummary) {
        let mut planet_counts: BTreeMap<FactionId, u32> = BTreeMap::new();
        for owner in self.planets.values().filter_map(|p| p.owner) {
            let count = planet_counts.entry(owner).or_default();
            *count = count.saturating_add(1);
        }

        for faction in self.factions.values_mut() {
            let Some(current) = faction.research.current.clone() else {
                continue;
            };
            let planets = planet_counts.get(&faction.id).copied().unwrap_or(0);
            let gained = planets.saturating_mul(self.rules.research_per_planet);
            faction.research.progress = faction.research.progress.saturating_add(gained);
            if faction.research.progress >= self.rules.research_cost {
                debug!(faction = %faction.id, tech = %current, "Research completed");
                faction.research.completed.insert(current.clone());
                faction.research.current = None;
                faction.research.progress = 0;
                summary.research_completed.push((faction.id, current));
            }
        }
    }

    /// Count down build queues and deliver finished items.
    fn progress_build_queues(&mut self) {
        let mut delivered: Vec<Fleet> = Vec::new();
        for planet in self.planets.values_mut() {
            let Some(owner) = planet.owner else {
                planet.build_queue.clear();
                continue;
            };
            let Some(front) = planet.build_queue.front_mut() else {
                continue;
            };
            front.remaining_ticks = front.remaining_ticks.saturating_sub(1);
            if front.remaining_ticks > 0 {
                continue;
            }
            let Some(order) = planet.build_queue.pop_front() else {
                continue;
            };
            match order.item {
                ProductionItem::Scout => {
                    delivered.push(Fleet::new(owner, FleetRole::Scout, planet.position, &self.rules));
                }
                ProductionItem::Warship => {
                    delivered.push(Fleet::new(
                        owner,
                        FleetRole::Warfleet,
                        planet.position,
                        &self.rules,
                    ));
                }
                ProductionItem::Defense => {
                    planet.defense = planet.defense.saturating_add(self.rules.defense_per_level);
                }
            }
        }
        for fleet in delivered {
            debug!(faction = %fleet.owner, fleet = %fleet.id, role = ?fleet.role, "Fleet built");
            self.fleets.insert(fleet.id, fleet);
        }
    }

    /// Move fleets and resolve the arrivals.
    fn move_fleets(&mut self, summary: &mut AdvanceSummary) {
        let mut arrived: Vec<FleetId> = Vec::new();
        for fleet in self.fleets.values_mut() {
            let Some(destination) = fleet.destination else {
                continue;
            };
            fleet.position = fleet.position.step_toward(destination, fleet.speed);
            if fleet.position == destination {
                arrived.push(fleet.id);
            }
        }
        for fleet_id in arrived {
            self.resolve_arrival(fleet_id, summary);
        }
    }

    /// Resolve a fleet reaching its destination.
    fn resolve_arrival(&mut self, fleet_id: FleetId, summary: &mut AdvanceSummary) {
        let Some(fleet) = self.fleets.get_mut(&fleet_id) else {
            return;
        };
        fleet.destination = None;
        let Some(target) = fleet.target.take() else {
            return;
        };
        let (owner, role, attack) = (fleet.owner, fleet.role, fleet.attack);
        let at_war_with = self
            .factions
            .get(&owner)
            .map(|f| f.at_war_with.clone())
            .unwrap_or_default();
        let colony_production = self.rules.colony_production;
        let planet_radar = self.rules.planet_radar;
        let Some(planet) = self.planets.get_mut(&target) else {
            return;
        };

        match role {
            FleetRole::ColonyShip if planet.owner.is_none() && planet.habitable => {
                planet.owner = Some(owner);
                planet.production = colony_production;
                planet.radar_radius = planet_radar;
                self.fleets.remove(&fleet_id);
                info!(faction = %owner, planet = %planet.name, "Planet colonized");
                summary.colonized.push((target, owner));
            }
            FleetRole::Warfleet
                if planet.owner.is_some_and(|o| at_war_with.contains(&o)) =>
            {
                let captured = attack > planet.defense;
                if let Some(defender) = planet.owner {
                    summary.assaults.push(AssaultReport {
                        attacker: owner,
                        defender,
                        planet: target,
                        attack,
                        defense: planet.defense,
                        captured,
                    });
                }
                if captured {
                    planet.owner = Some(owner);
                    planet.defense = 0;
                    planet.build_queue.clear();
                    info!(faction = %owner, planet = %planet.name, "Planet captured");
                    summary.captured.push((target, owner));
                } else {
                    planet.defense = planet.defense.saturating_sub(attack);
                    self.fleets.remove(&fleet_id);
                    info!(faction = %owner, planet = %planet.name, "Assault repelled");
                    summary.fleets_lost.push(fleet_id);
                }
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------
    // Action application
    // -------------------------------------------------------------------

    /// Apply one committed AI action on behalf of `faction`.
    ///
    /// Memory-only actions ([`Action::is_memory_only`]) are accepted as
    /// no-ops; the AI layer applies them to its own memory.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if an ID is unknown, the faction does not
    /// own the commanded entity, funds are insufficient or the order is
    /// invalid in the current state.
    pub fn apply(&mut self, faction: FactionId, action: &Action) -> Result<(), WorldError> {
        if !self.factions.contains_key(&faction) {
            return Err(WorldError::FactionNotFound(faction));
        }
        match action {
            Action::Colonize { source, target } => self.colonize(faction, *source, *target),
            Action::StartResearch { tech } => self.start_research(faction, tech),
            Action::MoveFleet { fleet, destination } => {
                let fleet = self.owned_fleet_mut(faction, *fleet)?;
                fleet.destination = Some(*destination);
                fleet.target = None;
                Ok(())
            }
            Action::QueueProduction { planet, item } => {
                self.queue_production(faction, *planet, *item)
            }
            Action::AttackPlanet { fleet, target } => self.attack_planet(faction, *fleet, *target),
            Action::SetDefensive { .. } | Action::ScheduleAttack { .. } | Action::CancelAttack => {
                Ok(())
            }
        }
    }

    /// Launch a colony ship from `source` toward `target`.
    fn colonize(
        &mut self,
        faction: FactionId,
        source: PlanetId,
        target: PlanetId,
    ) -> Result<(), WorldError> {
        let origin = self.owned_planet(faction, source)?.position;
        let destination = self
            .planets
            .get(&target)
            .ok_or(WorldError::PlanetNotFound(target))?;
        if destination.owner.is_some() || !destination.habitable {
            return Err(WorldError::InvalidOrder {
                reason: format!("planet {target} cannot be colonized"),
            });
        }
        let destination = destination.position;
        self.charge(faction, self.rules.colony_cost)?;

        let mut ship = Fleet::new(faction, FleetRole::ColonyShip, origin, &self.rules);
        ship.destination = Some(destination);
        ship.target = Some(target);
        self.fleets.insert(ship.id, ship);
        Ok(())
    }

    /// Switch the faction's research project.
    fn start_research(&mut self, faction: FactionId, tech: &str) -> Result<(), WorldError> {
        if !self.tech_list.iter().any(|t| t == tech) {
            return Err(WorldError::UnknownTech(tech.to_owned()));
        }
        let faction = self
            .factions
            .get_mut(&faction)
            .ok_or(WorldError::FactionNotFound(faction))?;
        if faction.research.completed.contains(tech) {
            return Err(WorldError::UnknownTech(tech.to_owned()));
        }
        if faction.research.current.as_deref() != Some(tech) {
            faction.research.current = Some(tech.to_owned());
            faction.research.progress = 0;
        }
        Ok(())
    }

    /// Pay for and enqueue a production item.
    fn queue_production(
        &mut self,
        faction: FactionId,
        planet: PlanetId,
        item: ProductionItem,
    ) -> Result<(), WorldError> {
        self.owned_planet(faction, planet)?;
        self.charge(faction, self.rules.cost_of(item))?;
        let build_ticks = self.rules.build_ticks.max(1);
        if let Some(planet) = self.planets.get_mut(&planet) {
            planet.build_queue.push_back(BuildOrder {
                item,
                remaining_ticks: build_ticks,
            });
        }
        Ok(())
    }

    /// Send a warfleet against a planet.
    fn attack_planet(
        &mut self,
        faction: FactionId,
        fleet: FleetId,
        target: PlanetId,
    ) -> Result<(), WorldError> {
        let position = self
            .planets
            .get(&target)
            .ok_or(WorldError::PlanetNotFound(target))?
            .position;
        let fleet = self.owned_fleet_mut(faction, fleet)?;
        if fleet.role != FleetRole::Warfleet {
            return Err(WorldError::InvalidOrder {
                reason: format!("fleet {} is not a warfleet", fleet.id),
            });
        }
        fleet.destination = Some(position);
        fleet.target = Some(target);
        Ok(())
    }

    /// Resolve a planet the faction must own.
    fn owned_planet(&self, faction: FactionId, planet: PlanetId) -> Result<&Planet, WorldError> {
        let found = self
            .planets
            .get(&planet)
            .ok_or(WorldError::PlanetNotFound(planet))?;
        if found.owner != Some(faction) {
            return Err(WorldError::PlanetNotOwned { faction, planet });
        }
        Ok(found)
    }

    /// Resolve a fleet the faction must own.
    fn owned_fleet_mut(
        &mut self,
        faction: FactionId,
        fleet: FleetId,
    ) -> Result<&mut Fleet, WorldError> {
        let found = self
            .fleets
            .get_mut(&fleet)
            .ok_or(WorldError::FleetNotFound(fleet))?;
        if found.owner != faction {
            return Err(WorldError::FleetNotOwned { faction, fleet });
        }
        Ok(found)
    }

    /// Deduct `cost` from the faction treasury.
    fn charge(&mut self, faction: FactionId, cost: u64) -> Result<(), WorldError> {
        let record = self
            .factions
            .get_mut(&faction)
            .ok_or(WorldError::FactionNotFound(faction))?;
        record.treasury = record
            .treasury
            .checked_sub(cost)
            .ok_or(WorldError::InsufficientFunds {
                needed: cost,
                available: record.treasury,
            })?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_types::FactionTraits;

    use super::*;

    fn bounds() -> GalaxyBounds {
        GalaxyBounds {
            width: 200.0,
            height: 200.0,
        }
    }

    fn galaxy_with_home() -> (Galaxy, FactionId, PlanetId) {
        let mut galaxy = Galaxy::new(
            bounds(),
            vec!["radar".to_owned(), "shields".to_owned()],
            EconomyRules::default(),
        );
        let faction = galaxy
            .add_faction(Faction::new("Vega", FactionTraits::default()))
            .unwrap();
        let home = galaxy.add_planet(Planet::unowned("Home", Position::new(10.0, 10.0), true));
        galaxy.settle(home, faction, 20).unwrap();
        (galaxy, faction, home)
    }

    fn fund(galaxy: &mut Galaxy, faction: FactionId, amount: u64) {
        galaxy.factions.get_mut(&faction).unwrap().treasury = amount;
    }

    #[test]
    fn production_is_credited_each_tick() {
        let (mut galaxy, faction, _) = galaxy_with_home();
        galaxy.advance();
        galaxy.advance();
        assert_eq!(galaxy.faction(faction).unwrap().treasury, 40);
    }

    #[test]
    fn colonize_charges_and_settles_on_arrival() {
        let (mut galaxy, faction, home) = galaxy_with_home();
        let target = galaxy.add_planet(Planet::unowned("Far", Position::new(22.0, 10.0), true));
        fund(&mut galaxy, faction, 200);

        galaxy
            .apply(faction, &Action::Colonize { source: home, target })
            .unwrap();
        assert_eq!(galaxy.faction(faction).unwrap().treasury, 80);

        let mut summary = AdvanceSummary::default();
        for _ in 0..3 {
            let step = galaxy.advance();
            summary.colonized.extend(step.colonized);
        }
        assert_eq!(summary.colonized, vec![(target, faction)]);
        assert_eq!(galaxy.planet(target).unwrap().owner, Some(faction));
        assert!(galaxy.fleets().all(|f| f.role != FleetRole::ColonyShip));
    }

    #[test]
    fn colonize_without_funds_is_rejected() {
        let (mut galaxy, faction, home) = galaxy_with_home();
        let target = galaxy.add_planet(Planet::unowned("Far", Position::new(50.0, 10.0), true));
        let err = galaxy
            .apply(faction, &Action::Colonize { source: home, target })
            .unwrap_err();
        assert!(matches!(err, WorldError::InsufficientFunds { needed: 120, .. }));
    }

    #[test]
    fn unknown_fleet_is_a_stale_reference() {
        let (mut galaxy, faction, _) = galaxy_with_home();
        let err = galaxy
            .apply(
                faction,
                &Action::MoveFleet {
                    fleet: FleetId::new(),
                    destination: Position::new(1.0, 1.0),
                },
            )
            .unwrap_err();
        assert!(err.is_stale_reference());
    }

    #[test]
    fn queued_warship_is_delivered_after_build_ticks() {
        let (mut galaxy, faction, home) = galaxy_with_home();
        fund(&mut galaxy, faction, 100);
        galaxy
            .apply(
                faction,
                &Action::QueueProduction {
                    planet: home,
                    item: ProductionItem::Warship,
                },
            )
            .unwrap();
        galaxy.advance();
        galaxy.advance();
        assert_eq!(galaxy.fleets().count(), 0);
        galaxy.advance();
        let fleets: Vec<_> = galaxy.fleets().collect();
        assert_eq!(fleets.len(), 1);
        assert_eq!(fleets.first().map(|f| f.role), Some(FleetRole::Warfleet));
    }

    #[test]
    fn research_completes_and_clears_project() {
        let (mut galaxy, faction, _) = galaxy_with_home();
        galaxy
            .apply(faction, &Action::StartResearch { tech: "radar".to_owned() })
            .unwrap();
        let mut completed = Vec::new();
        for _ in 0..25 {
            completed.extend(galaxy.advance().research_completed);
        }
        assert_eq!(completed, vec![(faction, "radar".to_owned())]);
        let record = galaxy.faction(faction).unwrap();
        assert!(record.research.current.is_none());
        assert!(galaxy
            .apply(faction, &Action::StartResearch { tech: "radar".to_owned() })
            .is_err());
    }

    #[test]
    fn weak_assault_is_repelled() {
        let (mut galaxy, faction, _) = galaxy_with_home();
        let rival = galaxy
            .add_faction(Faction::new("Rigel", FactionTraits::default()))
            .unwrap();
        let fort = galaxy.add_planet(Planet::unowned("Fort", Position::new(18.0, 10.0), true));
        galaxy.settle(fort, rival, 5).unwrap();
        galaxy.planets.get_mut(&fort).unwrap().defense = 50;
        galaxy.declare_war(faction, rival).unwrap();

        let fleet = galaxy.add_fleet(Fleet::new(
            faction,
            FleetRole::Warfleet,
            Position::new(10.0, 10.0),
            &EconomyRules::default(),
        ));
        galaxy
            .apply(faction, &Action::AttackPlanet { fleet, target: fort })
            .unwrap();
        let summary = galaxy.advance();
        assert_eq!(summary.fleets_lost, vec![fleet]);
        assert_eq!(
            summary.assaults,
            vec![AssaultReport {
                attacker: faction,
                defender: rival,
                planet: fort,
                attack: 12,
                defense: 50,
                captured: false,
            }]
        );
        assert_eq!(galaxy.planet(fort).unwrap().defense, 38);
        assert_eq!(galaxy.planet(fort).unwrap().owner, Some(rival));
    }

    #[test]
    fn memory_only_actions_are_noops() {
        let (mut galaxy, faction, _) = galaxy_with_home();
        assert!(galaxy.apply(faction, &Action::CancelAttack).is_ok());
    }

    #[test]
    fn galaxy_serializes_with_its_rules() {
        let (mut galaxy, faction, home) = galaxy_with_home();
        galaxy.rules.warship_cost = 77;
        let json = serde_json::to_string(&galaxy).unwrap();
        let restored: Galaxy = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.rules().warship_cost, 77);
        assert_eq!(restored.planet(home).unwrap().owner, Some(faction));
    }
}
