//! Unit tests for pt-agent.

#[cfg(test)]
mod record {
    use pt_core::{AgentId, BuildingId};

    use crate::{AgentBuilder, HealthState, Location, MORALE_MAX, Payload, SocialClass};

    #[test]
    fn contagious_states() {
        assert!(!HealthState::Healthy.is_contagious());
        assert!(HealthState::Incubating.is_contagious());
        assert!(HealthState::Infected.is_contagious());
        assert!(!HealthState::Deceased.is_contagious());
        assert!(!HealthState::Deceased.is_alive());
    }

    #[test]
    fn morale_is_clamped() {
        let mut r = AgentBuilder::new(AgentId(0)).build(1, 0.0);
        r.adjust_morale(250.0, -40.0);
        assert_eq!(r.awareness, MORALE_MAX);
        assert_eq!(r.panic, 0.0);
        r.adjust_morale(-500.0, f32::NAN);
        assert_eq!(r.awareness, 0.0);
        assert_eq!(r.panic, 0.0);
    }

    #[test]
    fn susceptibility_orders_classes() {
        assert!(SocialClass::Nobility.susceptibility() < SocialClass::Clergy.susceptibility());
        assert!(SocialClass::Merchant.susceptibility() < SocialClass::Commoner.susceptibility());
        assert_eq!(SocialClass::Peasant.susceptibility(), 1.2);
    }

    #[test]
    fn occupied_building_prefers_visit() {
        let mut r = AgentBuilder::new(AgentId(1))
            .home(BuildingId(4))
            .location(Location::Interior)
            .build(1, 0.0);
        assert_eq!(r.occupied_building(), Some(BuildingId(4)));
        r.motion.visiting = Some(BuildingId(9));
        assert_eq!(r.occupied_building(), Some(BuildingId(9)));
        r.location = Location::Outdoor;
        assert_eq!(r.occupied_building(), None);
    }

    #[test]
    fn payload_downcast() {
        #[derive(Debug, PartialEq)]
        struct Look { hue: u8 }

        let p = Payload::new(Look { hue: 7 });
        assert_eq!(p.downcast_ref::<Look>(), Some(&Look { hue: 7 }));
        assert!(p.downcast_ref::<u32>().is_none());
        assert!(Payload::none().downcast_ref::<Look>().is_none());
        // Clones share the same allocation.
        let q = p.clone();
        assert_eq!(q.downcast_ref::<Look>().map(|l| l.hue), Some(7));
    }
}

#[cfg(test)]
mod builder {
    use pt_core::{AgentId, Vec2};

    use crate::{AgentBuilder, HealthState, Role};

    #[test]
    fn defaults() {
        let r = AgentBuilder::new(AgentId(5)).build(9, 2.5);
        assert_eq!(r.health, HealthState::Healthy);
        assert_eq!(r.state_entered_at, 2.5);
        assert_eq!(r.last_update_at, 2.5);
        assert_eq!(r.schedule_seed, 5);
        assert_eq!(r.role, Role::Laborer);
        assert!(r.plague.is_none());
        assert!(r.home.is_none());
    }

    #[test]
    fn contagious_start_gets_plague_info() {
        let r = AgentBuilder::new(AgentId(2))
            .health(HealthState::Infected)
            .position(Vec2::new(1.0, 2.0))
            .build(9, 3.0);
        let info = r.plague.expect("infected agents carry plague info");
        assert_eq!(info.onset_at, 3.0);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentBuilder::new(AgentId(8)).build(77, 0.0);
        let mut b = AgentBuilder::new(AgentId(8)).build(77, 0.0);
        let mut c = AgentBuilder::new(AgentId(9)).build(77, 0.0);
        let xa: u64 = a.rng.random();
        let xb: u64 = b.rng.random();
        let xc: u64 = c.rng.random();
        assert_eq!(xa, xb);
        assert_ne!(xa, xc);
    }

    #[test]
    fn initial_morale_clamped() {
        let r = AgentBuilder::new(AgentId(0)).morale(140.0, -3.0).build(0, 0.0);
        assert_eq!(r.awareness, 100.0);
        assert_eq!(r.panic, 0.0);
    }
}

#[cfg(test)]
mod registry {
    use pt_core::{AgentId, BuildingId, Vec2};

    use crate::{AgentBuilder, AgentError, AgentRegistry, HealthState, Location};

    fn registry() -> AgentRegistry {
        let mut reg = AgentRegistry::new();
        for (i, health) in [
            HealthState::Healthy,
            HealthState::Incubating,
            HealthState::Infected,
            HealthState::Deceased,
            HealthState::Healthy,
        ]
        .into_iter()
        .enumerate()
        {
            let mut b = AgentBuilder::new(AgentId(i as u32 * 2))
                .health(health)
                .position(Vec2::new(i as f32, 0.0));
            if i < 2 {
                b = b.home(BuildingId(1)).location(Location::Interior);
            }
            reg.insert(b.build(1, 0.0)).unwrap();
        }
        reg
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut reg = registry();
        let dup = AgentBuilder::new(AgentId(2)).build(1, 0.0);
        assert_eq!(reg.insert(dup), Err(AgentError::DuplicateAgent(AgentId(2))));
        // The original record is untouched.
        assert_eq!(reg.get(AgentId(2)).map(|r| r.health), Some(HealthState::Incubating));
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn require_mut_reports_missing() {
        let mut reg = registry();
        assert_eq!(reg.require_mut(AgentId(3)).err(), Some(AgentError::NotFound(AgentId(3))));
        assert!(reg.require_mut(AgentId(4)).is_ok());
    }

    #[test]
    fn iteration_is_id_ordered() {
        let reg = registry();
        let ids: Vec<u32> = reg.ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![0, 2, 4, 6, 8]);
        assert_eq!(reg.next_id(), AgentId(9));
        assert_eq!(AgentRegistry::new().next_id(), AgentId(0));
    }

    #[test]
    fn counts_and_snapshots() {
        let reg = registry();
        let c = reg.counts();
        assert_eq!((c.healthy, c.incubating, c.infected, c.deceased), (2, 1, 1, 1));
        assert_eq!(c.total(), 5);
        assert_eq!(c.alive(), 4);
        assert_eq!(c.contagious(), 2);

        let snaps = reg.outdoor_snapshots();
        let ids: Vec<u32> = snaps.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![4, 6, 8]);
    }

    #[test]
    fn household_and_occupants() {
        let mut reg = registry();
        assert_eq!(reg.household(BuildingId(1)).count(), 2);
        assert_eq!(reg.occupants(BuildingId(1)).count(), 2);
        reg.get_mut(AgentId(0)).unwrap().location = Location::Outdoor;
        assert_eq!(reg.household(BuildingId(1)).count(), 2);
        assert_eq!(reg.occupants(BuildingId(1)).count(), 1);
    }
}
