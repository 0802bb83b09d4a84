//! Property tests for the capacity invariant and FIFO admission.

use enrollvisor::{ClaimantId, Enrollment, EnrollmentConfig, EventKind, SectionId};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Join(usize),
    Admit(usize),
    Open,
    Withdraw(usize),
    Release(usize),
    Remove(usize),
}

fn arb_op(claimants: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..claimants).prop_map(Op::Join),
        2 => (0..claimants).prop_map(Op::Admit),
        2 => Just(Op::Open),
        2 => (0..claimants).prop_map(Op::Withdraw),
        1 => (0..claimants).prop_map(Op::Release),
        1 => (0..claimants).prop_map(Op::Remove),
    ]
}

fn apply(enr: &mut Enrollment, section: SectionId, ids: &[ClaimantId], op: &Op) {
    // Errors are valid outcomes here; only the invariants matter.
    let _ = match *op {
        Op::Join(i) => enr.join_or_wait(ids[i], section).map(|_| ()),
        Op::Admit(i) => enr.try_admit(section, ids[i]),
        Op::Open => enr.open(section).map(|_| ()),
        Op::Withdraw(i) => enr.withdraw(ids[i], section).map(|_| ()),
        Op::Release(i) => enr.release(section, ids[i]).map(|_| ()),
        Op::Remove(i) => enr.remove_claimant(ids[i]),
    };
}

proptest! {
    /// Occupancy never exceeds capacity, and every waiting claimant's
    /// pending reference points at the section it is registered on.
    #[test]
    fn capacity_and_pending_invariants_hold(
        capacity in 0usize..4,
        ops in prop::collection::vec(arb_op(6), 1..60)
    ) {
        let mut enr = Enrollment::new(EnrollmentConfig::default());
        let s = enr.add_section("PROP", capacity);
        let ids: Vec<ClaimantId> = (0..6).map(|i| enr.add_claimant(format!("c{i}"))).collect();

        for op in &ops {
            apply(&mut enr, s, &ids, op);

            let section = enr.section(s).unwrap();
            prop_assert!(section.occupant_list().len() <= capacity);

            for c in enr.claimants() {
                let waiting = section.is_waiting(c.id());
                prop_assert_eq!(c.pending() == Some(s), waiting);
                if c.pending() == Some(s) {
                    let positions = section.waitlist().iter().filter(|id| **id == c.id()).count();
                    prop_assert_eq!(positions, 1);
                }
                prop_assert_eq!(c.holds(s), section.is_seated(c.id()));
            }
            for id in section.waitlist() {
                prop_assert!(enr.claimant(id).is_some());
            }
        }
    }

    /// With m free seats and n > m waiters, one open admits exactly the
    /// first m in registration order, and nobody is notified twice.
    #[test]
    fn open_admits_first_m_in_order(n in 1usize..12, m_frac in 0.0f64..1.0) {
        let m = ((n as f64) * m_frac) as usize;
        let mut enr = Enrollment::new(EnrollmentConfig::default());
        let s = enr.add_section("FIFO", m);
        let ids: Vec<ClaimantId> = (0..n).map(|i| enr.add_claimant(format!("c{i}"))).collect();
        for id in &ids {
            enr.join_or_wait(*id, s).unwrap();
        }
        let mut rx = enr.subscribe();

        let report = enr.open(s).unwrap();
        prop_assert_eq!(&report.claimed, &ids[..m].to_vec());
        prop_assert_eq!(enr.section(s).unwrap().waitlist(), ids[m..].to_vec());

        let mut notified: HashMap<ClaimantId, usize> = HashMap::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ClaimantNotified {
                *notified.entry(ev.claimant.unwrap()).or_default() += 1;
            }
        }
        prop_assert_eq!(notified.len(), n);
        prop_assert!(notified.values().all(|v| *v == 1));
    }
}
