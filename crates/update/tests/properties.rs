//! Property tests over random documents and random primitive sets.

use proptest::prelude::*;
use proptest::test_runner::Config;
use std::cmp::Ordering;
use std::collections::HashSet;
use table::{BuilderConfig, Kind, Pre, Table, TableBuilder, TableClip, TableStore, invariants};
use update::{UpdateConfig, UpdateOrder, UpdatePass, UpdatePrimitive};

#[derive(Clone, Debug)]
enum Event {
    Open(u8),
    Close,
    Attribute(u8),
    Text(u8),
    Comment,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => (0u8..3).prop_map(Event::Open),
        3 => Just(Event::Close),
        2 => (0u8..3).prop_map(Event::Attribute),
        3 => (0u8..3).prop_map(Event::Text),
        1 => Just(Event::Comment),
    ]
}

fn document() -> impl Strategy<Value = Table> {
    prop::collection::vec(event(), 1..48).prop_map(|events| {
        let mut builder = TableBuilder::new(BuilderConfig::default());
        for event in events {
            match event {
                Event::Open(n) => {
                    builder.start_element(&format!("e{n}")).unwrap();
                }
                Event::Close => {
                    builder.end_element();
                }
                Event::Attribute(n) => {
                    let _ = builder.attribute(&format!("a{n}"), "v");
                }
                Event::Text(n) => builder.text(&format!("t{n}")).unwrap(),
                Event::Comment => {
                    builder.comment("c").unwrap();
                }
            }
        }
        builder.finish()
    })
}

/// (target seed, primitive kind, payload choice)
type Seed = (usize, u8, u8);

fn payload(choice: u8) -> TableClip {
    match choice % 3 {
        0 => TableClip::parse("<i><j/></i>").unwrap(),
        1 => TableClip::text("w").unwrap(),
        _ => TableClip::parse("x<k/>").unwrap(),
    }
}

fn primitive(table: &Table, (seed, kind, choice): Seed) -> Option<UpdatePrimitive> {
    let target = seed % table.len();
    let primitive = match kind % 9 {
        0 => UpdatePrimitive::DeleteNode { target },
        1 => UpdatePrimitive::InsertInto {
            target,
            clip: payload(choice),
        },
        2 => UpdatePrimitive::InsertIntoAsFirst {
            target,
            clip: payload(choice),
        },
        3 => UpdatePrimitive::InsertBefore {
            target,
            clip: payload(choice),
        },
        4 => UpdatePrimitive::InsertAfter {
            target,
            clip: payload(choice),
        },
        5 => UpdatePrimitive::InsertAttribute {
            target,
            clip: TableClip::attributes(&[("n", "1")]).unwrap(),
        },
        6 => UpdatePrimitive::RenameNode {
            target,
            name: "r".to_string(),
            uri: None,
        },
        7 => {
            let clip = if table.kind(target) == Kind::Attribute {
                TableClip::attributes(&[("p", "2")]).unwrap()
            } else {
                payload(choice)
            };
            UpdatePrimitive::ReplaceNode { target, clip }
        }
        _ => UpdatePrimitive::ReplaceValue {
            target,
            value: "u".to_string(),
        },
    };
    primitive.validate(table).ok().map(|_| primitive)
}

/// Valid primitives with no (target, kind) duplicates.
fn primitives(table: &Table, seeds: &[Seed]) -> Vec<UpdatePrimitive> {
    let mut seen = HashSet::new();
    seeds
        .iter()
        .filter_map(|&seed| primitive(table, seed))
        .filter(|p| seen.insert((p.target(), p.kind())))
        .collect()
}

fn is_descendant(table: &Table, ancestor: Pre, node: Pre) -> bool {
    node > ancestor && node < ancestor + table.size(ancestor)
}

fn seeds() -> impl Strategy<Value = Vec<Seed>> {
    prop::collection::vec((0usize..1024, 0u8..9, 0u8..3), 0..24)
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn sorting_is_deterministic(table in document(), seeds in seeds()) {
        let mut once = primitives(&table, &seeds);
        let order = UpdateOrder::new(&table);
        order.sort(&mut once).unwrap();
        let mut twice = once.clone();
        twice.reverse();
        order.sort(&mut twice).unwrap();
        let keys = |ps: &[UpdatePrimitive]| -> Vec<_> {
            ps.iter().map(|p| (p.target(), p.kind())).collect()
        };
        prop_assert_eq!(keys(&once), keys(&twice));
    }

    #[test]
    fn comparator_is_antisymmetric(table in document(), seeds in seeds()) {
        let all = primitives(&table, &seeds);
        let order = UpdateOrder::new(&table);
        for a in &all {
            for b in &all {
                if a.target() == b.target() && a.kind() == b.kind() {
                    continue;
                }
                let ab = order.compare(a, b).unwrap();
                let ba = order.compare(b, a).unwrap();
                prop_assert_eq!(ab, ba.reverse());
                prop_assert_ne!(ab, Ordering::Equal);
            }
        }
    }

    #[test]
    fn descendants_precede_anchored_ancestors(table in document(), seeds in seeds()) {
        let all = primitives(&table, &seeds);
        let order = UpdateOrder::new(&table);
        for ancestor in &all {
            if ancestor.kind().rank() == 0 || ancestor.kind() == update::PrimitiveKind::InsertInto {
                // end-anchored primitives act after the whole subtree
                continue;
            }
            for child in &all {
                let node = child.target();
                if !is_descendant(&table, ancestor.target(), node)
                    || table.kind(node) == Kind::Attribute
                {
                    continue;
                }
                prop_assert_eq!(order.compare(child, ancestor).unwrap(), Ordering::Less);
            }
        }
    }

    #[test]
    fn passes_leave_a_consistent_table(table in document(), seeds in seeds()) {
        let mut table = table;
        let all = primitives(&table, &seeds);
        let mut pass = UpdatePass::new(
            &mut table,
            UpdateConfig { merge_adjacent_text: true, verify_invariants: false },
        );
        pass.extend(all);
        pass.apply().unwrap();
        prop_assert_eq!(invariants::check(&table), Ok(()));
    }
}
