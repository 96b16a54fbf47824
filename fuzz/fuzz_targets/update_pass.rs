#![no_main]

//! Input layout: a markup document, a NUL byte, then 3-byte primitive
//! requests `(target, kind, payload)`.

use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use table::{Kind, Table, TableClip, TableStore, invariants};
use update::{UpdateConfig, UpdateError, UpdatePass, UpdatePrimitive};

fn payload(choice: u8) -> TableClip {
    let markup = match choice % 4 {
        0 => "<i/>",
        1 => "w",
        2 => "x<k>y</k>",
        _ => "<!--c-->",
    };
    TableClip::parse(markup).expect("static payload")
}

fn primitive(table: &Table, target: u8, kind: u8, choice: u8) -> UpdatePrimitive {
    let target = target as usize % table.len();
    match kind % 9 {
        0 => UpdatePrimitive::DeleteNode { target },
        1 => UpdatePrimitive::InsertInto { target, clip: payload(choice) },
        2 => UpdatePrimitive::InsertIntoAsFirst { target, clip: payload(choice) },
        3 => UpdatePrimitive::InsertBefore { target, clip: payload(choice) },
        4 => UpdatePrimitive::InsertAfter { target, clip: payload(choice) },
        5 => UpdatePrimitive::InsertAttribute {
            target,
            clip: TableClip::attributes(&[("n", "1")]).expect("static attributes"),
        },
        6 => UpdatePrimitive::RenameNode { target, name: "r".into(), uri: None },
        7 if table.kind(target) == Kind::Attribute => UpdatePrimitive::ReplaceNode {
            target,
            clip: TableClip::attributes(&[("p", "2")]).expect("static attributes"),
        },
        7 => UpdatePrimitive::ReplaceNode { target, clip: payload(choice) },
        _ => UpdatePrimitive::ReplaceValue { target, value: "u".into() },
    }
}

fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let Ok(markup) = std::str::from_utf8(&data[..split]) else {
        return;
    };
    let Ok(mut table) = Table::parse(markup) else {
        return;
    };
    let mut seen = HashSet::new();
    let primitives: Vec<UpdatePrimitive> = data[split + 1..]
        .chunks_exact(3)
        .map(|c| primitive(&table, c[0], c[1], c[2]))
        .filter(|p| p.validate(&table).is_ok())
        .filter(|p| seen.insert((p.target(), p.kind())))
        .collect();

    let before = snapshot(&table);
    let mut pass = UpdatePass::new(
        &mut table,
        UpdateConfig { merge_adjacent_text: true, verify_invariants: false },
    );
    pass.extend(primitives);
    match pass.apply() {
        Ok(_) => {
            if let Err(violation) = invariants::check(&table) {
                panic!("pass left an inconsistent table: {violation}");
            }
        }
        Err(UpdateError::Table(err)) => panic!("storage failure: {err}"),
        Err(_) => assert_eq!(snapshot(&table), before, "rejected pass modified the table"),
    }
});

fn snapshot(table: &Table) -> String {
    table::snapshot::to_xml(table)
}
