#![no_main]

use libfuzzer_sys::fuzz_target;
use table::{Table, invariants, snapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = Table::parse(input) else {
        return;
    };
    if let Err(violation) = invariants::check(&table) {
        panic!("builder produced an inconsistent table: {violation}");
    }
    let markup = snapshot::to_xml(&table);
    if let Ok(reparsed) = Table::parse(&markup) {
        if let Err(violation) = invariants::check(&reparsed) {
            panic!("reparsed table is inconsistent: {violation}");
        }
    }
});
