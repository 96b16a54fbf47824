use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use table::{Table, TableClip, TableStore};
use update::{UpdateConfig, UpdatePass, UpdatePrimitive};

const SMALL_ITEMS: usize = 64;
const LARGE_ITEMS: usize = 10_000;

fn make_items(items: usize) -> Table {
    let mut markup = String::with_capacity(items * 32 + 16);
    markup.push_str("<list>");
    for i in 0..items {
        markup.push_str(&format!(r#"<item id="{i}"><name>n{i}</name>t{i}</item>"#));
    }
    markup.push_str("</list>");
    Table::parse(&markup).unwrap()
}

/// Every third item deleted, every third renamed, every third gets a child.
fn mixed_primitives(table: &Table) -> Vec<UpdatePrimitive> {
    let clip = TableClip::parse("<extra>x</extra>").unwrap();
    let mut primitives = Vec::new();
    let mut pre = 2;
    let mut i = 0;
    while pre < table.len() {
        primitives.push(match i % 3 {
            0 => UpdatePrimitive::DeleteNode { target: pre },
            1 => UpdatePrimitive::RenameNode {
                target: pre,
                name: "entry".to_string(),
                uri: None,
            },
            _ => UpdatePrimitive::InsertInto {
                target: pre,
                clip: clip.clone(),
            },
        });
        pre += table.size(pre);
        i += 1;
    }
    primitives
}

fn run_pass(table: &mut Table, primitives: Vec<UpdatePrimitive>) {
    let mut pass = UpdatePass::new(
        table,
        UpdateConfig {
            merge_adjacent_text: true,
            verify_invariants: false,
        },
    );
    pass.extend(primitives);
    black_box(pass.apply().unwrap());
}

fn bench_mixed_pass_small(c: &mut Criterion) {
    let table = make_items(SMALL_ITEMS);
    let primitives = mixed_primitives(&table);
    c.bench_function("bench_mixed_pass_small", |b| {
        b.iter_batched(
            || (table.clone(), primitives.clone()),
            |(mut table, primitives)| run_pass(&mut table, primitives),
            BatchSize::SmallInput,
        );
    });
}

fn bench_mixed_pass_large(c: &mut Criterion) {
    let table = make_items(LARGE_ITEMS);
    let primitives = mixed_primitives(&table);
    c.bench_function("bench_mixed_pass_large", |b| {
        b.iter_batched(
            || (table.clone(), primitives.clone()),
            |(mut table, primitives)| run_pass(&mut table, primitives),
            BatchSize::LargeInput,
        );
    });
}

fn bench_text_coalescing(c: &mut Criterion) {
    let table = make_items(LARGE_ITEMS);
    // replacing each <name> with text joins it to the item's trailing text
    let mut primitives = Vec::new();
    let mut pre = 2;
    while pre < table.len() {
        let name = pre + table.attribute_size(pre);
        primitives.push(UpdatePrimitive::ReplaceNode {
            target: name,
            clip: TableClip::text("lead").unwrap(),
        });
        pre += table.size(pre);
    }
    c.bench_function("bench_text_coalescing", |b| {
        b.iter_batched(
            || (table.clone(), primitives.clone()),
            |(mut table, primitives)| run_pass(&mut table, primitives),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_mixed_pass_small,
    bench_mixed_pass_large,
    bench_text_coalescing
);
criterion_main!(benches);
