use divan::{Bencher, black_box};
use facet_setter_shootout::{Dummy, Strategy, TEXT_PROPERTY};

fn main() {
    divan::main();
}

#[divan::bench(args = Strategy::ALL)]
fn set_text(bencher: Bencher, strategy: Strategy) {
    let mut dummy = Dummy::new();
    let mut accessor = strategy
        .build(&mut dummy, TEXT_PROPERTY)
        .expect("accessor should build");
    let value = String::from("value");

    bencher.bench_local(|| (accessor.action)(black_box(value.clone())));
}

#[divan::bench(args = Strategy::ALL)]
fn build_accessor(bencher: Bencher, strategy: Strategy) {
    let mut dummy = Dummy::new();
    bencher.bench_local(|| {
        let accessor = strategy.build(black_box(&mut dummy), black_box(TEXT_PROPERTY));
        black_box(accessor.is_ok())
    });
}
