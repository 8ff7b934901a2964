use std::env;

use visitset::Dense;

fn main() {
    let mut args = env::args();
    args.next();
    let n: usize = args
        .next()
        .map(|s| s.parse().expect("Pass the number of nodes as an integer"))
        .unwrap_or(100);

    let mut s = Dense::new();
    println!("contains 1: {}", s.contains(1));
    s.add(1);
    println!("contains 1: {}", s.contains(1));
    s.reset();
    println!("contains 1: {}", s.contains(1));

    // Size once for the largest node index, then reuse across passes.
    s.grow(n.saturating_sub(1));
    for step in [2, 3, 5] {
        s.reset();
        for i in (0..n).step_by(step) {
            s.add(i);
        }
        println!("every {step}th of {n}: {} nodes marked", s.count());
    }

    if let Err(err) = s.try_add(-1) {
        println!("rejected -1: {err}");
    }
}
