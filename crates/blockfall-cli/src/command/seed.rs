use blockfall_engine::PieceSeed;
use rand::Rng as _;

pub(crate) fn run() {
    let seed: PieceSeed = rand::rng().random();
    println!("{seed}");
}
