criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        compiling_war_genome,
        parsing_war_bytecode,
        simulating_one_war_game,
        simulating_crazy_eights_batch,
        searching_crazy_eights_mcts,
        screening_fitness,
}

use deckforge::bytecode;
use deckforge::catalog;
use deckforge::fitness::Evaluate;
use deckforge::fitness::Evaluator;
use deckforge::fitness::FitnessConfig;
use deckforge::mcts::Mcts;
use deckforge::sim::AiKind;
use deckforge::sim::Driver;
use deckforge::state::Lcg;

fn compiling_war_genome(c: &mut criterion::Criterion) {
    let genome = catalog::war();
    c.bench_function("compile the War genome", |b| {
        b.iter(|| bytecode::compile(&genome).expect("compile"))
    });
}

fn parsing_war_bytecode(c: &mut criterion::Criterion) {
    let bytes = bytecode::compile(&catalog::war()).expect("compile");
    c.bench_function("parse the War bytecode", |b| {
        b.iter(|| bytecode::parse(&bytes).expect("parse"))
    });
}

fn simulating_one_war_game(c: &mut criterion::Criterion) {
    let driver = Driver::new();
    let engine = driver.engine_for(&catalog::war()).expect("engine");
    c.bench_function("simulate one War game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            driver.run_single(&engine, &[AiKind::Random; 4], seed)
        })
    });
}

fn simulating_crazy_eights_batch(c: &mut criterion::Criterion) {
    let driver = Driver::new();
    let genome = catalog::crazy_eights();
    c.bench_function("run a 100-game Crazy 8s batch", |b| {
        b.iter(|| driver.run_batch(&genome, 100, AiKind::Random, 7).expect("batch"))
    });
}

fn searching_crazy_eights_mcts(c: &mut criterion::Criterion) {
    let driver = Driver::new();
    let engine = driver.engine_for(&catalog::crazy_eights()).expect("engine");
    let mut rng = Lcg::new(3);
    let mut state = driver.states().acquire();
    engine.setup(&mut state, &mut rng);
    let mut buf = vec![];
    engine.step_moves(&mut state, &mut buf);
    c.bench_function("500-iteration MCTS search", |b| {
        b.iter(|| Mcts::new(500).search(&engine, &state, driver.states(), &mut rng))
    });
}

fn screening_fitness(c: &mut criterion::Criterion) {
    let genome = catalog::scopa();
    c.bench_function("screen a seed genome", |b| {
        // fresh evaluator per iteration, otherwise the cache answers
        b.iter(|| Evaluator::new(FitnessConfig::default(), 1).screen(&genome))
    });
}
