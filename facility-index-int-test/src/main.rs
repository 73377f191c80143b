use facility_index::{FacilityIndex, IndexResult, Position, QueryStrategy, RadiusQuery};
use facility_index_int_test::test_util::austria_records;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn main() -> IndexResult<()> {
    colog::init();
    log::info!("Starting stress test...");

    let count = 200_000;
    let records = austria_records(1, count);

    for strategy in [QueryStrategy::Grid, QueryStrategy::Scan] {
        let index = FacilityIndex::builder().strategy(strategy).build()?;

        let start = Instant::now();
        index.load(records.clone())?;
        log::info!("{:?}: loaded {} records in {:?}", strategy, count, start.elapsed());

        let stats = index.stats();
        log::info!(
            "{:?}: {} occupied cells, at most {} records per cell",
            strategy,
            stats.occupied_cells,
            stats.max_cell_occupancy
        );

        let mut rng = StdRng::seed_from_u64(2);
        let queries = 1_000;
        let start = Instant::now();
        let mut matched = 0usize;
        for _ in 0..queries {
            let center = Position::new(rng.gen_range(46.4..49.0), rng.gen_range(9.5..17.2));
            let query = RadiusQuery::new(center, rng.gen_range(500.0..20_000.0))
                .with_types(["hospital", "clinic"])
                .with_limit(50);
            matched += index.query(&query)?.len();
        }
        log::info!(
            "{:?}: ran {} queries matching {} facilities in {:?}",
            strategy,
            queries,
            matched,
            start.elapsed()
        );

        let start = Instant::now();
        for record in records.iter().take(10_000) {
            let mut moved = record.clone();
            moved.position = Position::new(rng.gen_range(46.4..49.0), rng.gen_range(9.5..17.2));
            index.upsert(moved)?;
        }
        log::info!("{:?}: upserted 10000 records in {:?}", strategy, start.elapsed());
    }

    Ok(())
}
