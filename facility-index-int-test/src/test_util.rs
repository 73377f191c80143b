use facility_index::{FacilityIndex, FacilityRecord, IndexResult, Position, QueryStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::backtrace::Backtrace;
use std::time::Instant;

/// Facility types used by generated datasets.
pub const FACILITY_TYPES: [&str; 6] = [
    "hospital",
    "clinic",
    "pharmacy",
    "doctors",
    "dentist",
    "laboratory",
];

/// Runs a test between a setup and a teardown step and reports failures
/// with the stage that failed.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> IndexResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> IndexResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> IndexResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx)
                    .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();

    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let message = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", message), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed. Error: {}", error);
}

#[derive(Clone)]
pub struct TestContext {
    index: FacilityIndex,
}

impl TestContext {
    pub fn new(index: FacilityIndex) -> Self {
        TestContext { index }
    }

    pub fn index(&self) -> &FacilityIndex {
        &self.index
    }
}

/// An empty index with the default configuration.
pub fn create_test_context() -> IndexResult<TestContext> {
    Ok(TestContext::new(FacilityIndex::new()))
}

/// An empty index that answers queries by scanning every record.
pub fn create_scan_context() -> IndexResult<TestContext> {
    let index = FacilityIndex::builder()
        .strategy(QueryStrategy::Scan)
        .build()?;
    Ok(TestContext::new(index))
}

/// An index holding [`vienna_records`].
pub fn create_vienna_context() -> IndexResult<TestContext> {
    let ctx = create_test_context()?;
    ctx.index().load(vienna_records())?;
    Ok(ctx)
}

pub fn cleanup(ctx: TestContext) -> IndexResult<()> {
    ctx.index().clear();
    if !ctx.index().is_empty() {
        eprintln!("Warning: index not empty after clear");
    }
    Ok(())
}

/// Three facilities in Vienna.
///
/// Seen from `vienna_center()`, A (hospital) is about 1.3 km away, B
/// (pharmacy) about 1.9 km and C (hospital) about 9.7 km.
pub fn vienna_records() -> Vec<FacilityRecord> {
    vec![
        FacilityRecord::new(1, Position::new(48.221, 16.345), "hospital")
            .with_name("A")
            .with_city("Wien"),
        FacilityRecord::new(2, Position::new(48.210, 16.306), "pharmacy")
            .with_name("B")
            .with_city("Wien"),
        FacilityRecord::new(3, Position::new(48.250, 16.450), "hospital")
            .with_name("C")
            .with_city("Wien"),
    ]
}

pub fn vienna_center() -> Position {
    Position::new(48.215, 16.330)
}

/// Seeded random facilities inside `[min_lat, max_lat] x [min_lon, max_lon]`
/// with numeric ids starting at `first_id`.
pub fn random_records(
    seed: u64,
    count: usize,
    first_id: i64,
    (min_lat, max_lat): (f64, f64),
    (min_lon, max_lon): (f64, f64),
) -> Vec<FacilityRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let lat = rng.gen_range(min_lat..=max_lat);
            let lon = rng.gen_range(min_lon..=max_lon);
            let kind = FACILITY_TYPES[rng.gen_range(0..FACILITY_TYPES.len())];
            FacilityRecord::new(first_id + i as i64, Position::new(lat, lon), kind)
        })
        .collect()
}

/// Seeded random facilities over Austria.
pub fn austria_records(seed: u64, count: usize) -> Vec<FacilityRecord> {
    random_records(seed, count, 1, (46.4, 49.0), (9.5, 17.2))
}

/// Random facilities with text ids, for callers that key records by
/// external identifiers. Ids and positions both derive from `seed`.
pub fn uuid_records(seed: u64, count: usize) -> Vec<FacilityRecord> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(0x5eed));
    random_records(seed, count, 0, (46.4, 49.0), (9.5, 17.2))
        .into_iter()
        .map(|mut record| {
            let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
            record.id = id.to_string().into();
            record
        })
        .collect()
}

/// Brute-force reference for a radius query: every record within
/// `radius_m` of `center`, nearest first, ties by id.
pub fn brute_force(
    records: &[FacilityRecord],
    center: &Position,
    radius_m: f64,
) -> Vec<(FacilityRecord, f64)> {
    let mut hits: Vec<(FacilityRecord, f64)> = records
        .iter()
        .map(|r| (r.clone(), r.position.distance_to(center)))
        .filter(|(_, d)| *d <= radius_m)
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
    hits
}
