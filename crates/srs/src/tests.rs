use std::io::Write;
use std::sync::Arc;

use bbrs_ecc::curves::bn254::{G1Affine as Bn254G1Affine, G1Element as Bn254G1Element};

use crate::error::SrsError;
use crate::factories::{
    Bn254Crs, Bn254CrsFactory, DerivedBn254CrsFactory, FileBn254CrsFactory, MemBn254Crs,
    MemBn254CrsFactory,
};
use crate::global_crs::SrsManager;

/// Generate `n` distinct BN254 G1 affine points: G, 2G, 3G, ...
fn bn254_test_points(n: usize) -> Vec<Bn254G1Affine> {
    let generator = Bn254G1Element::one();
    let mut acc = generator;
    let mut points = Vec::with_capacity(n);
    points.push(acc.to_affine());
    for _ in 1..n {
        acc = acc + generator;
        points.push(acc.to_affine());
    }
    points
}

fn derived_manager(max_size: usize) -> SrsManager {
    SrsManager::new(Arc::new(DerivedBn254CrsFactory::default()), max_size)
}

fn write_points(points: &[Bn254G1Affine]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for p in points {
        file.write_all(&p.to_be_bytes()).unwrap();
    }
    file.flush().unwrap();
    file
}

// ===========================================================================
// MemBn254Crs
// ===========================================================================

#[test]
fn bn254_mem_crs_from_known_points() {
    let points = bn254_test_points(8);
    let crs = MemBn254Crs::new(points.clone()).unwrap();

    assert_eq!(crs.get_monomial_size(), 8);
    assert_eq!(crs.get_monomial_points(), &points[..]);
    assert_eq!(crs.get_g1_identity(), Bn254G1Affine::one());
}

#[test]
fn bn254_mem_crs_rejects_wrong_first_point() {
    let mut points = bn254_test_points(3);
    points.swap(0, 1);
    assert!(matches!(
        MemBn254Crs::new(points),
        Err(SrsError::BadGenerator)
    ));
    assert!(matches!(
        MemBn254Crs::new(Vec::new()),
        Err(SrsError::BadGenerator)
    ));
}

#[test]
fn bn254_mem_factory_reports_insufficient_points() {
    let factory = MemBn254CrsFactory::new(&bn254_test_points(4));
    assert_eq!(factory.load_points(1, 3).unwrap().len(), 3);
    assert!(matches!(
        factory.load_points(2, 3),
        Err(SrsError::Insufficient {
            available: 4,
            required: 5
        })
    ));
}

// ===========================================================================
// Derived source
// ===========================================================================

#[test]
fn derived_points_extend_consistently() {
    let factory = DerivedBn254CrsFactory::default();
    let all = factory.load_points(0, 6).unwrap();
    let head = factory.load_points(0, 2).unwrap();
    let tail = factory.load_points(2, 4).unwrap();

    assert_eq!(all[0], Bn254G1Affine::one());
    assert_eq!(&all[..2], &head[..]);
    assert_eq!(&all[2..], &tail[..]);
    assert!(all.iter().all(|p| p.on_curve()));
}

#[test]
fn derived_domain_separator_matters() {
    let a = DerivedBn254CrsFactory::new(b"A").load_points(1, 1).unwrap();
    let b = DerivedBn254CrsFactory::new(b"B").load_points(1, 1).unwrap();
    assert_ne!(a, b);
}

// ===========================================================================
// File source
// ===========================================================================

#[test]
fn file_source_reads_requested_range() {
    let points = bn254_test_points(5);
    let file = write_points(&points);
    let factory = FileBn254CrsFactory::new(file.path());

    assert_eq!(factory.load_points(0, 5).unwrap(), points);
    assert_eq!(factory.load_points(3, 2).unwrap(), &points[3..]);
    assert!(matches!(
        factory.load_points(4, 2),
        Err(SrsError::Insufficient { available: 5, .. })
    ));
}

#[test]
fn file_source_rejects_corrupt_points() {
    let points = bn254_test_points(3);
    let mut bytes: Vec<u8> = points.iter().flat_map(|p| p.to_be_bytes()).collect();
    bytes[64 + 63] ^= 1;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let factory = FileBn254CrsFactory::new(file.path());
    assert!(matches!(
        factory.load_points(0, 3),
        Err(SrsError::InvalidPoint { index: 1 })
    ));
}

#[test]
fn file_source_missing_file_is_io_error() {
    let factory = FileBn254CrsFactory::new("/nonexistent/bbrs/srs.dat");
    assert!(matches!(
        factory.load_points(0, 1),
        Err(SrsError::Io { .. })
    ));
}

// ===========================================================================
// SrsManager
// ===========================================================================

#[test]
fn manager_starts_empty_and_grows_monotonically() {
    let manager = derived_manager(64);
    assert_eq!(manager.current_size(), 0);

    let small = manager.ensure(4).unwrap();
    assert_eq!(small.get_monomial_size(), 4);

    let large = manager.ensure(16).unwrap();
    assert_eq!(large.get_monomial_size(), 16);
    assert_eq!(&large.get_monomial_points()[..4], small.get_monomial_points());

    // A smaller request reuses the larger snapshot.
    let again = manager.ensure(8).unwrap();
    assert!(Arc::ptr_eq(&again, &large));
    assert_eq!(manager.current_size(), 16);

    // Snapshots handed out earlier remain usable.
    assert_eq!(small.get_monomial_size(), 4);
}

#[test]
fn manager_enforces_size_limit() {
    let manager = derived_manager(8);
    manager.ensure(8).unwrap();
    assert!(matches!(
        manager.ensure(9),
        Err(SrsError::ExceedsLimit {
            required: 9,
            limit: 8
        })
    ));
    assert_eq!(manager.current_size(), 8);
}

#[test]
fn manager_failure_leaves_snapshot_untouched() {
    let file = write_points(&bn254_test_points(4));
    let manager = SrsManager::new(Arc::new(FileBn254CrsFactory::new(file.path())), 1 << 10);

    manager.ensure(4).unwrap();
    assert!(matches!(
        manager.ensure(8),
        Err(SrsError::Insufficient { .. })
    ));
    assert_eq!(manager.current_size(), 4);
}

#[test]
fn concurrent_growth_converges_to_largest_request() {
    let manager = derived_manager(1 << 10);
    let sizes = [2usize, 32, 8, 16, 4, 32, 1];

    std::thread::scope(|s| {
        for &size in &sizes {
            let manager = &manager;
            s.spawn(move || {
                let crs = manager.ensure(size).unwrap();
                assert!(crs.get_monomial_size() >= size);
            });
        }
    });

    assert_eq!(manager.current_size(), 32);
    let expected = DerivedBn254CrsFactory::default().load_points(0, 32).unwrap();
    assert_eq!(manager.current().unwrap().get_monomial_points(), &expected[..]);
}
