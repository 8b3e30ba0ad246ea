use kdsearch::{persist, BuildConfig, KdTree, LinearIndex, NearestNeighbor, Point, SplitPolicy};
use rand::{rngs::StdRng, Rng, SeedableRng};

const POLICIES: [SplitPolicy; 3] = [
    SplitPolicy::Cycle,
    SplitPolicy::Variance,
    SplitPolicy::Range,
];

// Clustered data with a few distant outliers, so splits see skewed histograms.
fn clustered(rng: &mut StdRng, n: usize, dimension: usize) -> Vec<Point> {
    let centers: Vec<Vec<f64>> = (0..5)
        .map(|_| (0..dimension).map(|_| rng.gen_range(-100.0..100.0)).collect())
        .collect();
    (0..n)
        .map(|i| {
            let coords: Vec<f64> = if rng.gen_bool(0.02) {
                (0..dimension).map(|_| rng.gen_range(-1e4..1e4)).collect()
            } else {
                let center = &centers[rng.gen_range(0..centers.len())];
                center.iter().map(|c| c + rng.gen_range(-1.0..1.0)).collect()
            };
            Point::new(coords, i)
        })
        .collect()
}

#[test]
fn test_random() {
    let mut rng = StdRng::seed_from_u64(0);
    for policy in POLICIES {
        for dimension in [1, 2, 3, 8] {
            let points = clustered(&mut rng, 2000, dimension);
            let queries = clustered(&mut rng, 500, dimension);

            let linear = LinearIndex::new(points.clone()).unwrap();
            let tree = KdTree::build(points, BuildConfig::new(policy)).unwrap();

            let expected = linear.query(&queries).unwrap();
            let actual = tree.query(&queries).unwrap();
            assert_eq!(expected.len(), actual.len());
            for (expected, actual) in expected.iter().zip(actual.iter()) {
                assert!(
                    (expected.distance - actual.distance).abs() < 1e-9,
                    "Mismatch in kd-tree distances: {} vs {}",
                    actual.distance,
                    expected.distance
                );
            }
        }
    }
}

#[test]
fn test_indexed_points() {
    let mut rng = StdRng::seed_from_u64(1);
    let points: Vec<Point> = (0..1000)
        .map(|i| Point::new(vec![rng.gen(), rng.gen()], i))
        .collect();
    let tree = KdTree::build(points.clone(), BuildConfig::default()).unwrap();

    for (point, neighbor) in points.iter().zip(tree.query(&points).unwrap()) {
        assert_eq!(neighbor.index, point.source_index());
        assert_eq!(neighbor.distance, 0.0);
    }
}

#[test]
fn test_persisted_tree() {
    let mut rng = StdRng::seed_from_u64(2);
    let points = clustered(&mut rng, 1000, 4);
    let queries = clustered(&mut rng, 200, 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    for policy in POLICIES {
        let tree = KdTree::build(points.clone(), BuildConfig::new(policy)).unwrap();
        persist::write_tree(&tree, &path).unwrap();
        let restored = persist::read_tree(&path).unwrap();
        assert_eq!(restored.config().policy, policy);
        assert_eq!(tree.query(&queries).unwrap(), restored.query(&queries).unwrap());
    }
}
