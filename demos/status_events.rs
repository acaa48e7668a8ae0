use kmeansp::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=kmeansp=debug shows one event per assignment pass
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kmeansp=info")))
        .init();

    let (sample_cnt, sample_dims, k) = (20000, 16, 4);

    // Generate some random data
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());
    let points = Matrix::from_vec(samples, sample_cnt, sample_dims)?;

    let conf = KMeansConfig::build()
        .init_done(&|_| println!("Initialization completed."))
        .iteration_done(&|s, nr, new_distsum|
            println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
                nr, s.distsum, new_distsum, s.distsum - new_distsum))
        .abort_strategy(AbortStrategy::NoImprovementForXIterations {
            // Abort after there has not been an improvement for 5 iterations
            x: 5,
            // Only count as improvement if > 0.0005 difference
            threshold: 0.0005f64,
            // Do not directly abort after a negative improvement
            abort_on_negative: false
        })
        .empty_cluster_policy(EmptyClusterPolicy::Reseed)
        .build();

    let result = KMeans::new(&points).kmeansp(k, &DataCentroids, &EuclideanDistance, &conf)?;

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster sizes: {:?}", result.centroid_frequency);
    println!("Converged: {} after {} iterations", result.converged, result.iterations);
    println!("Error: {}", result.distsum);
    Ok(())
}
