use kmeansp::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kmeansp=info")))
        .init();

    // Cluster a point file given on the command line, or the bundled sample
    let path = std::env::args().nth(1).unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/points.tsv").to_string());
    let points = io::load_points(&path)?;

    // Calculate kmeans, using kmean++ as initialization-method
    let (centroids, assignments) = kmeansp(&points, 2, &KMeansPlusPlus, &EuclideanDistance)?;

    println!("Centroids: {:?}", centroids);
    println!("Cluster-Assignments: {:?}", assignments);
    Ok(())
}
