//! End-to-end demonstration of the heterogeneous variable container:
//! populate mixed manifold types, retrieve them typed, project with filtered
//! views, and apply a whole-container retraction.

use apex_values::manifold::SE3;
use apex_values::values::{Value, Values};
use apex_values::{init_logger, ValuesResult};
use clap::Parser;
use nalgebra::{DVector, Point3, UnitQuaternion, Vector3};

#[derive(Parser)]
#[command(name = "values_demo")]
#[command(about = "Demonstrate typed storage and filtered views over mixed manifold variables")]
struct Args {
    /// Number of pose variables to insert
    #[arg(short, long, default_value = "5")]
    poses: usize,

    /// Perturbation magnitude for the whole-container retraction
    #[arg(short, long, default_value = "0.01")]
    step: f64,
}

fn build_values(poses: usize) -> ValuesResult<Values> {
    let mut values = Values::new();

    // Even keys: camera poses along a straight trajectory
    for i in 0..poses {
        let pose = SE3::from_translation_rotation(
            Vector3::new(i as f64, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, 0.05 * i as f64),
        );
        values.insert(2 * i as u64, pose)?;
    }

    // Odd keys: landmarks between the poses
    for i in 0..poses {
        values.insert(2 * i as u64 + 1, Point3::new(i as f64 + 0.5, 1.0, 2.0))?;
    }

    // A calibration vector stored with automatic fixed-to-dynamic widening
    values.insert(1000, Vector3::new(500.0, 320.0, 240.0))?;

    Ok(values)
}

fn main() -> ValuesResult<()> {
    init_logger();
    let args = Args::parse();

    let mut values = build_values(args.poses)?;
    tracing::info!(
        entries = values.len(),
        dof = values.dim(),
        "container populated"
    );

    let poses = values.filter::<SE3, _>(|_| true);
    tracing::info!(count = poses.size(), keys = ?poses.keys(), "pose variables");

    let landmarks = values.filter::<Point3<f64>, _>(|_| true);
    tracing::info!(count = landmarks.size(), "landmark variables");

    let calibration: Vector3<f64> = values.at(1000)?;
    tracing::info!(fx = calibration.x, cx = calibration.y, cy = calibration.z, "calibration");

    // Snapshot only the poses into their own container
    let pose_estimate = Values::from_filtered(&values.filter::<SE3, _>(|_| true))?;
    tracing::info!(entries = pose_estimate.len(), "pose-only copy");

    // A uniform perturbation step over every degree of freedom, the shape of
    // an optimizer update
    let delta = DVector::from_element(values.dim(), args.step);
    let perturbed = values.retract(&delta)?;
    let recovered = values.local_coordinates(&perturbed)?;
    tracing::info!(
        step = args.step,
        max_recovered = recovered.amax(),
        "retract / local_coordinates round trip"
    );

    // Write the perturbed poses back through update
    for key in pose_estimate.keys() {
        let pose: SE3 = perturbed.at(key)?;
        values.update(key, pose)?;
    }

    let erased = values.filter::<dyn Value, _>(|key| key < 4);
    for (key, value) in erased.iter() {
        tracing::info!("  {key} ({}): {value}", value.type_name());
    }

    Ok(())
}
