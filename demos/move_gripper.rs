use std::time::Duration;

use robotiq_urcap::*;
use tracing_subscriber::EnvFilter;

// replace with your UR controller IP
const UR_IP: &str = "192.168.0.10";

#[tokio::main]
async fn main() -> Result<(), RobotiqError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A JSON config path may be given as the first argument.
    let config = match std::env::args().nth(1) {
        Some(path) => GripperConfig::from_json_file(path)?,
        None => GripperConfig::new(UR_IP),
    };
    let gripper = RobotiqGripper::new(config)?;
    gripper.connect().await?;

    // Activate gripper (if not already active)
    gripper.activate_default(true).await?;

    println!("Opening gripper...");
    gripper
        .open(MoveOptions::from_config(gripper.config()).force(10))
        .await?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("POS after open: {}", gripper.get_position().await?);

    println!("Closing gripper...");
    gripper
        .close(MoveOptions::from_config(gripper.config()).speed(200).force(200))
        .await?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("POS after close: {}", gripper.get_position().await?);

    println!("Moving gripper to position 50%...");
    gripper
        .move_percent(50.0, MoveOptions::from_config(gripper.config()))
        .await?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("POS after move_percent: {}", gripper.get_position().await?);

    println!("Object status: {:?}", gripper.get_object_status().await?);
    let fault = gripper.get_fault().await?;
    match GripperFault::from_code(fault) {
        Some(known) => println!("Fault code: {fault} ({known})"),
        None => println!("Fault code: {fault}"),
    }

    gripper.disconnect().await
}
