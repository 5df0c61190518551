use std::env;

use nexia_thermostat::{AccessoryConfig, ThermostatAccessory};

#[tokio::main]
async fn main() -> nexia_thermostat::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: status <config.json>");
        std::process::exit(2);
    };

    let config = AccessoryConfig::from_file(path)?;
    let accessory = ThermostatAccessory::from_config(&config)?;

    let snapshot = accessory.refresh().await?;
    println!(
        "[{}] {:.1}{} | mode: {:?} (target {:?}) | heat {:.1} / cool {:.1} | vendor scale {}",
        snapshot.name.as_deref().unwrap_or(config.name.as_str()),
        snapshot.current_temperature,
        snapshot.host_scale,
        snapshot.current_mode,
        snapshot.target_mode,
        snapshot.heating_setpoint,
        snapshot.cooling_setpoint,
        snapshot.display_scale,
    );

    for characteristic in accessory.characteristics() {
        let value = accessory.get(*characteristic).await;
        println!("{:<28} {}", characteristic.name(), value.to_json());
    }
    Ok(())
}
