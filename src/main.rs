use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use rusted_steps::engine::input::device::NUM_JOYSTICKS;
use rusted_steps::engine::input::{
    FileStorage, GameController, GameInput, InputDevice, InputError, InputMapper, InputScheme,
    LogSink, VirtualDriver,
};
use std::path::PathBuf;

/// Load a game scheme's input mappings, auto-map joysticks and print the result
#[derive(Parser, Debug)]
#[command(name = "rusted-steps", version, about)]
struct Args {
    /// Directory holding Keymaps.toml and Preferences.toml
    #[arg(short, long, default_value = "Save")]
    settings: PathBuf,

    /// Game scheme: dance, pump, para or techno
    #[arg(short = 'g', long, default_value = "dance")]
    scheme: String,

    /// Description of a connected joystick, in plug order (repeatable)
    #[arg(short, long = "joystick")]
    joysticks: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    info!("Starting Rusted Steps...");

    let scheme = InputScheme::find(&args.scheme)
        .ok_or_else(|| InputError::UnknownScheme(args.scheme.clone()))?;

    if args.joysticks.len() > usize::from(NUM_JOYSTICKS) {
        bail!("At most {} joysticks are supported", NUM_JOYSTICKS);
    }

    let mut driver = VirtualDriver::new();
    driver.connect(InputDevice::Keyboard, "Keyboard");
    for (index, description) in (0..NUM_JOYSTICKS).zip(&args.joysticks) {
        driver.connect(InputDevice::joystick(index), description.as_str());
    }

    let storage = FileStorage::new(&args.settings);
    info!("Using keymaps at {}", storage.keymaps_path().display());
    let mut mapper = InputMapper::new(scheme, Box::new(storage), Box::new(LogSink));

    match mapper.check_for_changed_input_devices_and_remap(&driver) {
        Some(change) => println!("{}\n", change.message.trim_end()),
        None => info!("No joystick changes since the last run"),
    }

    println!("Input mappings for {}:", scheme.name);
    for controller in GameController::ALL {
        for button in scheme.game_buttons() {
            let game_input = GameInput::new(controller, button);
            let tokens: Vec<String> = mapper
                .mappings_for(game_input)
                .into_iter()
                .map(|(slot, device_input)| format!("{}:{}", slot, device_input))
                .collect();
            println!("  {:<14} {}", game_input.to_name(scheme), tokens.join("  "));
        }
    }

    // Drop saves again but can only log a failure
    mapper.save_mappings()?;
    info!("Shutting down...");
    Ok(())
}
