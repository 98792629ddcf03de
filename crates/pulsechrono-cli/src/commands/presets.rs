use clap::Args;
use pulsechrono_core::{format_countdown, Preset};
use serde::Serialize;

#[derive(Args)]
pub struct PresetsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PresetRow {
    key: Preset,
    name: &'static str,
    description: &'static str,
    minutes: u32,
    seconds: u32,
}

pub fn run(args: PresetsArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        let rows: Vec<PresetRow> = Preset::ALL
            .iter()
            .map(|&p| PresetRow {
                key: p,
                name: p.name(),
                description: p.description(),
                minutes: p.minutes(),
                seconds: p.seconds(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for preset in Preset::ALL {
        println!(
            "{:<12} {}  {}",
            preset.name(),
            format_countdown(preset.duration_ms()),
            preset.description()
        );
    }
    Ok(())
}
