use mrt_timetable::generator::{generate_timetable, parse_config};
use mrt_timetable::models::Direction;
use std::path::PathBuf;
use std::{env, fs, process};

const DEFAULT_CONFIG: &str = "timetable-config.md";

fn main() {
    let mut args = env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    if let Err(e) = run(&config_path, &output_dir) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(config_path: &str, output_dir: &std::path::Path) -> Result<(), String> {
    let content = fs::read_to_string(config_path).map_err(|e| format!("Failed to read {config_path}: {e}"))?;
    let schedules = parse_config(&content);
    if schedules.is_empty() {
        return Err(format!("No schedule sections found in {config_path}"));
    }

    for (day, slots) in &schedules {
        let timetable = generate_timetable(slots).map_err(|e| format!("{}: {e}", day.label()))?;
        let json = timetable.to_json_pretty()?;
        let path = output_dir.join(day.file_name());
        fs::write(&path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

        println!(
            "{}: {} trains to Motijheel, {} trains to Uttara North -> {}",
            day.label(),
            timetable.train_count(Direction::Motijheel),
            timetable.train_count(Direction::UttaraNorth),
            path.display()
        );
    }
    Ok(())
}
