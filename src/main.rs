use std::path::Path;
use class_timetable::config::load_config;
use class_timetable::display::{print_capacity, print_version, write_version_files};
use class_timetable::schedule::generate_versions;
use class_timetable::store::DEFAULT_STORE_CAPACITY;
use class_timetable::web;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting web server on port {}...", port);
        println!("POST a timetable configuration to http://localhost:{}/api/timetables", port);

        web::start_server(port, DEFAULT_STORE_CAPACITY).await?;
        return Ok(());
    }

    // CLI mode: timetable.json in the working directory unless a path is given
    let config_path = args.get(1).map(String::as_str).unwrap_or("timetable.json");
    if !Path::new(config_path).exists() {
        return Err(format!(
            "Configuration file '{}' not found. Usage: class-timetable [config.json] | web [port]",
            config_path
        )
        .into());
    }

    println!("Loading configuration from {}...", config_path);
    let config = load_config(config_path)?;
    let eligibility = config.teacher_eligibility()?;
    println!("Loaded teachers for {} subjects", eligibility.subjects().len());

    let (prepared, capacity) = config.prepare(eligibility)?;
    print_capacity(&capacity);

    let versions = generate_versions(&prepared, config.versions, config.seed);
    let title = format!("Timetable for {} {}", config.class_name, config.section);
    for version in &versions {
        print_version(&title, version);
    }

    println!("\n=== Writing Timetables to Files ===");
    let out_dir = Path::new(".");
    for version in &versions {
        for path in write_version_files(out_dir, &config.file_stem(), version)? {
            println!("  - {}", path.display());
        }
    }

    Ok(())
}
