//! Build script for chevron-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section, mirroring the on-device parser
const SECTIONS: &[(&str, &[&str])] = &[
    ("serial", &["baudrate", "delimiter"]),
    (
        "telemetry",
        &["interval_ms", "settle_ms", "width", "precision", "sensors"],
    ),
    ("timestamp", &["interval_ms"]),
    ("monitor", &["interval_ms"]),
];

/// Limits shared with chevron-core
const MAX_SENSORS: usize = 8;
const MAX_WIDTH: i64 = 12;
const MAX_PRECISION: i64 = 6;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml as its configuration.           ║\n\
            ║  Please create one in the chevron-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_serial(&config, &mut errors);
    validate_telemetry(&config, &mut errors);
    validate_intervals(&config, &mut errors);
    report("Invalid device configuration", &errors);

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Only known sections and keys; the device parser rejects anything else
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some(keys) = SECTIONS
            .iter()
            .find(|(s, _)| *s == name.as_str())
            .map(|(_, k)| *k)
        else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };

        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}

fn check_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match get(config, section, key) {
        None => {}
        Some(toml::Value::Integer(n)) if range.contains(n) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be an integer {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "serial", "baudrate", 1..=u32::MAX as i64, errors);

    match get(config, "serial", "delimiter") {
        None => {}
        Some(toml::Value::String(s)) if s.len() == 1 && s.is_ascii() && s != "\0" => {}
        Some(_) => errors.push("[serial] delimiter must be one ASCII character".to_string()),
    }
}

fn validate_telemetry(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "telemetry", "width", 0..=MAX_WIDTH, errors);
    check_int(config, "telemetry", "precision", 0..=MAX_PRECISION, errors);

    let Some(sensors) = get(config, "telemetry", "sensors") else {
        return;
    };
    let Some(sensors) = sensors.as_array() else {
        errors.push("[telemetry] sensors must be an array".to_string());
        return;
    };
    if sensors.len() > MAX_SENSORS {
        errors.push(format!("[telemetry] at most {} sensors", MAX_SENSORS));
    }
    for sensor in sensors {
        match sensor.as_integer() {
            Some(addr) if (0..=0x7F).contains(&addr) => {}
            _ => errors.push(format!("[telemetry] sensor {} is not a 7-bit address", sensor)),
        }
    }
}

fn validate_intervals(config: &toml::Value, errors: &mut Vec<String>) {
    let max = u32::MAX as i64;
    check_int(config, "telemetry", "interval_ms", 1..=max, errors);
    check_int(config, "telemetry", "settle_ms", 0..=max, errors);
    check_int(config, "timestamp", "interval_ms", 0..=max, errors);
    check_int(config, "monitor", "interval_ms", 1..=max, errors);
}
