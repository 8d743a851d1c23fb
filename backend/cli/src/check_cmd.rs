//! CLI Check Command
//!
//! Validates the environment without touching the database or the
//! application: credentials parse, templates load, the executable exists.

use std::path::Path;

use stocksync_desktop::driver::{BARCODE_INPUT_TEMPLATE, MENU_TEMPLATE, STORE_LABEL_TEMPLATE};
use stocksync_desktop::Template;
use stocksync_store::ServiceAccountKey;

use crate::config::Config;

/// Run the full check suite and print a verdict.
pub fn run(config: &Config) {
    println!("\n🔍 Checking stocksync setup...\n");

    let credentials_ok = check_service_account(config);
    let templates_ok = check_templates(config);
    let app_ok = check_application(config);
    let is_ok = credentials_ok && templates_ok && app_ok;

    println!();
    if is_ok {
        println!("✅ All checks passed! stocksync is ready to run.");
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
    }
}

fn check_service_account(config: &Config) -> bool {
    println!("Checking service account key:");
    match ServiceAccountKey::from_file(&config.service_account_path) {
        Ok(key) => {
            let project = config.project_id.as_deref().unwrap_or(&key.project_id);
            println!(
                "  🟢 {} parses (project '{}')",
                config.service_account_path, project
            );
            true
        }
        Err(e) => {
            println!("  🔴 {}: {:#}", config.service_account_path, e);
            false
        }
    }
}

fn check_templates(config: &Config) -> bool {
    println!("Checking UI templates in {}:", config.templates_dir.display());

    let mut all_good = true;
    for file in [MENU_TEMPLATE, BARCODE_INPUT_TEMPLATE, STORE_LABEL_TEMPLATE] {
        match Template::load(config.templates_dir.join(file)) {
            Ok(_) => println!("  🟢 {} loads", file),
            Err(e) => {
                println!("  🔴 {}: {:#}", file, e);
                all_good = false;
            }
        }
    }
    all_good
}

fn check_application(config: &Config) -> bool {
    println!("Checking POS application:");
    if Path::new(&config.app_executable).exists() {
        println!("  🟢 {} exists", config.app_executable);
        true
    } else {
        // A bare executable name may still resolve through PATH at launch.
        println!(
            "  🟡 {} not found as a file (will rely on PATH at launch)",
            config.app_executable
        );
        true
    }
}
