//! System diagnostics and dependency checking.
//!
//! Verifies that required system tools are installed and configured correctly.

use owo_colors::OwoColorize;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str) -> CheckResult {
    match Command::new(command).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but -version failed", command)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check whether API credentials for the transcription backend are set.
fn check_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning("OPENAI_API_KEY is set but empty".to_string()),
        Err(_) => CheckResult::NotFound,
    }
}

/// Run all dependency checks and print results.
///
/// Returns false when a required dependency is missing.
pub fn check_dependencies() -> bool {
    println!("Checking system dependencies...\n");
    let mut all_ok = true;

    // ffmpeg (normalize/compress/segment)
    print!("ffmpeg (media preprocessing): ");
    match check_command("ffmpeg") {
        CheckResult::Ok => println!("{}", "✓ OK".green()),
        CheckResult::NotFound => {
            all_ok = false;
            println!("{}", "✗ NOT FOUND".red());
            println!("  Install: sudo apt install ffmpeg  (Debian/Ubuntu)");
            println!("           sudo pacman -S ffmpeg    (Arch)");
        }
        CheckResult::Warning(msg) => println!("{} {}", "⚠ WARNING:".yellow(), msg),
    }

    // ffprobe (duration probing); ships with ffmpeg but some distros split it
    print!("ffprobe (duration probing): ");
    match check_command("ffprobe") {
        CheckResult::Ok => println!("{}", "✓ OK".green()),
        CheckResult::NotFound => {
            all_ok = false;
            println!("{}", "✗ NOT FOUND".red());
            println!("  ffprobe ships with ffmpeg; check your ffmpeg installation");
        }
        CheckResult::Warning(msg) => println!("{} {}", "⚠ WARNING:".yellow(), msg),
    }

    // API credentials
    print!("OPENAI_API_KEY: ");
    match check_api_key() {
        CheckResult::Ok => println!("{}", "✓ set".green()),
        CheckResult::NotFound => {
            all_ok = false;
            println!("{}", "✗ not set".red());
            println!("  export OPENAI_API_KEY=sk-...");
        }
        CheckResult::Warning(msg) => {
            all_ok = false;
            println!("{} {}", "⚠ WARNING:".yellow(), msg);
        }
    }

    println!();
    if all_ok {
        println!("{}", "✓ Ready to transcribe.".green());
    } else {
        println!("{}", "⚠ Fix the issues above before transcribing.".yellow());
    }
    all_ok
}
