//! Report which external tools are available.

use cinema_common::config::AppConfig;
use cinema_common::process::find_tool;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Release Cinema System Check");
    println!("{}", "=".repeat(50));

    let git = &config.tools.git;
    report("git", find_tool(git).map(|p| p.display().to_string()), "install git");

    let magick = match &config.tools.magick {
        Some(binary) => find_tool(binary),
        None => find_tool("magick").or_else(|| find_tool("convert")),
    };
    report(
        "ImageMagick",
        magick.map(|p| p.display().to_string()),
        "install ImageMagick (magick or convert)",
    );

    let ffmpeg = &config.tools.ffmpeg;
    report("ffmpeg", find_tool(ffmpeg).map(|p| p.display().to_string()), "install ffmpeg");

    println!();
    if super::repository(config).is_inside_work_tree() {
        println!("[OK] Inside a git work tree");
    } else {
        println!("[WARN] Not inside a git work tree (render and analyze need one)");
    }

    Ok(())
}

fn report(name: &str, found: Option<String>, fix: &str) {
    match found {
        Some(path) => println!("[OK] {name}: {path}"),
        None => println!("[WARN] {name}: not found ({fix})"),
    }
}
