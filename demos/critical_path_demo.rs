use colored::*;

use path_engine::algorithm::path_legs;
use path_engine::graph::generators::demo_graph;
use path_engine::schedule::{compute_schedule, demo_project};
use path_engine::{enumerate_top_k_paths, search, Objective};

fn main() {
    env_logger::init();

    println!("{}", "Critical path of the demo project".green().bold());
    let project = demo_project();
    let schedule = match compute_schedule(&project) {
        Ok(schedule) => schedule,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return;
        }
    };

    println!(
        "{:<6} {:>8} {:<10} {:>8} {:>8} {:>8}",
        "task", "duration", "after", "earliest", "latest", "margin"
    );
    for row in &schedule.rows {
        let line = format!(
            "{:<6} {:>8} {:<10} {:>8} {:>8} {:>8}",
            row.id,
            row.duration,
            if row.predecessors.is_empty() { "-".to_string() } else { row.predecessors.join(",") },
            row.earliest_start,
            row.latest_start,
            row.margin
        );
        if row.critical {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    println!(
        "\nProject duration: {}",
        schedule.project_duration.to_string().yellow().bold()
    );
    println!("Critical path: {}", schedule.critical_path.join(" -> ").red().bold());

    println!("\n{}", "Path search on the demo graph".green().bold());
    let graph = demo_graph();
    let (source, target) = ("A".to_string(), "E".to_string());
    for objective in Objective::ALL {
        match search(&graph, &source, &target, objective) {
            Ok(result) => {
                println!("{} {} (value {})", objective.to_string().cyan().bold(), result.path.join(" -> "), result.value);
                for leg in path_legs(&graph, &result.path).unwrap_or_default() {
                    println!("    {} -> {}  weight {}  total {}", leg.from, leg.to, leg.weight, leg.running_total);
                }
            }
            Err(err) => eprintln!("{} {}", "error:".red().bold(), err),
        }
    }

    println!("\n{}", "Heaviest simple paths".green().bold());
    match enumerate_top_k_paths(&graph, &source, &target, 3) {
        Ok(paths) => {
            for (rank, found) in paths.iter().enumerate() {
                println!("{}. {} ({})", rank + 1, found.path.join(" -> "), found.weight);
            }
        }
        Err(err) => eprintln!("{} {}", "error:".red().bold(), err),
    }
}
