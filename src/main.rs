#![allow(non_snake_case)]
use RustedHeatPlot::surface_plots::pipelines::{run_animation, run_static};
use RustedHeatPlot::surface_plots::task::RenderTask;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: RustedHeatPlot static|animate [task-file]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(mode) = args.get(1) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };
    let task = match args.get(2) {
        Some(path) => RenderTask::from_file(path),
        // without an explicit file, task.txt in the working directory or the defaults
        None if Path::new("task.txt").exists() => RenderTask::from_file("task.txt"),
        None => Ok(RenderTask::default()),
    };
    let task = match task {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let result = match mode.as_str() {
        "static" => run_static(&task).map(|_| ()),
        "animate" => run_animation(&task).map(|_| ()),
        other => {
            eprintln!("unknown mode '{}'\n{}", other, USAGE);
            return ExitCode::FAILURE;
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
