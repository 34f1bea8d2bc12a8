use std::{env, fs, path::{Path, PathBuf}, process::ExitCode, time::Instant};

use inkwell::context::Context;
use log::info;
use tiny::{
    compile,
    compiler::jit::run_entry_point,
    errors::errors::{CompileError, Error, ErrorTip},
    CompileOptions,
};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("usage: {} <file> [entry point]", args[0]);
        return ExitCode::FAILURE;
    }

    let file_path = PathBuf::from(&args[1]);
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args[1].clone());

    let source = match fs::read_to_string(&file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let options = CompileOptions {
        file_name,
        entry_point: args.get(2).cloned().unwrap_or_else(|| String::from("main")),
    };

    let start = Instant::now();
    let context = Context::create();
    let compiled = match compile(&source, &options, &context) {
        Ok(compiled) => compiled,
        Err(error) => {
            display_compile_error(&error, &source, &file_path);
            return ExitCode::FAILURE;
        }
    };
    println!("Compiled in {:?}", start.elapsed());

    if fs::create_dir_all("build").is_ok() {
        if let Err(error) = compiled.save_module_to_file(PathBuf::from("build/out.ll")) {
            eprintln!("Failed to write build/out.ll: {}", error);
        }
    }

    match run_entry_point(&compiled, &options.entry_point) {
        Ok(result) => {
            info!("Total time: {:?}", start.elapsed());
            println!("{} returned {}", options.entry_point, result);
            ExitCode::from(result as u8)
        }
        Err(error) => {
            display_error(&error, &source, &file_path);
            ExitCode::FAILURE
        }
    }
}

fn display_compile_error(error: &CompileError, source: &str, file: &Path) {
    eprintln!("{}", error);
    for error in error.errors() {
        display_error(error, source, file);
    }
}

fn display_error(error: &Error, source: &str, file: &Path) {
    /*
        Error: VariableNotDeclared (Variable `y` not declared)
        -> main.tiny
          |
        2 | ret y
          | ----^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file.display());

    let position = error.get_position();
    if position.line == 0 {
        return;
    }
    let Some(line_text) = source.lines().nth(position.line as usize - 1) else {
        return;
    };

    let line_str = position.line.to_string();
    let padding = line_str.len() + 2;
    let trimmed = line_text.trim_start();
    let removed_whitespace = line_text.len() - trimmed.len();
    let arrows = (position.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    eprintln!("{:>padding$}", "|");
    eprintln!("{} | {}", line_str, trimmed.trim_end());
    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}
