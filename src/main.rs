use clap::Parser;
use num::complex::Complex64;

use newton_basins::cli::args::{CommandsEnum, NewtonBasinsArgs};
use newton_basins::cli::evaluate::{classify_point, evaluate_fractal};
use newton_basins::core::file_io::read_json_params;
use newton_basins::fractals::newtons_method::NewtonsMethodParams;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: NewtonBasinsArgs = NewtonBasinsArgs::parse();

    if let Some(level) = args.log_level() {
        tracing_subscriber::fmt::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .init();
    }

    match &args.command {
        Some(CommandsEnum::Evaluate(params)) => {
            let fractal_params: NewtonsMethodParams = read_json_params(&params.params_path)?;
            evaluate_fractal(&fractal_params, std::io::stdout().lock())
        }
        Some(CommandsEnum::Classify(params)) => {
            let fractal_params: NewtonsMethodParams = read_json_params(&params.params_path)?;
            classify_point(
                &fractal_params,
                Complex64::new(params.re, params.im),
                std::io::stdout().lock(),
            )
        }
        None => {
            println!("Default command (nothing specified!)");
            Ok(())
        }
    }
}
