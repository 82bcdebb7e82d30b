#![forbid(unsafe_code)]

//! Asset Hunter binary entry point.

use asset_hunter::app::AppModel;
use asset_hunter::cli::{self, ScreenModeOpt};
use asset_hunter::logging;
use ftui_render::budget::FrameBudgetConfig;
use ftui_runtime::{Program, ProgramConfig, ScreenMode};

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = logging::init(path)
    {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let screen_mode = match opts.screen_mode {
        ScreenModeOpt::Inline => ScreenMode::Inline {
            ui_height: opts.ui_height,
        },
        ScreenModeOpt::Alt => ScreenMode::AltScreen,
    };

    tracing::info!(
        target: "asset_hunter",
        source = %opts.source,
        scan_latency_ms = opts.scan_latency.as_millis() as u64,
        report_dir = %opts.report_dir.display(),
        "starting dashboard"
    );

    let model = AppModel::from_opts(&opts);

    let budget = match screen_mode {
        ScreenMode::AltScreen => {
            let mut cfg = FrameBudgetConfig::relaxed();
            cfg.allow_frame_skip = false;
            cfg
        }
        _ => FrameBudgetConfig::default(),
    };

    let config = ProgramConfig {
        screen_mode,
        mouse_capture_policy: opts.mouse_capture_policy(),
        budget,
        ..ProgramConfig::default()
    };
    match Program::with_native_backend(model, config) {
        Ok(mut program) => {
            if let Err(e) = program.run() {
                tracing::error!(target: "asset_hunter", error = %e, "runtime error");
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}
