use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use env_logger::Env;
use fern::log_file;
use log::LevelFilter;

/// Logs to stdout and to a per-process file under `log_dir`. Falls back to
/// stdout-only `env_logger` and returns false when the file cannot be set up.
pub fn init_logger(log_dir: &Path, level: &str) -> bool {
    let level_filter = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    let create_dir_res = std::fs::create_dir_all(log_dir);
    if let Err(e) = create_dir_res {
        init_stdout_logger(level);
        log::error!("[init_logger] Unable to create logs dir {:?}: {:?}", log_dir, e);
        return false;
    }

    let log_file_path = log_dir.join(format!("{}.log", Utc::now().format("%Y-%m-%d_%H-%M-%S")));
    let file_config = match log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            init_stdout_logger(level);
            log::error!("[init_logger] Unable to create log file {:?}: {:?}", &log_file_path, e);
            return false;
        }
    };
    let dispatcher_res = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level_filter)
        .chain(std::io::stdout())
        .chain(file_config)
        .apply();
    if let Err(e) = dispatcher_res {
        eprintln!("[init_logger] Unable to create logs file dispatcher: {:?}", e);
        return false;
    }
    true
}

fn init_stdout_logger(level: &str) {
    // A logger may already be installed (tests, repeated init); keep it.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init();
}
