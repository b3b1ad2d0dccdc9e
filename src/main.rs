use anyhow::Context;
use clap::Parser;
use sensor_dashboard::{cli, config, dashboard, error, export, selector};
use sensor_dashboard_common::{summarizer, Metric, SummaryOptions, Taxonomy};
use cli::{Cli, Commands};
use config::Config;
use dashboard::{Dashboard, SensorRequest};
use error::DashboardError;
use export::ExportTargets;

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("設定ファイルを読み込めません: {}", config_path.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    log::debug!("データフォルダ: {}", config.data_dir.display());

    match cli.command {
        Commands::Sensor { source, start, end, metrics, interactive, json, excel } => {
            println!("🌱 sensor-dash - {}\n", source.title());

            let preview_rows = config.series_preview_rows;
            let window_days = config.default_window_days;
            let mut dashboard = Dashboard::new(config);

            let table = dashboard.sensor_table(source)?;
            let default_range = summarizer::default_range(&table.readings, window_days);
            let bounds = summarizer::date_bounds(&table.readings);

            let mut request = SensorRequest {
                range: dashboard::resolve_range(start, end, default_range)?,
                metrics: if metrics.is_empty() { Metric::ALL.to_vec() } else { metrics },
            };
            if interactive {
                request = selector::select_sensor_request(&request, default_range, bounds)?;
            }

            let report = dashboard.sensor_page(source, &request)?;
            export::terminal::print_sensor_report(&report, preview_rows);

            let targets = ExportTargets { json: json.as_deref(), excel: excel.as_deref() };
            if !targets.is_empty() {
                println!();
                export::export_sensor_report(&report, &targets)?;
            }
        }

        Commands::Camera { basis, include_unclassified, taxonomy, json, excel } => {
            println!("📷 sensor-dash - カメラ診断\n");

            let taxonomy = match taxonomy {
                Some(path) => Some(
                    Taxonomy::from_file(&path)
                        .with_context(|| format!("タクソノミーを読み込めません: {}", path.display()))?,
                ),
                None => None,
            };
            let options = SummaryOptions { basis, include_unclassified };

            let mut dashboard = Dashboard::new(config);
            let report = match dashboard.camera_page(taxonomy.as_ref(), options) {
                Ok(report) => report,
                Err(e @ DashboardError::SchemaMismatch { .. }) => {
                    log::warn!("{}", e);
                    println!("⚠ 'detected_object' 列が見つからないため分類できません");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            export::terminal::print_camera_report(&report);

            let targets = ExportTargets { json: json.as_deref(), excel: excel.as_deref() };
            if !targets.is_empty() {
                println!();
                export::export_camera_report(&report, &targets)?;
            }
        }

        Commands::Config { show, init, set_threshold } => {
            let mut config = config;

            if init {
                if config_path.exists() {
                    println!("設定ファイルは既に存在します: {}", config_path.display());
                } else {
                    Config::default().save_to(&config_path)?;
                    config = Config::load_from(&config_path)?;
                    println!("✔ 設定ファイルを作成しました: {}", config_path.display());
                }
            }

            if let Some(threshold) = set_threshold {
                config.vwc_threshold = threshold;
                config.validate()?;
                config.save_to(&config_path)?;
                println!("✔ vwc_percent 閾値を {} に設定しました", threshold);
            }

            if show || (!init && set_threshold.is_none()) {
                println!("設定: {}", config_path.display());
                println!("  データフォルダ: {}", config.data_dir.display());
                println!("  センサー1: {}", config.sensor1_file);
                println!("  センサー2: {}", config.sensor2_file);
                println!("  カメラ: {}", config.camera_file);
                println!("  vwc_percent 閾値: {}", config.vwc_threshold);
                println!("  既定の表示期間: {}日", config.default_window_days);
                println!("  系列プレビュー行数: {}", config.series_preview_rows);
                println!(
                    "  タクソノミー: {}",
                    if config.taxonomy.is_some() { "カスタム" } else { "組み込み" }
                );
            }
        }

        Commands::Sources { json } => {
            let mut dashboard = Dashboard::new(config);
            let sources = dashboard.sources();
            export::terminal::print_sources(&sources);

            if let Some(path) = json {
                export::write_json(&sources, &path)?;
                println!("✔ JSON出力: {}", path.display());
            }
        }
    }

    Ok(())
}
