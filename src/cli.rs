use crate::dashboard::SensorSource;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sensor_dashboard_common::{Metric, PercentageBasis};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensor-dash")]
#[command(about = "土壌水分センサー・カメラ診断ダッシュボード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（デフォルト: ~/.config/sensor-dashboard/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// データフォルダ（設定ファイルより優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 土壌水分センサーの期間集計
    Sensor {
        /// センサー (sensor1/sensor2)
        #[arg(required = true)]
        source: SensorSource,

        /// 開始日 (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// 終了日 (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// 表示する列（カンマ区切り、省略時は全列）
        #[arg(short, long, value_delimiter = ',')]
        metrics: Vec<Metric>,

        /// 期間と列を対話式で選択
        #[arg(short, long)]
        interactive: bool,

        /// JSON出力先
        #[arg(long)]
        json: Option<PathBuf>,

        /// Excel出力先
        #[arg(long)]
        excel: Option<PathBuf>,
    },

    /// カメラ診断ログの分類集計
    Camera {
        /// 割合の分母 (declared/all)
        #[arg(long, default_value = "declared")]
        basis: PercentageBasis,

        /// unclassified行を集計表に含める
        #[arg(long)]
        include_unclassified: bool,

        /// タクソノミーJSONファイル（設定より優先）
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// JSON出力先
        #[arg(long)]
        json: Option<PathBuf>,

        /// Excel出力先
        #[arg(long)]
        excel: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,

        /// vwc_percent の判定閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,
    },

    /// データソースの状態を表示
    Sources {
        /// JSON出力先
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sensor_command() {
        let cli = Cli::parse_from([
            "sensor-dash",
            "sensor",
            "sensor2",
            "--start",
            "2025-05-01",
            "-m",
            "vwc_percent,soc_percent",
        ]);
        match cli.command {
            Commands::Sensor { source, start, end, metrics, interactive, .. } => {
                assert_eq!(source, SensorSource::Sensor2);
                assert_eq!(start, NaiveDate::from_ymd_opt(2025, 5, 1));
                assert!(end.is_none());
                assert_eq!(metrics, vec![Metric::VwcPercent, Metric::SocPercent]);
                assert!(!interactive);
            }
            _ => panic!("sensor command expected"),
        }
    }

    #[test]
    fn test_parse_camera_command() {
        let cli = Cli::parse_from(["sensor-dash", "-v", "camera", "--basis", "all", "--include-unclassified"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Camera { basis, include_unclassified, .. } => {
                assert_eq!(basis, PercentageBasis::AllDetections);
                assert!(include_unclassified);
            }
            _ => panic!("camera command expected"),
        }
    }

    #[test]
    fn test_rejects_unknown_metric() {
        let result = Cli::try_parse_from(["sensor-dash", "sensor", "sensor1", "-m", "humidity"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = Cli::try_parse_from(["sensor-dash", "sensor", "sensor1", "--start", "05/01/2025"]);
        assert!(result.is_err());
    }
}
