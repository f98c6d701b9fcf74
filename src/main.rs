// ==========================================
// 缝制线生产跟踪系统 - 命令行入口
// ==========================================
// 用法:
//   sewing-line-tracker seed
//   sewing-line-tracker employees | inputs | outputs | options
//   sewing-line-tracker reconcile <line> <buyer> <po> <style> <pf> <color>
//   sewing-line-tracker import-inputs <file>
//   sewing-line-tracker config [key] [value]
//
// 输出: stdout 为 JSON，日志写入 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::json;
use sewing_line_tracker::app::{get_default_db_path, AppState};
use sewing_line_tracker::{logging, MatchKey, APP_NAME, VERSION};

const USAGE: &str = "用法: sewing-line-tracker <seed|employees|inputs|outputs|options|reconcile|import-inputs|config> [参数...]";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };
    let rest = &args[1..];

    tracing::info!(version = VERSION, command = %command, "{}", APP_NAME);

    let db_path = get_default_db_path();
    let state = AppState::new(db_path.clone())
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("无法初始化数据库: {}", db_path))?;

    match command.as_str() {
        "seed" => print_json(&state.seed_demo_data()?),
        "employees" => print_json(&state.employee_api.list_employees()),
        "inputs" => print_json(&state.input_api.list_inputs()),
        "outputs" => print_json(&state.output_api.list_outputs()),
        "options" => print_json(&state.output_api.match_key_options()),
        "reconcile" => {
            let [line, buyer, po, style, pf, color] = rest else {
                bail!("用法: sewing-line-tracker reconcile <line> <buyer> <po> <style> <pf> <color>");
            };
            let key = MatchKey::new(line, buyer, po, style, pf, color);
            print_json(&state.output_api.preview_reconciliation(&key)?)
        }
        "import-inputs" => {
            let file = rest
                .first()
                .context("用法: sewing-line-tracker import-inputs <file>")?;
            print_json(&state.input_api.import_from_file(file)?)
        }
        "config" => {
            let config = &state.config_manager;
            match rest {
                [] => {
                    let snapshot: serde_json::Value = serde_json::from_str(
                        &config.get_config_snapshot().map_err(|e| anyhow!(e.to_string()))?,
                    )?;
                    print_json(&snapshot)
                }
                [key] => {
                    let value = config
                        .get_config_value(key)
                        .map_err(|e| anyhow!(e.to_string()))?;
                    print_json(&json!({ "key": key, "value": value }))
                }
                [key, value, ..] => {
                    config
                        .set_config_value(key, value)
                        .map_err(|e| anyhow!(e.to_string()))?;
                    print_json(&json!({ "key": key, "value": value }))
                }
            }
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}
