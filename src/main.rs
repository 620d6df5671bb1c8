//! 访问控制管理工具
//! 权限矩阵查看、单项权限检查、数据库初始化

use lhn_access::{
    config::AppConfig,
    db,
    models::{Capability, Role},
    policy::{PermissionTables, PolicyEvaluator},
    services::UserService,
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--version") => {
            println!("lhn-access {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some("--help") | None => {
            print_help();
            Ok(())
        }
        Some("matrix") => {
            let json = args.get(2).is_some_and(|a| a == "--json");
            print_matrix(json)
        }
        Some("check") => match (args.get(2), args.get(3)) {
            (Some(role), Some(capability)) => check(role, capability),
            _ => {
                eprintln!("用法: lhn-access check <role> <capability>");
                std::process::exit(2);
            }
        },
        Some("init") => init().await,
        Some(other) => {
            eprintln!("未知参数: {}", other);
            print_help();
            std::process::exit(1);
        }
    }
}

/// 打印权限矩阵
fn print_matrix(json: bool) -> anyhow::Result<()> {
    let matrix = PermissionTables::global().matrix();

    if json {
        let rows: Vec<serde_json::Value> = matrix
            .iter()
            .map(|(capability, roles)| {
                serde_json::json!({
                    "capability": capability.to_string(),
                    "roles": roles,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (capability, roles) in matrix {
        let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        println!("{:<40} {}", capability.to_string(), names.join(", "));
    }
    Ok(())
}

/// 单项权限检查；未知角色一律拒绝
fn check(role: &str, capability: &str) -> anyhow::Result<()> {
    let capability: Capability = capability
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid capability: {}", e))?;

    let allowed = PermissionTables::global().allows_role_name(role, capability);
    println!("{}", if allowed { "allow" } else { "deny" });
    Ok(())
}

/// 加载配置、迁移数据库并创建初始管理员
async fn init() -> anyhow::Result<()> {
    // 加载 .env 文件（开发环境）
    if let Ok(env) = std::env::var("LHN_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    telemetry::init_telemetry(&config);

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let user_service = UserService::new(pool.clone(), Arc::new(config), PolicyEvaluator::new())?;
    match user_service.ensure_bootstrap_admin().await? {
        Some(admin) => tracing::info!(username = %admin.username, "Bootstrap admin ready"),
        None => tracing::info!("Existing accounts found, bootstrap skipped"),
    }

    pool.close().await;
    tracing::info!("Initialization complete");
    Ok(())
}

/// 打印帮助信息
fn print_help() {
    println!("lhn-access {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: lhn-access <命令> [参数]");
    println!();
    println!("命令:");
    println!("  matrix [--json]            打印权限矩阵");
    println!("  check <role> <capability>  检查角色是否拥有某项权限");
    println!("                             例: check teacher \"search(veterans)\"");
    println!("  init                       运行迁移并创建初始管理员");
    println!("  --version                  打印版本信息并退出");
    println!("  --help                     打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 LHN_ 前缀的环境变量完成，例如 LHN_DATABASE__URL");
}
